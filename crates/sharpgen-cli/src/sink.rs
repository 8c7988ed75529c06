use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sharpgen_core::error::EmitError;
use sharpgen_core::{EmissionSink, GeneratedFile};

/// Writes generated files below a root directory, creating parents as
/// needed.
pub struct DirectorySink {
    root: PathBuf,
    written: usize,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Remove the root directory and everything below it. A missing
    /// directory is not an error.
    pub fn clean(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.root) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn write(&self, file: &GeneratedFile) -> io::Result<PathBuf> {
        let path = self.root.join(Path::new(&file.path));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &file.content)?;
        Ok(path)
    }
}

impl EmissionSink for DirectorySink {
    fn emit(&mut self, file: &GeneratedFile) -> Result<(), EmitError> {
        let path = self.write(file).map_err(|source| EmitError::Io {
            path: self.root.join(&file.path).display().to_string(),
            source,
        })?;
        log::debug!("wrote {}", path.display());
        self.written += 1;
        Ok(())
    }
}
