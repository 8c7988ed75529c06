use std::fmt;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warning,
    Verbose,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => f.write_str("info"),
            Level::Warning => f.write_str("warning"),
            Level::Verbose => f.write_str("verbose"),
        }
    }
}

/// Receives leveled messages from the planning passes.
///
/// Passed explicitly to every pass that can report; nothing in the core
/// writes to a global sink.
pub trait Diagnostics {
    fn report(&mut self, level: Level, message: String);

    fn info(&mut self, message: String) {
        self.report(Level::Info, message);
    }

    fn warn(&mut self, message: String) {
        self.report(Level::Warning, message);
    }

    fn verbose(&mut self, message: String) {
        self.report(Level::Verbose, message);
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&mut self, level: Level, message: String) {
        match level {
            Level::Info => log::info!("{message}"),
            Level::Warning => log::warn!("{message}"),
            Level::Verbose => log::debug!("{message}"),
        }
    }
}

/// Keeps every message in memory, optionally forwarding to another sink.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    pub messages: Vec<(Level, String)>,
    forward_to_log: bool,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect and also log each message as it arrives.
    pub fn logging() -> Self {
        Self {
            messages: Vec::new(),
            forward_to_log: true,
        }
    }

    pub fn count(&self, level: Level) -> usize {
        self.messages.iter().filter(|(l, _)| *l == level).count()
    }

    pub fn at(&self, level: Level) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(move |(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn report(&mut self, level: Level, message: String) {
        if self.forward_to_log {
            LogDiagnostics.report(level, message.clone());
        }
        self.messages.push((level, message));
    }
}
