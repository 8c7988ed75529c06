use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};

/// Reflection-style generic names, e.g.
/// ``Wrapper`1[[Inner.Type, Asm, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null]]``.
static GENERIC_FULLNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<generic>.+)`\d+\[\[(?P<inner>.+?), .+?, Version=\d+\.\d+\.\d+\.\d+, Culture=.+?, PublicKeyToken=.+?\]\]$",
    )
    .unwrap()
});
static UNSAFE_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_]").unwrap());
static UNSAFE_CHARS_KEEP_DOTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_.]").unwrap());

/// Whether `.` survives sanitation. Namespaces keep dots, identifiers don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotPolicy {
    Keep,
    Replace,
}

/// Reserved words of the target language and the prefix used to escape them.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    words: HashSet<&'static str>,
    escape_prefix: &'static str,
}

impl KeywordTable {
    pub fn new(words: impl IntoIterator<Item = &'static str>, escape_prefix: &'static str) -> Self {
        Self {
            words: words.into_iter().collect(),
            escape_prefix,
        }
    }

    /// A table with no reserved words.
    pub fn empty() -> Self {
        Self::new([], "")
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn escape(&self, word: &str) -> String {
        format!("{}{}", self.escape_prefix, word)
    }
}

/// Flatten a reflection-style generic full name into `Generic_Inner` so the
/// general pass below doesn't shred it into separator soup.
pub fn flatten_generic(raw: &str) -> Cow<'_, str> {
    GENERIC_FULLNAME_RE.replace(raw, "${generic}_${inner}")
}

/// Sanitize with `_` as the replacement character.
pub fn sanitize(raw: &str, dots: DotPolicy) -> String {
    sanitize_with(raw, dots, '_')
}

/// Replace every character that can't appear in an identifier with
/// `replacement`, collapse runs of `replacement`, and trim it from both ends.
pub fn sanitize_with(raw: &str, dots: DotPolicy, replacement: char) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let flattened = flatten_generic(raw);
    let re = match dots {
        DotPolicy::Keep => &*UNSAFE_CHARS_KEEP_DOTS_RE,
        DotPolicy::Replace => &*UNSAFE_CHARS_RE,
    };
    let mut buf = [0u8; 4];
    let replaced = re.replace_all(&flattened, NoExpand(replacement.encode_utf8(&mut buf)));

    let mut out = String::with_capacity(replaced.len());
    let mut prev_was_replacement = false;
    for ch in replaced.chars() {
        let is_replacement = ch == replacement;
        if !(is_replacement && prev_was_replacement) {
            out.push(ch);
        }
        prev_was_replacement = is_replacement;
    }

    out.trim_matches(replacement).to_string()
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// PascalCase method name: drops a leading `api_`, splits on `_` and
/// capitalizes each segment.
///
/// - `api/pets/{petId}` → `PetsPetId`
/// - `list_all-pets` → `ListAllPets`
pub fn to_method_name(raw: &str) -> String {
    let safe = sanitize(raw, DotPolicy::Replace);
    let safe = safe.strip_prefix("api_").unwrap_or(&safe);
    let name: String = safe
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(upper_first)
        .collect();
    if starts_with_digit(&name) {
        format!("_{name}")
    } else {
        name
    }
}

/// camelCase variable name, escaped if it is a keyword or starts with a digit.
pub fn to_variable_name(raw: &str, keywords: &KeywordTable) -> String {
    let safe = sanitize(raw, DotPolicy::Replace);
    if safe.is_empty() {
        return "value".to_string();
    }
    let name = lower_first(&safe);
    if starts_with_digit(&name) {
        format!("_{name}")
    } else if keywords.contains(&name) {
        keywords.escape(&name)
    } else {
        name
    }
}

/// Member (property/type) name: first letter upper-cased, `_` before a
/// leading digit.
pub fn to_member_name(raw: &str) -> String {
    let safe = sanitize(raw, DotPolicy::Replace);
    if safe.is_empty() {
        return "Value".to_string();
    }
    if starts_with_digit(&safe) {
        format!("_{safe}")
    } else {
        upper_first(&safe)
    }
}

/// Type name for a schema key.
pub fn to_type_name(key: &str) -> String {
    let safe = sanitize(key, DotPolicy::Replace);
    if safe.is_empty() {
        "Unnamed".to_string()
    } else if starts_with_digit(&safe) {
        format!("_{safe}")
    } else {
        safe
    }
}

/// Hands out names that are unique within one scope, suffixing `_1`, `_2`, ...
/// on collision.
#[derive(Debug, Default, Clone)]
pub struct Uniquifier {
    taken: HashSet<String>,
}

impl Uniquifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with names that must never be handed out.
    pub fn with_reserved<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: reserved.into_iter().map(Into::into).collect(),
        }
    }

    pub fn reserve(&mut self, name: impl Into<String>) {
        self.taken.insert(name.into());
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    pub fn claim(&mut self, name: &str) -> String {
        if self.taken.insert(name.to_string()) {
            return name.to_string();
        }
        let mut counter = 1usize;
        loop {
            let candidate = format!("{name}_{counter}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Lazy, order-preserving `(item, unique name)` sequence.
pub struct Uniquify<I, F> {
    inner: I,
    key_fn: F,
    names: Uniquifier,
}

impl<I, F> Iterator for Uniquify<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item) -> String,
{
    type Item = (I::Item, String);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        let key = (self.key_fn)(&item);
        let name = self.names.claim(&key);
        Some((item, name))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Pair every item with a name derived from `key_fn`, suffixing repeats.
/// Each call starts from a clean slate.
pub fn uniquify<I, F>(items: I, key_fn: F) -> Uniquify<I::IntoIter, F>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> String,
{
    Uniquify {
        inner: items.into_iter(),
        key_fn,
        names: Uniquifier::new(),
    }
}
