//! Placeholder substitution for configured text.
//!
//! A [`Replacement`] names a placeholder and the text it stands for. A
//! [`ReplacementProcessor`] decides how placeholders look inside the text;
//! the stock [`PlaceholderProcessor`] wraps each key in a prefix/suffix pair
//! (`%player%`, `{player}`, `<player>`) and performs literal substring
//! replacement, one replacement at a time in the order given.

use std::fmt::Display;

/// An immutable (placeholder, text) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    key: String,
    value: String,
}

impl Replacement {
    /// Create a replacement from a key and its text.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a replacement from anything displayable (numbers, flags, ...).
    #[must_use]
    pub fn display(key: impl Into<String>, value: impl Display) -> Self {
        Self::new(key, value.to_string())
    }

    /// Create a replacement from a collection, joined with newlines.
    #[must_use]
    pub fn lines<I, S>(key: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = lines
            .into_iter()
            .map(|line| line.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(key, joined)
    }

    /// Placeholder name, without decoration.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Substituted text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Strategy for injecting [`Replacement`]s into text.
pub trait ReplacementProcessor: Send + Sync {
    /// Apply every replacement to `text`.
    fn process(&self, text: &str, replacements: &[Replacement]) -> String;

    /// Like [`process`](Self::process), passing absent text through unchanged.
    fn process_opt(&self, text: Option<&str>, replacements: &[Replacement]) -> Option<String> {
        text.map(|t| self.process(t, replacements))
    }

    /// Apply the replacements to every line independently.
    fn process_lines(&self, lines: &[String], replacements: &[Replacement]) -> Vec<String> {
        lines
            .iter()
            .map(|line| self.process(line, replacements))
            .collect()
    }
}

/// Literal `prefix + key + suffix` substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderProcessor {
    prefix: String,
    suffix: String,
}

impl PlaceholderProcessor {
    /// Processor with a custom delimiter pair.
    #[must_use]
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// `%key%` placeholders. This is the default style.
    #[must_use]
    pub fn percent() -> Self {
        Self::new("%", "%")
    }

    /// `{key}` placeholders.
    #[must_use]
    pub fn brackets() -> Self {
        Self::new("{", "}")
    }

    /// `<key>` placeholders.
    #[must_use]
    pub fn chevron() -> Self {
        Self::new("<", ">")
    }

    /// Opening delimiter.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Closing delimiter.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    fn token(&self, key: &str) -> String {
        format!("{}{key}{}", self.prefix, self.suffix)
    }
}

impl Default for PlaceholderProcessor {
    fn default() -> Self {
        Self::percent()
    }
}

impl ReplacementProcessor for PlaceholderProcessor {
    fn process(&self, text: &str, replacements: &[Replacement]) -> String {
        let mut result = text.to_owned();
        for replacement in replacements {
            let token = self.token(replacement.key());
            if result.contains(&token) {
                result = result.replace(&token, replacement.value());
            }
        }
        result
    }
}
