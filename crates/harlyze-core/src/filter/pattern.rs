use regex::{Regex, RegexBuilder};

/// A pattern tested against a single string field of an entry
#[derive(Debug, Clone)]
pub enum ValuePattern {
    /// Exact, case-sensitive string equality
    Exact(String),
    /// Case-insensitive regex search anywhere in the value
    Regex(Regex),
}

impl ValuePattern {
    /// Build a pattern in regex or exact mode
    pub fn parse(pattern: &str, use_regex: bool) -> crate::Result<Self> {
        if use_regex {
            Self::regex(pattern)
        } else {
            Ok(Self::exact(pattern))
        }
    }

    pub fn regex(pattern: &str) -> crate::Result<Self> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(ValuePattern::Regex(regex))
    }

    pub fn exact(pattern: &str) -> Self {
        ValuePattern::Exact(pattern.to_string())
    }

    /// Check if a value matches this pattern
    ///
    /// Regex patterns are unanchored: `"2"` matches `"302"`.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            ValuePattern::Exact(pattern) => value == pattern,
            ValuePattern::Regex(regex) => regex.is_match(value),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ValuePattern::Exact(pattern) => pattern,
            ValuePattern::Regex(regex) => regex.as_str(),
        }
    }
}
