mod matcher;
mod pattern;

pub use matcher::{
    HeaderSide, match_content_type, match_headers, match_http_version, match_request_type,
    match_status_code,
};
pub use pattern::ValuePattern;

use crate::Result;
use crate::har::Entry;

/// Filter criteria for page entries
///
/// All filter conditions are combined with AND logic - an entry must match
/// ALL specified criteria to be included. Criteria left unset are not checked.
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    /// Request method pattern (e.g. "GET", ".*ST")
    pub request_type: Option<String>,
    /// Response MIME type pattern (e.g. "image.*")
    pub content_type: Option<String>,
    /// Status code pattern, compared against the decimal string
    pub status_code: Option<String>,
    /// Response HTTP version pattern
    pub http_version: Option<String>,
    /// Keep entries whose `time` is at least this many milliseconds
    pub load_time_gt: Option<f64>,
    /// Regex search (true) or exact string equality (false)
    pub use_regex: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            request_type: None,
            content_type: None,
            status_code: None,
            http_version: None,
            load_time_gt: None,
            use_regex: true,
        }
    }
}

impl FilterCriteria {
    /// Create a new FilterCriteria with default (no filtering, regex mode)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_type(mut self, pattern: impl Into<String>) -> Self {
        self.request_type = Some(pattern.into());
        self
    }

    pub fn with_content_type(mut self, pattern: impl Into<String>) -> Self {
        self.content_type = Some(pattern.into());
        self
    }

    pub fn with_status_code(mut self, pattern: impl Into<String>) -> Self {
        self.status_code = Some(pattern.into());
        self
    }

    pub fn with_http_version(mut self, pattern: impl Into<String>) -> Self {
        self.http_version = Some(pattern.into());
        self
    }

    /// Keep entries with `time >= threshold`.
    ///
    /// The bound is inclusive despite the name; existing callers rely on it.
    pub fn with_load_time_gt(mut self, threshold: f64) -> Self {
        self.load_time_gt = Some(threshold);
        self
    }

    /// Switch between regex search and exact matching for every pattern
    pub fn with_regex(mut self, use_regex: bool) -> Self {
        self.use_regex = use_regex;
        self
    }

    /// Compile the patterns once for repeated matching
    pub fn compile(&self) -> Result<CompiledFilter> {
        let compile = |pattern: &Option<String>| {
            pattern
                .as_deref()
                .map(|p| ValuePattern::parse(p, self.use_regex))
                .transpose()
        };

        Ok(CompiledFilter {
            request_type: compile(&self.request_type)?,
            content_type: compile(&self.content_type)?,
            status_code: compile(&self.status_code)?,
            http_version: compile(&self.http_version)?,
            load_time_gt: self.load_time_gt,
        })
    }
}

/// [`FilterCriteria`] with its patterns compiled
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    request_type: Option<ValuePattern>,
    content_type: Option<ValuePattern>,
    status_code: Option<ValuePattern>,
    http_version: Option<ValuePattern>,
    load_time_gt: Option<f64>,
}

impl CompiledFilter {
    /// Check if an entry matches all filter criteria
    pub fn matches(&self, entry: &Entry) -> Result<bool> {
        if let Some(pattern) = &self.request_type
            && !match_request_type(entry, pattern)?
        {
            return Ok(false);
        }
        if let Some(pattern) = &self.content_type
            && !match_content_type(entry, pattern)?
        {
            return Ok(false);
        }
        if let Some(pattern) = &self.status_code
            && !match_status_code(entry, pattern)?
        {
            return Ok(false);
        }
        if let Some(pattern) = &self.http_version
            && !match_http_version(entry, pattern)?
        {
            return Ok(false);
        }
        if let Some(threshold) = self.load_time_gt
            && entry.time()? < threshold
        {
            return Ok(false);
        }
        Ok(true)
    }
}
