use super::{Analyzer, SummaryStats};
use crate::Result;
use crate::parser::HarParser;
use std::collections::{BTreeSet, HashSet};
use url::Url;

pub struct SummaryAnalyzer;

impl Analyzer for SummaryAnalyzer {
    type Output = SummaryStats;

    fn analyze(&self, parser: &HarParser) -> Result<Self::Output> {
        tracing::debug!("Analyzing HAR summary statistics");

        let entries = parser.entries()?;
        let total_entries = entries.len();

        // Unknown sizes are reported as -1 or left out
        let mut total_size = 0;
        for entry in &entries {
            total_size += entry.response()?.known_body_size()?.unwrap_or(0).max(0);
        }

        let mut domains = HashSet::new();
        for entry in &entries {
            if let Ok(url) = Url::parse(entry.url()?)
                && let Some(domain) = url.domain()
            {
                domains.insert(domain.to_string());
            }
        }

        let first = entries
            .iter()
            .filter(|e| e.start_time().is_some())
            .min_by_key(|e| e.start_time());
        let last = entries
            .iter()
            .filter(|e| e.start_time().is_some())
            .max_by_key(|e| e.start_time());
        let date_range = match (first, last) {
            (Some(f), Some(l)) => Some((
                f.started_date_time()?.to_string(),
                l.started_date_time()?.to_string(),
            )),
            _ => None,
        };

        let mut http_versions = BTreeSet::new();
        for entry in &entries {
            if let Ok(version) = entry.request()?.http_version() {
                let normalized = normalize_http_version(version);
                if !normalized.is_empty() {
                    http_versions.insert(normalized);
                }
            }
        }

        let page_count = parser
            .pages()?
            .iter()
            .filter(|page| !page.is_unknown())
            .count();

        tracing::info!(
            "Summary analysis complete: {} entries, {} pages, {} domains",
            total_entries,
            page_count,
            domains.len()
        );

        Ok(SummaryStats {
            version: parser.version()?.to_string(),
            creator: parser.creator()?,
            browser: parser.browser()?,
            total_entries,
            page_count,
            total_size,
            unique_domains: domains.len(),
            date_range,
            http_versions: http_versions.into_iter().collect(),
            hostname: parser.hostname()?.map(str::to_string),
        })
    }
}

/// Normalize HTTP version strings to a consistent format
fn normalize_http_version(version: &str) -> String {
    match version.to_lowercase().as_str() {
        "h2" | "http/2" | "http/2.0" => "HTTP/2.0".to_string(),
        "h3" | "http/3" | "http/3.0" => "HTTP/3.0".to_string(),
        "http/1.0" => "HTTP/1.0".to_string(),
        "http/1.1" => "HTTP/1.1".to_string(),
        _ => version.to_string(),
    }
}
