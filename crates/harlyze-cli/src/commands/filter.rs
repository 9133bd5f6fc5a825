use crate::OutputFormat;
use anyhow::Result;
use harlyze_core::filter::FilterCriteria;
use harlyze_core::har::{Entry, HarReader};
use serde::Serialize;
use std::path::Path;

/// One matching entry, flattened for output
#[derive(Debug, Clone, Serialize)]
pub struct EntryRow {
    pub started_date_time: String,
    pub method: String,
    pub url: String,
    pub status: i64,
    pub mime_type: String,
    pub http_version: Option<String>,
    pub time: f64,
}

impl EntryRow {
    fn from_entry(entry: &Entry) -> Result<Self> {
        let response = entry.response()?;
        Ok(Self {
            started_date_time: entry.started_date_time()?.to_string(),
            method: entry.method()?.to_string(),
            url: entry.url()?.to_string(),
            status: response.status()?,
            mime_type: response.mime_type()?.to_string(),
            http_version: response.http_version().ok().map(str::to_string),
            time: entry.time()?,
        })
    }
}

/// Turn command-line options into filter criteria
pub fn build_criteria(
    method: Option<String>,
    content_type: Option<String>,
    status: Option<String>,
    http_version: Option<String>,
    min_time: Option<f64>,
    exact: bool,
) -> FilterCriteria {
    let mut criteria = FilterCriteria::new().with_regex(!exact);

    if let Some(method) = method {
        criteria = criteria.with_request_type(method);
    }
    if let Some(content_type) = content_type {
        criteria = criteria.with_content_type(content_type);
    }
    if let Some(status) = status {
        criteria = criteria.with_status_code(status);
    }
    if let Some(http_version) = http_version {
        criteria = criteria.with_http_version(http_version);
    }
    if let Some(min_time) = min_time {
        criteria = criteria.with_load_time_gt(min_time);
    }

    criteria
}

/// Entries of `page_id` in `file` matching `criteria`, in chronological order
pub fn filter_file(file: &Path, page_id: &str, criteria: &FilterCriteria) -> Result<Vec<EntryRow>> {
    tracing::debug!("Filtering page {} of {}", page_id, file.display());

    let parser = HarReader::from_file(file)?;
    let page = parser.page(page_id)?;

    page.filter_entries(criteria)?
        .into_iter()
        .map(EntryRow::from_entry)
        .collect()
}

pub fn execute(
    file: &Path,
    page_id: &str,
    criteria: &FilterCriteria,
    format: OutputFormat,
) -> Result<()> {
    let rows = filter_file(file, page_id, criteria)?;
    tracing::info!("{} entries matched", rows.len());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => {
            println!("Started,Method,URL,Status,MIME Type,Time (ms)");
            for row in &rows {
                println!(
                    "{},{},{},{},{},{:.2}",
                    row.started_date_time, row.method, row.url, row.status, row.mime_type, row.time
                );
            }
        }
        OutputFormat::Pretty => {
            use console::style;

            println!(
                "\n{}",
                style(format!("{} matching entries on page {}", rows.len(), page_id))
                    .bold()
                    .cyan()
            );
            for row in &rows {
                let status = if row.status >= 400 {
                    style(row.status.to_string()).red()
                } else if (300..400).contains(&row.status) {
                    style(row.status.to_string()).yellow()
                } else {
                    style(row.status.to_string()).green()
                };
                println!(
                    "  [{:>9.2} ms] {} {} {} ({})",
                    row.time, status, row.method, row.url, row.mime_type
                );
            }
            println!();
        }
    }

    Ok(())
}
