mod aggregate;
mod page;
mod summary;

pub use aggregate::AggregateReport;
pub use page::PageAnalyzer;
pub use summary::SummaryAnalyzer;

use crate::asset::AssetType;
use crate::parser::{Creator, HarParser};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: SummaryStats,
    pub pages: Vec<PageReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub version: String,
    pub creator: Creator,
    pub browser: Option<Creator>,
    pub total_entries: usize,
    pub page_count: usize,
    pub total_size: i64,
    pub unique_domains: usize,
    pub date_range: Option<(String, String)>,
    pub http_versions: Vec<String>,
    pub hostname: Option<String>,
}

/// Every metric of one page; `None` marks a value the HAR file does not provide
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub page_id: String,
    pub title: String,
    pub url: Option<String>,
    pub hostname: Option<String>,
    pub entry_count: usize,
    pub initial_load_time: Option<f64>,
    pub content_load_time: Option<f64>,
    pub page_load_time: Option<f64>,
    pub time_to_first_byte: Option<f64>,
    pub page_size: i64,
    pub page_size_trans: i64,
    pub assets: Vec<AssetReport>,
    pub duplicate_urls: BTreeMap<String, usize>,
    pub slowest_requests: Vec<SlowRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetReport {
    pub asset: AssetType,
    pub files: usize,
    pub size: i64,
    pub size_trans: i64,
    pub load_time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlowRequest {
    pub url: String,
    pub time: f64,
    pub method: String,
    pub status: i64,
}

/// Mean and spread of one metric across runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: String,
    pub samples: usize,
    pub mean: Option<f64>,
    pub stdev: f64,
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, parser: &HarParser) -> crate::Result<Self::Output>;
}
