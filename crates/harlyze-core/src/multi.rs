//! Statistics over several recordings of the same page load.

use crate::asset::{AssetType, Metric};
use crate::page::Page;
use crate::parser::HarParser;
use crate::Result;
use serde_json::Value;

/// Aggregation settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Only aggregate pages with this id; `None` takes every page
    pub page_id: Option<String>,
    /// Decimal places kept when rounding means and deviations
    pub decimal_precision: u32,
}

impl AggregatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_id(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    pub fn with_decimal_precision(mut self, precision: u32) -> Self {
        self.decimal_precision = precision;
        self
    }
}

/// Aggregates timing metrics across several decoded HAR documents
#[derive(Debug, Clone)]
pub struct MultiRunAggregator {
    har_data: Vec<Value>,
    config: AggregatorConfig,
}

impl MultiRunAggregator {
    pub fn new(har_data: Vec<Value>) -> Self {
        Self::with_config(har_data, AggregatorConfig::default())
    }

    pub fn with_config(har_data: Vec<Value>, config: AggregatorConfig) -> Self {
        Self { har_data, config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Number of HAR documents being aggregated
    pub fn run_count(&self) -> usize {
        self.har_data.len()
    }

    /// Pages across every document, rebuilt on each call.
    ///
    /// With a configured page id only pages with that id are kept; otherwise
    /// every page of every document is returned, unknown pages included.
    pub fn pages(&self) -> Result<Vec<Page>> {
        let mut pages = Vec::new();
        for (run, har) in self.har_data.iter().enumerate() {
            let run_pages = HarParser::new(har.clone())?.into_pages()?;
            tracing::debug!("Run {} has {} pages", run, run_pages.len());
            match &self.config.page_id {
                Some(page_id) => pages.extend(
                    run_pages
                        .into_iter()
                        .filter(|page| page.page_id() == page_id),
                ),
                None => pages.extend(run_pages),
            }
        }
        Ok(pages)
    }

    /// Available values of `metric`, one per page
    pub fn load_times(&self, metric: Metric) -> Result<Vec<f64>> {
        metric_values(&self.pages()?, metric)
    }

    /// Values by metric name ("page", "ttfb" or an asset type)
    pub fn get_load_times(&self, metric: &str) -> Result<Vec<f64>> {
        self.load_times(metric.parse()?)
    }

    /// Sample standard deviation of `metric`
    pub fn stdev(&self, metric: Metric) -> Result<f64> {
        Ok(sample_stdev(
            &self.load_times(metric)?,
            self.config.decimal_precision,
        ))
    }

    /// Standard deviation by metric name ("page", "ttfb" or an asset type)
    pub fn get_stdev(&self, metric: &str) -> Result<f64> {
        self.stdev(metric.parse()?)
    }

    /// Mean of `metric`, `None` when no page has a value
    pub fn mean(&self, metric: Metric) -> Result<Option<f64>> {
        Ok(mean(
            &self.load_times(metric)?,
            self.config.decimal_precision,
        ))
    }

    pub fn page_load_time(&self) -> Result<Option<f64>> {
        self.mean(Metric::Page)
    }

    pub fn time_to_first_byte(&self) -> Result<Option<f64>> {
        self.mean(Metric::Ttfb)
    }

    pub fn js_load_time(&self) -> Result<Option<f64>> {
        self.mean(Metric::Asset(AssetType::Js))
    }

    pub fn css_load_time(&self) -> Result<Option<f64>> {
        self.mean(Metric::Asset(AssetType::Css))
    }

    pub fn image_load_time(&self) -> Result<Option<f64>> {
        self.mean(Metric::Asset(AssetType::Image))
    }

    pub fn html_load_time(&self) -> Result<Option<f64>> {
        self.mean(Metric::Asset(AssetType::Html))
    }

    pub fn audio_load_time(&self) -> Result<Option<f64>> {
        self.mean(Metric::Asset(AssetType::Audio))
    }

    pub fn video_load_time(&self) -> Result<Option<f64>> {
        self.mean(Metric::Asset(AssetType::Video))
    }

    pub fn text_load_time(&self) -> Result<Option<f64>> {
        self.mean(Metric::Asset(AssetType::Text))
    }
}

/// Values of `metric` for each page that has one
pub(crate) fn metric_values(pages: &[Page], metric: Metric) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(pages.len());
    for page in pages {
        if let Some(value) = page.metric(metric)? {
            values.push(value);
        }
    }
    Ok(values)
}

/// Beyond this many places an f64 has no digits left to round
const MAX_PRECISION: u32 = 15;

/// Round half to even at `precision` decimal places
pub(crate) fn round_to(value: f64, precision: u32) -> f64 {
    if precision > MAX_PRECISION {
        return value;
    }
    let factor = 10f64.powi(precision as i32);
    (value * factor).round_ties_even() / factor
}

pub(crate) fn mean(values: &[f64], precision: u32) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(round_to(sum / values.len() as f64, precision))
}

/// Sample (n - 1) standard deviation; 0 for fewer than two values or an
/// all-zero sample
pub(crate) fn sample_stdev(values: &[f64], precision: u32) -> f64 {
    let sum: f64 = values.iter().sum();
    if values.len() < 2 || sum == 0.0 {
        return 0.0;
    }
    let avg = sum / values.len() as f64;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    round_to(variance.sqrt(), precision)
}
