use super::MetricSummary;
use crate::Result;
use crate::asset::Metric;
use crate::multi::{MultiRunAggregator, mean, metric_values, sample_stdev};
use serde::{Deserialize, Serialize};

/// Means and standard deviations of every metric across runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    pub runs: usize,
    pub page_id: Option<String>,
    pub page_count: usize,
    pub decimal_precision: u32,
    pub metrics: Vec<MetricSummary>,
}

impl AggregateReport {
    pub fn from_aggregator(aggregator: &MultiRunAggregator) -> Result<Self> {
        let config = aggregator.config();
        let pages = aggregator.pages()?;

        let metrics = Metric::ALL
            .into_iter()
            .map(|metric| {
                let values = metric_values(&pages, metric)?;
                Ok(MetricSummary {
                    metric: metric.to_string(),
                    samples: values.len(),
                    mean: mean(&values, config.decimal_precision),
                    stdev: sample_stdev(&values, config.decimal_precision),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Aggregated {} pages from {} runs",
            pages.len(),
            aggregator.run_count()
        );

        Ok(Self {
            runs: aggregator.run_count(),
            page_id: config.page_id.clone(),
            page_count: pages.len(),
            decimal_precision: config.decimal_precision,
            metrics,
        })
    }

    pub fn metric(&self, name: &str) -> Option<&MetricSummary> {
        self.metrics.iter().find(|summary| summary.metric == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multi::AggregatorConfig;
    use serde_json::{Value, json};

    fn run(on_load: f64, image_time: f64) -> Value {
        json!({
            "log": {
                "version": "1.2",
                "creator": {"name": "test", "version": "1"},
                "pages": [{"id": "page_1", "pageTimings": {"onLoad": on_load}}],
                "entries": [{
                    "pageref": "page_1",
                    "startedDateTime": "2020-02-02T02:02:02.000Z",
                    "time": image_time,
                    "request": {"method": "GET", "url": "https://img.example/a.png", "headers": []},
                    "response": {
                        "status": 200,
                        "headers": [],
                        "content": {"size": 10, "mimeType": "image/png"},
                        "bodySize": 10
                    },
                    "timings": {"wait": image_time}
                }]
            }
        })
    }

    #[test]
    fn test_matches_aggregator() {
        let aggregator = MultiRunAggregator::with_config(
            vec![run(500.0, 40.0), run(520.0, 60.0), run(540.0, 80.0)],
            AggregatorConfig::new().with_page_id("page_1"),
        );
        let report = AggregateReport::from_aggregator(&aggregator).unwrap();

        assert_eq!(report.runs, 3);
        assert_eq!(report.page_count, 3);
        assert_eq!(report.page_id.as_deref(), Some("page_1"));
        assert_eq!(report.metrics.len(), Metric::ALL.len());

        let page = report.metric("page").unwrap();
        assert_eq!(page.samples, 3);
        assert_eq!(page.mean, aggregator.page_load_time().unwrap());
        assert_eq!(page.stdev, 20.0);

        let image = report.metric("image").unwrap();
        assert_eq!(image.mean, Some(60.0));
        assert_eq!(image.stdev, aggregator.stdev(Metric::Asset(crate::AssetType::Image)).unwrap());

        let audio = report.metric("audio").unwrap();
        assert_eq!(audio.mean, Some(0.0));
        assert_eq!(audio.stdev, 0.0);
    }

    #[test]
    fn test_no_runs() {
        let report = AggregateReport::from_aggregator(&MultiRunAggregator::new(vec![])).unwrap();
        assert_eq!(report.runs, 0);
        assert!(report.metrics.iter().all(|m| m.mean.is_none() && m.stdev == 0.0));
    }
}
