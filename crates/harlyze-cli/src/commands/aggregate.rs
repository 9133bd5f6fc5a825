use super::{format_ms, table_cell};
use crate::OutputFormat;
use anyhow::{Result, bail};
use harlyze_core::analysis::AggregateReport;
use harlyze_core::har::HarReader;
use harlyze_core::{AggregatorConfig, MultiRunAggregator};
use std::path::{Path, PathBuf};

/// Aggregate metrics across HAR files recorded from repeated runs
pub fn aggregate_files(
    files: &[PathBuf],
    page_id: Option<String>,
    precision: u32,
) -> Result<AggregateReport> {
    if files.is_empty() {
        bail!("At least one HAR file is required");
    }

    let mut config = AggregatorConfig::new().with_decimal_precision(precision);
    if let Some(page_id) = page_id {
        config = config.with_page_id(page_id);
    }

    let aggregator = MultiRunAggregator::with_config(HarReader::from_files(files)?, config);
    Ok(AggregateReport::from_aggregator(&aggregator)?)
}

pub fn execute(
    files: &[PathBuf],
    page_id: Option<String>,
    precision: u32,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Aggregating {} HAR files", files.len());

    let report = aggregate_files(files, page_id, precision)?;
    if report.page_count == 0 {
        tracing::warn!("No pages matched, every metric is unavailable");
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report, files),
    }

    Ok(())
}

fn output_pretty(report: &AggregateReport, files: &[PathBuf]) {
    use console::style;

    println!("\n{}", style("Multi-Run Aggregate").bold().cyan());
    println!("{}", style("===================").cyan());

    println!("\n{}", style("Runs:").bold());
    for file in files {
        println!("  {}", file_label(file));
    }
    if let Some(page_id) = &report.page_id {
        println!("  Page:   {}", page_id);
    }
    println!("  Pages aggregated: {}", report.page_count);

    println!("\n{}", style("Metrics:").bold());
    println!(
        "  {:<6} {:>7} {:>14} {:>14}",
        "metric", "samples", "mean", "stdev"
    );
    for metric in &report.metrics {
        println!(
            "  {:<6} {:>7} {:>14} {:>14}",
            metric.metric,
            metric.samples,
            format_ms(metric.mean),
            format_ms(Some(metric.stdev))
        );
    }
    println!();
}

fn output_table(report: &AggregateReport) {
    println!("Metric,Samples,Mean (ms),Stdev (ms)");
    for metric in &report.metrics {
        println!(
            "{},{},{},{}",
            metric.metric,
            metric.samples,
            table_cell(metric.mean),
            table_cell(Some(metric.stdev))
        );
    }
}

fn file_label(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}
