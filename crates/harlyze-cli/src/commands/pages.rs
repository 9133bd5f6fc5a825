use super::{format_ms, table_cell};
use crate::OutputFormat;
use anyhow::Result;
use harlyze_core::analysis::{AnalysisReport, Analyzer, PageAnalyzer, SummaryAnalyzer};
use harlyze_core::har::HarReader;
use std::path::Path;

/// Analyze a HAR file and return the summary plus one report per page
pub fn analyze_file(file: &Path, top_n: usize) -> Result<AnalysisReport> {
    tracing::debug!("Reading HAR file: {}", file.display());

    let parser = HarReader::from_file(file)?;

    let summary = SummaryAnalyzer.analyze(&parser)?;
    let pages = PageAnalyzer::new(top_n).analyze(&parser)?;

    Ok(AnalysisReport { summary, pages })
}

pub fn execute(file: &Path, top_n: usize, format: OutputFormat) -> Result<()> {
    tracing::info!("Analyzing pages in: {}", file.display());

    let report = analyze_file(file, top_n)?;

    tracing::debug!("Rendering {} pages as {:?}", report.pages.len(), format);
    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

fn output_pretty(report: &AnalysisReport) {
    use console::style;

    println!("\n{}", style("HAR Page Report").bold().cyan());
    println!("{}", style("===============").cyan());

    let summary = &report.summary;
    println!("\n{}", style("Summary:").bold());
    println!("  HAR Version:        {}", summary.version);
    println!(
        "  Creator:            {} {}",
        summary.creator.name, summary.creator.version
    );
    if let Some(browser) = &summary.browser {
        println!("  Browser:            {} {}", browser.name, browser.version);
    }
    if let Some(hostname) = &summary.hostname {
        println!("  Hostname:           {}", hostname);
    }
    println!("  Pages:              {}", summary.page_count);
    println!("  Total Entries:      {}", summary.total_entries);
    println!("  Unique Domains:     {}", summary.unique_domains);
    println!("  Response Body Size: {} bytes", summary.total_size);
    if let Some((start, end)) = &summary.date_range {
        println!("  Date Range:         {} to {}", start, end);
    }
    if !summary.http_versions.is_empty() {
        println!("  HTTP Versions:      {}", summary.http_versions.join(", "));
    }

    for page in &report.pages {
        let heading = if page.title.is_empty() {
            page.page_id.clone()
        } else {
            format!("{} ({})", page.page_id, page.title)
        };
        println!("\n{}", style(format!("Page {}:", heading)).bold());
        if let Some(url) = &page.url {
            println!("  URL:                {}", url);
        }
        if let Some(hostname) = &page.hostname {
            println!("  Hostname:           {}", hostname);
        }
        println!("  Entries:            {}", page.entry_count);
        println!("  Time To First Byte: {}", format_ms(page.time_to_first_byte));
        println!("  Initial Load:       {}", format_ms(page.initial_load_time));
        println!("  Content Load:       {}", format_ms(page.content_load_time));
        println!("  Page Load:          {}", format_ms(page.page_load_time));
        println!(
            "  Page Size:          {} bytes ({} transferred)",
            page.page_size, page.page_size_trans
        );

        println!("  {}", style("Assets:").underlined());
        for asset in page.assets.iter().filter(|a| a.files > 0) {
            println!(
                "    {:<6} {:>3} files {:>10} bytes  {}",
                asset.asset.as_str(),
                asset.files,
                asset.size,
                format_ms(Some(asset.load_time))
            );
        }

        if !page.duplicate_urls.is_empty() {
            println!("  {}", style("Duplicate Requests:").yellow());
            for (url, count) in &page.duplicate_urls {
                println!("    {}x {}", count, url);
            }
        }

        if !page.slowest_requests.is_empty() {
            println!("  {}", style("Slowest Requests:").underlined());
            for (i, req) in page.slowest_requests.iter().enumerate() {
                println!(
                    "    {}. [{:.2} ms] {} {} - {}",
                    i + 1,
                    req.time,
                    req.method,
                    req.status,
                    req.url
                );
            }
        }
    }

    println!();
}

fn output_json(report: &AnalysisReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

fn output_table(report: &AnalysisReport) {
    println!(
        "Page,URL,Entries,TTFB (ms),Initial Load (ms),Content Load (ms),Page Load (ms),Size (bytes),Transferred (bytes)"
    );
    for page in &report.pages {
        println!(
            "{},{},{},{},{},{},{},{},{}",
            page.page_id,
            page.url.as_deref().unwrap_or_default(),
            page.entry_count,
            table_cell(page.time_to_first_byte),
            table_cell(page.initial_load_time),
            table_cell(page.content_load_time),
            table_cell(page.page_load_time),
            page.page_size,
            page.page_size_trans
        );
    }
}
