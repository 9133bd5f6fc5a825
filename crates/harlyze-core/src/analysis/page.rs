use super::{Analyzer, AssetReport, PageReport, SlowRequest};
use crate::Result;
use crate::asset::AssetType;
use crate::page::Page;
use crate::parser::HarParser;
use std::cmp::Ordering;
use url::Url;

pub struct PageAnalyzer {
    top_n: usize,
}

impl PageAnalyzer {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

impl Default for PageAnalyzer {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Analyzer for PageAnalyzer {
    type Output = Vec<PageReport>;

    fn analyze(&self, parser: &HarParser) -> Result<Self::Output> {
        tracing::debug!("Analyzing page performance");

        let reports = parser
            .pages()?
            .iter()
            .map(|page| PageReport::from_page(page, self.top_n))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Page analysis complete: {} pages", reports.len());
        Ok(reports)
    }
}

impl PageReport {
    /// Snapshot every metric of `page`, listing its `top_n` slowest requests
    pub fn from_page(page: &Page, top_n: usize) -> Result<Self> {
        let url = page.url()?.map(str::to_string);
        let hostname = match page.hostname()? {
            Some(host) => Some(host.to_string()),
            // HTTP/2 captures carry :authority instead of Host
            None => url
                .as_deref()
                .and_then(|u| Url::parse(u).ok())
                .and_then(|u| u.host_str().map(str::to_string)),
        };

        let assets = AssetType::ALL
            .into_iter()
            .map(|asset| {
                Ok(AssetReport {
                    asset,
                    files: page.files_for(asset)?.len(),
                    size: page.size_for(asset)?,
                    size_trans: page.size_trans_for(asset)?,
                    load_time: page.load_time_for(asset)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut slowest_requests = page
            .entries()
            .iter()
            .map(|entry| {
                Ok(SlowRequest {
                    url: entry.url()?.to_string(),
                    time: entry.time()?,
                    method: entry.method()?.to_string(),
                    status: entry.status()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        slowest_requests
            .sort_by(|a, b| b.time.partial_cmp(&a.time).unwrap_or(Ordering::Equal));
        slowest_requests.truncate(top_n);

        Ok(Self {
            page_id: page.page_id().to_string(),
            title: page.title().to_string(),
            url,
            hostname,
            entry_count: page.entries().len(),
            initial_load_time: page.initial_load_time()?,
            content_load_time: page.content_load_time(),
            page_load_time: page.page_load_time(),
            time_to_first_byte: page.time_to_first_byte()?,
            page_size: page.page_size()?,
            page_size_trans: page.page_size_trans(),
            assets,
            duplicate_urls: page.duplicate_url_request()?.clone(),
            slowest_requests,
        })
    }

    /// Report line for one asset category
    pub fn asset(&self, asset: AssetType) -> Option<&AssetReport> {
        self.assets.iter().find(|report| report.asset == asset)
    }
}
