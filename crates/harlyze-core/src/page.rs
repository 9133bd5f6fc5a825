use crate::asset::{AssetType, Metric};
use crate::cache::try_get_or_init;
use crate::filter::{CompiledFilter, FilterCriteria};
use crate::har::Entry;
use crate::parser::HarParser;
use crate::timeline::create_asset_timeline;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Id of the synthetic page holding entries without a `pageref`
pub const UNKNOWN_PAGE_ID: &str = "unknown";

/// Page timing information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageTimings {
    /// Milliseconds from navigation start to DOM ready
    #[serde(rename = "onContentLoad", default)]
    pub on_content_load: Option<f64>,
    /// Milliseconds from navigation start to the load event
    #[serde(rename = "onLoad", default)]
    pub on_load: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One page load and the entries attributed to it.
///
/// Entries are kept in chronological order. If any entry has an unparsable
/// start time the file order is kept instead. Derived metrics are computed on
/// first access and cached; a page never changes after construction.
#[derive(Debug)]
pub struct Page {
    page_id: String,
    title: String,
    started_date_time: Option<String>,
    page_timings: PageTimings,
    entries: Vec<Entry>,
    actual_page: OnceLock<Option<usize>>,
    hostname: OnceLock<Option<String>>,
    time_to_first_byte: OnceLock<Option<f64>>,
    duplicate_url_request: OnceLock<BTreeMap<String, usize>>,
}

impl Page {
    /// Build the page `page_id` from a parsed HAR file.
    ///
    /// Fails with [`Error::PageNotFound`] unless the file lists the page or
    /// the id is [`UNKNOWN_PAGE_ID`].
    pub fn new(parser: &HarParser, page_id: &str) -> Result<Self> {
        tracing::debug!("Building page {}", page_id);

        let listed = parser
            .raw_pages()?
            .iter()
            .find(|page| page.get("id").and_then(Value::as_str) == Some(page_id));

        let (title, started_date_time, page_timings) = match listed {
            Some(page) => (
                page.get("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                page.get("startedDateTime")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                parse_page_timings(page)?,
            ),
            None if page_id == UNKNOWN_PAGE_ID => (String::new(), None, PageTimings::default()),
            None => return Err(Error::PageNotFound(page_id.to_string())),
        };

        let mut entries = parser
            .raw_entries()?
            .iter()
            .filter(|raw| belongs_to(raw, page_id))
            .cloned()
            .map(Entry::new)
            .collect::<Result<Vec<_>>>()?;

        if entries.iter().all(|entry| entry.start_time().is_some()) {
            entries.sort_by_key(|entry| entry.start_time());
        } else {
            tracing::warn!(
                "Page {} has entries with unparsable start times, keeping file order",
                page_id
            );
        }

        tracing::debug!("Page {} has {} entries", page_id, entries.len());

        Ok(Self {
            page_id: page_id.to_string(),
            title,
            started_date_time,
            page_timings,
            entries,
            actual_page: OnceLock::new(),
            hostname: OnceLock::new(),
            time_to_first_byte: OnceLock::new(),
            duplicate_url_request: OnceLock::new(),
        })
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn is_unknown(&self) -> bool {
        self.page_id == UNKNOWN_PAGE_ID
    }

    /// Page title, empty when the file gives none
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn started_date_time(&self) -> Option<&str> {
        self.started_date_time.as_deref()
    }

    pub fn page_timings(&self) -> &PageTimings {
        &self.page_timings
    }

    /// Entries in chronological order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries matching every criterion that is set, in chronological order
    pub fn filter_entries(&self, criteria: &FilterCriteria) -> Result<Vec<&Entry>> {
        self.filter_compiled(&criteria.compile()?)
    }

    fn filter_compiled(&self, filter: &CompiledFilter) -> Result<Vec<&Entry>> {
        let mut matched = Vec::new();
        for entry in &self.entries {
            if filter.matches(entry)? {
                matched.push(entry);
            }
        }
        Ok(matched)
    }

    /// Load time in ms of the entries matching `criteria`.
    ///
    /// With `asynchronous` the result is the wall-clock span during which any
    /// matching entry was loading; otherwise it is the sum of entry times.
    /// The load-time threshold of `criteria` is ignored here.
    pub fn get_load_time(&self, criteria: &FilterCriteria, asynchronous: bool) -> Result<f64> {
        let criteria = FilterCriteria {
            load_time_gt: None,
            ..criteria.clone()
        };
        let entries = self.filter_entries(&criteria)?;
        load_time_of(&entries, asynchronous)
    }

    /// Sum of positive response body sizes; absent sizes count as zero and
    /// mistyped ones are an error
    pub fn get_total_size<'a, I>(entries: I) -> Result<i64>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut size = 0;
        for entry in entries {
            size += entry.response()?.known_body_size()?.unwrap_or(0).max(0);
        }
        Ok(size)
    }

    /// Sum of positive `_transferSize` values
    pub fn get_total_transfer_size<'a, I>(entries: I) -> i64
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        entries
            .into_iter()
            .filter_map(Entry::transfer_size)
            .filter(|size| *size > 0)
            .sum()
    }

    pub fn get_requests(&self) -> Result<Vec<&Entry>> {
        self.filter_entries(&FilterCriteria::new().with_request_type("get"))
    }

    pub fn post_requests(&self) -> Result<Vec<&Entry>> {
        self.filter_entries(&FilterCriteria::new().with_request_type("post"))
    }

    /// Entries whose MIME type belongs to `asset`
    pub fn files_for(&self, asset: AssetType) -> Result<Vec<&Entry>> {
        self.filter_compiled(asset.filter())
    }

    pub fn size_for(&self, asset: AssetType) -> Result<i64> {
        Self::get_total_size(self.files_for(asset)?)
    }

    pub fn size_trans_for(&self, asset: AssetType) -> Result<i64> {
        Ok(Self::get_total_transfer_size(self.files_for(asset)?))
    }

    /// Asynchronous load time of every `asset` entry
    pub fn load_time_for(&self, asset: AssetType) -> Result<f64> {
        load_time_of(&self.files_for(asset)?, true)
    }

    /// Total body size of every entry on the page
    pub fn page_size(&self) -> Result<i64> {
        Self::get_total_size(&self.entries)
    }

    pub fn page_size_trans(&self) -> i64 {
        Self::get_total_transfer_size(&self.entries)
    }

    /// First entry that is not a 3xx redirect, `None` if every entry redirects
    pub fn actual_page(&self) -> Result<Option<&Entry>> {
        let index = try_get_or_init(&self.actual_page, || {
            for (index, entry) in self.entries.iter().enumerate() {
                if !(300..=399).contains(&entry.status()?) {
                    return Ok(Some(index));
                }
            }
            Ok(None)
        })?;
        Ok(index.map(|i| &self.entries[i]))
    }

    /// `Host` request header of the first entry
    pub fn hostname(&self) -> Result<Option<&str>> {
        let hostname = try_get_or_init(&self.hostname, || match self.entries.first() {
            Some(entry) => Ok(entry.request()?.host()?.map(str::to_string)),
            None => Ok(None),
        })?;
        Ok(hostname.as_deref())
    }

    /// URL of the first entry.
    ///
    /// `None` when the page has no entries or the first request carries no
    /// `url`; a non-string `url` is still an error.
    pub fn url(&self) -> Result<Option<&str>> {
        match self.entries.first() {
            Some(entry) => entry.request()?.known_url(),
            None => Ok(None),
        }
    }

    /// Milliseconds until the first byte of the landing response.
    ///
    /// Redirects ahead of the first 200 response contribute their full time;
    /// the 200 response contributes every timing phase except `receive`.
    /// `None` for the unknown page, which has no navigation.
    pub fn time_to_first_byte(&self) -> Result<Option<f64>> {
        try_get_or_init(&self.time_to_first_byte, || {
            if self.is_unknown() {
                return Ok(None);
            }
            let mut ttfb = 0.0;
            for entry in &self.entries {
                if entry.status()? == 200 {
                    ttfb += entry.time_before_receive()?;
                    break;
                }
                ttfb += entry.time()?;
            }
            Ok(Some(ttfb))
        })
        .copied()
    }

    /// Total time of the landing (non-redirect) response
    pub fn initial_load_time(&self) -> Result<Option<f64>> {
        self.actual_page()?.map(Entry::time).transpose()
    }

    /// `onContentLoad`, `None` when not reported
    pub fn content_load_time(&self) -> Option<f64> {
        self.page_timings.on_content_load
    }

    /// `onLoad`, `None` when not reported or for the unknown page
    pub fn page_load_time(&self) -> Option<f64> {
        if self.is_unknown() {
            return None;
        }
        self.page_timings.on_load
    }

    /// URLs requested more than once, with their request counts
    pub fn duplicate_url_request(&self) -> Result<&BTreeMap<String, usize>> {
        try_get_or_init(&self.duplicate_url_request, || {
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for entry in &self.entries {
                *counts.entry(entry.url()?.to_string()).or_default() += 1;
            }
            counts.retain(|_, count| *count > 1);
            Ok(counts)
        })
    }

    /// Value of an aggregatable metric, `None` when unavailable
    pub fn metric(&self, metric: Metric) -> Result<Option<f64>> {
        match metric {
            Metric::Page => Ok(self.page_load_time()),
            Metric::Ttfb => self.time_to_first_byte(),
            Metric::Asset(asset) => self.load_time_for(asset).map(Some),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = self.url().ok().flatten().unwrap_or("?");
        write!(f, "ID: {}, URL: {}", self.page_id, url)
    }
}

impl<'p> IntoIterator for &'p Page {
    type Item = &'p Entry;
    type IntoIter = std::slice::Iter<'p, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn belongs_to(raw: &Value, page_id: &str) -> bool {
    match raw.get("pageref").and_then(Value::as_str) {
        Some(pageref) => pageref == page_id,
        None => page_id == UNKNOWN_PAGE_ID,
    }
}

fn parse_page_timings(page: &Value) -> Result<PageTimings> {
    match page.get("pageTimings") {
        None | Some(Value::Null) => Ok(PageTimings::default()),
        Some(timings) => serde_json::from_value(timings.clone())
            .map_err(|e| Error::MissingField(format!("page.pageTimings ({})", e))),
    }
}

fn load_time_of(entries: &[&Entry], asynchronous: bool) -> Result<f64> {
    if !asynchronous {
        let mut total = 0.0;
        for entry in entries {
            total += entry.time()?;
        }
        return Ok(total);
    }

    let (timed, untimed): (Vec<&Entry>, Vec<&Entry>) = entries
        .iter()
        .copied()
        .partition(|entry| entry.start_time().is_some());
    if !untimed.is_empty() {
        tracing::warn!(
            "Skipping {} entries with unparsable start times from the timeline",
            untimed.len()
        );
    }

    Ok(create_asset_timeline(timed)?.len() as f64)
}
