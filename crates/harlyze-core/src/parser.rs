use crate::har::Entry;
use crate::page::{Page, UNKNOWN_PAGE_ID};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Creator or browser application information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A parsed HAR document and the pages it describes
#[derive(Debug)]
pub struct HarParser {
    log: Value,
    pages: OnceLock<Vec<Page>>,
}

impl HarParser {
    /// Wrap a decoded HAR document. The root must be an object with a `log`
    /// object; everything else is validated lazily on access.
    pub fn new(har: Value) -> Result<Self> {
        let log = match har {
            Value::Object(mut root) => root.remove("log").ok_or_else(|| {
                Error::InvalidInput("missing top-level 'log' object".to_string())
            })?,
            _ => {
                return Err(Error::InvalidInput(
                    "HAR root must be a JSON object".to_string(),
                ));
            }
        };

        if !log.is_object() {
            return Err(Error::InvalidInput("'log' must be a JSON object".to_string()));
        }

        Ok(Self {
            log,
            pages: OnceLock::new(),
        })
    }

    /// HAR format version (e.g. "1.2")
    pub fn version(&self) -> Result<&str> {
        self.log
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MissingField("log.version".to_string()))
    }

    pub fn creator(&self) -> Result<Creator> {
        let creator = self
            .log
            .get("creator")
            .ok_or_else(|| Error::MissingField("log.creator".to_string()))?;
        serde_json::from_value(creator.clone())
            .map_err(|e| Error::MissingField(format!("log.creator ({})", e)))
    }

    /// Browser information, optional in HAR files
    pub fn browser(&self) -> Result<Option<Creator>> {
        match self.log.get("browser") {
            None | Some(Value::Null) => Ok(None),
            Some(browser) => serde_json::from_value(browser.clone())
                .map(Some)
                .map_err(|e| Error::MissingField(format!("log.browser ({})", e))),
        }
    }

    /// Raw page records; a file without `pages` has none
    pub(crate) fn raw_pages(&self) -> Result<&[Value]> {
        match self.log.get("pages") {
            None | Some(Value::Null) => Ok(&[][..]),
            Some(Value::Array(pages)) => Ok(pages),
            Some(_) => Err(Error::MissingField(
                "log.pages (expected array)".to_string(),
            )),
        }
    }

    pub(crate) fn raw_entries(&self) -> Result<&[Value]> {
        match self.log.get("entries") {
            Some(Value::Array(entries)) => Ok(entries),
            Some(_) => Err(Error::MissingField(
                "log.entries (expected array)".to_string(),
            )),
            None => Err(Error::MissingField("log.entries".to_string())),
        }
    }

    pub fn entry_count(&self) -> Result<usize> {
        Ok(self.raw_entries()?.len())
    }

    /// Every entry in file order, not grouped by page
    pub fn entries(&self) -> Result<Vec<Entry>> {
        self.raw_entries()?.iter().cloned().map(Entry::new).collect()
    }

    /// All pages in the file.
    ///
    /// When any entry lacks a `pageref` the synthetic unknown page comes
    /// first, followed by the listed pages in file order.
    pub fn pages(&self) -> Result<&[Page]> {
        crate::cache::try_get_or_init(&self.pages, || self.build_pages()).map(Vec::as_slice)
    }

    /// Consume the parser, keeping its pages
    pub fn into_pages(mut self) -> Result<Vec<Page>> {
        match self.pages.take() {
            Some(pages) => Ok(pages),
            None => self.build_pages(),
        }
    }

    /// Build a single page; see [`Page::new`]
    pub fn page(&self, page_id: &str) -> Result<Page> {
        Page::new(self, page_id)
    }

    /// Host of the first real (non-unknown) page
    pub fn hostname(&self) -> Result<Option<&str>> {
        match self.pages()?.iter().find(|page| !page.is_unknown()) {
            Some(page) => page.hostname(),
            None => Ok(None),
        }
    }

    fn build_pages(&self) -> Result<Vec<Page>> {
        let mut pages = Vec::new();

        let orphaned = self
            .raw_entries()?
            .iter()
            .any(|entry| entry.get("pageref").and_then(Value::as_str).is_none());
        if orphaned {
            pages.push(Page::new(self, UNKNOWN_PAGE_ID)?);
        }

        for raw in self.raw_pages()? {
            let id = raw
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::MissingField("log.pages[].id".to_string()))?;
            pages.push(Page::new(self, id)?);
        }

        tracing::debug!("Found {} pages", pages.len());
        Ok(pages)
    }
}
