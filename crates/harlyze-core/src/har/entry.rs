use super::value::{
    array_field, f64_field, field, i64_field, opt_i64, opt_i64_field, opt_str, opt_str_field,
    str_field,
};
use crate::cache::try_get_or_init;
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// One HTTP transaction (request/response pair) from a HAR `entries` array.
///
/// Wraps the raw JSON record read-only. Derived values (start time, timing
/// phases, time to first byte) are computed on first access and cached for
/// the lifetime of the entry.
#[derive(Debug)]
pub struct Entry {
    raw: Value,
    start_time: OnceLock<Option<DateTime<FixedOffset>>>,
    timings: OnceLock<BTreeMap<String, f64>>,
    time_before_receive: OnceLock<f64>,
}

impl Entry {
    pub fn new(raw: Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(Error::InvalidInput(
                "HAR entry must be a JSON object".to_string(),
            ));
        }

        Ok(Self {
            raw,
            start_time: OnceLock::new(),
            timings: OnceLock::new(),
            time_before_receive: OnceLock::new(),
        })
    }

    /// Untyped field access to the underlying record
    pub fn raw(&self) -> RawView<'_> {
        RawView::new(&self.raw)
    }

    pub fn request(&self) -> Result<Request<'_>> {
        let raw = field(&self.raw, "request", "entry")?;
        Ok(Request { raw })
    }

    pub fn response(&self) -> Result<Response<'_>> {
        let raw = field(&self.raw, "response", "entry")?;
        Ok(Response { raw })
    }

    /// Id of the owning page, `None` for entries outside any page
    pub fn pageref(&self) -> Option<&str> {
        opt_str(&self.raw, "pageref")
    }

    pub fn started_date_time(&self) -> Result<&str> {
        str_field(&self.raw, "startedDateTime", "entry")
    }

    /// Parsed `startedDateTime`, `None` if absent or unparsable
    pub fn start_time(&self) -> Option<DateTime<FixedOffset>> {
        *self
            .start_time
            .get_or_init(|| parse_start_time(opt_str(&self.raw, "startedDateTime")))
    }

    /// Total elapsed time of the transaction in milliseconds
    pub fn time(&self) -> Result<f64> {
        f64_field(&self.raw, "time", "entry")
    }

    pub fn method(&self) -> Result<&str> {
        self.request()?.method()
    }

    pub fn url(&self) -> Result<&str> {
        self.request()?.url()
    }

    pub fn status(&self) -> Result<i64> {
        self.response()?.status()
    }

    /// Numeric timing phases keyed by name, including vendor phases such as
    /// `_blocked_queueing`. Values are reported as-is (`-1` stays `-1`).
    pub fn timings(&self) -> Result<&BTreeMap<String, f64>> {
        try_get_or_init(&self.timings, || {
            let timings = field(&self.raw, "timings", "entry")?
                .as_object()
                .ok_or_else(|| {
                    Error::MissingField("entry.timings (expected object)".to_string())
                })?;

            Ok(timings
                .iter()
                .filter_map(|(phase, value)| value.as_f64().map(|ms| (phase.clone(), ms)))
                .collect())
        })
    }

    /// Sum of every timing phase except `receive`, with negative
    /// ("not applicable") phases counted as zero
    pub fn time_before_receive(&self) -> Result<f64> {
        try_get_or_init(&self.time_before_receive, || {
            Ok(self
                .timings()?
                .iter()
                .filter(|(phase, _)| phase.as_str() != "receive")
                .map(|(_, ms)| ms.max(0.0))
                .sum())
        })
        .copied()
    }

    pub fn cache(&self) -> Option<&Value> {
        self.raw.get("cache")
    }

    pub fn server_address(&self) -> Option<&str> {
        opt_str(&self.raw, "serverIPAddress")
    }

    /// Connection id, which browsers report as the client port
    pub fn port(&self) -> Option<u16> {
        match self.raw.get("connection")? {
            Value::String(port) => port.trim().parse().ok(),
            Value::Number(port) => port.as_u64().and_then(|p| u16::try_from(p).ok()),
            _ => None,
        }
    }

    /// Whether the browser marked the connection secure (`_securityState`)
    pub fn secure(&self) -> Option<bool> {
        opt_str(&self.raw, "_securityState").map(|state| state == "secure")
    }

    /// Bytes on the wire (`_transferSize`), read from the response first as
    /// Chrome exports it there
    pub fn transfer_size(&self) -> Option<i64> {
        self.raw
            .get("response")
            .and_then(|response| opt_i64(response, "_transferSize"))
            .or_else(|| opt_i64(&self.raw, "_transferSize"))
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = self.method().unwrap_or("?");
        let url = self.url().unwrap_or("?");
        write!(f, "{} {}", method, url)
    }
}

fn parse_start_time(value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let value = value?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed);
    }

    // Some exporters drop the offset; read those as UTC
    match NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Some(naive.and_utc().fixed_offset()),
        Err(e) => {
            tracing::warn!("Unparsable startedDateTime {:?}: {}", value, e);
            None
        }
    }
}

/// A single HTTP header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'e> {
    pub name: &'e str,
    pub value: Option<&'e str>,
}

fn headers_of<'e>(raw: &'e Value, context: &str) -> Result<Vec<Header<'e>>> {
    array_field(raw, "headers", context)?
        .iter()
        .map(|header| {
            let name = str_field(header, "name", &format!("{}.headers[]", context))?;
            Ok(Header {
                name,
                value: opt_str(header, "value"),
            })
        })
        .collect()
}

/// Case-insensitive lookup, first match wins
fn find_header<'e>(raw: &'e Value, context: &str, name: &str) -> Result<Option<&'e str>> {
    Ok(headers_of(raw, context)?
        .into_iter()
        .find(|header| header.name.eq_ignore_ascii_case(name))
        .and_then(|header| header.value))
}

/// Request side of an [`Entry`]
#[derive(Debug, Clone, Copy)]
pub struct Request<'e> {
    raw: &'e Value,
}

impl<'e> Request<'e> {
    pub fn raw(&self) -> RawView<'e> {
        RawView::new(self.raw)
    }

    pub fn method(&self) -> Result<&'e str> {
        str_field(self.raw, "method", "request")
    }

    pub fn url(&self) -> Result<&'e str> {
        str_field(self.raw, "url", "request")
    }

    /// `url`, `None` when absent
    pub fn known_url(&self) -> Result<Option<&'e str>> {
        opt_str_field(self.raw, "url", "request")
    }

    pub fn http_version(&self) -> Result<&'e str> {
        str_field(self.raw, "httpVersion", "request")
    }

    pub fn headers(&self) -> Result<Vec<Header<'e>>> {
        headers_of(self.raw, "request")
    }

    pub fn header(&self, name: &str) -> Result<Option<&'e str>> {
        find_header(self.raw, "request", name)
    }

    pub fn cookies(&self) -> Result<&'e [Value]> {
        array_field(self.raw, "cookies", "request")
    }

    pub fn query_string(&self) -> Result<&'e [Value]> {
        array_field(self.raw, "queryString", "request")
    }

    pub fn body_size(&self) -> Result<i64> {
        i64_field(self.raw, "bodySize", "request")
    }

    pub fn headers_size(&self) -> Result<i64> {
        i64_field(self.raw, "headersSize", "request")
    }

    /// MIME type of the posted body, if any
    pub fn mime_type(&self) -> Option<&'e str> {
        self.raw
            .get("postData")
            .and_then(|post| opt_str(post, "mimeType"))
    }

    pub fn text(&self) -> Option<&'e str> {
        self.raw.get("postData").and_then(|post| opt_str(post, "text"))
    }

    pub fn host(&self) -> Result<Option<&'e str>> {
        self.header("Host")
    }

    pub fn user_agent(&self) -> Result<Option<&'e str>> {
        self.header("User-Agent")
    }

    pub fn accept(&self) -> Result<Option<&'e str>> {
        self.header("Accept")
    }

    pub fn language(&self) -> Result<Option<&'e str>> {
        self.header("Accept-Language")
    }

    pub fn encoding(&self) -> Result<Option<&'e str>> {
        self.header("Accept-Encoding")
    }

    pub fn cache_control(&self) -> Result<Option<&'e str>> {
        self.header("Cache-Control")
    }
}

/// Response side of an [`Entry`]
#[derive(Debug, Clone, Copy)]
pub struct Response<'e> {
    raw: &'e Value,
}

impl<'e> Response<'e> {
    pub fn raw(&self) -> RawView<'e> {
        RawView::new(self.raw)
    }

    pub fn status(&self) -> Result<i64> {
        i64_field(self.raw, "status", "response")
    }

    pub fn status_text(&self) -> Result<&'e str> {
        str_field(self.raw, "statusText", "response")
    }

    pub fn http_version(&self) -> Result<&'e str> {
        str_field(self.raw, "httpVersion", "response")
    }

    pub fn headers(&self) -> Result<Vec<Header<'e>>> {
        headers_of(self.raw, "response")
    }

    pub fn header(&self, name: &str) -> Result<Option<&'e str>> {
        find_header(self.raw, "response", name)
    }

    pub fn body_size(&self) -> Result<i64> {
        i64_field(self.raw, "bodySize", "response")
    }

    /// `bodySize`, `None` when the exporter left it out
    pub fn known_body_size(&self) -> Result<Option<i64>> {
        opt_i64_field(self.raw, "bodySize", "response")
    }

    pub fn headers_size(&self) -> Result<i64> {
        i64_field(self.raw, "headersSize", "response")
    }

    /// Redirect target; an empty `redirectURL` means no redirect
    pub fn redirect_url(&self) -> Option<&'e str> {
        opt_str(self.raw, "redirectURL").filter(|url| !url.is_empty())
    }

    fn content(&self) -> Result<&'e Value> {
        field(self.raw, "content", "response")
    }

    pub fn content_size(&self) -> Result<i64> {
        i64_field(self.content()?, "size", "response.content")
    }

    /// MIME type from the structured `content` object (not the header)
    pub fn mime_type(&self) -> Result<&'e str> {
        str_field(self.content()?, "mimeType", "response.content")
    }

    pub fn text(&self) -> Result<Option<&'e str>> {
        Ok(opt_str(self.content()?, "text"))
    }

    pub fn content_type(&self) -> Result<Option<&'e str>> {
        self.header("Content-Type")
    }

    pub fn cache_control(&self) -> Result<Option<&'e str>> {
        self.header("Cache-Control")
    }

    pub fn date(&self) -> Result<Option<&'e str>> {
        self.header("Date")
    }

    pub fn last_modified(&self) -> Result<Option<&'e str>> {
        self.header("Last-Modified")
    }

    pub fn content_security_policy(&self) -> Result<Option<&'e str>> {
        self.header("Content-Security-Policy")
    }
}

/// Bag-of-fields view over a raw HAR object, for callers that need fields
/// the typed accessors do not cover (vendor `_` fields, comments).
#[derive(Debug, Clone, Copy)]
pub struct RawView<'e> {
    raw: &'e Value,
}

impl<'e> RawView<'e> {
    fn new(raw: &'e Value) -> Self {
        Self { raw }
    }

    pub fn get(&self, key: &str) -> Option<&'e Value> {
        self.raw.get(key)
    }

    pub fn get_or(&self, key: &str, default: &'e Value) -> &'e Value {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.raw
            .as_object()
            .is_some_and(|object| object.contains_key(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &'e str> + use<'e> {
        self.raw
            .as_object()
            .into_iter()
            .flat_map(|object| object.keys())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.raw.as_object().map_or(0, |object| object.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
