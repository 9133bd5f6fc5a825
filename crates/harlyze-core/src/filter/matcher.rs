//! Predicates testing one entry against one criterion.
//!
//! All matchers are pure. A field the matcher needs but the entry lacks is a
//! [`crate::Error::MissingField`], never a silent `false`.

use super::ValuePattern;
use crate::har::Entry;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Which side of the transaction a header lookup targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSide {
    Request,
    Response,
}

impl HeaderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderSide::Request => "request",
            HeaderSide::Response => "response",
        }
    }
}

impl fmt::Display for HeaderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeaderSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "request" => Ok(HeaderSide::Request),
            "response" => Ok(HeaderSide::Response),
            other => Err(Error::InvalidArgument(format!(
                "Invalid header side '{}', expected 'request' or 'response'",
                other
            ))),
        }
    }
}

/// Match any header named `header` (case-insensitive) whose value matches.
///
/// Headers with a `null` value never match.
pub fn match_headers(
    entry: &Entry,
    side: HeaderSide,
    header: &str,
    pattern: &ValuePattern,
) -> Result<bool> {
    let headers = match side {
        HeaderSide::Request => entry.request()?.headers()?,
        HeaderSide::Response => entry.response()?.headers()?,
    };

    Ok(headers.iter().any(|h| {
        h.name.eq_ignore_ascii_case(header) && h.value.is_some_and(|value| pattern.matches(value))
    }))
}

/// Match the response MIME type from the `content` object
pub fn match_content_type(entry: &Entry, pattern: &ValuePattern) -> Result<bool> {
    Ok(pattern.matches(entry.response()?.mime_type()?))
}

pub fn match_request_type(entry: &Entry, pattern: &ValuePattern) -> Result<bool> {
    Ok(pattern.matches(entry.request()?.method()?))
}

/// Match the status code as its decimal string, so `"2"` in regex mode
/// matches 200 as well as 302.
pub fn match_status_code(entry: &Entry, pattern: &ValuePattern) -> Result<bool> {
    Ok(pattern.matches(&entry.status()?.to_string()))
}

pub fn match_http_version(entry: &Entry, pattern: &ValuePattern) -> Result<bool> {
    Ok(pattern.matches(entry.response()?.http_version()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(status: i64) -> Entry {
        Entry::new(json!({
            "startedDateTime": "2021-01-01T00:00:00.000Z",
            "time": 10,
            "request": {
                "method": "GET",
                "url": "https://example.com/app.js",
                "httpVersion": "HTTP/1.1",
                "headers": [{"name": "Host", "value": "example.com"}]
            },
            "response": {
                "status": status,
                "httpVersion": "h2",
                "headers": [
                    {"name": "content-type", "value": "application/javascript"},
                    {"name": "X-Empty", "value": null},
                    {"name": "Via", "value": "1.1 edge-a"},
                    {"name": "via", "value": "1.1 edge-b"}
                ],
                "content": {"size": 10, "mimeType": "application/javascript"}
            },
            "timings": {"wait": 10}
        }))
        .unwrap()
    }

    fn regex(p: &str) -> ValuePattern {
        ValuePattern::parse(p, true).unwrap()
    }

    fn exact(p: &str) -> ValuePattern {
        ValuePattern::parse(p, false).unwrap()
    }

    #[test]
    fn test_header_side_parse() {
        assert_eq!("request".parse::<HeaderSide>().unwrap(), HeaderSide::Request);
        assert_eq!("response".parse::<HeaderSide>().unwrap(), HeaderSide::Response);
        assert!(matches!(
            "body".parse::<HeaderSide>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_match_headers() {
        let e = entry(200);
        let side = HeaderSide::Response;
        assert!(match_headers(&e, side, "Content-Type", &regex("javascript")).unwrap());
        assert!(match_headers(&e, side, "CONTENT-TYPE", &exact("application/javascript")).unwrap());
        assert!(!match_headers(&e, side, "Content-Type", &exact("javascript")).unwrap());
        assert!(!match_headers(&e, side, "X-Missing", &regex(".*")).unwrap());
        assert!(!match_headers(&e, side, "X-Empty", &regex(".*")).unwrap());
        assert!(match_headers(&e, HeaderSide::Request, "host", &regex("EXAMPLE")).unwrap());
    }

    #[test]
    fn test_match_headers_checks_repeated_names() {
        let e = entry(200);
        assert!(match_headers(&e, HeaderSide::Response, "via", &regex("edge-b")).unwrap());
    }

    #[test]
    fn test_match_content_type() {
        let e = entry(200);
        assert!(match_content_type(&e, &regex(".*javascript")).unwrap());
        assert!(!match_content_type(&e, &regex("image.*")).unwrap());
        assert!(match_content_type(&e, &exact("application/javascript")).unwrap());
    }

    #[test]
    fn test_match_request_type() {
        let e = entry(200);
        assert!(match_request_type(&e, &regex(".*ET")).unwrap());
        assert!(match_request_type(&e, &regex("get")).unwrap());
        assert!(!match_request_type(&e, &regex(".*ST")).unwrap());
        assert!(!match_request_type(&e, &exact("get")).unwrap());
    }

    #[test]
    fn test_match_status_code_is_string_based() {
        let ok = entry(200);
        assert!(match_status_code(&ok, &regex("2.*")).unwrap());
        assert!(match_status_code(&ok, &exact("200")).unwrap());
        assert!(!match_status_code(&ok, &exact("201")).unwrap());
        assert!(!match_status_code(&ok, &regex("3.*")).unwrap());

        // Unanchored search: "2" appears in "302"
        let redirect = entry(302);
        assert!(match_status_code(&redirect, &regex("2")).unwrap());
        assert!(!match_status_code(&redirect, &regex("^2")).unwrap());
    }

    #[test]
    fn test_match_http_version() {
        let e = entry(200);
        assert!(match_http_version(&e, &regex("H2")).unwrap());
        assert!(!match_http_version(&e, &exact("HTTP/1.1")).unwrap());
    }

    #[test]
    fn test_missing_mime_type_surfaces() {
        let e = Entry::new(json!({
            "request": {"method": "GET", "url": "https://example.com/", "headers": []},
            "response": {"status": 200, "headers": [], "content": {"size": 0}}
        }))
        .unwrap();
        assert!(matches!(
            match_content_type(&e, &regex("html")),
            Err(Error::MissingField(_))
        ));
    }
}
