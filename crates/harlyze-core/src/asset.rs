use crate::filter::{CompiledFilter, FilterCriteria};
use crate::{Error, Result};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Asset categories, each identified by a MIME type regex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Image,
    Css,
    Text,
    Js,
    Audio,
    Video,
    Html,
}

lazy_static! {
    static ref ASSET_FILTERS: HashMap<AssetType, CompiledFilter> = AssetType::ALL
        .iter()
        .map(|asset| {
            let filter = FilterCriteria::new()
                .with_content_type(asset.content_type_pattern())
                .compile()
                .unwrap();
            (*asset, filter)
        })
        .collect();
}

impl AssetType {
    pub const ALL: [AssetType; 7] = [
        AssetType::Image,
        AssetType::Css,
        AssetType::Text,
        AssetType::Js,
        AssetType::Audio,
        AssetType::Video,
        AssetType::Html,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Image => "image",
            AssetType::Css => "css",
            AssetType::Text => "text",
            AssetType::Js => "js",
            AssetType::Audio => "audio",
            AssetType::Video => "video",
            AssetType::Html => "html",
        }
    }

    /// Regex searched (case-insensitively) in the response MIME type
    pub fn content_type_pattern(&self) -> &'static str {
        match self {
            AssetType::Image => "image.*",
            AssetType::Css => ".*css",
            AssetType::Text => "text.*",
            AssetType::Js => ".*javascript",
            AssetType::Audio => "audio.*",
            AssetType::Video => "video.*|.*flash",
            AssetType::Html => "html",
        }
    }

    pub(crate) fn filter(&self) -> &'static CompiledFilter {
        &ASSET_FILTERS[self]
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AssetType::ALL
            .into_iter()
            .find(|asset| asset.as_str() == s)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "Unknown asset type '{}', expected one of: {}",
                    s,
                    asset_names().join(", ")
                ))
            })
    }
}

fn asset_names() -> Vec<&'static str> {
    AssetType::ALL.iter().map(AssetType::as_str).collect()
}

/// A per-page timing that can be aggregated across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Full page load (`onLoad`)
    Page,
    /// Time to first byte
    Ttfb,
    /// Asynchronous load time of one asset category
    Asset(AssetType),
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::Page,
        Metric::Ttfb,
        Metric::Asset(AssetType::Js),
        Metric::Asset(AssetType::Css),
        Metric::Asset(AssetType::Image),
        Metric::Asset(AssetType::Html),
        Metric::Asset(AssetType::Audio),
        Metric::Asset(AssetType::Video),
        Metric::Asset(AssetType::Text),
    ];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Page => f.write_str("page"),
            Metric::Ttfb => f.write_str("ttfb"),
            Metric::Asset(asset) => asset.fmt(f),
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "page" => Ok(Metric::Page),
            "ttfb" => Ok(Metric::Ttfb),
            other => other.parse().map(Metric::Asset).map_err(|_| {
                Error::InvalidArgument(format!(
                    "Unknown metric '{}', expected one of: page, ttfb, {}",
                    other,
                    asset_names().join(", ")
                ))
            }),
        }
    }
}
