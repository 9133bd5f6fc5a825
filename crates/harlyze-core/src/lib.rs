pub mod analysis;
pub mod asset;
mod cache;
pub mod error;
pub mod filter;
pub mod har;
pub mod multi;
pub mod page;
pub mod parser;
pub mod timeline;

pub use asset::{AssetType, Metric};
pub use error::{Error, Result};
pub use filter::FilterCriteria;
pub use multi::{AggregatorConfig, MultiRunAggregator};
pub use page::{Page, PageTimings, UNKNOWN_PAGE_ID};
pub use parser::{Creator, HarParser};
