mod entry;
mod reader;
mod value;

pub use entry::{Entry, Header, RawView, Request, Response};
pub use reader::HarReader;
