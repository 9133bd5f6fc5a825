//! Compute-once fields.
//!
//! Every memoised value in this crate lives in a [`OnceLock`] owned by the
//! object it describes. The cached value is never invalidated: entries, pages
//! and parsers are immutable after construction.

use crate::Result;
use std::sync::OnceLock;

/// Return the cached value, computing it with `init` on first access.
///
/// A failed computation is not cached, so the next call retries. Two threads
/// racing on an empty cell may both run `init`; the first stored value wins
/// and both observe it.
pub(crate) fn try_get_or_init<T, F>(cell: &OnceLock<T>, init: F) -> Result<&T>
where
    F: FnOnce() -> Result<T>,
{
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value))
}
