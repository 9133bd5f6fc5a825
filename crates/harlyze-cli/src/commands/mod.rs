pub mod aggregate;
pub mod completion;
pub mod filter;
pub mod pages;

/// Milliseconds for pretty output, "n/a" when unavailable
pub(crate) fn format_ms(value: Option<f64>) -> String {
    match value {
        Some(ms) => format!("{:.2} ms", ms),
        None => "n/a".to_string(),
    }
}

/// Table cell, empty when unavailable
pub(crate) fn table_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}
