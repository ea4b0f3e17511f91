//! Label and value normalization applied before comparison.

/// Collapses whitespace runs to single spaces, trims, and lower-cases.
pub fn normalize_label(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Trims surrounding whitespace, preserving case.
pub fn normalize_value(raw: &str) -> &str {
    raw.trim()
}
