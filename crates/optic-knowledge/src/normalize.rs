//! Label normalization.
//!
//! Classifier labels are often comma-joined synonym lists
//! ("Persian cat, Persian"); only the primary term is useful for lookups.

/// Canonicalize a raw classifier label into a topic string.
///
/// Takes the text before the first comma and trims surrounding whitespace.
/// Total over strings: empty input yields the empty string.
pub fn normalize_label(raw: &str) -> String {
    raw.split(',').next().unwrap_or("").trim().to_string()
}

/// Collapse runs of whitespace into single spaces and trim.
///
/// Applied to topics before they are used as lookup queries.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
