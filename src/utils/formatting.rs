//! Formatting utilities used for console output.

/// `none` for an empty list, otherwise a comma separated list.
pub fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
