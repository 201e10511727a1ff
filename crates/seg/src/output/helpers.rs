//! Common helper functions for output formatting.

use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a section header line.
pub fn header(text: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", text.green().bold())
    } else {
        format!("{text}\n")
    }
}

/// Formats a table column heading line.
pub fn column_heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", text.dimmed())
    } else {
        format!("{text}\n")
    }
}
