//! Formatting helpers shared across report renderers.

/// Maximum number of characters kept in a short display name.
pub const SHORT_NAME_LEN: usize = 14;

/// Shorten a contributor name for matrix labels.
///
/// Names longer than [`SHORT_NAME_LEN`] characters keep their first
/// [`SHORT_NAME_LEN`] characters followed by `...`.
pub fn short_name(name: &str) -> String {
    if name.chars().count() > SHORT_NAME_LEN {
        let head: String = name.chars().take(SHORT_NAME_LEN).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// Format a correlation score for tabular output.
pub fn format_score(score: f64) -> String {
    format!("{:.3}", score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_keeps_short_names() {
        assert_eq!(short_name("Alice"), "Alice");
        assert_eq!(short_name("Exactly14Chars"), "Exactly14Chars");
    }

    #[test]
    fn test_short_name_truncates_on_char_boundary() {
        assert_eq!(short_name("Maximilian Mustermann"), "Maximilian Mus...");
        // Multi-byte names are cut by characters, not bytes
        assert_eq!(short_name("Ääääääääääääääää"), "Ääääääääääääää...");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.0), "0.000");
        assert_eq!(format_score(1.23456), "1.235");
    }
}
