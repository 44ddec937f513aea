//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod retry;

/// Truncate text to at most `max_chars` characters, ending with `...` when cut
///
/// Counts characters rather than bytes so multi-byte status markers are never
/// split.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

/// Parse a `#rrggbb` (or bare `rrggbb`) color into its 24-bit value
pub fn parse_hex_color(value: &str) -> Option<u32> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("very long text here", 10), "very lo...");
    }

    #[test]
    fn test_truncate_text_multibyte() {
        let text = "🟢 Online 🟢 Online";
        let truncated = truncate_text(text, 8);
        assert_eq!(truncated.chars().count(), 8);
        assert!(truncated.ends_with("..."));
        assert!(truncated.starts_with('🟢'));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#8b00ff"), Some(0x8b00ff));
        assert_eq!(parse_hex_color("00FF00"), Some(0x00ff00));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }
}
