//! Shared helper functions for CLI commands

use chrono::{DateTime, Utc};
use console::style;

use crate::cli::GlobalOpts;

/// Print a green check line unless `--quiet`
pub fn success(global: &GlobalOpts, message: impl std::fmt::Display) {
    if !global.quiet {
        println!("{} {}", style("✓").green().bold(), message);
    }
}

/// Print a yellow warning line. Warnings mean nothing was done, so they
/// are shown even with `--quiet`.
pub fn warning(message: impl std::fmt::Display) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Date part of a timestamp, as shown in listings
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("ünïcödé text", 7), "ünïc...");
    }

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2030, 1, 2, 13, 45, 0).unwrap();
        assert_eq!(format_date(ts), "2030-01-02");
    }
}
