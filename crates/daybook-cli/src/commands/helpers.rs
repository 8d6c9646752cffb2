//! Shared helper functions for commands

use anyhow::Result;
use chrono::{Duration, NaiveDate};

/// Parse a date string into NaiveDate, relative to `today`
pub fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    if s == "today" {
        return Ok(today);
    }
    if s == "yesterday" {
        return Ok(today - Duration::days(1));
    }
    if s == "tomorrow" {
        return Ok(today + Duration::days(1));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date format: {}. Use YYYY-MM-DD", s))
}

/// Truncate string to max characters with ellipsis
pub fn truncate(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = chars[..max_chars.saturating_sub(3)].iter().collect();
        format!("{}...", truncated)
    }
}

/// Human-readable byte count, 1024 per step
pub fn format_file_size(bytes: i64) -> String {
    if bytes <= 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut exponent = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && exponent < UNITS.len() - 1 {
        value /= 1024.0;
        exponent += 1;
    }
    // Two decimals at most, trailing zeros dropped
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exponent])
}

/// Currency display with two decimals
pub fn format_amount(amount: f64, currency: &str) -> String {
    format!("{}{:.2}", currency, amount)
}

/// Text bar scaled against `max`, at most `width` blocks
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if value <= 0.0 || max <= 0.0 {
        return "·".to_string();
    }
    let len = ((value / max) * width as f64).ceil() as usize;
    "█".repeat(len.clamp(1, width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_parse_date_valid() {
        let date = parse_date("2025-01-15", today()).unwrap();
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_parse_date_relative() {
        assert_eq!(parse_date("today", today()).unwrap(), today());
        assert_eq!(
            parse_date("yesterday", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            parse_date("tomorrow", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("invalid", today()).is_err());
        assert!(parse_date("2025/01/15", today()).is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is very long text", 10), "this is...");
        assert_eq!(truncate("日本語のとても長いタイトルです", 10), "日本語のとても...");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(12.5, "₹"), "₹12.50");
        assert_eq!(format_amount(0.0, "$"), "$0.00");
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0, 10.0, 10), "·");
        assert_eq!(bar(10.0, 10.0, 10), "██████████");
        assert_eq!(bar(0.1, 10.0, 10), "█");
    }
}
