//! Human-readable sequence numbers for sets (`s007`) and cards (`c003`).
//!
//! Formatting and parsing only; the next value is always derived from
//! persisted state by the numbering repository.

/// Prefix for content set numbers.
pub const SET_PREFIX: char = 's';
/// Prefix for content card numbers.
pub const CARD_PREFIX: char = 'c';
/// Minimum zero-padded width of the numeric part.
pub const NUMBER_WIDTH: usize = 3;

/// Format a set number, e.g. `7 -> "s007"`.
pub fn format_set_number(value: i32) -> String {
    format_number(SET_PREFIX, value)
}

/// Format a card number, e.g. `3 -> "c003"`.
pub fn format_card_number(value: i32) -> String {
    format_number(CARD_PREFIX, value)
}

/// Zero-pad `value` to [`NUMBER_WIDTH`]; wider values are kept intact
/// (`1000 -> "s1000"`).
pub fn format_number(prefix: char, value: i32) -> String {
    format!("{prefix}{value:0width$}", width = NUMBER_WIDTH)
}

/// Parse the numeric part of a sequence number with the given prefix.
///
/// Returns `None` for a wrong prefix, an empty or non-digit tail, or zero.
pub fn parse_number(prefix: char, number: &str) -> Option<i32> {
    let digits = number.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i32>().ok().filter(|v| *v > 0)
}

/// Next value after both the highest persisted number and the high-water
/// mark. The watermark keeps numbers of deleted rows from being handed out
/// again.
pub fn next_value(max_persisted: Option<i32>, watermark: i32) -> i32 {
    max_persisted.unwrap_or(0).max(watermark).max(0) + 1
}

/// `count` consecutive values starting right after `last`.
pub fn consecutive_after(last: i32, count: usize) -> impl Iterator<Item = i32> {
    (1..=count as i32).map(move |i| last + i)
}
