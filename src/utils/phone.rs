//! Chat address normalization

/// Suffix of a person-to-person chat address
pub const CHAT_SUFFIX: &str = "@c.us";

/// Normalize a phone number into a chat address.
///
/// Any existing suffix is dropped, then every non-digit, then the suffix is
/// appended again. Returns `None` when no digits remain.
pub fn normalize_chat_id(number: &str) -> Option<String> {
    let trimmed = number.trim();
    let base = trimmed.strip_suffix(CHAT_SUFFIX).unwrap_or(trimmed);
    let digits: String = base.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        None
    } else {
        Some(format!("{}{}", digits, CHAT_SUFFIX))
    }
}
