//! US phone number formatting.
//!
//! Formatting runs on every keystroke of inline editing, so every function here
//! is total: any input, including empty or non-numeric text, yields a value.

const MAX_DIGITS: usize = 10;

/// Digits of `value` with a leading US country code removed.
///
/// The country code is only dropped when exactly eleven digits remain and the
/// first one is `1`.
pub fn strip_phone_number(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == MAX_DIGITS + 1 && digits.starts_with('1') {
        digits[1..].to_string()
    } else {
        digits
    }
}

/// Format `value` as `(XXX) XXX-XXXX`, progressively for partial input.
pub fn format_phone_number(value: &str) -> String {
    let digits = strip_phone_number(value);
    let digits = &digits[..digits.len().min(MAX_DIGITS)];

    match digits.len() {
        0 => String::new(),
        1..=3 => format!("({}", digits),
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

/// True when the number has exactly ten digits after normalization.
pub fn is_valid_phone_number(value: &str) -> bool {
    strip_phone_number(value).len() == MAX_DIGITS
}
