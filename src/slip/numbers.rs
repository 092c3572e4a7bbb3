//! Number extraction helpers
//!
//! Pulls digit runs out of OCR text and normalizes them to the two-digit
//! form printed on tickets.

use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit pattern"));

/// Width every ball number is padded to
pub const NUMBER_WIDTH: usize = 2;

/// Extract every run of digits in order of appearance
pub fn extract_numbers(text: &str) -> Vec<String> {
    DIGIT_RUN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract digit runs and left-pad each with zeros to two characters
pub fn extract_and_pad(text: &str) -> Vec<String> {
    DIGIT_RUN.find_iter(text).map(|m| pad(m.as_str())).collect()
}

/// Zero-pad a single token to two characters. Longer tokens are kept as-is.
pub fn pad(token: &str) -> String {
    format!("{:0>width$}", token, width = NUMBER_WIDTH)
}

/// True when the token is non-empty and made only of ASCII digits
pub fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Sort key giving natural numeric order ("2" < "10"), ties broken by text
pub fn natural_key(token: &str) -> (u64, usize, &str) {
    let value = token.parse::<u64>().unwrap_or(u64::MAX);
    (value, token.len(), token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_numbers_keeps_raw_runs() {
        assert_eq!(extract_numbers("A 1 02,33x7"), vec!["1", "02", "33", "7"]);
        assert!(extract_numbers("红胆").is_empty());
    }

    #[test]
    fn test_extract_and_pad() {
        assert_eq!(extract_and_pad("前区 1 2 35"), vec!["01", "02", "35"]);
        assert_eq!(extract_and_pad("100"), vec!["100"]);
        assert!(extract_and_pad("").is_empty());
    }

    #[test]
    fn test_is_all_digits() {
        assert!(is_all_digits("07"));
        assert!(!is_all_digits(""));
        assert!(!is_all_digits("0a"));
        assert!(!is_all_digits("-1"));
    }

    #[test]
    fn test_natural_key_orders_numerically() {
        let mut tokens = vec!["10", "02", "9", "33"];
        tokens.sort_by_key(|t| natural_key(t));
        assert_eq!(tokens, vec!["02", "9", "10", "33"]);
    }
}
