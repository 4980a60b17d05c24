//! Text normalization shared by every scorer.
//!
//! A word character is any Unicode alphanumeric or `_`. Normalization keeps word characters
//! and whitespace, turns every other run into a single space, and collapses whitespace.

use std::collections::HashSet;

/// Tokens shorter than this (in chars) are dropped.
pub const TOKEN_MIN_LENGTH: usize = 2;

/// Returns true for characters that count as part of a word.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lowercases, replaces punctuation runs with a space, collapses whitespace and trims.
pub fn normalize(text: &str) -> String {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_word_char(c) || c.is_whitespace() { c } else { ' ' })
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits normalized text into tokens of at least `TOKEN_MIN_LENGTH` chars.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|token| token.chars().count() >= TOKEN_MIN_LENGTH)
        .map(str::to_string)
        .collect()
}

pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Senior  React.js   Developer!!"), "senior react js developer");
    }

    #[test]
    fn test_normalize_collapses_newlines_and_tabs() {
        assert_eq!(normalize("  Rust\n\tGo ,  C++ "), "rust go c");
    }

    #[test]
    fn test_normalize_keeps_underscore_and_digits() {
        assert_eq!(normalize("snake_case v2.0"), "snake_case v2 0");
    }

    #[test]
    fn test_normalize_keeps_non_ascii_letters() {
        assert_eq!(normalize("José, München"), "josé münchen");
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  ...  "), "");
    }

    #[test]
    fn test_tokenize_drops_single_char_tokens() {
        assert_eq!(tokenize("A C# b Go dev"), vec!["go", "dev"]);
    }

    #[test]
    fn test_tokenize_counts_chars_not_bytes() {
        // "é" is two bytes but one char
        assert!(tokenize("é").is_empty());
        assert_eq!(tokenize("ép"), vec!["ép"]);
    }

    #[test]
    fn test_token_set_deduplicates() {
        let set = token_set("rust Rust RUST go");
        assert_eq!(set.len(), 2);
        assert!(set.contains("rust"));
        assert!(set.contains("go"));
    }
}
