//! Term Matcher: whole-phrase and token-coverage presence checks.

use std::collections::HashSet;

use crate::matching::normalize::{is_word_char, tokenize};

/// True iff `phrase` occurs in `haystack` bounded by non-word characters or text edges.
///
/// Both inputs are expected to be normalized already, so comparison is literal.
/// An empty phrase never matches.
pub fn whole_phrase_match(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }

    let mut from = 0;
    while let Some(offset) = haystack[from..].find(phrase) {
        let start = from + offset;
        let end = start + phrase.len();

        if at_word_boundary(haystack, start, phrase) && at_word_boundary_end(haystack, end, phrase)
        {
            return true;
        }

        // Advance by one char so overlapping occurrences are still considered.
        let step = haystack[start..].chars().next().map_or(1, char::len_utf8);
        from = start + step;
    }

    false
}

/// True iff every token (≥2 chars) of `phrase` is present in `text_tokens`.
/// A phrase that yields no tokens never matches.
pub fn token_coverage(text_tokens: &HashSet<String>, phrase: &str) -> bool {
    let tokens = tokenize(phrase);
    !tokens.is_empty() && tokens.iter().all(|token| text_tokens.contains(token))
}

fn at_word_boundary(haystack: &str, start: usize, phrase: &str) -> bool {
    let before = haystack[..start].chars().next_back();
    let first = phrase.chars().next();
    is_boundary(before, first)
}

fn at_word_boundary_end(haystack: &str, end: usize, phrase: &str) -> bool {
    let last = phrase.chars().next_back();
    let after = haystack[end..].chars().next();
    is_boundary(last, after)
}

/// A boundary sits between a word char and a non-word char (or a text edge).
fn is_boundary(left: Option<char>, right: Option<char>) -> bool {
    let left_word = left.is_some_and(is_word_char);
    let right_word = right.is_some_and(is_word_char);
    left_word != right_word
}
