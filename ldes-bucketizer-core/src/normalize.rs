//! Text normalization for bucket ids
//!
//! Both variants trim, decompose with NFKD, drop combining diacritical marks
//! (U+0300..=U+036F), remove commas and apostrophes and lowercase the result.

use unicode_normalization::UnicodeNormalization;

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

fn fold(value: &str, map: impl Fn(char) -> Option<char>) -> String {
    value
        .trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter_map(map)
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalization used by the substring strategy
///
/// Hyphens become spaces so that hyphenated words split into parts.
pub fn normalize_substring(value: &str) -> String {
    fold(value, |c| match c {
        ',' | '\'' => None,
        '-' => Some(' '),
        c => Some(c),
    })
}

/// Normalization used for subject bucket ids
///
/// `#` becomes `-` so fragment identifiers stay usable in bucket paths.
pub fn normalize_subject(value: &str) -> String {
    fold(value, |c| match c {
        ',' | '\'' => None,
        '#' => Some('-'),
        c => Some(c),
    })
}
