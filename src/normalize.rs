use crate::models::{AgreementTract, NormalizedTract};

/// Canonicalize free text for comparison: lowercase, expand "&" and ","
/// to "and", strip diacritics via NFKD decomposition, keep only ASCII
/// alphanumerics and single spaces.
pub fn normalize_text(input: &str) -> String {
    use unicode_normalization::UnicodeNormalization;

    let lowered = input.to_lowercase();
    let mut expanded = String::with_capacity(lowered.len() + 8);
    for ch in lowered.chars() {
        match ch {
            '&' => expanded.push_str("and"),
            ',' => expanded.push_str(" and"),
            _ => expanded.push(ch),
        }
    }

    let mut out = String::with_capacity(expanded.len());
    for ch in expanded.nfkd() {
        if unicode_normalization::char::is_combining_mark(ch) {
            continue;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
        } else if ch.is_whitespace() {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
        }
        // Everything else (punctuation, symbols, non-ASCII leftovers) is dropped.
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out
}

pub fn normalize_tract(t: &AgreementTract) -> NormalizedTract {
    NormalizedTract {
        first_party: normalize_text(t.first_party.as_deref().unwrap_or("")),
        book: normalize_text(t.book.as_deref().unwrap_or("")),
        page: normalize_text(t.page.as_deref().unwrap_or("")),
        entry: normalize_text(t.entry.as_deref().unwrap_or("")),
    }
}
