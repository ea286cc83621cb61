// src/core/sanitize.rs
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Compatibility-decompose, fold dashes and apostrophes to ASCII, collapse whitespace.
pub fn sanitize(raw: &str) -> String {
    let decomposed: String = raw.nfkd().collect();
    normalize_ws(&fold_punct(&decomposed))
}

fn is_dash(ch: char) -> bool {
    matches!(ch, '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' | '\u{96}')
}

fn is_apostrophe(ch: char) -> bool {
    matches!(ch, '\u{92}' | '\u{2018}' | '\u{2019}')
}

/// A run of dash-likes becomes one '-', a run of apostrophe-likes one '\''.
fn fold_punct(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev: Option<char> = None;
    for ch in s.chars() {
        let mapped = if is_dash(ch) {
            '-'
        } else if is_apostrophe(ch) {
            '\''
        } else {
            out.push(ch);
            prev = None;
            continue;
        };
        if prev != Some(mapped) { out.push(mapped); }
        prev = Some(mapped);
    }
    out
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop literal `[` and `]` characters, keeping what was between them.
pub fn strip_brackets(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '[' | ']')).collect()
}

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("static pattern"));

/// Lookup form of an item: lowercase, only word chars, whitespace and hyphens.
pub fn normalize_for_lookup(s: &str) -> String {
    let lower = s.to_lowercase();
    normalize_ws(&NON_WORD.replace_all(&lower, ""))
}

/// True when the text carries at least one ASCII letter.
pub fn has_letters(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_alphabetic())
}
