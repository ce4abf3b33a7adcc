// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Content blacklist for card submissions.
//!
//! Free text is normalized (lowercased, stripped of whitespace,
//! zero-width/directional controls and punctuation, leetspeak collapsed)
//! and then matched against a fixed list of canonical terms as a
//! contiguous substring, so spacing, punctuation, and concatenation
//! evasions all land on the same canonical form.

use once_cell::sync::Lazy;

/// Blacklist: canonical forms only. Normalization of user input handles
/// leetspeak, spaces, punctuation, and common substitutions.
const BLACKLIST_TERMS: &[&str] = &[
    "nigger",
    "nigga",
    "negro",
    "nigg",
    "niggar",
    "faggot",
    "fag",
    "fagg",
    "fagot",
    "fgt",
    "chink",
    "chinky",
    "gook",
    "kike",
    "kyke",
    "spic",
    "spick",
    "wetback",
    "paki",
    "raghead",
    "towelhead",
    "coon",
    "darkie",
    "darky",
    "beaner",
    "gyp",
    "gypsy",
    "retard",
    "retarded",
    "rtard",
    "tranny",
    "trannies",
    "shemale",
    "heshe",
    "dyke",
    "dyk",
    "whore",
    "slut",
    "cunt",
    "fck",
    "fuk",
    "fuc",
    "nazi",
    "hitler",
    "heil",
    "whitepower",
    "killjew",
    "killjews",
    "gasjew",
    "gasthe",
    "finalsolution",
    "kys",
    "killyourself",
    "diejew",
    "jewdie",
];

static NORMALIZED_TERMS: Lazy<Vec<String>> =
    Lazy::new(|| BLACKLIST_TERMS.iter().map(|t| normalize(t)).collect());

/// Whitespace, zero-width and directional-control characters, and a
/// fixed set of separator/bracket characters removed before matching.
fn is_stripped(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '\u{200B}'..='\u{200D}'
                | '\u{2060}'
                | '\u{00AD}'
                | '\u{200E}'
                | '\u{200F}'
                | '\u{202A}'..='\u{202E}'
                | '\u{2066}'..='\u{2069}'
        )
        || matches!(
            c,
            '*' | '.'
                | '_'
                | '-'
                | '['
                | ']'
                | '#'
                | '\\'
                | '/'
                | ';'
                | ':'
                | '\''
                | '"'
                | '<'
                | '>'
                | '{'
                | '}'
                | '('
                | ')'
        )
}

/// Leetspeak / common substitution table (char -> canonical letters).
/// Targets are fixed points of [`normalize`], keeping it idempotent.
fn fold(c: char) -> Option<&'static str> {
    Some(match c {
        '0' => "o",
        '1' => "i",
        '3' => "e",
        '4' => "a",
        '5' => "s",
        '6' => "g",
        '7' => "t",
        '8' => "b",
        '9' => "g",
        '@' => "a",
        '!' => "i",
        '|' => "i",
        '$' => "s",
        '+' => "t",
        '€' => "e",
        '§' => "s",
        '¥' => "y",
        '×' => "x",
        '©' => "c",
        '®' => "r",
        '™' => "tm",
        '°' => "o",
        '²' => "2",
        '³' => "e",
        'µ' => "u",
        '¿' => "?",
        '¡' => "i",
        _ => return None,
    })
}

/// Canonical form of arbitrary text: lowercase, separators stripped,
/// homoglyphs collapsed. "n i g g 3 r" and "n1gg3r" normalize
/// identically.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if is_stripped(c) {
            continue;
        }
        match fold(c) {
            Some(folded) => out.push_str(folded),
            None => out.push(c),
        }
    }
    out
}

/// True if the text contains any blacklisted term, or a normalized
/// evasion of one, as a substring (not whole-word). Empty input never
/// matches.
pub fn contains_blacklisted_term(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let normalized = normalize(text);
    NORMALIZED_TERMS.iter().any(|term| normalized.contains(term))
}

/// Check all card fields together. Empty fields are skipped.
pub fn is_card_content_blacklisted(message: &str, from_name: &str, to_name: &str) -> bool {
    let combined = [message, from_name, to_name]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    contains_blacklisted_term(&combined)
}
