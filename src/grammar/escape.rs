//! Backslash escapes shared by string literals and quoted identifiers.
//!
//! The table is applied symmetrically: encoding replaces each listed character
//! with its escape, decoding maps each escape back. Characters outside the
//! table pass through untouched.

use crate::error::{Result, ScriptingError};

/// Raw character and the letter that follows the backslash.
const ESCAPES: [(char, char); 9] = [
    ('\\', '\\'),
    ('\'', '\''),
    ('"', '"'),
    ('\u{07}', 'a'),
    ('\u{08}', 'b'),
    ('\u{0c}', 'f'),
    ('\n', 'n'),
    ('\t', 't'),
    ('\u{0b}', 'v'),
];

fn escape_letter(c: char) -> Option<char> {
    ESCAPES.iter().find(|(raw, _)| *raw == c).map(|(_, e)| *e)
}

fn unescape_letter(c: char) -> Option<char> {
    ESCAPES.iter().find(|(_, e)| *e == c).map(|(raw, _)| *raw)
}

/// Escape `text` for use between quotes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match escape_letter(c) {
            Some(letter) => {
                out.push('\\');
                out.push(letter);
            }
            None => out.push(c),
        }
    }
    out
}

/// Undo [`escape`] on the text between quotes.
pub fn unescape(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let letter = chars
            .next()
            .ok_or_else(|| ScriptingError::malformed(text, "dangling backslash"))?;
        let raw = unescape_letter(letter).ok_or_else(|| {
            ScriptingError::malformed(text, format!("unknown escape sequence '\\{}'", letter))
        })?;
        out.push(raw);
    }
    Ok(out)
}

/// Quote and escape `text` as a STRING literal.
pub fn quote_string(text: &str) -> String {
    format!("\"{}\"", escape(text))
}

/// Check that `body` (without surrounding quotes) only uses valid escapes and
/// never contains an unescaped `quote` character.
pub(crate) fn is_valid_quoted_body(body: &str, quote: char) -> bool {
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == quote {
            return false;
        }
        if c == '\\' {
            match chars.next() {
                Some(letter) if unescape_letter(letter).is_some() => {}
                _ => return false,
            }
        }
    }
    true
}
