//! Rust identifiers for generated items.

use crate::grammar::{Identifier, QualifiedName};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "union", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Plain text of an identifier usable in Rust: quotes stripped, other
/// characters replaced with `_`.
fn plain(identifier: &str) -> String {
    let body = identifier
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap_or(identifier);
    let mut text: String = body
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if text.is_empty() || text.starts_with(|c: char| c.is_ascii_digit()) {
        text.insert(0, '_');
    }
    text
}

/// A Rust identifier for `text`, escaping keywords.
pub fn rust_ident(text: &str) -> String {
    let text = plain(text);
    if RESERVED.contains(&text.as_str()) {
        format!("{}_", text)
    } else if KEYWORDS.contains(&text.as_str()) {
        format!("r#{}", text)
    } else {
        text
    }
}

/// Method name: path relative to `root`, joined with `_`.
///
/// Names outside the root keep their full path. Keywords are escaped later,
/// by [`rust_ident`], when the name is written out.
pub fn method_name(root: &QualifiedName, name: &QualifiedName) -> String {
    let segments: &[Identifier] = name.strip_prefix(root).unwrap_or(name.segments());
    let joined: Vec<String> = segments.iter().map(|s| plain(s.as_str())).collect();
    joined.join("_")
}

/// Rust type name of an emitted type: its last identifier.
pub fn type_ident(name: &QualifiedName) -> String {
    rust_ident(name.last().as_str())
}
