//! Tokens of the scripting literal grammar.

use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token<'src> {
    #[token("record")]
    Record,
    #[token("end")]
    End,
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice())]
    Ident(&'src str),
    #[regex(r"'([^'\\]|\\[^\n])*'", |lex| lex.slice())]
    QIdent(&'src str),
    #[regex(r#""([^"\\]|\\[^\n])*""#, |lex| lex.slice())]
    Str(&'src str),
    #[regex(r"[0-9]+", |lex| lex.slice())]
    UInt(&'src str),
    #[regex(
        r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+",
        |lex| lex.slice()
    )]
    UReal(&'src str),

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("=")]
    Assign,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,
    #[token("-")]
    Minus,
}

/// A token and its byte span.
pub type Spanned<'src> = (Token<'src>, Range<usize>);

/// Lex `source` completely, returning each token with its byte span.
///
/// On failure returns the span of the first unrecognized input.
pub fn tokenize(source: &str) -> Result<Vec<Spanned<'_>>, Range<usize>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => return Err(lexer.span()),
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token<'_>> {
        tokenize(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_keywords_win_over_identifiers() {
        assert_eq!(
            kinds("record R end R; recordX"),
            vec![
                Token::Record,
                Token::Ident("R"),
                Token::End,
                Token::Ident("R"),
                Token::Semi,
                Token::Ident("recordX"),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("12 1.5 2. 1e-06 3.0E+2 -4"),
            vec![
                Token::UInt("12"),
                Token::UReal("1.5"),
                Token::UReal("2."),
                Token::UReal("1e-06"),
                Token::UReal("3.0E+2"),
                Token::Minus,
                Token::UInt("4"),
            ]
        );
    }

    #[test]
    fn test_strings_keep_escapes() {
        assert_eq!(kinds(r#""a\"b""#), vec![Token::Str(r#""a\"b""#)]);
        assert_eq!(kinds(r"'x y'"), vec![Token::QIdent("'x y'")]);
        assert_eq!(kinds("''"), vec![Token::QIdent("''")]);
    }

    #[test]
    fn test_unknown_character_reports_span() {
        assert_eq!(tokenize("{1, #}").unwrap_err(), 4..5);
    }
}
