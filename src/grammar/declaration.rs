//! Parser for interface-only class listings.
//!
//! The compiler can print a function or record as a short stored definition:
//!
//! ```text
//! function loadFile "load file (*.mo) and merge it with the loaded AST."
//!   input String fileName;
//!   input String encoding = "UTF-8";
//!   output Boolean success "Returns true on success";
//! end loadFile;
//! ```
//!
//! This is a declaration grammar (class headers, component clauses,
//! modifications, annotations, algorithm sections), distinct from the value
//! literal grammar in [`super::literal`]. It has its own lexer and never
//! evaluates expressions: bindings and subscripts are kept as source text.

use std::ops::Range;

use logos::{FilterResult, Lexer, Logos};

use crate::error::{Result, ScriptingError};

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
enum DeclToken<'src> {
    /// Never emitted: the callback skips the comment.
    #[token("/*", block_comment)]
    BlockComment,
    /// `$Code`, `$TypeName` and friends are compiler builtins.
    #[regex(r"\$?[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice())]
    Ident(&'src str),
    #[regex(r"'([^'\\]|\\[^\n])*'", |lex| lex.slice())]
    QIdent(&'src str),
    #[regex(r#""([^"\\]|\\[^\n])*""#, |lex| lex.slice())]
    Str(&'src str),
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    Number,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("=")]
    Assign,
    #[token(":=")]
    Walrus,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[regex(r"\+|-|\*|/|\^|<|>|<=|>=|==|<>|\.\+|\.-|\.\*|\./|\.\^")]
    Operator,
}

/// Skip to the closing `*/`; an unterminated comment is an error.
fn block_comment<'src>(lex: &mut Lexer<'src, DeclToken<'src>>) -> FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(())
        }
    }
}

/// Class restriction keyword of a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassRestriction {
    Function,
    Record,
    Type,
    Package,
}

/// Causality prefix of a component clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// One declared component (formal parameter or record element).
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentDeclaration {
    pub name: String,
    pub type_name: String,
    pub direction: Option<Direction>,
    pub protected: bool,
    /// Array subscripts as written, type subscripts first.
    pub subscripts: Vec<String>,
    /// Binding expression text after `=`.
    pub default: Option<String>,
    pub description: Option<String>,
}

impl ComponentDeclaration {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// A parsed `function ... end name;` or `record ... end name;` listing.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassListing {
    pub restriction: ClassRestriction,
    pub name: String,
    pub description: Option<String>,
    pub components: Vec<ComponentDeclaration>,
}

impl ClassListing {
    pub fn component(&self, name: &str) -> Option<&ComponentDeclaration> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Public formal parameters with the given direction, in declaration order.
    pub fn parameters(&self, direction: Direction) -> impl Iterator<Item = &ComponentDeclaration> {
        self.components
            .iter()
            .filter(move |c| !c.protected && c.direction == Some(direction))
    }
}

/// Prefixes that may precede a class restriction.
const CLASS_PREFIXES: &[&str] = &[
    "encapsulated",
    "partial",
    "final",
    "replaceable",
    "redeclare",
    "impure",
    "pure",
    "operator",
    "expandable",
];

/// Prefixes that may precede the type of a component clause.
const COMPONENT_PREFIXES: &[&str] = &[
    "parameter",
    "constant",
    "discrete",
    "flow",
    "stream",
    "final",
    "inner",
    "outer",
    "replaceable",
    "redeclare",
    "each",
];

/// Section keywords whose contents are skipped up to the class `end`.
const BODY_SECTIONS: &[&str] = &["algorithm", "equation", "initial"];

/// Keywords after which a binding expression continues.
const EXPRESSION_KEYWORDS: &[&str] = &["if", "then", "else", "elseif", "and", "or", "not"];

/// Parse one class listing.
pub fn parse_class_listing(source: &str) -> Result<ClassListing> {
    let mut lexer = DeclToken::lexer(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(ScriptingError::malformed(
                    &source[lexer.span()],
                    "unrecognized input in class listing",
                ));
            }
        }
    }
    DeclarationParser {
        source,
        tokens,
        pos: 0,
    }
    .class_listing()
}

struct DeclarationParser<'src> {
    source: &'src str,
    tokens: Vec<(DeclToken<'src>, Range<usize>)>,
    pos: usize,
}

impl<'src> DeclarationParser<'src> {
    fn peek(&self) -> Option<DeclToken<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn peek_at(&self, offset: usize) -> Option<DeclToken<'src>> {
        self.tokens.get(self.pos + offset).map(|(t, _)| *t)
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(DeclToken::Ident(text)) if text == keyword)
    }

    fn error(&self, reason: &str) -> ScriptingError {
        let text = match self.tokens.get(self.pos) {
            Some((_, span)) => &self.source[span.start..],
            None => self.source,
        };
        ScriptingError::malformed(text.lines().next().unwrap_or(text), reason)
    }

    fn expect(&mut self, expected: DeclToken<'static>, what: &str) -> Result<()> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected {}", what)))
        }
    }

    fn name(&mut self) -> Result<&'src str> {
        match self.peek() {
            Some(DeclToken::Ident(text)) | Some(DeclToken::QIdent(text)) => {
                self.pos += 1;
                Ok(text)
            }
            _ => Err(self.error("expected an identifier")),
        }
    }

    /// Source text covering tokens `start..end`.
    fn text(&self, start: usize, end: usize) -> String {
        if start >= end {
            return String::new();
        }
        let from = self.tokens[start].1.start;
        let to = self.tokens[end - 1].1.end;
        self.source[from..to].trim().to_string()
    }

    /// One or more string literals joined with `+`.
    fn description(&mut self) -> Result<Option<String>> {
        let mut text = String::new();
        let mut found = false;
        while let Some(DeclToken::Str(s)) = self.peek() {
            self.pos += 1;
            found = true;
            text.push_str(&super::escape::unescape(&s[1..s.len() - 1])?);
            let is_concat = self.tokens.get(self.pos).is_some_and(|(t, span)| {
                *t == DeclToken::Operator && &self.source[span.clone()] == "+"
            });
            if is_concat && matches!(self.peek_at(1), Some(DeclToken::Str(_))) {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(found.then_some(text))
    }

    /// Skip a balanced group starting at an opening token.
    fn skip_group(&mut self) -> Result<()> {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            self.pos += 1;
            match token {
                DeclToken::LParen | DeclToken::LBracket | DeclToken::LBrace => depth += 1,
                DeclToken::RParen | DeclToken::RBracket | DeclToken::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(self.error("unbalanced brackets"))
    }

    fn skip_to_semicolon(&mut self) -> Result<()> {
        while let Some(token) = self.peek() {
            match token {
                DeclToken::Semi => {
                    self.pos += 1;
                    return Ok(());
                }
                DeclToken::LParen | DeclToken::LBracket | DeclToken::LBrace => self.skip_group()?,
                _ => self.pos += 1,
            }
        }
        Err(self.error("expected ';'"))
    }

    fn annotation(&mut self) -> Result<()> {
        // `annotation` keyword already peeked
        self.pos += 1;
        if self.peek() == Some(DeclToken::LParen) {
            self.skip_group()?;
        }
        Ok(())
    }

    fn class_listing(&mut self) -> Result<ClassListing> {
        while let Some(DeclToken::Ident(text)) = self.peek() {
            if CLASS_PREFIXES.contains(&text) {
                self.pos += 1;
            } else {
                break;
            }
        }
        let restriction = match self.peek() {
            Some(DeclToken::Ident("function")) => ClassRestriction::Function,
            Some(DeclToken::Ident("record")) => ClassRestriction::Record,
            Some(DeclToken::Ident("type")) => ClassRestriction::Type,
            Some(DeclToken::Ident("package")) => ClassRestriction::Package,
            _ => return Err(self.error("expected a class restriction")),
        };
        self.pos += 1;
        let name = self.name()?.to_string();
        let description = self.description()?;

        let mut components = Vec::new();
        let mut protected = false;
        loop {
            match self.peek() {
                None => return Err(self.error(&format!("missing 'end {}'", name))),
                Some(DeclToken::Semi) => self.pos += 1,
                Some(DeclToken::Ident("end")) if self.is_class_end(&name) => {
                    self.pos += 2;
                    if self.peek() == Some(DeclToken::Semi) {
                        self.pos += 1;
                    }
                    break;
                }
                Some(DeclToken::Ident("public")) => {
                    self.pos += 1;
                    protected = false;
                }
                Some(DeclToken::Ident("protected")) => {
                    self.pos += 1;
                    protected = true;
                }
                Some(DeclToken::Ident("annotation")) => {
                    self.annotation()?;
                    self.expect(DeclToken::Semi, "';' after annotation")?;
                }
                Some(DeclToken::Ident("external")) => self.skip_to_semicolon()?,
                Some(DeclToken::Ident(text)) if BODY_SECTIONS.contains(&text) => {
                    self.skip_body(&name)?;
                }
                Some(DeclToken::Ident("extends")) | Some(DeclToken::Ident("import")) => {
                    self.skip_to_semicolon()?;
                }
                Some(_) => components.extend(self.component_clause(protected)?),
            }
        }

        if let Some((_, span)) = self.tokens.get(self.pos) {
            return Err(ScriptingError::malformed(
                &self.source[span.start..],
                "unexpected input after class end",
            ));
        }
        Ok(ClassListing {
            restriction,
            name,
            description,
            components,
        })
    }

    fn is_class_end(&self, name: &str) -> bool {
        matches!(
            self.peek_at(1),
            Some(DeclToken::Ident(n)) | Some(DeclToken::QIdent(n)) if n == name
        )
    }

    /// Skip statements/equations until the class's own `end name`.
    fn skip_body(&mut self, name: &str) -> Result<()> {
        while let Some(token) = self.peek() {
            match token {
                DeclToken::Ident("end") if self.is_class_end(name) => return Ok(()),
                DeclToken::Ident("public") | DeclToken::Ident("protected") => return Ok(()),
                DeclToken::LParen | DeclToken::LBracket | DeclToken::LBrace => self.skip_group()?,
                _ => self.pos += 1,
            }
        }
        Err(self.error(&format!("missing 'end {}'", name)))
    }

    fn type_specifier(&mut self) -> Result<String> {
        let start = self.pos;
        if self.peek() == Some(DeclToken::Dot) {
            self.pos += 1;
        }
        self.name()?;
        while self.peek() == Some(DeclToken::Dot) {
            self.pos += 1;
            self.name()?;
        }
        Ok(self.text(start, self.pos))
    }

    /// `[a, :, size(x, 1)]` split on top-level commas.
    fn subscripts(&mut self) -> Result<Vec<String>> {
        let mut subscripts = Vec::new();
        if self.peek() != Some(DeclToken::LBracket) {
            return Ok(subscripts);
        }
        self.pos += 1;
        let mut start = self.pos;
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token {
                DeclToken::LParen | DeclToken::LBracket | DeclToken::LBrace => depth += 1,
                DeclToken::RParen | DeclToken::RBrace => depth = depth.saturating_sub(1),
                DeclToken::RBracket if depth == 0 => {
                    subscripts.push(self.text(start, self.pos));
                    self.pos += 1;
                    return Ok(subscripts);
                }
                DeclToken::RBracket => depth -= 1,
                DeclToken::Comma if depth == 0 => {
                    subscripts.push(self.text(start, self.pos));
                    start = self.pos + 1;
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(self.error("unterminated array subscripts"))
    }

    /// Binding expression text; stops at a top-level `,`, `;`, annotation, or
    /// a description string that follows a complete operand.
    fn binding(&mut self) -> Result<String> {
        let start = self.pos;
        let mut depth = 0usize;
        let mut after_operator = true;
        while let Some(token) = self.peek() {
            if depth == 0 {
                match token {
                    DeclToken::Comma | DeclToken::Semi => break,
                    DeclToken::Ident("annotation") => break,
                    DeclToken::Str(_) if !after_operator => break,
                    _ => {}
                }
            }
            match token {
                DeclToken::LParen | DeclToken::LBracket | DeclToken::LBrace => depth += 1,
                DeclToken::RParen | DeclToken::RBracket | DeclToken::RBrace => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            after_operator = matches!(
                token,
                DeclToken::Operator
                    | DeclToken::Assign
                    | DeclToken::LParen
                    | DeclToken::LBracket
                    | DeclToken::LBrace
                    | DeclToken::Comma
                    | DeclToken::Colon
            ) || matches!(token, DeclToken::Ident(k) if EXPRESSION_KEYWORDS.contains(&k));
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a binding expression"));
        }
        Ok(self.text(start, self.pos))
    }

    fn component_clause(&mut self, protected: bool) -> Result<Vec<ComponentDeclaration>> {
        let mut direction = None;
        while let Some(DeclToken::Ident(text)) = self.peek() {
            match text {
                "input" => direction = Some(Direction::Input),
                "output" => direction = Some(Direction::Output),
                _ if COMPONENT_PREFIXES.contains(&text) => {}
                _ => break,
            }
            self.pos += 1;
        }
        let type_name = self.type_specifier()?;
        let type_subscripts = self.subscripts()?;

        let mut declarations = Vec::new();
        loop {
            let name = self.name()?.to_string();
            let mut subscripts = type_subscripts.clone();
            subscripts.extend(self.subscripts()?);
            if self.peek() == Some(DeclToken::LParen) {
                // modification
                self.skip_group()?;
            }
            let default = match self.peek() {
                Some(DeclToken::Assign) | Some(DeclToken::Walrus) => {
                    self.pos += 1;
                    Some(self.binding()?)
                }
                _ => None,
            };
            let description = self.description()?;
            if self.peek_keyword("annotation") {
                self.annotation()?;
            }
            declarations.push(ComponentDeclaration {
                name,
                type_name: type_name.clone(),
                direction,
                protected,
                subscripts,
                default,
                description,
            });
            match self.peek() {
                Some(DeclToken::Comma) => self.pos += 1,
                Some(DeclToken::Semi) => {
                    self.pos += 1;
                    return Ok(declarations);
                }
                _ => return Err(self.error("expected ',' or ';' after component")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unindent::unindent;

    #[test]
    fn test_function_listing_defaults() {
        let code = unindent(
            r#"
            function loadFile "load file (*.mo) and merge it with the loaded AST."
              input String fileName;
              input String encoding = "UTF-8" "file encoding";
              input Boolean uses = true;
              input Boolean notify = true "Give a notification of the libraries loaded";
              output Boolean success "Returns true on success";
            external "builtin";
            annotation(preferredView="text");
            end loadFile;
            "#,
        );
        let listing = parse_class_listing(&code).unwrap();
        assert_eq!(listing.restriction, ClassRestriction::Function);
        assert_eq!(listing.name, "loadFile");
        assert_eq!(
            listing.description.as_deref(),
            Some("load file (*.mo) and merge it with the loaded AST.")
        );
        let inputs: Vec<_> = listing.parameters(Direction::Input).collect();
        assert_eq!(inputs.len(), 4);
        assert!(!inputs[0].has_default());
        assert_eq!(inputs[1].default.as_deref(), Some("\"UTF-8\""));
        assert_eq!(inputs[1].description.as_deref(), Some("file encoding"));
        assert_eq!(inputs[2].default.as_deref(), Some("true"));
        assert_eq!(
            inputs[3].description.as_deref(),
            Some("Give a notification of the libraries loaded")
        );
        let outputs: Vec<_> = listing.parameters(Direction::Output).collect();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].type_name, "Boolean");
    }

    #[test]
    fn test_subscripts_and_expression_defaults() {
        let code = unindent(
            r#"
            function f
              input Real A[:, size(B, 1)];
              input Real[3] v = {1, 2, 3} "vector";
              input Integer n = -(1 + 2) * 3;
              input OpenModelica.Scripting.Access access = OpenModelica.Scripting.Access.all;
              input String s = "a" + "b";
              output Real x, y;
            protected
              Integer i = 0;
            algorithm
              if n > 0 then
                x := 1;
              end if;
              for k in 1:n loop
                y := k;
              end for;
            end f;
            "#,
        );
        let listing = parse_class_listing(&code).unwrap();
        let a = listing.component("A").unwrap();
        assert_eq!(a.subscripts, vec![":", "size(B, 1)"]);
        assert!(!a.has_default());
        let v = listing.component("v").unwrap();
        assert_eq!(v.subscripts, vec!["3"]);
        assert_eq!(v.default.as_deref(), Some("{1, 2, 3}"));
        assert_eq!(v.description.as_deref(), Some("vector"));
        assert_eq!(
            listing.component("n").unwrap().default.as_deref(),
            Some("-(1 + 2) * 3")
        );
        assert_eq!(
            listing.component("access").unwrap().type_name,
            "OpenModelica.Scripting.Access"
        );
        assert_eq!(
            listing.component("s").unwrap().default.as_deref(),
            Some("\"a\" + \"b\"")
        );
        let outputs: Vec<_> = listing
            .parameters(Direction::Output)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(outputs, vec!["x", "y"]);
        assert!(listing.component("i").unwrap().protected);
        assert_eq!(listing.parameters(Direction::Input).count(), 5);
    }

    #[test]
    fn test_record_listing() {
        let code = "record R \"a record\" Integer a; String b = \"z\"; end R;";
        let listing = parse_class_listing(code).unwrap();
        assert_eq!(listing.restriction, ClassRestriction::Record);
        assert_eq!(listing.components.len(), 2);
        assert!(listing.components.iter().all(|c| c.direction.is_none()));
        assert!(listing.component("b").unwrap().has_default());
    }

    #[test]
    fn test_builtin_defaults() {
        let code = "function getVersion input TypeName cl = $Code(OpenModelica); \
                    output String v; end getVersion;";
        let listing = parse_class_listing(code).unwrap();
        assert_eq!(
            listing.component("cl").unwrap().default.as_deref(),
            Some("$Code(OpenModelica)")
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let code = "function g // helper\n /* block */ input Integer x = 1; end g;";
        let listing = parse_class_listing(code).unwrap();
        assert!(listing.component("x").unwrap().has_default());
    }

    #[test]
    fn test_block_comments() {
        let code = "function g /* block */ input Integer x = 1; /* a * b / c **/ end g;";
        let listing = parse_class_listing(code).unwrap();
        assert_eq!(listing.components.len(), 1);
        assert!(listing.component("x").unwrap().has_default());
        assert!(parse_class_listing("function g input Integer x; /* open end g;").is_err());
    }

    #[test]
    fn test_malformed_listing() {
        assert!(parse_class_listing("model M end M;").is_err());
        assert!(parse_class_listing("function f input Real x; end g;").is_err());
        assert!(parse_class_listing("function f input Real x end f;").is_err());
    }
}
