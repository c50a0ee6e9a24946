use std::fmt;

use serde::Serialize;

use crate::span::Span;

/// A token produced by the expression lexer.
///
/// Tokens keep their literal source text so the parser never needs the
/// original buffer to build names and literal values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    /// Create a new token from a kind, its text and byte offsets.
    pub fn new(kind: TokenKind, text: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            span: Span::new(start, end),
        }
    }
}

/// Every kind of token that can appear in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Literals ───────────────────────────────────────────────────────
    /// Number literal, e.g. `42`, `3.14`, `.5`.
    Number,
    /// Double-quoted string literal including its quotes.
    String,
    /// A string whose closing quote is missing. Spans to end of input.
    UnterminatedString,

    // ── Names ──────────────────────────────────────────────────────────
    /// Identifier: object, variable, behavior or function name.
    Ident,

    // ── Operators ──────────────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `^`
    Caret,

    // ── Punctuation ────────────────────────────────────────────────────
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `::` between a behavior and its function.
    ColonColon,

    // ── Special ────────────────────────────────────────────────────────
    /// A character the grammar does not know. Reported by the parser.
    Unknown,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Whether this token is one of the binary operators.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash | TokenKind::Caret
        )
    }

    /// How the token is named in syntax error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Number => "a number",
            TokenKind::String => "a text",
            TokenKind::UnterminatedString => "an unterminated text",
            TokenKind::Ident => "a name",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Caret => "`^`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::ColonColon => "`::`",
            TokenKind::Unknown => "an unexpected character",
            TokenKind::Eof => "the end of the expression",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}
