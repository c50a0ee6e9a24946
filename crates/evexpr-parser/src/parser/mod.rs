//! Token-stream parser for expressions.
//!
//! The [`Parser`] owns the token vector from the lexer and hands tokens to
//! the grammar functions in [`expressions`] one at a time, with bounded
//! lookahead through [`Parser::nth`]. Grammar functions build owned
//! [`Expr`] nodes directly and record [`ParseError`]s on the side; they
//! never return early with an error, so every call yields a node.

pub(crate) mod expressions;

use evexpr_common::diagnostic::DiagnosticCode;
use evexpr_common::span::Span;
use evexpr_common::token::{Token, TokenKind};

use crate::ast::{ErrorNode, Expr, ExprKind};
use crate::error::ParseError;

/// Deepest nesting the grammar accepts. Parentheses, unary operators,
/// call arguments, indices and binary operators each count one level.
pub(crate) const MAX_NESTING: u32 = 200;

pub(crate) struct Parser<'src> {
    /// All tokens from the lexer, `Eof` included.
    tokens: Vec<Token>,
    /// Current position in the token stream. Never moves past `Eof`.
    pos: usize,
    /// Original source text, for error node text.
    source: &'src str,
    /// End offset of the last consumed token.
    last_end: u32,
    /// Span of the most recently closed parenthesised group.
    last_group: Option<Span>,
    /// Current nesting level, bounded by [`MAX_NESTING`].
    depth: u32,
    errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(mut tokens: Vec<Token>, source: &'src str) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let end = source.len() as u32;
            tokens.push(Token::new(TokenKind::Eof, "", end, end));
        }
        Self {
            tokens,
            pos: 0,
            source,
            last_end: 0,
            last_group: None,
            depth: 0,
            errors: Vec::new(),
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    pub(crate) fn current(&self) -> TokenKind {
        self.nth(0)
    }

    /// Kind of the token `n` positions ahead; `Eof` past the end.
    pub(crate) fn nth(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map_or_else(|| Span::empty_at(self.source.len() as u32), |t| t.span)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current())
    }

    /// End offset of the last consumed token (0 before anything is consumed).
    pub(crate) fn last_end(&self) -> u32 {
        self.last_end
    }

    // ── Consumption ────────────────────────────────────────────────────

    /// Consume the current token and return it. At `Eof` nothing moves and
    /// the `Eof` token is returned again.
    pub(crate) fn advance(&mut self) -> Token {
        let token = match self.tokens.get(self.pos) {
            Some(token) => token.clone(),
            None => {
                let end = self.source.len() as u32;
                return Token::new(TokenKind::Eof, "", end, end);
            }
        };
        if token.kind != TokenKind::Eof {
            self.pos += 1;
            self.last_end = token.span.end;
        }
        token
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    // ── Groups ─────────────────────────────────────────────────────────

    pub(crate) fn finish_group(&mut self, span: Span) {
        self.last_group = Some(span);
    }

    pub(crate) fn last_group(&self) -> Option<Span> {
        self.last_group
    }

    // ── Nesting ────────────────────────────────────────────────────────

    pub(crate) fn depth(&self) -> u32 {
        self.depth
    }

    pub(crate) fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    // ── Error reporting ────────────────────────────────────────────────

    pub(crate) fn push_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Record an error at the current token.
    pub(crate) fn error_here(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        let span = self.current_span();
        self.push_error(ParseError::new(code, message, span));
    }

    /// Build an [`ErrorNode`] covering `span`.
    pub(crate) fn error_node(&self, reason: impl Into<String>, span: Span) -> Expr {
        Expr::new(
            ExprKind::Error(ErrorNode {
                reason: reason.into(),
                text: span.slice(self.source).to_string(),
            }),
            span,
        )
    }

    pub(crate) fn finish(self) -> Vec<ParseError> {
        self.errors
    }
}

// ── Top-level parsing ──────────────────────────────────────────────────

/// Parse a whole expression: exactly one root, empty input included.
pub(crate) fn parse_root(p: &mut Parser) -> Expr {
    if p.at(TokenKind::Eof) {
        return Expr::new(ExprKind::Empty, p.current_span());
    }

    let root = expressions::expr(p);

    if !p.at(TokenKind::Eof) {
        let start = p.current_span().start;
        let stray_paren = p.at(TokenKind::RParen);
        while !p.at(TokenKind::Eof) {
            p.advance();
        }
        let span = Span::new(start, p.last_end().max(start));
        let error = if stray_paren {
            ParseError::new(
                DiagnosticCode::UnexpectedClosingParenthesis,
                "This closing parenthesis has no matching opening parenthesis. Remove it or add a `(` before.",
                span,
            )
        } else {
            ParseError::new(
                DiagnosticCode::ExtraCharacters,
                "The expression has extra characters at the end that should be removed (or completed if your expression is not finished).",
                span,
            )
        };
        p.push_error(error);
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use evexpr_lexer::Lexer;

    fn parser(source: &str) -> Parser<'_> {
        Parser::new(Lexer::tokenize(source), source)
    }

    #[test]
    fn lookahead_does_not_consume() {
        let p = parser("A.B::C()");
        assert_eq!(p.current(), TokenKind::Ident);
        assert_eq!(p.nth(1), TokenKind::Dot);
        assert_eq!(p.nth(3), TokenKind::ColonColon);
        assert_eq!(p.nth(42), TokenKind::Eof);
        assert_eq!(p.current_span(), Span::new(0, 1));
    }

    #[test]
    fn advance_stops_at_eof() {
        let mut p = parser("1");
        assert_eq!(p.advance().kind, TokenKind::Number);
        assert_eq!(p.last_end(), 1);
        assert_eq!(p.advance().kind, TokenKind::Eof);
        assert_eq!(p.advance().kind, TokenKind::Eof);
        assert!(p.at(TokenKind::Eof));
    }

    #[test]
    fn eat_consumes_on_match_only() {
        let mut p = parser("(1");
        assert!(p.eat(TokenKind::RParen).is_none());
        assert!(p.eat(TokenKind::LParen).is_some());
        assert!(p.at_any(&[TokenKind::Number, TokenKind::String]));
    }

    #[test]
    fn error_node_takes_source_text() {
        let p = parser("1 + $$");
        let node = p.error_node("bad", Span::new(4, 6));
        match node.kind {
            ExprKind::Error(err) => assert_eq!(err.text, "$$"),
            other => panic!("expected error node, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_empty_root() {
        let mut p = parser("  ");
        let root = parse_root(&mut p);
        assert_eq!(root.kind, ExprKind::Empty);
        assert!(p.finish().is_empty());
    }

    #[test]
    fn trailing_tokens_are_reported_once() {
        let mut p = parser("1 2 3");
        let root = parse_root(&mut p);
        assert_eq!(root.span, Span::new(0, 1));
        let errors = p.finish();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, DiagnosticCode::ExtraCharacters);
        assert_eq!(errors[0].span, Span::new(2, 5));
    }
}
