//! Expression grammar using Pratt parsing (top-down operator precedence).
//!
//! Binding powers, lowest to highest:
//!
//! | Operator | l_bp | r_bp | Assoc |
//! |----------|------|------|-------|
//! | `+` `-`  | 1    | 2    | left  |
//! | `*` `/`  | 3    | 4    | left  |
//! | prefix   | -    | 5    | -     |
//! | `^`      | 7    | 6    | right |

use evexpr_common::diagnostic::DiagnosticCode;
use evexpr_common::span::Span;
use evexpr_common::token::TokenKind;

use crate::ast::{Accessor, BinaryOp, Expr, ExprKind, FunctionCall, Name, UnaryOp, VariableAccessor};
use crate::error::ParseError;

use super::{Parser, MAX_NESTING};

// ── Binding Power Tables ───────────────────────────────────────────────

fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8, BinaryOp)> {
    match kind {
        TokenKind::Plus => Some((1, 2, BinaryOp::Add)),
        TokenKind::Minus => Some((1, 2, BinaryOp::Sub)),
        TokenKind::Star => Some((3, 4, BinaryOp::Mul)),
        TokenKind::Slash => Some((3, 4, BinaryOp::Div)),
        TokenKind::Caret => Some((7, 6, BinaryOp::Pow)),
        _ => None,
    }
}

const PREFIX_BP: u8 = 5;

/// Tokens that end an operand. Error recovery never consumes them.
const BOUNDARIES: &[TokenKind] = &[
    TokenKind::Eof,
    TokenKind::RParen,
    TokenKind::RBracket,
    TokenKind::Comma,
];

// ── Public Entry Point ─────────────────────────────────────────────────

pub(crate) fn expr(p: &mut Parser) -> Expr {
    expr_bp(p, 0)
}

// ── Pratt Expression Parser ────────────────────────────────────────────

fn expr_bp(p: &mut Parser, min_bp: u8) -> Expr {
    let depth = p.depth();
    if depth >= MAX_NESTING {
        return too_deep(p);
    }
    p.set_depth(depth + 1);

    let mut lhs = operand(p);

    loop {
        let Some((l_bp, r_bp, op)) = infix_binding_power(p.current()) else {
            break;
        };
        if l_bp < min_bp {
            break;
        }
        p.advance(); // operator
        // The new node sits above `lhs`, so its right side is one level deeper.
        p.set_depth(p.depth() + 1);
        let rhs = expr_bp(p, r_bp);
        let span = lhs.span.merge(rhs.span);
        lhs = Expr::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span,
        );
    }

    p.set_depth(depth);
    lhs
}

/// Past [`MAX_NESTING`]: skip to the boundary that closes the current
/// level, keeping nested brackets balanced, and stand for it with one
/// error node.
fn too_deep(p: &mut Parser) -> Expr {
    let start = p.current_span().start;
    let mut open = 0usize;
    loop {
        match p.current() {
            TokenKind::Eof => break,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::Comma if open == 0 => break,
            TokenKind::LParen | TokenKind::LBracket => open += 1,
            TokenKind::RParen | TokenKind::RBracket => open -= 1,
            _ => {}
        }
        p.advance();
    }
    let span = Span::new(start, p.last_end().max(start));
    p.push_error(ParseError::new(
        DiagnosticCode::NestingTooDeep,
        format!(
            "This expression is nested too deeply (more than {MAX_NESTING} levels). Split it into simpler expressions."
        ),
        span,
    ));
    p.error_node("nesting too deep", span)
}

fn operand(p: &mut Parser) -> Expr {
    let op = match p.current() {
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Minus => UnaryOp::Minus,
        _ => return primary(p),
    };
    let op_token = p.advance();
    let operand = expr_bp(p, PREFIX_BP);
    let span = op_token.span.merge(operand.span);
    Expr::new(
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
        span,
    )
}

fn primary(p: &mut Parser) -> Expr {
    match p.current() {
        TokenKind::Number => {
            let token = p.advance();
            // The lexer only produces `digits[.digits]` and `.digits`, both valid floats.
            let value = token.text.parse::<f64>().unwrap_or(0.0);
            Expr::new(
                ExprKind::Number {
                    value,
                    text: token.text,
                },
                token.span,
            )
        }
        TokenKind::String => {
            let token = p.advance();
            Expr::new(
                ExprKind::String {
                    value: unescape_string(&token.text),
                },
                token.span,
            )
        }
        TokenKind::UnterminatedString => {
            let token = p.advance();
            p.push_error(ParseError::new(
                DiagnosticCode::UnterminatedString,
                "A text must be ended by a double quote (\"). Add a double quote to terminate the text.",
                token.span,
            ));
            p.error_node("unterminated string", token.span)
        }
        TokenKind::LParen => group(p),
        TokenKind::Ident => name(p),
        TokenKind::Eof | TokenKind::RParen => {
            let span = Span::empty_at(p.current_span().start);
            let message = if p.at(TokenKind::Eof) {
                "You must enter a value here. The expression is not complete."
            } else {
                "You must enter a value before this closing parenthesis."
            };
            p.push_error(ParseError::new(DiagnosticCode::MissingOperand, message, span));
            p.error_node("missing operand", span)
        }
        TokenKind::Comma | TokenKind::RBracket => {
            let span = Span::empty_at(p.current_span().start);
            let found = p.current();
            p.push_error(ParseError::new(
                DiagnosticCode::SyntaxError,
                format!("A value was expected here, but found {}.", found.describe()),
                span,
            ));
            p.error_node("missing operand", span)
        }
        _ => unexpected_tokens(p),
    }
}

/// Consume a bad token and everything after it up to the next boundary
/// or infix operator, and stand for all of it with one error node.
fn unexpected_tokens(p: &mut Parser) -> Expr {
    let first = p.advance();
    while !p.at_any(BOUNDARIES) && infix_binding_power(p.current()).is_none() {
        p.advance();
    }
    let span = Span::new(first.span.start, p.last_end().max(first.span.end));
    p.push_error(ParseError::new(
        DiagnosticCode::SyntaxError,
        format!(
            "{} is not expected here. Enter a number, a text, a variable or a function call.",
            capitalize(&first.kind.describe())
        ),
        span,
    ));
    p.error_node("unexpected token", span)
}

// ── Groups ─────────────────────────────────────────────────────────────

/// `( expression )`. A closed group is the inner node with its span widened
/// to cover the parentheses.
fn group(p: &mut Parser) -> Expr {
    let open = p.advance(); // (
    let inner = expr(p);

    let Some(close) = p.eat(TokenKind::RParen) else {
        let span = Span::new(open.span.start, p.last_end().max(open.span.end));
        p.push_error(
            ParseError::new(
                DiagnosticCode::UnmatchedParenthesis,
                "Missing a closing parenthesis. Add a closing parenthesis for each opening parenthesis.",
                span,
            )
            .with_related("parenthesis opened here", open.span),
        );
        return p.error_node("unmatched parenthesis", span);
    };

    let span = open.span.merge(close.span);
    if !inner.is_error() && p.last_group() == Some(inner.span) {
        p.push_error(ParseError::warning(
            DiagnosticCode::RedundantParentheses,
            "These parentheses are not needed. Remove them to simplify the expression.",
            span,
        ));
    }
    p.finish_group(span);

    Expr::new(inner.kind, span)
}

// ── Names, Calls and Variables ─────────────────────────────────────────

fn name(p: &mut Parser) -> Expr {
    let first = p.advance(); // identifier
    let first = Name::new(first.text, first.span);

    match (p.current(), p.nth(1), p.nth(2)) {
        (TokenKind::LParen, _, _) => call(p, None, None, first),
        (TokenKind::Dot, TokenKind::Ident, TokenKind::LParen) => {
            p.advance(); // .
            let function = p.advance();
            let function = Name::new(function.text, function.span);
            call(p, Some(first), None, function)
        }
        (TokenKind::Dot, TokenKind::Ident, TokenKind::ColonColon) => behavior_call(p, first),
        (TokenKind::Dot | TokenKind::LBracket, _, _) => variable(p, first),
        _ => Expr::new(ExprKind::Identifier { name: first.text }, first.span),
    }
}

/// `Object.Behavior::Function(args)`, with the cursor on the `.`.
fn behavior_call(p: &mut Parser, object: Name) -> Expr {
    p.advance(); // .
    let behavior = p.advance();
    let behavior = Name::new(behavior.text, behavior.span);
    p.advance(); // ::

    let Some(function) = p.eat(TokenKind::Ident) else {
        p.error_here(
            DiagnosticCode::SyntaxError,
            "The name of a behavior function is expected after `::`.",
        );
        let span = Span::new(object.span.start, p.last_end());
        return p.error_node("missing behavior function", span);
    };
    let function = Name::new(function.text, function.span);

    if !p.at(TokenKind::LParen) {
        p.error_here(
            DiagnosticCode::SyntaxError,
            "An opening parenthesis was expected here to call the behavior function.",
        );
        let span = object.span.merge(function.span);
        return Expr::new(
            ExprKind::Call(FunctionCall {
                object: Some(object),
                behavior: Some(behavior),
                function,
                parameters: Vec::new(),
            }),
            span,
        );
    }

    call(p, Some(object), Some(behavior), function)
}

/// Parse the argument list of a call, with the cursor on `(`.
fn call(p: &mut Parser, object: Option<Name>, behavior: Option<Name>, function: Name) -> Expr {
    let start = object.as_ref().map_or(function.span.start, |o| o.span.start);
    let open = p.advance(); // (
    let mut parameters = Vec::new();

    if !p.at(TokenKind::RParen) {
        loop {
            parameters.push(expr(p));
            if p.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
    }

    if p.eat(TokenKind::RParen).is_none() {
        let span = Span::new(open.span.start, p.last_end().max(open.span.end));
        p.push_error(
            ParseError::new(
                DiagnosticCode::UnterminatedParameters,
                "The list of parameters is not terminated. Add a closing parenthesis to end the parameters.",
                span,
            )
            .with_related("parameters start here", open.span),
        );
    }

    let span = Span::new(start, p.last_end());
    Expr::new(
        ExprKind::Call(FunctionCall {
            object,
            behavior,
            function,
            parameters,
        }),
        span,
    )
}

/// `Name` followed by one or more `.child` or `[index]` accessors.
fn variable(p: &mut Parser, name: Name) -> Expr {
    let mut accessors = Vec::new();

    loop {
        match p.current() {
            TokenKind::Dot => {
                let dot = p.advance();
                let Some(child) = p.eat(TokenKind::Ident) else {
                    p.error_here(
                        DiagnosticCode::SyntaxError,
                        "A name is expected after `.` to access a child variable.",
                    );
                    break;
                };
                accessors.push(Accessor::Child {
                    span: dot.span.merge(child.span),
                    name: child.text,
                });
            }
            TokenKind::LBracket => {
                let open = p.advance();
                let index = expr(p);
                match p.eat(TokenKind::RBracket) {
                    Some(close) => accessors.push(Accessor::Index {
                        index: Box::new(index),
                        span: open.span.merge(close.span),
                    }),
                    None => {
                        let span = Span::new(open.span.start, p.last_end().max(open.span.end));
                        p.push_error(
                            ParseError::new(
                                DiagnosticCode::UnterminatedIndex,
                                "Missing a closing bracket. Add `]` to end the variable index.",
                                span,
                            )
                            .with_related("bracket opened here", open.span),
                        );
                        accessors.push(Accessor::Index {
                            index: Box::new(index),
                            span,
                        });
                        break;
                    }
                }
            }
            _ => break,
        }
    }

    let span = Span::new(name.span.start, p.last_end().max(name.span.end));
    Expr::new(ExprKind::Variable(VariableAccessor { name, accessors }), span)
}

// ── Helpers ────────────────────────────────────────────────────────────

/// Strip the quotes of a string token and decode `\"` and `\\`.
/// Any other backslash is kept as written.
fn unescape_string(text: &str) -> String {
    let inner = text.strip_prefix('"').unwrap_or(text);
    let inner = inner.strip_suffix('"').unwrap_or(inner);
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('"' | '\\')) => value.push(escaped),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
