//! Expression lexer -- tokenizer for event sheet expressions.
//!
//! The lexer never fails. Characters the grammar does not know become
//! single-character [`TokenKind::Unknown`] tokens and a string missing its
//! closing quote becomes one [`TokenKind::UnterminatedString`] token, so
//! all error reporting happens in the parser where there is enough context
//! to phrase it.

mod cursor;

use cursor::Cursor;
use evexpr_common::token::{Token, TokenKind};

/// The expression lexer. Converts text into a stream of tokens.
///
/// Implements `Iterator<Item = Token>`; the last item is always a single
/// [`TokenKind::Eof`] token positioned at the end of input.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    /// Whether we have already emitted the `Eof` token.
    emitted_eof: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
        }
    }

    /// Convenience: tokenize the whole text into a `Vec<Token>`, `Eof` included.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.cursor.pos();
        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, "", start, start);
        };

        match c {
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            '+' => self.single_char_token(TokenKind::Plus, start),
            '-' => self.single_char_token(TokenKind::Minus, start),
            '*' => self.single_char_token(TokenKind::Star, start),
            '/' => self.single_char_token(TokenKind::Slash, start),
            '^' => self.single_char_token(TokenKind::Caret, start),

            // `.5` is a number, any other `.` is an accessor/call separator.
            '.' if self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) => {
                self.lex_number(start)
            }
            '.' => self.single_char_token(TokenKind::Dot, start),

            ':' => self.lex_colon(start),
            '"' => self.lex_string(start),
            '0'..='9' => self.lex_number(start),
            c if is_ident_start(c) => self.lex_ident(start),

            _ => self.single_char_token(TokenKind::Unknown, start),
        }
    }

    fn skip_whitespace(&mut self) {
        self.cursor
            .eat_while(|c| c == ' ' || c == '\t' || c == '\r' || c == '\n');
    }

    fn finish(&self, kind: TokenKind, start: u32) -> Token {
        let end = self.cursor.pos();
        Token::new(kind, self.cursor.slice(start, end), start, end)
    }

    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        self.finish(kind, start)
    }

    /// `::` -> `ColonColon`, a lone `:` -> `Unknown`.
    fn lex_colon(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume ':'
        if self.cursor.eat(':') {
            self.finish(TokenKind::ColonColon, start)
        } else {
            self.finish(TokenKind::Unknown, start)
        }
    }

    /// Digits with an optional fractional part: `12`, `12.5`, `.5`, `12.`.
    fn lex_number(&mut self, start: u32) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.') {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        self.finish(TokenKind::Number, start)
    }

    /// A double-quoted string. `\"` and `\\` are escapes; the token text
    /// keeps the raw source including quotes, decoding is the parser's job.
    fn lex_string(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume opening '"'
        loop {
            match self.cursor.peek() {
                None => return self.finish(TokenKind::UnterminatedString, start),
                Some('"') => {
                    self.cursor.advance();
                    return self.finish(TokenKind::String, start);
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        self.finish(TokenKind::Ident, start)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
