//! Shared types for the event expression engine.
//!
//! Every stage (lexer, parser, validator) reports positions as byte
//! [`Span`]s and problems as [`Diagnostic`]s, so they live here where all
//! crates can reach them.

pub mod diagnostic;
pub mod span;
pub mod token;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use span::{LineIndex, Span};
pub use token::{Token, TokenKind};
