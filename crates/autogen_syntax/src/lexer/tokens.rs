//! Token types for the schema lexer.
//!
//! Punctuation tokens carry registry IDs from `autogen_core::lang::punctuation`; use
//! `crate::token_helpers` for ergonomic matching at call sites.

use crate::ast::Span;
use autogen_core::lang::punctuation::PunctuationId;

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    /// Numeric literal kept as written (`1`, `0.5`, `1e-05`).
    Number(String),
    /// Quoted string literal, quotes stripped.
    String(String),

    Eof,
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}
