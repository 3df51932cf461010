//! Syntax errors for schema strings.

use crate::ast::Span;
use miette::Diagnostic;
use thiserror::Error;

/// A lexing or parsing failure with the byte span it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(schema::syntax))]
pub struct SyntaxError {
    pub message: String,
    #[label("{message}")]
    pub span: Span,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end.saturating_sub(span.start)).into()
    }
}
