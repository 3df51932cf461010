//! Schema frontend for the DIOPI wrapper generator: lexer, parser, AST, diagnostics.
//!
//! An operator schema is a one-line signature such as
//! `add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor`. This crate turns it into a
//! structured [`ast::Schema`] once, so every downstream derivation works on parameters and return
//! elements instead of re-scanning the raw string.
//!
//! ## Notes
//! - This crate is “syntax-only”: it does not know about C++ renderings or DIOPI calls.
//! - Vocabulary identity (punctuation, type spellings) comes from `autogen_core::lang`.
//!
//! ## Examples
//! ```rust
//! use autogen_syntax::parse_schema;
//!
//! let schema = parse_schema("add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor").unwrap();
//! assert_eq!(schema.name.base, "add");
//! assert_eq!(schema.params.len(), 3);
//! assert!(schema.params[2].keyword_only);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;

use ast::Schema;
use diagnostics::SyntaxError;

/// Lex and parse a schema string in one step.
///
/// ## Errors
/// Returns every lexer error, or the first parser error, when the schema is malformed.
pub fn parse_schema(source: &str) -> Result<Schema, Vec<SyntaxError>> {
    let tokens = lexer::lex(source)?;
    parser::parse(source, &tokens)
}
