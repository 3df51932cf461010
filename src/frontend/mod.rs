//! Schema frontend.
//!
//! The lexer, parser and AST live in the `autogen_syntax` crate and are re-exported here; this
//! module adds [`signature`], the derivations the generator needs from one parsed schema.

pub use autogen_syntax::{ast, diagnostics, lexer, parser};

pub mod signature;

pub use signature::{OpSignature, TensorInput};
