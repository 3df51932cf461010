//! Schema mini-language vocabulary.
//!
//! - [`punctuation`]: punctuation tokens recognised by the schema lexer.
//! - [`types`]: well-known schema type spellings and their C++ renderings.

pub mod punctuation;
pub mod types;
