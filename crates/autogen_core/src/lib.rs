//! Provide the canonical vocabulary shared by the DIOPI wrapper generator.
//!
//! This crate is intentionally small and dependency-free. It holds the spellings every other
//! layer must agree on:
//! - the schema mini-language vocabulary (punctuation, well-known type spellings), and
//! - the naming conventions of the generated C++ (wrapper prefix, DIOPI handle types, helper
//!   functions, synthesized output names).
//!
//! ## Notes
//!
//! - No IO, no global state, and no generator-specific types live here.
//! - The lexer/parser (`autogen_syntax`) and the generator (`diopi_autogen`) both consume these
//!   tables, so a spelling change happens in exactly one place.

pub mod conventions;
pub mod lang;
