#![forbid(unsafe_code)]
//! DIOPI wrapper generator
//!
//! Compiles a catalogue of operator schemas into C++ source: one wrapper function per operator
//! that marshals its arguments into DIOPI handles and calls the foreign kernel, plus one
//! registration entry binding the operator name to the wrapper.
//!
//! - `frontend` - schema parsing (re-exported from `autogen_syntax`) and signature derivations
//! - `template` - `$name` text templates
//! - `backend` - foreign-call rewriting, per-record emission and file assembly
//! - `format` - output post-processing
//! - `catalogue` - YAML catalogue reader
//! - `cli` - command-line entry point
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: Registry lookups in `autogen_core` use `.expect("... info missing")`; a panic there is a
//!   table bug, not an input error.

pub mod backend;
pub mod catalogue;
pub mod cli;
pub mod format;
pub mod frontend;
pub mod template;
pub mod version;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::{OpSignature, TensorInput};

pub use backend::{GenerateError, Generator, TemplateSet};
pub use catalogue::{OpRecord, load_catalogue, parse_catalogue};
pub use format::{FormatConfig, normalize};
pub use template::{Env, Template, TemplateError, Value};
