//! Code generation backend.
//!
//! The pipeline for one catalogue record is:
//! 1. Parsed schema ([`crate::frontend::OpSignature`]) → call expression ([`call`])
//! 2. Tensor/scalar marshalling and return statement ([`emit`])
//! 3. Function and registration templates ([`templates`]) → text fragments
//!
//! Fragments of all records are substituted into the file template once, then post-processed by
//! [`crate::format`].
//!
//! ## Module Organization
//!
//! - `call.rs` - Foreign-call rewriter (`CallExpr`, `ForeignCall`)
//! - `emit.rs` - Per-record emission and whole-file assembly (`Generator`)
//! - `templates.rs` - Default templates and overrides (`TemplateSet`)
//! - `errors.rs` - `GenerateError`

#![deny(clippy::unwrap_used)]

pub mod call;
pub mod emit;
pub mod errors;
pub mod templates;

pub use call::{CallExpr, CallSource, ForeignCall};
pub use emit::{GeneratedOp, Generator};
pub use errors::GenerateError;
pub use templates::TemplateSet;
