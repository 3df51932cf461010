//! Build the DIOPI call expression for an operator.
//!
//! A derived call is computed structurally from the parsed schema: the context handle first, then
//! the written tensors, then the remaining parameters in schema order with their types stripped.
//! Catalogue records may instead supply the call text verbatim (`interface`), which is kept as an
//! opaque [`CallExpr::Explicit`].
//!
//! ## Examples
//! ```rust
//! use diopi_autogen::backend::call::derive_call;
//! use diopi_autogen::frontend::OpSignature;
//!
//! let sig = OpSignature::parse("add_.Tensor(Tensor(a!) self, Tensor other, *, Scalar alpha=1) -> Tensor(a!)").unwrap();
//! let call = derive_call(sig.schema());
//! assert_eq!(call.to_string(), "diopiAddInp(ctx, self, other, &alpha)");
//! ```

use std::fmt;

use autogen_core::conventions;
use autogen_core::lang::types::SchemaTypeId;

use crate::frontend::ast::{OpName, Param, Schema, TypeRef};

/// Where a record's call expression comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallSource {
    /// Compute the call from the schema.
    Derived,
    /// Use the given call text as-is.
    Explicit(String),
}

/// One argument of a derived call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    /// The `ctx` handle.
    Context,
    /// An argument passed by name.
    Ident(String),
    /// A scalar passed by address: `&name`.
    ScalarRef(String),
    /// A parameter with no special handling, passed as `type name`.
    Verbatim { ty: String, name: String },
}

impl CallArg {
    fn rename(&mut self, from: &str, to: &str) {
        match self {
            CallArg::Context => {}
            CallArg::Ident(name) | CallArg::ScalarRef(name) | CallArg::Verbatim { name, .. } => {
                if name == from {
                    *name = to.to_string();
                }
            }
        }
    }
}

impl fmt::Display for CallArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallArg::Context => f.write_str(conventions::CONTEXT_ARG),
            CallArg::Ident(name) => f.write_str(name),
            CallArg::ScalarRef(name) => write!(f, "&{}", name),
            CallArg::Verbatim { ty, name } => write!(f, "{} {}", ty, name),
        }
    }
}

/// A structured call into the foreign interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignCall {
    pub function: String,
    pub args: Vec<CallArg>,
}

impl fmt::Display for ForeignCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

/// The call expression placed in a generated wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallExpr {
    Derived(ForeignCall),
    Explicit(String),
}

impl CallExpr {
    /// Resolve a record's call source against its schema.
    pub fn resolve(source: &CallSource, schema: &Schema) -> Self {
        match source {
            CallSource::Derived => CallExpr::Derived(derive_call(schema)),
            CallSource::Explicit(text) => {
                CallExpr::Explicit(text.trim().trim_end_matches(';').trim_end().to_string())
            }
        }
    }

    /// Rename every argument called `from` to `to`.
    ///
    /// Derived calls rename matching arguments; explicit calls replace whole identifiers only, so
    /// renaming `self` leaves `self_diopiHandle` or `myself` untouched.
    pub fn rename(&mut self, from: &str, to: &str) {
        match self {
            CallExpr::Derived(call) => call.args.iter_mut().for_each(|arg| arg.rename(from, to)),
            CallExpr::Explicit(text) => *text = replace_identifier(text, from, to),
        }
    }

    /// Bare name of the called function (`diopiAdd(ctx, ...)` -> `diopiAdd`).
    pub fn function_name(&self) -> String {
        match self {
            CallExpr::Derived(call) => call.function.clone(),
            CallExpr::Explicit(text) => explicit_function_name(text),
        }
    }
}

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallExpr::Derived(call) => write!(f, "{}", call),
            CallExpr::Explicit(text) => f.write_str(text),
        }
    }
}

/// Derive the foreign call for a schema.
///
/// Never fails for a schema the parser accepts.
pub fn derive_call(schema: &Schema) -> ForeignCall {
    let mut args = vec![CallArg::Context];
    args.extend(schema.inplace_params().map(|p| CallArg::Ident(p.name.clone())));

    let returns = &schema.returns;
    if !returns.has_inplace() {
        let tuple = returns.is_tuple();
        args.extend(
            (0..returns.elements.len())
                .map(|i| CallArg::Ident(conventions::output_name(tuple.then_some(i)))),
        );
    }

    args.extend(
        schema
            .params
            .iter()
            .filter(|p| !p.ty.is_inplace_tensor())
            .map(call_arg),
    );

    ForeignCall {
        function: foreign_function_name(&schema.name),
        args,
    }
}

/// Foreign function name for an operator (`add_.Tensor` -> `diopiAddInp`).
pub fn foreign_function_name(name: &OpName) -> String {
    let mut stem = match (&name.overload, name.base.strip_suffix('_')) {
        (Some(_), Some(base)) => format!("{}{}", base, conventions::INPLACE_TAG),
        _ => name.base.clone(),
    };
    if let Some(overload) = &name.overload {
        stem.push_str(overload);
    }
    for strip in conventions::STEM_STRIPS.iter().chain(conventions::NATIVE_MARKERS) {
        stem = stem.replace(strip, "");
    }

    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => format!(
            "{}{}{}",
            conventions::FOREIGN_PREFIX,
            first.to_uppercase(),
            chars.as_str()
        ),
        None => conventions::FOREIGN_PREFIX.to_string(),
    }
}

fn is_stripped(ty: &TypeRef) -> bool {
    ty.is(SchemaTypeId::Tensor)
        || ty.is(SchemaTypeId::Bool)
        || ty.is(SchemaTypeId::Float)
        || (ty.is(SchemaTypeId::Str) && ty.optional && ty.list.is_none())
}

fn call_arg(param: &Param) -> CallArg {
    if param.ty.is_bare_of(SchemaTypeId::Scalar) {
        CallArg::ScalarRef(param.name.clone())
    } else if is_stripped(&param.ty) {
        CallArg::Ident(param.name.clone())
    } else {
        CallArg::Verbatim {
            ty: param.ty.to_string(),
            name: param.name.clone(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace every whole-identifier occurrence of `from` in `text`.
fn replace_identifier(text: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(is_ident_char) {
        out.push_str(&rest[..start]);
        let word_len = rest[start..].find(|c: char| !is_ident_char(c)).unwrap_or(rest.len() - start);
        let word = &rest[start..start + word_len];
        out.push_str(if word == from { to } else { word });
        rest = &rest[start + word_len..];
    }
    out.push_str(rest);
    out
}

fn explicit_function_name(text: &str) -> String {
    let head = match text.find('(') {
        Some(open) => &text[..open],
        None => text,
    };
    let head = head.trim_end();
    let start = head
        .rfind(|c: char| !(is_ident_char(c) || c == ':'))
        .map_or(0, |i| i + 1);
    head[start..].to_string()
}
