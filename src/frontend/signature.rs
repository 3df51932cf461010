//! Derive the C++ wrapper signature and marshalling facts from a schema.
//!
//! [`OpSignature`] parses a schema once and answers every structural question the emitter asks:
//! the wrapper name and signature, which tensors are inputs or outputs, which arguments are
//! scalars, and what the wrapper returns.
//!
//! ## Examples
//! ```rust
//! use diopi_autogen::frontend::{OpSignature, TensorInput};
//!
//! let sig = OpSignature::parse("add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor").unwrap();
//! assert_eq!(sig.function_name(), "dipu_add_tensor");
//! assert_eq!(
//!     sig.cpp_signature(),
//!     "at::Tensor dipu_add_tensor(const at::Tensor& self, const at::Tensor& other, const at::Scalar& alpha)"
//! );
//! assert_eq!(sig.inputs(), vec![TensorInput::Required("self".into()), TensorInput::Required("other".into())]);
//! assert_eq!(sig.outputs(), vec!["out"]);
//! assert_eq!(sig.scalar_args(), vec!["alpha"]);
//! ```

use autogen_core::conventions;
use autogen_core::lang::types::{self, LIST_TEMPLATE, OPTIONAL_TEMPLATE, SchemaTypeId};

use super::ast::{Alias, Param, ReturnElem, Schema, TypeRef};
use super::diagnostics::SyntaxError;

/// A tensor argument converted to a read-only DIOPI handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TensorInput {
    /// `Tensor x`: always converted.
    Required(String),
    /// `Tensor? x`: converted only when `x.has_value() && x.value().defined()`.
    Optional(String),
}

impl TensorInput {
    pub fn name(&self) -> &str {
        match self {
            TensorInput::Required(name) | TensorInput::Optional(name) => name,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TensorInput::Optional(_))
    }
}

/// A parsed schema together with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct OpSignature {
    source: String,
    schema: Schema,
}

impl OpSignature {
    /// Parse a schema string.
    ///
    /// ## Errors
    /// Returns the syntax errors of a malformed schema.
    pub fn parse(source: &str) -> Result<Self, Vec<SyntaxError>> {
        let schema = autogen_syntax::parse_schema(source)?;
        Ok(Self {
            source: source.to_string(),
            schema,
        })
    }

    /// The schema text exactly as given.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Operator name used for registration (`aten::add.Tensor` -> `add.Tensor`).
    pub fn register_name(&self) -> String {
        self.schema.name.unqualified()
    }

    /// Generated wrapper name (`add.Tensor` -> `dipu_add_tensor`).
    pub fn function_name(&self) -> String {
        let name = self.register_name().replace('.', "_");
        format!("{}{}", conventions::WRAPPER_PREFIX, name).to_lowercase()
    }

    /// C++ return type of the wrapper.
    pub fn return_type(&self) -> String {
        let returns = &self.schema.returns;
        match returns.elements.as_slice() {
            [] if returns.parenthesized => "void".to_string(),
            [single] if !returns.parenthesized => cxx_return_type(&single.ty),
            elements => {
                let parts: Vec<String> = elements.iter().map(|e| cxx_return_type(&e.ty)).collect();
                format!("std::tuple<{}>", parts.join(", "))
            }
        }
    }

    /// C++ parameter list of the wrapper, without parentheses.
    pub fn parameter_list(&self) -> String {
        self.schema.params.iter().map(cxx_param).collect::<Vec<_>>().join(", ")
    }

    /// Full C++ declaration: `{return_type} {function_name}({parameter_list})`.
    pub fn cpp_signature(&self) -> String {
        format!(
            "{} {}({})",
            self.return_type(),
            self.function_name(),
            self.parameter_list()
        )
    }

    /// Tensor parameters that are only read.
    pub fn inputs(&self) -> Vec<TensorInput> {
        self.schema
            .params
            .iter()
            .filter_map(|p| {
                if p.ty.is_plain_tensor() {
                    Some(TensorInput::Required(p.name.clone()))
                } else if p.ty.is_optional_tensor() {
                    Some(TensorInput::Optional(p.name.clone()))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Tensors written by the operator.
    ///
    /// In-place parameters when there are any; otherwise the bare `Tensor` positions of the return
    /// clause (`out`, or `out{i}` inside a tuple).
    pub fn outputs(&self) -> Vec<String> {
        let inplace: Vec<String> = self.schema.inplace_params().map(|p| p.name.clone()).collect();
        if !inplace.is_empty() {
            return inplace;
        }
        let returns = &self.schema.returns;
        if !returns.is_tuple() {
            return returns
                .elements
                .iter()
                .filter(|e| e.ty.is_bare_of(SchemaTypeId::Tensor))
                .map(|_| conventions::output_name(None))
                .collect();
        }
        returns
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.ty.is_bare_of(SchemaTypeId::Tensor))
            .map(|(i, _)| conventions::output_name(Some(i)))
            .collect()
    }

    /// Plain `Scalar` parameters.
    pub fn scalar_args(&self) -> Vec<String> {
        self.schema
            .params
            .iter()
            .filter(|p| p.ty.is_bare_of(SchemaTypeId::Scalar))
            .map(|p| p.name.clone())
            .collect()
    }

    /// Names the wrapper returns, in return-clause order.
    ///
    /// An in-place element `Tensor(a!)` resolves to the identifier that follows the first
    /// occurrence of the literal marker `(a!)` in the schema text.
    pub fn return_bindings(&self) -> Vec<String> {
        let returns = &self.schema.returns;
        let tuple = returns.is_tuple();
        returns
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| is_tensor_family(e))
            .map(|(i, e)| {
                let position = tuple.then_some(i);
                match e.ty.alias.as_ref().filter(|a| a.mutable) {
                    Some(alias) => self
                        .back_reference(alias)
                        .unwrap_or_else(|| conventions::output_name(position)),
                    None => conventions::output_name(position),
                }
            })
            .collect()
    }

    fn back_reference(&self, alias: &Alias) -> Option<String> {
        let marker = self.source.get(alias.span.start..alias.span.end)?;
        let found = self.source.find(marker)?;
        let rest = &self.source[found + marker.len()..];
        let start = rest.find(is_binding_char)?;
        let name: String = rest[start..].chars().take_while(|c| is_binding_char(*c)).collect();
        Some(name)
    }
}

fn is_binding_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ':'
}

fn is_tensor_family(elem: &ReturnElem) -> bool {
    elem.ty.base.starts_with(types::as_str(SchemaTypeId::Tensor))
}

fn list_suffix(ty: &TypeRef) -> String {
    match &ty.list {
        Some(list) => format!("[{}]", list.size.as_deref().unwrap_or("")),
        None => String::new(),
    }
}

/// `Tensor?[]` -> `c10::List<c10::optional<at::Tensor>>`; everything else keeps the schema suffix.
fn cxx_value_type(ty: &TypeRef) -> String {
    if ty.has_optional_elements() {
        format!(
            "{}<{}<{}>>",
            LIST_TEMPLATE,
            OPTIONAL_TEMPLATE,
            types::cxx_spelling(&ty.base)
        )
    } else {
        format!("{}{}", types::cxx_spelling(&ty.base), list_suffix(ty))
    }
}

fn cxx_return_type(ty: &TypeRef) -> String {
    let mut text = cxx_value_type(ty);
    if ty.optional {
        text = format!("{}<{}>", OPTIONAL_TEMPLATE, text);
    }
    if ty.is_mutable() {
        text.push('&');
    }
    text
}

fn cxx_param_type(ty: &TypeRef) -> String {
    let spelled = cxx_value_type(ty);
    if ty.is_mutable() {
        format!("{}&", spelled)
    } else if ty.optional && ty.list.is_none() && ty.is(SchemaTypeId::Str) {
        format!("{}<{}>", OPTIONAL_TEMPLATE, types::cxx_name(SchemaTypeId::Str))
    } else if ty.is_optional_tensor() {
        format!("const {}<{}>&", OPTIONAL_TEMPLATE, types::cxx_name(SchemaTypeId::Tensor))
    } else if ty.optional {
        format!("{}<{}>&", OPTIONAL_TEMPLATE, spelled)
    } else if ty.has_optional_elements() {
        format!("const {}&", spelled)
    } else if ty.list.is_none() && (ty.is(SchemaTypeId::Tensor) || ty.is(SchemaTypeId::Scalar)) {
        format!("const {}&", spelled)
    } else {
        spelled
    }
}

fn cxx_param(param: &Param) -> String {
    format!("{} {}", cxx_param_type(&param.ty), param.name)
}
