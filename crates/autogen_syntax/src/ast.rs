//! Abstract syntax tree for operator schemas.
//!
//! ```text
//! schema  := op_name "(" [param ("," param)*] ")" "->" returns
//! op_name := [ident "::"] ident ["." ident]
//! param   := "*" | type ident ["=" default]
//! type    := ident ["(" alias ")"] [["?"] "[" [number] "]"] ["?"]
//! returns := "(" [ret ("," ret)*] ")" | ret
//! ret     := type [ident]
//! ```
//!
//! Nodes keep byte spans into the original schema text so callers can point diagnostics at the
//! offending fragment and, where needed, re-read the literal source.

use autogen_core::lang::types::{self, SchemaTypeId};
use std::fmt;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

pub type Ident = String;

/// A parsed operator schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: OpName,
    pub params: Vec<Param>,
    pub returns: ReturnSpec,
    pub span: Span,
}

impl Schema {
    /// Parameters marked in-place (`Tensor(a!) self`), in declaration order.
    pub fn inplace_params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| p.ty.is_inplace_tensor())
    }
}

/// Operator name: `[namespace::]base[.overload]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpName {
    pub namespace: Option<Ident>,
    pub base: Ident,
    pub overload: Option<Ident>,
    pub span: Span,
}

impl OpName {
    /// Name without its namespace, overload kept: `aten::add.Tensor` -> `add.Tensor`.
    pub fn unqualified(&self) -> String {
        match &self.overload {
            Some(overload) => format!("{}.{}", self.base, overload),
            None => self.base.clone(),
        }
    }

    /// Whether the base name carries the trailing in-place underscore (`add_`).
    pub fn is_inplace_variant(&self) -> bool {
        self.base.ends_with('_')
    }
}

/// Alias annotation on a type: `(a)` or `(a!)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Alias set name without the `!` marker.
    pub set: String,
    /// `true` when the annotation ends with `!` (the value is written to).
    pub mutable: bool,
    /// Span of the whole annotation, parentheses included.
    pub span: Span,
}

/// List suffix on a type: `[]`, `[N]`, or `?[]` for a list of optional elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSuffix {
    pub size: Option<String>,
    /// Written as `?[...]`: each element may be absent (`Tensor?[] indices`).
    pub optional_elements: bool,
}

/// A type reference such as `Tensor`, `Tensor(a!)`, `int[2]` or `Scalar?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub base: Ident,
    pub alias: Option<Alias>,
    pub list: Option<ListSuffix>,
    pub optional: bool,
    pub span: Span,
}

impl TypeRef {
    /// Whether the base spelling is exactly the given well-known type.
    pub fn is(&self, id: SchemaTypeId) -> bool {
        self.base == types::as_str(id)
    }

    /// No alias, no list suffix, not optional.
    pub fn is_bare(&self) -> bool {
        self.alias.is_none() && self.list.is_none() && !self.optional
    }

    /// Whether this is exactly the given type without any decoration.
    pub fn is_bare_of(&self, id: SchemaTypeId) -> bool {
        self.is(id) && self.is_bare()
    }

    /// Whether the alias annotation marks the value as written to.
    pub fn is_mutable(&self) -> bool {
        self.alias.as_ref().is_some_and(|a| a.mutable)
    }

    /// A single in-place tensor: `Tensor(a!)`.
    pub fn is_inplace_tensor(&self) -> bool {
        self.is(SchemaTypeId::Tensor) && self.is_mutable() && self.list.is_none() && !self.optional
    }

    /// A plain (possibly read-only aliased) tensor: `Tensor` or `Tensor(a)`.
    pub fn is_plain_tensor(&self) -> bool {
        self.is(SchemaTypeId::Tensor) && !self.is_mutable() && self.list.is_none() && !self.optional
    }

    /// An optional single tensor: `Tensor?`.
    pub fn is_optional_tensor(&self) -> bool {
        self.is(SchemaTypeId::Tensor) && self.optional && self.list.is_none()
    }

    /// A list whose elements may be absent: `Tensor?[]`.
    pub fn has_optional_elements(&self) -> bool {
        self.list.as_ref().is_some_and(|l| l.optional_elements)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if let Some(alias) = &self.alias {
            write!(f, "({}{})", alias.set, if alias.mutable { "!" } else { "" })?;
        }
        if let Some(list) = &self.list {
            if list.optional_elements {
                write!(f, "?")?;
            }
            write!(f, "[{}]", list.size.as_deref().unwrap_or(""))?;
        }
        if self.optional {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// A formal parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: TypeRef,
    pub name: Ident,
    /// Raw default value text (`1`, `None`, `"mean"`), without the `=`.
    pub default: Option<String>,
    /// Declared after the bare `*` marker.
    pub keyword_only: bool,
    pub span: Span,
}

/// The return clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnSpec {
    pub elements: Vec<ReturnElem>,
    /// Written with parentheses (`(Tensor, Tensor)` or `()`).
    pub parenthesized: bool,
    pub span: Span,
}

impl ReturnSpec {
    /// More than one element (`out{i}` naming applies).
    pub fn is_tuple(&self) -> bool {
        self.elements.len() > 1
    }

    /// Whether any element carries an in-place marker.
    pub fn has_inplace(&self) -> bool {
        self.elements.iter().any(|e| e.ty.is_mutable())
    }
}

/// One element of the return clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnElem {
    pub ty: TypeRef,
    pub name: Option<Ident>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor(alias: Option<(&str, bool)>, optional: bool) -> TypeRef {
        TypeRef {
            base: "Tensor".to_string(),
            alias: alias.map(|(set, mutable)| Alias {
                set: set.to_string(),
                mutable,
                span: Span::default(),
            }),
            list: None,
            optional,
            span: Span::default(),
        }
    }

    #[test]
    fn tensor_classification() {
        assert!(tensor(None, false).is_plain_tensor());
        assert!(tensor(Some(("a", false)), false).is_plain_tensor());
        assert!(tensor(Some(("a", true)), false).is_inplace_tensor());
        assert!(tensor(None, true).is_optional_tensor());
        assert!(!tensor(None, true).is_plain_tensor());
    }

    #[test]
    fn type_ref_display_is_canonical() {
        assert_eq!(tensor(Some(("a", true)), false).to_string(), "Tensor(a!)");
        assert_eq!(tensor(None, true).to_string(), "Tensor?");

        let mut indices = tensor(None, false);
        indices.list = Some(ListSuffix {
            size: None,
            optional_elements: true,
        });
        assert_eq!(indices.to_string(), "Tensor?[]");
        assert!(indices.has_optional_elements());
        assert!(!indices.is_optional_tensor());
        assert!(!indices.is_plain_tensor());
    }
}
