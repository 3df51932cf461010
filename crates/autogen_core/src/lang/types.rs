//! Well-known schema type spellings.
//!
//! The schema grammar is open-ended (any identifier can name a type), but a handful of spellings
//! drive code generation: tensors and scalars are marshalled into DIOPI handles, `float` and
//! `bool` are passed through by value, and `str?` has a dedicated optional string-view rendering.
//!
//! ## Examples
//! ```rust
//! use autogen_core::lang::types::{self, SchemaTypeId};
//!
//! assert_eq!(types::from_str("Tensor"), Some(SchemaTypeId::Tensor));
//! assert_eq!(types::cxx_spelling("TensorList"), "at::TensorList");
//! assert_eq!(types::cxx_spelling("float"), "double");
//! assert_eq!(types::cxx_spelling("int"), "int");
//! ```

use std::borrow::Cow;

/// Stable identifier for schema types with generator-specific meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaTypeId {
    Tensor,
    Scalar,
    Str,
    Float,
    Bool,
}

/// Metadata for a well-known schema type.
#[derive(Debug, Clone, Copy)]
pub struct SchemaTypeInfo {
    pub id: SchemaTypeId,
    /// Spelling inside a schema.
    pub canonical: &'static str,
    /// Spelling in the generated C++ signature.
    pub cxx: &'static str,
}

/// Registry of well-known schema types.
pub const SCHEMA_TYPES: &[SchemaTypeInfo] = &[
    SchemaTypeInfo {
        id: SchemaTypeId::Tensor,
        canonical: "Tensor",
        cxx: "at::Tensor",
    },
    SchemaTypeInfo {
        id: SchemaTypeId::Scalar,
        canonical: "Scalar",
        cxx: "at::Scalar",
    },
    SchemaTypeInfo {
        id: SchemaTypeId::Str,
        canonical: "str",
        cxx: "c10::string_view",
    },
    SchemaTypeInfo {
        id: SchemaTypeId::Float,
        canonical: "float",
        cxx: "double",
    },
    SchemaTypeInfo {
        id: SchemaTypeId::Bool,
        canonical: "bool",
        cxx: "bool",
    },
];

/// Namespace prefix for ATen types in generated C++.
pub const ATEN_TYPE_NAMESPACE: &str = "at::";

/// Wrapper for optional values in generated C++.
pub const OPTIONAL_TEMPLATE: &str = "c10::optional";

/// Container for lists of optional elements (`Tensor?[]`) in generated C++.
pub const LIST_TEMPLATE: &str = "c10::List";

/// Resolve a schema spelling to a well-known type id (case-sensitive).
pub fn from_str(spelling: &str) -> Option<SchemaTypeId> {
    SCHEMA_TYPES.iter().find(|t| t.canonical == spelling).map(|t| t.id)
}

/// Return the registry entry for a type id.
pub fn info_for(id: SchemaTypeId) -> &'static SchemaTypeInfo {
    SCHEMA_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("schema type info missing")
}

/// Return the schema spelling for a type id.
pub fn as_str(id: SchemaTypeId) -> &'static str {
    info_for(id).canonical
}

/// Return the C++ spelling for a type id.
pub fn cxx_name(id: SchemaTypeId) -> &'static str {
    info_for(id).cxx
}

/// Render a schema base type for a C++ signature.
///
/// ## Notes
/// - Every `Tensor*`/`Scalar*` spelling (`Tensor`, `TensorList`, `ScalarType`, ...) is qualified with `at::`.
/// - `float` is widened to `double`.
/// - Anything else is passed through verbatim.
pub fn cxx_spelling(base: &str) -> Cow<'_, str> {
    if is_aten_family(base) {
        Cow::Owned(format!("{ATEN_TYPE_NAMESPACE}{base}"))
    } else if base == as_str(SchemaTypeId::Float) {
        Cow::Borrowed(cxx_name(SchemaTypeId::Float))
    } else {
        Cow::Borrowed(base)
    }
}

/// Return `true` for spellings that name an ATen class (`Tensor*` or `Scalar*`).
pub fn is_aten_family(base: &str) -> bool {
    base.starts_with(as_str(SchemaTypeId::Tensor)) || base.starts_with(as_str(SchemaTypeId::Scalar))
}
