//! Naming conventions of the generated DIPU/DIOPI glue code.
//!
//! Every identifier the generator invents (wrapper names, handle variables, synthesized outputs,
//! the foreign function stem) is derived from the constants and helpers in this module.
//!
//! ## Examples
//! ```rust
//! use autogen_core::conventions;
//!
//! assert_eq!(conventions::output_name(None), "out");
//! assert_eq!(conventions::output_name(Some(2)), "out2");
//! assert_eq!(conventions::handle_name("self"), "self_diopiHandle");
//! assert_eq!(conventions::scalar_name("alpha"), "alpha_diopiScalar");
//! ```

/// Prefix of every generated wrapper function.
pub const WRAPPER_PREFIX: &str = "dipu_";

/// Namespace that holds the generated wrapper functions.
pub const NATIVE_NAMESPACE: &str = "dipu::native::";

/// Prefix of every DIOPI foreign function.
pub const FOREIGN_PREFIX: &str = "diopi";

/// Global-namespace qualified spelling of [`FOREIGN_PREFIX`].
pub const FOREIGN_QUALIFIED_PREFIX: &str = "::diopi";

/// Name of the DIOPI context handle, always the first foreign argument.
pub const CONTEXT_ARG: &str = "ctx";

/// Tag that replaces the in-place `_` suffix of an overloaded operator (`add_.Tensor` -> `addInpTensor`).
pub const INPLACE_TAG: &str = "Inp";

/// Base name of synthesized output tensors.
pub const OUTPUT_NAME: &str = "out";

/// Substrings removed from the foreign function stem, in order.
pub const STEM_STRIPS: &[&str] = &["out", "_mode", "Tensor", "_"];

/// Leading markers removed from the foreign function stem after [`STEM_STRIPS`].
pub const NATIVE_MARKERS: &[&str] = &["native_", "Native_"];

/// Suffix of converted tensor handle variables.
pub const HANDLE_SUFFIX: &str = "_diopiHandle";

/// Suffix of converted scalar variables.
pub const SCALAR_SUFFIX: &str = "_diopiScalar";

/// DIOPI handle type for read-only tensors.
pub const CONST_TENSOR_HANDLE: &str = "::diopiConstTensorHandle_t";

/// DIOPI handle type for mutable tensors.
pub const TENSOR_HANDLE: &str = "::diopiTensorHandle_t";

/// DIOPI scalar value type.
pub const SCALAR_HANDLE: &str = "::diopiScalar_t";

/// Helper converting an `at::Tensor` into a DIOPI tensor handle.
pub const TO_TENSOR_HANDLE: &str = "dipu::diopi_helper::toDiopiTensorHandle";

/// Helper converting an `at::Scalar` into a DIOPI scalar.
pub const TO_SCALAR: &str = "dipu::diopi_helper::toDiopiScalar";

/// Name of a synthesized output tensor: `out` for a single return, `out{i}` inside a tuple.
pub fn output_name(index: Option<usize>) -> String {
    match index {
        Some(i) => format!("{OUTPUT_NAME}{i}"),
        None => OUTPUT_NAME.to_string(),
    }
}

/// Name of the converted handle variable for a tensor argument.
pub fn handle_name(arg: &str) -> String {
    format!("{arg}{HANDLE_SUFFIX}")
}

/// Name of the converted scalar variable for a scalar argument.
pub fn scalar_name(arg: &str) -> String {
    format!("{arg}{SCALAR_SUFFIX}")
}

/// Qualify a foreign function name with the global namespace (`diopiAdd` -> `::diopiAdd`).
///
/// Names that are already qualified are returned unchanged.
pub fn qualify_foreign(name: &str) -> String {
    if name.starts_with(FOREIGN_QUALIFIED_PREFIX) {
        return name.to_string();
    }
    name.replace(FOREIGN_PREFIX, FOREIGN_QUALIFIED_PREFIX)
}
