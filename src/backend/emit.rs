//! Turn catalogue records into wrapper functions and registration entries.
//!
//! Each record is handled on its own: parse the schema, build the call, marshal tensors and
//! scalars into DIOPI handles, and fill the function and registration templates. The fragments
//! are concatenated in catalogue order and substituted into the file template once at the end.
//!
//! ## Examples
//! ```rust
//! use diopi_autogen::backend::Generator;
//! use diopi_autogen::catalogue::OpRecord;
//!
//! let generator = Generator::default();
//! let op = generator
//!     .generate_op(0, &OpRecord::new("add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor"))
//!     .unwrap();
//! assert!(op.function.contains("diopiAdd(ctx, out_diopiHandle, self_diopiHandle, other_diopiHandle, &alpha_diopiScalar)"));
//! assert_eq!(op.registration, "DIOPI_ATEN_FUNC(\"add.Tensor\", ::diopiAdd, dipu::native::dipu_add_tensor);\n");
//! ```

use autogen_core::conventions;

use super::call::CallExpr;
use super::errors::GenerateError;
use super::templates::TemplateSet;
use crate::catalogue::OpRecord;
use crate::format::{self, FormatConfig};
use crate::frontend::{OpSignature, TensorInput};
use crate::template::Env;

/// The two text fragments produced for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOp {
    pub function: String,
    pub registration: String,
}

/// Generates a complete source file from catalogue records.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    templates: TemplateSet,
    format: FormatConfig,
}

impl Generator {
    pub fn new(templates: TemplateSet, format: FormatConfig) -> Self {
        Self { templates, format }
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn format_config(&self) -> &FormatConfig {
        &self.format
    }

    /// Generate the whole output file.
    ///
    /// ## Errors
    /// The first malformed schema or unbound template placeholder aborts generation.
    #[tracing::instrument(skip_all, fields(records = records.len()))]
    pub fn generate(&self, records: &[OpRecord]) -> Result<String, GenerateError> {
        self.templates.validate()?;

        let mut functions_code = String::new();
        let mut op_register_code = String::new();
        for (index, record) in records.iter().enumerate() {
            let op = self.generate_op(index, record)?;
            functions_code.push_str(&op.function);
            op_register_code.push_str(&op.registration);
        }

        let env = Env::new()
            .with("functions_code", functions_code)
            .with("op_register_code", op_register_code);
        let text = self
            .templates
            .file
            .substitute(&env)
            .map_err(|source| GenerateError::template("file template", source))?;

        tracing::info!(records = records.len(), bytes = text.len(), "generated wrappers");
        Ok(format::normalize(&text, &self.format))
    }

    /// Generate the wrapper function and registration entry for one record.
    pub fn generate_op(&self, index: usize, record: &OpRecord) -> Result<GeneratedOp, GenerateError> {
        let sig = OpSignature::parse(&record.schema)
            .map_err(|errors| GenerateError::malformed(index, &record.schema, &errors))?;
        let mut call = CallExpr::resolve(&record.call_source(), sig.schema());
        let diopi_fun_name = conventions::qualify_foreign(&call.function_name());

        let inputs = sig.inputs();
        for input in &inputs {
            call.rename(input.name(), &conventions::handle_name(input.name()));
        }
        let outputs = sig.outputs();
        for output in &outputs {
            call.rename(output, &conventions::handle_name(output));
        }
        let scalars = sig.scalar_args();
        for scalar in &scalars {
            call.rename(scalar, &conventions::scalar_name(scalar));
        }

        tracing::debug!(index, op = %sig.register_name(), call = %call, "generating wrapper");

        let env = Env::new()
            .with("comment", record.schema.as_str())
            .with("cpp_signature", sig.cpp_signature())
            .with("custom_code", custom_code(record.custom_code.as_deref().unwrap_or("")))
            .with("input_process_code", input_process_code(&inputs))
            .with("output_process_code", output_process_code(&outputs))
            .with("attrs_process_code", attrs_process_code(&scalars))
            .with("diopi_fun_call_code", call.to_string())
            .with("return_code", return_code(&sig.return_bindings()));
        let function = self
            .templates
            .function
            .substitute(&env)
            .map_err(|source| GenerateError::template(record_context(index, record), source))?;

        let env = Env::new()
            .with("register_name", sig.register_name())
            .with("aten_fun_name", format!("{}{}", conventions::NATIVE_NAMESPACE, sig.function_name()))
            .with("diopi_fun_name", diopi_fun_name);
        let registration = self
            .templates
            .registration
            .substitute(&env)
            .map_err(|source| GenerateError::template(record_context(index, record), source))?;

        Ok(GeneratedOp { function, registration })
    }
}

fn record_context(index: usize, record: &OpRecord) -> String {
    format!("record {} (`{}`)", index, record.schema)
}

/// One statement per line: every `"; "` becomes `";\n"`.
pub fn custom_code(code: &str) -> String {
    code.replace("; ", ";\n")
}

pub fn input_process_code(inputs: &[TensorInput]) -> String {
    let mut code = String::new();
    for input in inputs {
        let name = input.name();
        let handle = conventions::handle_name(name);
        match input {
            TensorInput::Required(_) => code.push_str(&format!(
                "{} {} = {}({});\n",
                conventions::CONST_TENSOR_HANDLE,
                handle,
                conventions::TO_TENSOR_HANDLE,
                name
            )),
            TensorInput::Optional(_) => code.push_str(&format!(
                "\n{const_t} {handle} = nullptr;\n\
                 if ({name}.has_value() && {name}.value().defined()) {handle} = {to}({name}.value());\n\n",
                const_t = conventions::CONST_TENSOR_HANDLE,
                to = conventions::TO_TENSOR_HANDLE,
            )),
        }
    }
    code
}

pub fn output_process_code(outputs: &[String]) -> String {
    outputs
        .iter()
        .map(|name| {
            format!(
                "{} {} = {}({});\n",
                conventions::TENSOR_HANDLE,
                conventions::handle_name(name),
                conventions::TO_TENSOR_HANDLE,
                name
            )
        })
        .collect()
}

pub fn attrs_process_code(scalars: &[String]) -> String {
    scalars
        .iter()
        .map(|name| {
            format!(
                "{} {} = {}({});\n",
                conventions::SCALAR_HANDLE,
                conventions::scalar_name(name),
                conventions::TO_SCALAR,
                name
            )
        })
        .collect()
}

pub fn return_code(bindings: &[String]) -> String {
    match bindings {
        [] => "return;".to_string(),
        [single] => format!("return {};", single),
        several => format!("return std::tie({});", several.join(", ")),
    }
}
