//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use miette::Report;

use crate::backend::call::derive_call;
use crate::backend::{Generator, TemplateSet};
use crate::catalogue::{OpRecord, parse_catalogue};
use crate::format::FormatConfig;
use crate::frontend::{OpSignature, TensorInput};

use super::{CliError, CliResult, ExitCode};

/// Maximum catalogue/template file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Arguments of the `generate` command.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub config: PathBuf,
    pub out: PathBuf,
    pub function_template: Option<PathBuf>,
    pub register_template: Option<PathBuf>,
    pub file_template: Option<PathBuf>,
    pub raw: bool,
}

/// Read a catalogue, generate every wrapper and write the output file.
pub fn generate(opts: &GenerateOptions) -> CliResult<ExitCode> {
    let text = read_source(&opts.config)?;
    let records = parse_catalogue(&text)
        .map_err(|e| CliError::failure(format!("Error in catalogue '{}': {}", opts.config.display(), e)))?;

    let templates = TemplateSet::embedded()
        .load_overrides(
            opts.function_template.as_deref(),
            opts.register_template.as_deref(),
            opts.file_template.as_deref(),
        )
        .map_err(|e| CliError::failure(format!("Error reading template override: {}", e)))?;
    let format = if opts.raw {
        FormatConfig::raw()
    } else {
        FormatConfig::default()
    };

    let output = Generator::new(templates, format)
        .generate(&records)
        .map_err(CliError::diagnostic)?;

    fs::write(&opts.out, output)
        .map_err(|e| CliError::failure(format!("Error writing '{}': {}", opts.out.display(), e)))?;

    println!(
        "Generated {} from {} ({} operators)",
        opts.out.display(),
        opts.config.display(),
        records.len()
    );
    Ok(ExitCode::SUCCESS)
}

/// Print the derivations and the generated wrapper for one schema.
pub fn inspect(schema: &str) -> CliResult<ExitCode> {
    let sig = OpSignature::parse(schema).map_err(|errors| {
        let mut msg = String::new();
        for err in errors {
            let report = Report::new(err).with_source_code(schema.to_string());
            let _ = writeln!(msg, "{:?}", report);
        }
        CliError::failure(msg.trim_end())
    })?;

    print!("{}", describe(&sig));

    let op = Generator::default()
        .generate_op(0, &OpRecord::new(schema))
        .map_err(CliError::diagnostic)?;
    println!("\n{}\n", op.function.trim_end());
    print!("{}", op.registration);
    Ok(ExitCode::SUCCESS)
}

/// One `label: value` line per derivation.
pub fn describe(sig: &OpSignature) -> String {
    let inputs: Vec<String> = sig
        .inputs()
        .iter()
        .map(|input| match input {
            TensorInput::Required(name) => name.clone(),
            TensorInput::Optional(name) => format!("{name}?"),
        })
        .collect();
    let rows = [
        ("function", sig.function_name()),
        ("register", sig.register_name()),
        ("signature", sig.cpp_signature()),
        ("inputs", inputs.join(", ")),
        ("outputs", sig.outputs().join(", ")),
        ("scalars", sig.scalar_args().join(", ")),
        ("returns", sig.return_bindings().join(", ")),
        ("call", derive_call(sig.schema()).to_string()),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{:<10} {}", format!("{label}:"), value);
    }
    out
}

/// Read an input file.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", path.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            path.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(path)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", path.display(), e)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_functional_op() {
        let sig = OpSignature::parse("add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor").unwrap();
        insta::assert_snapshot!(describe(&sig), @r"
        function:  dipu_add_tensor
        register:  add.Tensor
        signature: at::Tensor dipu_add_tensor(const at::Tensor& self, const at::Tensor& other, const at::Scalar& alpha)
        inputs:    self, other
        outputs:   out
        scalars:   alpha
        returns:   out
        call:      diopiAdd(ctx, out, self, other, &alpha)
        ");
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.message.starts_with("Cannot access file"));
    }

    #[test]
    fn test_inspect_rejects_malformed_schema() {
        let err = inspect("add(Tensor self").unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(!err.message.is_empty());
    }
}
