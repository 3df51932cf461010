//! CLI module for the wrapper generator
//!
//! ## Commands
//!
//! - `generate` - Read a catalogue and write the generated C++ file
//! - `inspect <SCHEMA>` - Print every derivation for one schema (debug)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::version::GENERATOR_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a diagnostic with its labelled source, as miette prints it.
    pub fn diagnostic(diagnostic: impl miette::Diagnostic + Send + Sync + 'static) -> Self {
        Self::failure(format!("{:?}", miette::Report::new(diagnostic)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate DIPU kernel wrappers from a DIOPI operator catalogue
#[derive(Parser, Debug)]
#[command(name = "diopi-autogen")]
#[command(version = GENERATOR_VERSION)]
#[command(about = "Generate DIPU kernel wrappers from a DIOPI operator catalogue", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the wrapper source file
    Generate {
        /// Operator catalogue (YAML list of records)
        #[arg(long, value_name = "FILE", default_value = "diopi_functions.yaml")]
        config: PathBuf,
        /// Output C++ file
        #[arg(long, value_name = "FILE", default_value = "AutoGenedKernels.cpp")]
        out: PathBuf,
        /// Replace the wrapper function template
        #[arg(long, value_name = "FILE")]
        function_template: Option<PathBuf>,
        /// Replace the registration entry template
        #[arg(long, value_name = "FILE")]
        register_template: Option<PathBuf>,
        /// Replace the outer file template
        #[arg(long, value_name = "FILE")]
        file_template: Option<PathBuf>,
        /// Write the output without post-processing
        #[arg(long)]
        raw: bool,
    },

    /// Print every derivation for one schema (debug)
    Inspect {
        /// Operator schema, e.g. "add.Tensor(Tensor self, Tensor other) -> Tensor"
        #[arg(value_name = "SCHEMA")]
        schema: String,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Generate {
            config,
            out,
            function_template,
            register_template,
            file_template,
            raw,
        } => commands::generate(&commands::GenerateOptions {
            config,
            out,
            function_template,
            register_template,
            file_template,
            raw,
        }),
        Command::Inspect { schema } => commands::inspect(&schema),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate_defaults() {
        let cli = Cli::try_parse_from(["diopi-autogen", "generate"]).unwrap();
        if let Command::Generate { config, out, raw, function_template, .. } = cli.command {
            assert_eq!(config, PathBuf::from("diopi_functions.yaml"));
            assert_eq!(out, PathBuf::from("AutoGenedKernels.cpp"));
            assert!(!raw);
            assert!(function_template.is_none());
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_parse_generate_overrides() {
        let cli = Cli::try_parse_from([
            "diopi-autogen",
            "generate",
            "--config",
            "ops.yaml",
            "--out",
            "gen.cpp",
            "--file-template",
            "file.tpl",
            "--raw",
        ])
        .unwrap();
        if let Command::Generate { config, out, file_template, raw, .. } = cli.command {
            assert_eq!(config, PathBuf::from("ops.yaml"));
            assert_eq!(out, PathBuf::from("gen.cpp"));
            assert_eq!(file_template, Some(PathBuf::from("file.tpl")));
            assert!(raw);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_parse_inspect() {
        let cli = Cli::try_parse_from(["diopi-autogen", "inspect", "relu(Tensor self) -> Tensor"]).unwrap();
        assert!(matches!(cli.command, Command::Inspect { .. }));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["diopi-autogen"]).is_err());
    }

    #[test]
    fn test_cli_error_constructors() {
        let err = CliError::failure("boom");
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert_eq!(err.to_string(), "boom");
    }
}
