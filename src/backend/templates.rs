//! The three templates the generator fills in.
//!
//! Defaults are compiled into the binary from `templates/`; each one can be replaced by a file at
//! run time (see [`TemplateSet::load_overrides`]).

use std::io;
use std::path::Path;

use super::errors::GenerateError;
use crate::template::Template;

const DEFAULT_FUNCTION: &str = include_str!("../../templates/function.tpl");
const DEFAULT_REGISTRATION: &str = include_str!("../../templates/register.tpl");
const DEFAULT_FILE: &str = include_str!("../../templates/file.tpl");

/// Placeholders bound for every wrapper function.
pub const FUNCTION_BINDINGS: &[&str] = &[
    "comment",
    "cpp_signature",
    "custom_code",
    "input_process_code",
    "output_process_code",
    "attrs_process_code",
    "diopi_fun_call_code",
    "return_code",
];

/// Placeholders bound for every registration entry.
pub const REGISTRATION_BINDINGS: &[&str] = &["register_name", "aten_fun_name", "diopi_fun_name"];

/// Placeholders bound once for the whole output file.
pub const FILE_BINDINGS: &[&str] = &["functions_code", "op_register_code"];

#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub function: Template,
    pub registration: Template,
    pub file: Template,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::embedded()
    }
}

impl TemplateSet {
    /// The templates shipped with the generator.
    pub fn embedded() -> Self {
        Self {
            function: Template::new(DEFAULT_FUNCTION).with_name("function.tpl"),
            registration: Template::new(DEFAULT_REGISTRATION).with_name("register.tpl"),
            file: Template::new(DEFAULT_FILE).with_name("file.tpl"),
        }
    }

    pub fn with_function(mut self, template: Template) -> Self {
        self.function = template;
        self
    }

    pub fn with_registration(mut self, template: Template) -> Self {
        self.registration = template;
        self
    }

    pub fn with_file(mut self, template: Template) -> Self {
        self.file = template;
        self
    }

    /// Replace the defaults with the templates found at the given paths.
    pub fn load_overrides(
        self,
        function: Option<&Path>,
        registration: Option<&Path>,
        file: Option<&Path>,
    ) -> io::Result<Self> {
        let mut set = self;
        if let Some(path) = function {
            set = set.with_function(Template::from_file(path)?);
        }
        if let Some(path) = registration {
            set = set.with_registration(Template::from_file(path)?);
        }
        if let Some(path) = file {
            set = set.with_file(Template::from_file(path)?);
        }
        Ok(set)
    }

    /// Check that every placeholder of every template will be bound.
    ///
    /// Run before any record is processed so a bad override fails fast.
    pub fn validate(&self) -> Result<(), GenerateError> {
        let checks = [
            (&self.function, FUNCTION_BINDINGS),
            (&self.registration, REGISTRATION_BINDINGS),
            (&self.file, FILE_BINDINGS),
        ];
        for (template, known) in checks {
            template.check_bindings(known).map_err(|source| {
                GenerateError::template(format!("template {} is not usable", template.name()), source)
            })?;
        }
        Ok(())
    }
}
