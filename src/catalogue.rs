//! Operator catalogue: the YAML list of records the generator consumes.
//!
//! ```yaml
//! - schema: "add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor"
//! - schema: "linear(Tensor input, Tensor weight, Tensor? bias=None) -> Tensor"
//!   custom_code: "at::Tensor weight_t = weight.t(); "
//!   interface: "diopiLinear(ctx, out, input, weight_t, bias)"
//! ```
//!
//! Keys other than `schema`, `interface` and `custom_code` are ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::backend::call::CallSource;

/// One operator to generate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpRecord {
    pub schema: String,
    /// Call text used instead of the derived call.
    #[serde(default)]
    pub interface: Option<String>,
    /// Statements placed before argument marshalling.
    #[serde(default)]
    pub custom_code: Option<String>,
}

impl OpRecord {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            interface: None,
            custom_code: None,
        }
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    pub fn with_custom_code(mut self, code: impl Into<String>) -> Self {
        self.custom_code = Some(code.into());
        self
    }

    pub fn call_source(&self) -> CallSource {
        match &self.interface {
            Some(text) => CallSource::Explicit(text.clone()),
            None => CallSource::Derived,
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid catalogue: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parse catalogue text. An empty document is an empty catalogue.
pub fn parse_catalogue(text: &str) -> Result<Vec<OpRecord>, CatalogueError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(text)?)
}

/// Read and parse a catalogue file.
pub fn load_catalogue(path: &Path) -> Result<Vec<OpRecord>, CatalogueError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogueError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_catalogue(&text)?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded catalogue");
    Ok(records)
}
