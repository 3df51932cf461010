//! Post-processing configuration for generated files.

/// Which rewrites run over the assembled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Replace every run of three or more newlines with a single newline.
    pub collapse_blank_lines: bool,
    /// Rewrite every comma and its surrounding spaces to `", "`.
    pub normalize_commas: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            collapse_blank_lines: true,
            normalize_commas: true,
        }
    }
}

impl FormatConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// No rewrites: the output is exactly what the templates produced.
    pub fn raw() -> Self {
        Self {
            collapse_blank_lines: false,
            normalize_commas: false,
        }
    }

    pub fn with_collapse_blank_lines(mut self, enabled: bool) -> Self {
        self.collapse_blank_lines = enabled;
        self
    }

    pub fn with_normalize_commas(mut self, enabled: bool) -> Self {
        self.normalize_commas = enabled;
        self
    }
}
