//! Errors raised while generating wrapper code.
//!
//! Any error aborts the whole run: the generator never writes partial output.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::frontend::diagnostics::SyntaxError;
use crate::template::TemplateError;

#[derive(Debug, Error, Diagnostic)]
pub enum GenerateError {
    /// A catalogue schema the parser rejected.
    #[error("record {index}: malformed schema: {message}")]
    #[diagnostic(
        code(autogen::malformed_schema),
        help("schemas look like `name.overload(Type arg, ...) -> ReturnType`")
    )]
    MalformedSchema {
        index: usize,
        #[source_code]
        schema: String,
        message: String,
        #[label("{message}")]
        span: SourceSpan,
    },

    /// A template references a placeholder the generator does not bind.
    #[error("{context}")]
    #[diagnostic(code(autogen::template))]
    Template {
        context: String,
        #[source]
        source: TemplateError,
    },
}

impl GenerateError {
    /// Build a [`GenerateError::MalformedSchema`] from the first syntax error of a record.
    pub fn malformed(index: usize, schema: &str, errors: &[SyntaxError]) -> Self {
        let (message, span) = match errors.first() {
            Some(error) => (error.message.clone(), error.span.into()),
            None => ("unparseable schema".to_string(), (0, schema.len()).into()),
        };
        GenerateError::MalformedSchema {
            index,
            schema: schema.to_string(),
            message,
            span,
        }
    }

    pub fn template(context: impl Into<String>, source: TemplateError) -> Self {
        GenerateError::Template {
            context: context.into(),
            source,
        }
    }
}
