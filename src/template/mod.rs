//! Text templates with `$name` placeholders.
//!
//! Three placeholder forms are recognised, scanned left to right without overlap:
//!
//! - **Indented block**: a placeholder preceded on its line only by whitespace (possibly none).
//!   Every line of every element is emitted on its own line behind the captured indentation, and
//!   trailing whitespace of the whole block is stripped.
//! - **List interpolation**: `${,name,}`, `${,name}` or `${name,}`. Sequence elements are joined
//!   with `", "`; the leading/trailing `", "` is added only when the marker is present and the
//!   sequence is non-empty.
//! - **Plain**: `$name`. Sequences are joined with `", "`, scalars substituted directly.
//!
//! A `$` that does not start a well-formed placeholder is copied verbatim.
//!
//! ## Examples
//! ```rust
//! use diopi_autogen::template::{Env, Template};
//!
//! let template = Template::new("f($args${,extra})");
//! let env = Env::new().with("args", vec!["a", "b"]).with("extra", Vec::<String>::new());
//! assert_eq!(template.substitute(&env).unwrap(), "f(a, b)");
//! ```

mod value;

pub use value::{Env, Value};

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors raised while substituting a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("missing binding for placeholder `${name}` in template {template}")]
    MissingPlaceholder { name: String, template: String },
}

/// One placeholder occurrence inside a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub name: &'a str,
    pub comma_before: bool,
    pub comma_after: bool,
    /// Leading whitespace of the line for block placeholders.
    pub indent: Option<&'a str>,
    /// Byte range replaced by the rendering (includes the indentation of block placeholders).
    pub start: usize,
    pub end: usize,
}

/// A text pattern with placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pattern: String,
    name: Option<String>,
}

impl Template {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            name: None,
        }
    }

    /// Attach a name used in error messages.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Load a template from disk, named after its path.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let pattern = fs::read_to_string(path)?;
        Ok(Self::new(pattern).with_name(path.display().to_string()))
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("<inline>")
    }

    /// Every placeholder occurrence, in pattern order.
    pub fn scan(&self) -> Vec<Placeholder<'_>> {
        let pattern = self.pattern.as_str();
        let mut found = Vec::new();
        let mut cursor = 0;
        while let Some(offset) = pattern[cursor..].find('$') {
            let dollar = cursor + offset;
            let Some((name, comma_before, comma_after, end)) = parse_marker(pattern, dollar) else {
                cursor = dollar + 1;
                continue;
            };
            let line_start = pattern[..dollar].rfind('\n').map_or(0, |i| i + 1);
            let prefix = &pattern[line_start..dollar];
            let indent = prefix.chars().all(char::is_whitespace).then_some(prefix);
            found.push(Placeholder {
                name,
                comma_before,
                comma_after,
                indent,
                start: if indent.is_some() { line_start } else { dollar },
                end,
            });
            cursor = end;
        }
        found
    }

    /// Distinct placeholder names, in first-occurrence order.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for placeholder in self.scan() {
            if !names.contains(&placeholder.name) {
                names.push(placeholder.name);
            }
        }
        names
    }

    /// Check that every placeholder is one of `known`, without substituting.
    pub fn check_bindings(&self, known: &[&str]) -> Result<(), TemplateError> {
        match self.placeholders().into_iter().find(|name| !known.contains(name)) {
            Some(name) => Err(self.missing(name)),
            None => Ok(()),
        }
    }

    /// Substitute every placeholder from `env`.
    ///
    /// ## Errors
    /// - [`TemplateError::MissingPlaceholder`] if a referenced name is not bound.
    pub fn substitute(&self, env: &Env) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.pattern.len());
        let mut last = 0;
        for placeholder in self.scan() {
            let value = env.get(placeholder.name).ok_or_else(|| self.missing(placeholder.name))?;
            out.push_str(&self.pattern[last..placeholder.start]);
            out.push_str(&render(&placeholder, value));
            last = placeholder.end;
        }
        out.push_str(&self.pattern[last..]);
        Ok(out)
    }

    fn missing(&self, name: &str) -> TemplateError {
        TemplateError::MissingPlaceholder {
            name: name.to_string(),
            template: self.name().to_string(),
        }
    }
}

fn render(placeholder: &Placeholder<'_>, value: &Value) -> String {
    if let Some(indent) = placeholder.indent {
        let mut block = String::new();
        for element in value.elements() {
            for line in element.lines() {
                block.push_str(indent);
                block.push_str(line);
                block.push('\n');
            }
        }
        return block.trim_end().to_string();
    }
    match value {
        Value::Scalar(text) => text.clone(),
        Value::Sequence(items) if items.is_empty() => String::new(),
        Value::Sequence(items) => {
            let before = if placeholder.comma_before { ", " } else { "" };
            let after = if placeholder.comma_after { ", " } else { "" };
            format!("{}{}{}", before, items.join(", "), after)
        }
    }
}

/// Parse the placeholder starting at the `$` at byte `dollar`.
///
/// Returns `(name, comma_before, comma_after, end)` where `end` is one past the placeholder.
fn parse_marker(pattern: &str, dollar: usize) -> Option<(&str, bool, bool, usize)> {
    let rest = &pattern[dollar + 1..];
    let Some(braced) = rest.strip_prefix('{') else {
        let len = ident_len(rest)?;
        return Some((&rest[..len], false, false, dollar + 1 + len));
    };
    let (comma_before, body) = match braced.strip_prefix(',') {
        Some(body) => (true, body),
        None => (false, braced),
    };
    let len = ident_len(body)?;
    let (comma_after, tail) = match body[len..].strip_prefix(',') {
        Some(tail) => (true, tail),
        None => (false, &body[len..]),
    };
    tail.strip_prefix('}')?;
    let consumed = 1 + usize::from(comma_before) + len + usize::from(comma_after) + 1;
    Some((&body[..len], comma_before, comma_after, dollar + 1 + consumed))
}

/// Byte length of the identifier at the start of `text` (a letter or `_`, then word characters).
fn ident_len(text: &str) -> Option<usize> {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_alphabetic() || c == '_' => {}
        _ => return None,
    }
    let end = chars
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map_or(text.len(), |(i, _)| i);
    Some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(pattern: &str, env: &Env) -> String {
        Template::new(pattern).substitute(env).unwrap()
    }

    #[test]
    fn test_plain_scalar_and_sequence() {
        let env = Env::new().with("name", "add").with("args", vec!["a", "b", "c"]);
        assert_eq!(sub("fn $name($args)", &env), "fn add(a, b, c)");
    }

    #[test]
    fn test_list_interpolation_markers() {
        let env = Env::new().with("xs", vec!["a", "b"]);
        assert_eq!(sub("f(ctx${,xs})", &env), "f(ctx, a, b)");
        assert_eq!(sub("f(${xs,}ctx)", &env), "f(a, b, ctx)");
        assert_eq!(sub("f(0${,xs,}1)", &env), "f(0, a, b, 1)");
    }

    #[test]
    fn test_empty_sequence_renders_nothing() {
        let env = Env::new().with("xs", Vec::<String>::new());
        assert_eq!(sub("f(ctx${,xs,})", &env), "f(ctx)");
        assert_eq!(sub("${,xs,}", &env), "");
    }

    #[test]
    fn test_markers_ignored_for_scalars() {
        let env = Env::new().with("x", "v");
        assert_eq!(sub("f(a${,x,}b)", &env), "f(avb)");
    }

    #[test]
    fn test_indented_block_repeats_indent_per_line() {
        let env = Env::new().with("body", vec!["int a = 1;\nint b = 2;", "return a;"]);
        assert_eq!(
            sub("{\n    $body\n}", &env),
            "{\n    int a = 1;\n    int b = 2;\n    return a;\n}"
        );
    }

    #[test]
    fn test_block_at_column_zero_and_scalar_coercion() {
        let env = Env::new().with("code", "a();\nb();\n\n");
        assert_eq!(sub("$code\nend", &env), "a();\nb();\nend");
    }

    #[test]
    fn test_empty_block_leaves_empty_line() {
        let env = Env::new().with("code", Vec::<String>::new());
        assert_eq!(sub("start\n  $code\nend", &env), "start\n\nend");
    }

    #[test]
    fn test_placeholder_after_text_is_not_a_block() {
        let env = Env::new().with("a", vec!["x", "y"]).with("b", "z");
        assert_eq!(sub("  $a $b", &env), "  x\n  y z");
    }

    #[test]
    fn test_invalid_markers_are_verbatim() {
        let env = Env::new().with("a", "x");
        assert_eq!(sub("cost: $5, ${a,b}, $", &env), "cost: $5, ${a,b}, $");
    }

    #[test]
    fn test_missing_binding_is_an_error() {
        let err = Template::new("$known $unknown")
            .with_name("function")
            .substitute(&Env::new().with("known", "k"))
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingPlaceholder {
                name: "unknown".to_string(),
                template: "function".to_string(),
            }
        );
    }

    #[test]
    fn test_substitution_is_idempotent_without_placeholders() {
        let env = Env::new().with("x", "plain text, no markers");
        let once = sub("a $x b", &env);
        assert_eq!(sub(&once, &env), once);
    }

    #[test]
    fn test_placeholders_lists_distinct_names() {
        let template = Template::new("$a ${,b} $a\n  $c");
        assert_eq!(template.placeholders(), vec!["a", "b", "c"]);
        assert!(template.check_bindings(&["a", "b", "c"]).is_ok());
        assert!(template.check_bindings(&["a", "b"]).is_err());
    }
}
