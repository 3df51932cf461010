//! Recursive-descent parser for operator schemas.
//!
//! Converts the token stream of one schema into a [`Schema`]. The grammar is one level deep
//! (parameters never nest), so a single forward pass with one token of lookahead suffices.
//!
//! ## Examples
//!
//! ```rust
//! use autogen_syntax::{lexer, parser};
//!
//! let source = "add_.Tensor(Tensor(a!) self, Tensor other, *, Scalar alpha=1) -> Tensor(a!)";
//! let tokens = lexer::lex(source).unwrap();
//! let schema = parser::parse(source, &tokens).unwrap();
//! assert!(schema.params[0].ty.is_inplace_tensor());
//! assert_eq!(schema.params[2].default.as_deref(), Some("1"));
//! ```

use crate::ast::*;
use crate::diagnostics::SyntaxError;
use crate::lexer::{Token, TokenKind};
use autogen_core::lang::punctuation::{self, PunctuationId};

type ParseResult<T> = Result<T, SyntaxError>;

/// Parser state.
///
/// ## Notes
/// - The parser keeps the source text so default values and alias annotations can be captured
///   verbatim from token spans.
/// - There is no error recovery: a schema is a single line, the first error is the useful one.
pub struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
    eof: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the token stream of `source`.
    pub fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, Span::new(source.len(), source.len())),
        }
    }

    /// Parse the token stream into a [`Schema`].
    pub fn parse(mut self) -> Result<Schema, Vec<SyntaxError>> {
        self.schema().map_err(|e| vec![e])
    }

    // ========================================================================
    // Token cursor
    // ========================================================================

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, id: PunctuationId) -> bool {
        self.peek().is_punctuation(id)
    }

    fn eat(&mut self, id: PunctuationId) -> Option<Token> {
        if self.check(id) { Some(self.advance()) } else { None }
    }

    fn expect(&mut self, id: PunctuationId, context: &str) -> ParseResult<Token> {
        self.eat(id).ok_or_else(|| {
            self.error_here(format!("expected '{}' {}", punctuation::as_str(id), context))
        })
    }

    fn expect_ident(&mut self, what: &str) -> ParseResult<(Ident, Span)> {
        let name = self.peek().ident().map(str::to_string);
        match name {
            Some(name) => Ok((name, self.advance().span)),
            None => Err(self.error_here(format!("expected {}", what))),
        }
    }

    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span.end)
            .unwrap_or(0)
    }

    fn error_here(&self, message: String) -> SyntaxError {
        let token = self.peek();
        let found = match &token.kind {
            TokenKind::Eof => "end of schema".to_string(),
            _ => format!("'{}'", &self.source[token.span.start..token.span.end]),
        };
        SyntaxError::new(format!("{}, found {}", message, found), token.span)
    }

    // ========================================================================
    // Grammar
    // ========================================================================

    fn schema(&mut self) -> ParseResult<Schema> {
        let name = self.op_name()?;
        self.expect(PunctuationId::LParen, "to open the parameter list")?;
        let params = self.params()?;
        self.expect(PunctuationId::RParen, "to close the parameter list")?;
        self.expect(PunctuationId::Arrow, "before the return clause")?;
        let returns = self.returns()?;
        if !matches!(self.peek().kind, TokenKind::Eof) {
            return Err(self.error_here("expected end of schema".to_string()));
        }
        let span = name.span.merge(returns.span);
        Ok(Schema {
            name,
            params,
            returns,
            span,
        })
    }

    fn op_name(&mut self) -> ParseResult<OpName> {
        let (first, first_span) = self.expect_ident("operator name")?;
        let (namespace, base, mut span) = if self.eat(PunctuationId::ColonColon).is_some() {
            let (base, base_span) = self.expect_ident("operator name after '::'")?;
            (Some(first), base, first_span.merge(base_span))
        } else {
            (None, first, first_span)
        };
        let overload = if self.eat(PunctuationId::Dot).is_some() {
            let (overload, overload_span) = self.expect_ident("overload name after '.'")?;
            span = span.merge(overload_span);
            Some(overload)
        } else {
            None
        };
        Ok(OpName {
            namespace,
            base,
            overload,
            span,
        })
    }

    fn params(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();
        if self.check(PunctuationId::RParen) {
            return Ok(params);
        }
        let mut keyword_only = false;
        loop {
            if self.eat(PunctuationId::Star).is_some() {
                keyword_only = true;
            } else {
                params.push(self.param(keyword_only)?);
            }
            if self.eat(PunctuationId::Comma).is_none() {
                break;
            }
        }
        Ok(params)
    }

    fn param(&mut self, keyword_only: bool) -> ParseResult<Param> {
        let ty = self.type_ref()?;
        let (name, _) = self.expect_ident("parameter name")?;
        let default = if self.eat(PunctuationId::Eq).is_some() {
            Some(self.default_value()?)
        } else {
            None
        };
        let span = Span::new(ty.span.start, self.prev_end());
        Ok(Param {
            ty,
            name,
            default,
            keyword_only,
            span,
        })
    }

    /// Capture a default value verbatim, up to the next top-level `,` or the closing `)`.
    fn default_value(&mut self) -> ParseResult<String> {
        let start = self.peek().span.start;
        let mut end = start;
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            match &token.kind {
                TokenKind::Eof => break,
                TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBracket) => depth += 1,
                TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Punctuation(PunctuationId::Comma) if depth == 0 => break,
                _ => {}
            }
            end = token.span.end;
            self.advance();
        }
        if end == start {
            return Err(self.error_here("expected default value after '='".to_string()));
        }
        Ok(self.source[start..end].trim().to_string())
    }

    fn type_ref(&mut self) -> ParseResult<TypeRef> {
        let (base, mut span) = self.expect_ident("type")?;

        let alias = if self.check(PunctuationId::LParen) {
            let alias = self.alias()?;
            span = span.merge(alias.span);
            Some(alias)
        } else {
            None
        };

        // `?` ahead of a list suffix marks the elements optional (`Tensor?[]`); anywhere else it
        // marks the whole type optional.
        let mut optional = false;
        let mut optional_elements = false;
        if let Some(q) = self.eat(PunctuationId::Question) {
            span = span.merge(q.span);
            if self.check(PunctuationId::LBracket) {
                optional_elements = true;
            } else {
                optional = true;
            }
        }

        let list = if !optional && self.eat(PunctuationId::LBracket).is_some() {
            let size = match &self.peek().kind {
                TokenKind::Number(n) => {
                    let n = n.clone();
                    self.advance();
                    Some(n)
                }
                _ => None,
            };
            let close = self.expect(PunctuationId::RBracket, "to close the list type")?;
            span = span.merge(close.span);
            Some(ListSuffix { size, optional_elements })
        } else {
            None
        };

        if list.is_some() {
            if let Some(q) = self.eat(PunctuationId::Question) {
                span = span.merge(q.span);
                optional = true;
            }
        }

        Ok(TypeRef {
            base,
            alias,
            list,
            optional,
            span,
        })
    }

    fn alias(&mut self) -> ParseResult<Alias> {
        let open = self.expect(PunctuationId::LParen, "to open the alias annotation")?;
        loop {
            match &self.peek().kind {
                TokenKind::Punctuation(PunctuationId::RParen) => break,
                TokenKind::Eof => {
                    return Err(SyntaxError::new(
                        "unterminated alias annotation",
                        Span::new(open.span.start, self.source.len()),
                    ));
                }
                _ => {
                    self.advance();
                }
            }
        }
        let close = self.advance();
        let text = self.source[open.span.end..close.span.start].trim();
        if text.is_empty() {
            return Err(SyntaxError::new(
                "empty alias annotation",
                open.span.merge(close.span),
            ));
        }
        Ok(Alias {
            set: text.trim_end_matches('!').trim().to_string(),
            mutable: text.ends_with('!'),
            span: open.span.merge(close.span),
        })
    }

    fn returns(&mut self) -> ParseResult<ReturnSpec> {
        if let Some(open) = self.eat(PunctuationId::LParen) {
            let mut elements = Vec::new();
            if !self.check(PunctuationId::RParen) {
                loop {
                    elements.push(self.return_elem()?);
                    if self.eat(PunctuationId::Comma).is_none() {
                        break;
                    }
                }
            }
            let close = self.expect(PunctuationId::RParen, "to close the return tuple")?;
            return Ok(ReturnSpec {
                elements,
                parenthesized: true,
                span: open.span.merge(close.span),
            });
        }
        let start = self.peek().span.start;
        let element = self.return_elem()?;
        Ok(ReturnSpec {
            elements: vec![element],
            parenthesized: false,
            span: Span::new(start, self.prev_end()),
        })
    }

    fn return_elem(&mut self) -> ParseResult<ReturnElem> {
        let ty = self.type_ref()?;
        let name = self.peek().ident().map(str::to_string);
        if name.is_some() {
            self.advance();
        }
        Ok(ReturnElem { ty, name })
    }
}

/// Parse the token stream of `source` into a [`Schema`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `source`: the schema text the tokens were produced from.
/// - `tokens`: token stream produced by [`crate::lexer::lex`].
///
/// ## Errors
/// Returns `Err(Vec<SyntaxError>)` if the schema does not follow the grammar.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(source: &str, tokens: &[Token]) -> Result<Schema, Vec<SyntaxError>> {
    Parser::new(source, tokens).parse()
}

#[cfg(test)]
mod tests {
    use crate::parse_schema;
    use autogen_core::lang::types::SchemaTypeId;

    #[test]
    fn test_parse_functional_add() {
        let schema = parse_schema("add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor").unwrap();
        assert_eq!(schema.name.namespace, None);
        assert_eq!(schema.name.base, "add");
        assert_eq!(schema.name.overload.as_deref(), Some("Tensor"));

        let names: Vec<_> = schema.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["self", "other", "alpha"]);
        assert!(!schema.params[1].keyword_only);
        assert!(schema.params[2].keyword_only);
        assert!(schema.params[2].ty.is_bare_of(SchemaTypeId::Scalar));
        assert_eq!(schema.params[2].default.as_deref(), Some("1"));

        assert!(!schema.returns.parenthesized);
        assert_eq!(schema.returns.elements.len(), 1);
        assert!(schema.returns.elements[0].ty.is_bare_of(SchemaTypeId::Tensor));
    }

    #[test]
    fn test_parse_namespace_and_inplace_alias() {
        let source = "aten::add_.Tensor(Tensor(a!) self, Tensor other) -> Tensor(a!)";
        let schema = parse_schema(source).unwrap();
        assert_eq!(schema.name.namespace.as_deref(), Some("aten"));
        assert!(schema.name.is_inplace_variant());

        let alias = schema.params[0].ty.alias.as_ref().unwrap();
        assert_eq!(alias.set, "a");
        assert!(alias.mutable);
        assert_eq!(&source[alias.span.start..alias.span.end], "(a!)");
        assert!(schema.returns.has_inplace());
    }

    #[test]
    fn test_parse_tuple_return_with_names() {
        let schema = parse_schema(
            "max.dim_max(Tensor self, int dim, bool keepdim=False, *, Tensor(a!) max, Tensor(b!) max_values) -> (Tensor(a!) values, Tensor(b!) indices)",
        )
        .unwrap();
        assert!(schema.returns.is_tuple());
        assert_eq!(schema.returns.elements[0].name.as_deref(), Some("values"));
        assert_eq!(schema.returns.elements[1].ty.alias.as_ref().unwrap().set, "b");
        assert_eq!(schema.inplace_params().count(), 2);
    }

    #[test]
    fn test_parse_optional_and_list_types() {
        let schema = parse_schema(
            "conv2d(Tensor input, Tensor weight, Tensor? bias=None, int[2] stride=1, int[2] padding=[0, 0], str? mode=None) -> Tensor",
        )
        .unwrap();
        assert!(schema.params[2].ty.is_optional_tensor());
        assert_eq!(schema.params[2].default.as_deref(), Some("None"));
        assert_eq!(
            schema.params[3].ty.list.as_ref().and_then(|l| l.size.as_deref()),
            Some("2")
        );
        assert_eq!(schema.params[4].default.as_deref(), Some("[0, 0]"));
        assert!(schema.params[5].ty.optional);
        assert!(schema.params[5].ty.is(SchemaTypeId::Str));
    }

    #[test]
    fn test_parse_list_of_optional_tensors() {
        let source = "index_put_(Tensor(a!) self, Tensor?[] indices, Tensor values, bool accumulate=False) -> Tensor(a!)";
        let schema = parse_schema(source).unwrap();
        let indices = &schema.params[1];
        assert_eq!(indices.name, "indices");
        assert!(indices.ty.is(SchemaTypeId::Tensor));
        assert!(indices.ty.has_optional_elements());
        assert!(!indices.ty.optional);
        assert_eq!(indices.ty.to_string(), "Tensor?[]");
        assert_eq!(&source[indices.ty.span.start..indices.ty.span.end], "Tensor?[]");

        let schema = parse_schema("f(int[1]? dim, Tensor?[3]? xs) -> Tensor").unwrap();
        assert!(schema.params[0].ty.optional);
        assert!(!schema.params[0].ty.has_optional_elements());
        assert!(schema.params[1].ty.optional);
        assert!(schema.params[1].ty.has_optional_elements());
        assert_eq!(schema.params[1].ty.to_string(), "Tensor?[3]?");
    }

    #[test]
    fn test_parse_double_question_is_error() {
        let errors = parse_schema("f(Tensor?? x) -> Tensor").unwrap_err();
        assert!(errors[0].message.starts_with("expected parameter name"), "{}", errors[0].message);
    }

    #[test]
    fn test_parse_empty_params_and_void_return() {
        let schema = parse_schema("_foo() -> ()").unwrap();
        assert!(schema.params.is_empty());
        assert!(schema.returns.parenthesized);
        assert!(schema.returns.elements.is_empty());
    }

    #[test]
    fn test_parse_string_and_negative_defaults() {
        let schema =
            parse_schema("mse_loss(Tensor self, Tensor target, str reduction=\"mean\", int dim=-1, float eps=1e-05) -> Tensor")
                .unwrap();
        assert_eq!(schema.params[2].default.as_deref(), Some("\"mean\""));
        assert_eq!(schema.params[3].default.as_deref(), Some("-1"));
        assert_eq!(schema.params[4].default.as_deref(), Some("1e-05"));
    }

    #[test]
    fn test_parse_missing_arrow_is_error() {
        let errors = parse_schema("add(Tensor self) Tensor").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("expected '->'"), "{}", errors[0].message);
    }

    #[test]
    fn test_parse_unclosed_params_is_error() {
        let errors = parse_schema("add(Tensor self -> Tensor").unwrap_err();
        assert!(errors[0].message.contains("expected ')'"), "{}", errors[0].message);
    }

    #[test]
    fn test_parse_trailing_input_is_error() {
        let errors = parse_schema("relu(Tensor self) -> Tensor result extra").unwrap_err();
        assert!(errors[0].message.starts_with("expected end of schema"), "{}", errors[0].message);
    }

    #[test]
    fn test_param_span_covers_default() {
        let source = "f(Tensor x, Scalar alpha=1) -> Tensor";
        let schema = parse_schema(source).unwrap();
        let span = schema.params[1].span;
        assert_eq!(&source[span.start..span.end], "Scalar alpha=1");
    }
}
