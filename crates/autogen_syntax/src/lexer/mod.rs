//! Lexer for operator schemas.
//!
//! Handles tokenization of:
//! - Identifiers (`add_`, `Tensor`, `self`, `aten`)
//! - Numeric and quoted string literals (only found in default values)
//! - Punctuation (`(`, `)`, `[`, `]`, `,`, `->`, `::`, `.`, `?`, `!`, `*`, `=`, `-`)
//!
//! Whitespace is insignificant and skipped.

pub mod tokens;

pub use tokens::{Token, TokenKind};

use crate::ast::Span;
use crate::diagnostics::SyntaxError;
use autogen_core::lang::punctuation;

/// Lexer for schema text.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    tokens: Vec<Token>,
    errors: Vec<SyntaxError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given schema text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire schema.
    ///
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<SyntaxError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos),
        ));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn peek_pos(&mut self) -> usize {
        self.chars.peek().map(|(pos, _)| *pos).unwrap_or(self.source.len())
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.peek_pos();
        let Some(c) = self.peek() else {
            return;
        };

        if c.is_whitespace() {
            self.advance();
        } else if c.is_alphabetic() || c == '_' {
            self.scan_ident(start);
        } else if c.is_ascii_digit() {
            self.scan_number(start);
        } else if c == '"' || c == '\'' {
            self.scan_string(start, c);
        } else if let Some((id, len)) = punctuation::longest_prefix(&self.source[start..]) {
            while self.current_pos < start + len {
                self.advance();
            }
            self.tokens
                .push(Token::new(TokenKind::Punctuation(id), Span::new(start, start + len)));
        } else {
            self.advance();
            self.errors.push(SyntaxError::new(
                format!("unexpected character '{}'", c),
                Span::new(start, self.current_pos),
            ));
        }
    }

    fn scan_ident(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let text = self.source[start..self.current_pos].to_string();
        self.tokens
            .push(Token::new(TokenKind::Ident(text), Span::new(start, self.current_pos)));
    }

    fn scan_number(&mut self, start: usize) {
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '-' || c == '+') && (prev == 'e' || prev == 'E');
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign {
                prev = c;
                self.advance();
            } else {
                break;
            }
        }
        let text = self.source[start..self.current_pos].to_string();
        self.tokens
            .push(Token::new(TokenKind::Number(text), Span::new(start, self.current_pos)));
    }

    fn scan_string(&mut self, start: usize, quote: char) {
        self.advance();
        let content_start = self.current_pos;
        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    let text = self.source[content_start..self.current_pos - c.len_utf8()].to_string();
                    self.tokens
                        .push(Token::new(TokenKind::String(text), Span::new(start, self.current_pos)));
                    return;
                }
                Some('\\') => {
                    self.advance();
                }
                Some(_) => {}
                None => {
                    self.errors.push(SyntaxError::new(
                        "unterminated string literal",
                        Span::new(start, self.current_pos),
                    ));
                    return;
                }
            }
        }
    }
}

/// Tokenize schema text.
///
/// ## Errors
/// Returns every unexpected character or unterminated string found in the input.
#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<SyntaxError>> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use autogen_core::lang::punctuation::PunctuationId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_inplace_param() {
        assert_eq!(
            kinds("Tensor(a!) self"),
            vec![
                TokenKind::Ident("Tensor".into()),
                TokenKind::Punctuation(PunctuationId::LParen),
                TokenKind::Ident("a".into()),
                TokenKind::Punctuation(PunctuationId::Bang),
                TokenKind::Punctuation(PunctuationId::RParen),
                TokenKind::Ident("self".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_arrow_and_negative_default() {
        assert_eq!(
            kinds("int dim=-1) -> Tensor"),
            vec![
                TokenKind::Ident("int".into()),
                TokenKind::Ident("dim".into()),
                TokenKind::Punctuation(PunctuationId::Eq),
                TokenKind::Punctuation(PunctuationId::Minus),
                TokenKind::Number("1".into()),
                TokenKind::Punctuation(PunctuationId::RParen),
                TokenKind::Punctuation(PunctuationId::Arrow),
                TokenKind::Ident("Tensor".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_float_exponent_and_string() {
        assert_eq!(
            kinds("1e-05 \"mean\""),
            vec![
                TokenKind::Number("1e-05".into()),
                TokenKind::String("mean".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_spans_are_byte_offsets() {
        let tokens = lex("aten::add").unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 4));
        assert_eq!(tokens[1].span, Span::new(4, 6));
        assert_eq!(tokens[2].span, Span::new(6, 9));
    }

    #[test]
    fn test_lex_reports_unexpected_character() {
        let errors = lex("add(Tensor self) -> Tensor;").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, Span::new(26, 27));
    }

    #[test]
    fn test_lex_unterminated_string() {
        let errors = lex("f(str x=\"abc) -> Tensor").unwrap_err();
        assert_eq!(errors[0].message, "unterminated string literal");
    }
}
