//! Punctuation vocabulary.
//!
//! This module defines the canonical set of punctuation tokens that appear in operator schemas:
//! delimiters, separators, the return arrow, and the alias/optional/default markers.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - This module is vocabulary only. It does not tokenize source text.
//!
//! ## Examples
//! ```rust
//! use autogen_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str("::"), Some(PunctuationId::ColonColon));
//! assert_eq!(punctuation::as_str(PunctuationId::Arrow), "->");
//! ```

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    // Separators / markers
    Comma,
    Question,
    Bang,
    Star,
    Eq,
    Minus,

    // Access / path
    Dot,
    ColonColon,

    // Return clause
    Arrow,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
}

const fn info(id: PunctuationId, canonical: &'static str) -> PunctuationInfo {
    PunctuationInfo { id, canonical }
}

/// Registry of all punctuation tokens.
///
/// Multi-character spellings come before their single-character prefixes so that a
/// longest-match scan over this table picks `->` before `-`.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::Arrow, "->"),
    info(PunctuationId::ColonColon, "::"),
    info(PunctuationId::Comma, ","),
    info(PunctuationId::Question, "?"),
    info(PunctuationId::Bang, "!"),
    info(PunctuationId::Star, "*"),
    info(PunctuationId::Eq, "="),
    info(PunctuationId::Minus, "-"),
    info(PunctuationId::Dot, "."),
    info(PunctuationId::LParen, "("),
    info(PunctuationId::RParen, ")"),
    info(PunctuationId::LBracket, "["),
    info(PunctuationId::RBracket, "]"),
];

/// Look up a punctuation token by its exact spelling.
pub fn from_str(spelling: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == spelling).map(|p| p.id)
}

/// Return the canonical spelling for a punctuation id.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Return the registry entry for a punctuation id.
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .expect("punctuation info missing")
}

/// Match the longest punctuation spelling at the start of `text`.
///
/// ## Returns
/// - `Some((id, len))` with the byte length of the matched spelling, or `None`.
pub fn longest_prefix(text: &str) -> Option<(PunctuationId, usize)> {
    PUNCTUATION
        .iter()
        .filter(|p| text.starts_with(p.canonical))
        .max_by_key(|p| p.canonical.len())
        .map(|p| (p.id, p.canonical.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_id_round_trips_through_its_spelling() {
        for p in PUNCTUATION {
            assert_eq!(from_str(p.canonical), Some(p.id), "{}", p.canonical);
            assert_eq!(as_str(p.id), p.canonical);
        }
    }

    #[test]
    fn longest_prefix_prefers_arrow_over_minus() {
        assert_eq!(longest_prefix("-> Tensor"), Some((PunctuationId::Arrow, 2)));
        assert_eq!(longest_prefix("-1"), Some((PunctuationId::Minus, 1)));
        assert_eq!(longest_prefix("::add"), Some((PunctuationId::ColonColon, 2)));
        assert_eq!(longest_prefix("x"), None);
    }
}
