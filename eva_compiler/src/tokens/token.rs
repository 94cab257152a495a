//! Token kinds and the immutable token value produced by the scanner
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of lexical tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Plus,
    Star,
    LeftParen,
    RightParen,
    Number,
    Semicolon,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "Plus",
            Self::Star => "Star",
            Self::LeftParen => "LeftParen",
            Self::RightParen => "RightParen",
            Self::Number => "Number",
            Self::Semicolon => "Semicolon",
        }
    }

    /// `+` or `*`
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Plus | Self::Star)
    }

    /// Tokens that close the current expression: `)` and `;`
    pub fn is_terminator(&self) -> bool {
        matches!(self, Self::RightParen | Self::Semicolon)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified lexical unit together with the exact text it was matched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
