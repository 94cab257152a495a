//! Token sources consumed by the parser
//!
//! The parser pulls one token at a time and never looks ahead, so a source only
//! has to hand out the next token or report that the statement has ended.

use crate::lexical::LexerError;
use crate::tokens::token::Token;

/// Anything that can hand the parser its next token
pub trait TokenSource {
    /// `Ok(None)` means the stream is exhausted
    fn next_token(&mut self) -> Result<Option<Token>, LexerError>;
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn next_token(&mut self) -> Result<Option<Token>, LexerError> {
        (**self).next_token()
    }
}

/// A source over tokens that were already produced
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Result<Option<Token>, LexerError> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        Ok(token)
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}
