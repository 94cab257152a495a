//! Token types shared by the scanner and the parser
//!
//! - [`TokenKind`] is the closed set of six lexical tags.
//! - [`Token`] pairs a kind with the exact source text and its [`Span`].
//! - [`TokenSource`] is the pull interface the parser reads from. The streaming
//!   scanner in `crate::lexical` implements it, as does the vector-backed
//!   [`TokenStream`].

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenKind};
pub use token_stream::{TokenSource, TokenStream};

pub use crate::utils::{Position, Span};
