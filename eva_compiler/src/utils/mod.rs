//! Shared source-location types for the tokenizer and parser

pub mod span;

pub use span::{Position, Span};
