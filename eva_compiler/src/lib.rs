//! Tokenizer, right-recursive parser and evaluator for arithmetic statements
//!
//! A statement is an expression over non-negative integers using `+`, `*` and
//! parentheses, terminated by `;`. Each stage logs through [`logging`] with
//! coded events.

pub mod config;
pub mod evaluation;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use evaluation::{evaluate, EvaluationError};
pub use lexical::{tokenize, LexerError, Scanner};
pub use pipeline::{
    evaluate_statement, process_line, terminate_line, PipelineError, SessionStats,
    StatementOutcome,
};
pub use syntax::{parse_statement, Parser, SyntaxError, SyntaxTree};
pub use tokens::{Token, TokenKind, TokenSource};
