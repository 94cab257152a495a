//! Evaluation errors

use crate::logging::{codes, Code};
use crate::utils::Span;

pub type EvaluationResult<T> = Result<T, EvaluationError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    /// `+` or `*` produced a value above `u64::MAX`
    #[error("arithmetic overflow in '{operator}' at {span}")]
    Overflow { operator: String, span: Span },

    #[error("literal {literal} at {span} does not fit in 64 bits")]
    LiteralOutOfRange { literal: String, span: Span },
}

impl EvaluationError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Overflow { .. } => codes::evaluation::ARITHMETIC_OVERFLOW,
            Self::LiteralOutOfRange { .. } => codes::evaluation::LITERAL_OUT_OF_RANGE,
        }
    }
}
