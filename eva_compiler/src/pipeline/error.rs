use crate::evaluation::EvaluationError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::syntax::SyntaxError;

/// Failure of one statement anywhere in the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl PipelineError {
    /// The line the driver writes to stderr for this failure
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Syntax(e) => format!("parse error: {}", e),
            Self::Evaluation(e) => format!("evaluation error: {}", e),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Syntax(e) => e.error_code(),
            Self::Evaluation(e) => e.error_code(),
        }
    }

    /// Tokenize and parse failures, as opposed to evaluation failures
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

impl From<LexerError> for PipelineError {
    fn from(error: LexerError) -> Self {
        Self::Syntax(SyntaxError::Lexical(error))
    }
}
