//! Syntax errors raised while building the expression tree

use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::tokens::Token;
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    /// A token that cannot appear at this point of the expression
    #[error("syntax error: unexpected '{found}' at {span}")]
    UnexpectedToken { found: String, span: Span },

    /// The token source ran dry, or the terminator arrived in operand position
    #[error("unexpected EOF")]
    UnexpectedEof,

    /// Failure of the underlying token source, passed through unchanged
    #[error(transparent)]
    Lexical(#[from] LexerError),

    #[error("maximum parse depth exceeded: {depth}")]
    MaxRecursionDepth { depth: usize },
}

impl SyntaxError {
    pub fn unexpected_token(token: &Token) -> Self {
        Self::UnexpectedToken {
            found: token.text.clone(),
            span: token.span,
        }
    }

    pub fn max_recursion_depth(depth: usize) -> Self {
        Self::MaxRecursionDepth { depth }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEof => codes::syntax::UNEXPECTED_EOF,
            Self::Lexical(inner) => inner.error_code(),
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;
    use crate::utils::Position;
    use assert_matches::assert_matches;

    #[test]
    fn test_unexpected_token_display() {
        let start = Position::new(2, 1, 3);
        let token = Token::new(TokenKind::Star, "*", Span::new(start, Position::new(3, 1, 4)));
        let error = SyntaxError::unexpected_token(&token);

        assert_eq!(error.to_string(), "syntax error: unexpected '*' at 1:3");
        assert_eq!(error.error_code(), codes::syntax::UNEXPECTED_TOKEN);
        assert_matches!(error, SyntaxError::UnexpectedToken { span, .. } if span.start == start);
    }

    #[test]
    fn test_unexpected_eof_display() {
        assert_eq!(SyntaxError::UnexpectedEof.to_string(), "unexpected EOF");
        assert_eq!(
            SyntaxError::UnexpectedEof.error_code(),
            codes::syntax::UNEXPECTED_EOF
        );
    }

    #[test]
    fn test_lexical_errors_pass_through() {
        let lexer_error = LexerError::BadToken {
            character: 'x',
            position: Position::new(0, 1, 1),
        };
        let expected = lexer_error.to_string();
        let error: SyntaxError = lexer_error.into();

        assert_eq!(error.to_string(), expected);
        assert_eq!(error.error_code(), codes::lexical::BAD_TOKEN);
    }

    #[test]
    fn test_io_errors_keep_read_failure_code() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "gone");
        let error: SyntaxError = LexerError::Io(io).into();

        assert_eq!(error.error_code(), codes::input::READ_FAILURE);
    }

    #[test]
    fn test_recursion_depth() {
        let error = SyntaxError::max_recursion_depth(12);
        assert!(error.to_string().contains("12"));
        assert_eq!(error.error_code(), codes::syntax::MAX_RECURSION_DEPTH);
    }
}
