//! Syntax analysis: tokens to expression tree
//!
//! The parser reads from any [`TokenSource`](crate::tokens::TokenSource) and
//! never buffers more than the current token.

mod error;
mod parser;
mod tree;

pub use error::{SyntaxError, SyntaxResult};
pub use parser::{parse, parse_statement, Parser};
pub use tree::SyntaxTree;

use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::logging::{codes, LogEvent};
use crate::tokens::TokenSource;
use crate::{log_debug, log_success};

/// Run `parser` over one statement, logging the tree or the rejection
pub fn parse_logged<S: TokenSource>(parser: &mut Parser<S>) -> SyntaxResult<SyntaxTree> {
    let result = parser.parse();

    match &result {
        Ok(tree) => {
            log_success!(
                codes::success::TREE_CONSTRUCTION_COMPLETE,
                "Syntax tree constructed",
                "nodes" => tree.node_count(),
                "depth" => tree.depth(),
                "tokens" => parser.tokens_consumed()
            );
        }
        Err(error) => crate::logging::dispatch_with_statement(rejection_event(error)),
    }

    result
}

/// The one event recorded for a rejected statement
///
/// The error text already carries the position, so no span is attached.
pub fn rejection_event(error: &SyntaxError) -> LogEvent {
    LogEvent::error(error.error_code(), &error.to_string())
}

/// Check that every syntax code is registered
pub fn init_syntax_logging() -> Result<(), String> {
    codes::ensure_registered(
        "Syntax",
        &[
            codes::syntax::UNEXPECTED_TOKEN,
            codes::syntax::UNEXPECTED_EOF,
            codes::syntax::MAX_RECURSION_DEPTH,
            codes::success::TREE_CONSTRUCTION_COMPLETE,
        ],
    )?;

    if MAX_PARSE_DEPTH == 0 {
        return Err("MAX_PARSE_DEPTH cannot be zero".to_string());
    }

    log_debug!("Syntax limits initialized", "max_parse_depth" => MAX_PARSE_DEPTH);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::Scanner;
    use assert_matches::assert_matches;

    #[test]
    fn test_init_syntax_logging() {
        assert!(init_syntax_logging().is_ok());
    }

    #[test]
    fn test_parse_logged() {
        let mut parser = Parser::new(Scanner::new(&b"(1+2)*3;"[..]));
        let tree = parse_logged(&mut parser).unwrap();
        assert_eq!(tree.node_count(), 6);

        let mut parser = Parser::new(Scanner::new(&b"2+*3;"[..]));
        assert_matches!(parse_logged(&mut parser), Err(SyntaxError::UnexpectedToken { .. }));

        let mut parser = Parser::new(Scanner::new(&b"1+;"[..]));
        assert_matches!(parse_logged(&mut parser), Err(SyntaxError::UnexpectedEof));
    }

    #[test]
    fn test_rejection_event_states_position_once() {
        let error = parse_statement("1+a;").unwrap_err();
        let line = rejection_event(&error).format();

        assert!(line.contains("E020"));
        assert!(line.contains("bad token 'a' at 1:3"));
        assert_eq!(line.matches("1:3").count(), 1);
    }
}
