//! Tree evaluation
//!
//! A fold over [`SyntaxTree`] in unsigned 64-bit arithmetic. Only groups
//! recurse; operator chains are folded in a loop.
//! Overflow and oversized literals are reported as errors; a `Number` node whose
//! text is not a digit run cannot come out of the parser and panics.

mod error;

pub use error::{EvaluationError, EvaluationResult};

use crate::logging::codes;
use crate::syntax::SyntaxTree;
use crate::tokens::Token;
use std::num::IntErrorKind;

/// Compute the value of a parsed statement
pub fn evaluate(tree: &SyntaxTree) -> EvaluationResult<u64> {
    // Operator chains hang off the right edge; walk it instead of recursing
    let mut links = Vec::new();
    let mut node = tree;
    while let SyntaxTree::Plus { right, .. } | SyntaxTree::Star { right, .. } = node {
        links.push(node);
        node = right.as_ref();
    }

    // Left operands first, in source order, so the earliest failure is reported
    let mut operands = Vec::with_capacity(links.len());
    for link in &links {
        if let SyntaxTree::Plus { left, .. } | SyntaxTree::Star { left, .. } = link {
            operands.push(evaluate(left)?);
        }
    }

    let mut value = match node {
        SyntaxTree::Paren { inner, .. } => evaluate(inner)?,
        SyntaxTree::Number { token } => literal_value(token)?,
        SyntaxTree::Plus { .. } | SyntaxTree::Star { .. } => {
            unreachable!("right edge walk stops at an operand")
        }
    };

    for (link, left) in links.into_iter().zip(operands).rev() {
        value = match link {
            SyntaxTree::Plus { op, .. } => left.checked_add(value).ok_or_else(|| overflow(op))?,
            SyntaxTree::Star { op, .. } => left.checked_mul(value).ok_or_else(|| overflow(op))?,
            SyntaxTree::Paren { .. } | SyntaxTree::Number { .. } => value,
        };
    }

    Ok(value)
}

fn overflow(op: &Token) -> EvaluationError {
    EvaluationError::Overflow {
        operator: op.text.clone(),
        span: op.span,
    }
}

fn literal_value(token: &Token) -> EvaluationResult<u64> {
    match token.text.parse::<u64>() {
        Ok(value) => Ok(value),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(EvaluationError::LiteralOutOfRange {
            literal: token.text.clone(),
            span: token.span,
        }),
        Err(e) => panic!(
            "number node holds non-numeric text {:?}: {}",
            token.text, e
        ),
    }
}

/// Evaluate and log the outcome
pub fn evaluate_logged(tree: &SyntaxTree) -> EvaluationResult<u64> {
    let result = evaluate(tree);

    match &result {
        Ok(value) => {
            crate::log_success!(codes::success::EVALUATION_COMPLETE, "Expression evaluated",
                "value" => value,
                "nodes" => tree.node_count()
            );
        }
        // The error text already names the position
        Err(error) => crate::log_error!(error.error_code(), &error.to_string()),
    }

    result
}

/// Check that every evaluation code is registered
pub fn init_evaluation_logging() -> Result<(), String> {
    codes::ensure_registered(
        "Evaluation",
        &[
            codes::evaluation::ARITHMETIC_OVERFLOW,
            codes::evaluation::LITERAL_OUT_OF_RANGE,
            codes::success::EVALUATION_COMPLETE,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_statement;
    use crate::tokens::TokenKind;
    use crate::utils::Span;
    use assert_matches::assert_matches;

    fn eval(text: &str) -> EvaluationResult<u64> {
        evaluate(&parse_statement(text).unwrap())
    }

    #[test]
    fn test_concrete_scenarios() {
        assert_eq!(eval("1+2;"), Ok(3));
        assert_eq!(eval("2*3+4;"), Ok(14));
        assert_eq!(eval("2+3*4;"), Ok(14));
        assert_eq!(eval("(1+2)*3;"), Ok(9));
        assert_eq!(eval("42;"), Ok(42));
    }

    #[test]
    fn test_right_grouping_is_reflected_in_values() {
        // 2*3+4*5 groups as 2*(3+(4*5))
        assert_eq!(eval("2*3+4*5;"), Ok(2 * (3 + 4 * 5)));
        assert_eq!(eval("(2*3)+4;"), Ok(10));
    }

    #[test]
    fn test_numbers_and_parens_only() {
        assert_eq!(eval("007;"), Ok(7));
        assert_eq!(eval("(((19)));"), Ok(19));
        assert_eq!(eval("0;"), Ok(0));
    }

    #[test]
    fn test_largest_value() {
        assert_eq!(eval("18446744073709551615;"), Ok(u64::MAX));
        assert_eq!(eval("18446744073709551614+1;"), Ok(u64::MAX));
    }

    #[test]
    fn test_addition_overflow() {
        let error = eval("18446744073709551615+1;").unwrap_err();
        assert_matches!(error, EvaluationError::Overflow { ref operator, span } if operator == "+" && span.start.column == 21);
        assert_eq!(error.error_code(), codes::evaluation::ARITHMETIC_OVERFLOW);
    }

    #[test]
    fn test_multiplication_overflow() {
        assert_matches!(
            eval("4294967296*4294967296;"),
            Err(EvaluationError::Overflow { ref operator, .. }) if operator == "*"
        );
    }

    #[test]
    fn test_literal_out_of_range() {
        let error = eval("1+18446744073709551616;").unwrap_err();
        assert_matches!(error, EvaluationError::LiteralOutOfRange { ref literal, .. } if literal == "18446744073709551616");
        assert!(error.to_string().contains("does not fit"));
    }

    #[test]
    #[should_panic(expected = "non-numeric")]
    fn test_non_numeric_literal_is_an_invariant_violation() {
        let token = Token::new(TokenKind::Number, "12x", Span::default());
        let _ = evaluate(&SyntaxTree::number(token));
    }

    #[test]
    fn test_earliest_failure_wins() {
        // Both the literal and the later multiplication fail; the literal comes first
        assert_matches!(
            eval("18446744073709551616+4294967296*4294967296;"),
            Err(EvaluationError::LiteralOutOfRange { .. })
        );
        assert_matches!(
            eval("(4294967296*4294967296)+18446744073709551616;"),
            Err(EvaluationError::Overflow { .. })
        );
    }

    #[test]
    fn test_long_chain() {
        let sum = format!("{}1;", "1+".repeat(4999));
        assert_eq!(eval(&sum), Ok(5000));

        let product = format!("{}(2*3);", "1*".repeat(4999));
        assert_eq!(eval(&product), Ok(6));
    }

    #[test]
    fn test_evaluate_logged_matches_evaluate() {
        let tree = parse_statement("3*3;").unwrap();
        assert_eq!(evaluate_logged(&tree), Ok(9));
        assert!(init_evaluation_logging().is_ok());
    }
}
