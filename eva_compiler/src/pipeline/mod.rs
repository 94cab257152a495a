mod error;
mod info;
mod outcome;
mod stats;
mod validation;

pub use error::PipelineError;
pub use info::{get_pipeline_info, PipelineInfo};
pub use outcome::StatementOutcome;
pub use stats::SessionStats;
pub use validation::validate_pipeline;

use crate::config::RuntimeConfig;
use crate::evaluation;
use crate::lexical::Scanner;
use crate::logging::codes;
use crate::syntax::{self, Parser};
use crate::tokens::TokenKind;
use std::time::Instant;

/// Statement terminator appended to every input line
pub const TERMINATOR: char = ';';

pub fn terminate_line(line: &str) -> String {
    let mut statement = String::with_capacity(line.len() + 1);
    statement.push_str(line);
    statement.push(TERMINATOR);
    statement
}

/// Run one terminated statement through tokenize -> parse -> evaluate
pub fn evaluate_statement(text: &str) -> Result<StatementOutcome, PipelineError> {
    evaluate_statement_with(text, &RuntimeConfig::default())
}

/// Same as [`evaluate_statement`] with explicit preferences
pub fn evaluate_statement_with(
    text: &str,
    config: &RuntimeConfig,
) -> Result<StatementOutcome, PipelineError> {
    let start_time = Instant::now();
    crate::log_debug!("Evaluating statement", "bytes" => text.len());

    let mut scanner = Scanner::with_preferences(text.as_bytes(), config.lexical.clone());
    let (tree, token_count) = {
        let mut parser = Parser::with_preferences(&mut scanner, &config.syntax);
        let tree = syntax::parse_logged(&mut parser);
        (tree, parser.tokens_consumed())
    };
    let tree = tree?;

    let metrics = scanner.metrics();
    crate::log_success!(codes::success::TOKENIZATION_COMPLETE, "Statement tokenized",
        "tokens" => scanner.token_count(),
        "bytes" => metrics.bytes_consumed
    );
    if config.lexical.collect_detailed_metrics {
        crate::log_debug!("Statement token mix",
            "numbers" => metrics.count_of(TokenKind::Number),
            "operators" => metrics.count_of(TokenKind::Plus) + metrics.count_of(TokenKind::Star),
            "whitespace_bytes" => metrics.whitespace_bytes,
            "longest_number" => metrics.longest_number
        );
    }

    let value = evaluation::evaluate_logged(&tree)?;
    let outcome = StatementOutcome::new(value, tree, token_count, start_time.elapsed());
    outcome.log_success();

    Ok(outcome)
}

/// Terminate a raw input line and evaluate it
pub fn process_line(line: &str) -> Result<StatementOutcome, PipelineError> {
    evaluate_statement(&terminate_line(line))
}

pub fn process_line_with(
    line: &str,
    config: &RuntimeConfig,
) -> Result<StatementOutcome, PipelineError> {
    evaluate_statement_with(&terminate_line(line), config)
}
