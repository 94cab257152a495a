//! Lexical analysis for eva statements
//!
//! The split function, the streaming [`Scanner`] and the whole-string
//! [`tokenize`] helper all live in `analyzer`; this module adds stage
//! validation on top.

pub mod analyzer;

use crate::config::compile_time::lexical::*;
use crate::logging::codes;

pub use analyzer::{
    classify, is_whitespace, next_token, tokenize, LexerError, LexicalMetrics, Scanner,
    SplitOutcome,
};

/// Check that every lexical code is registered and the limits are usable
pub fn init_lexical_logging() -> Result<(), String> {
    codes::ensure_registered(
        "Lexical",
        &[
            codes::lexical::BAD_TOKEN,
            codes::lexical::TOKEN_TOO_LONG,
            codes::lexical::TOO_MANY_TOKENS,
            codes::input::READ_FAILURE,
            codes::success::TOKENIZATION_COMPLETE,
        ],
    )?;

    validate_limits()?;

    crate::log_debug!("Lexical limits initialized",
        "max_token_size" => MAX_TOKEN_SIZE,
        "max_token_count" => MAX_TOKEN_COUNT,
        "read_chunk_size" => READ_CHUNK_SIZE
    );

    Ok(())
}

fn validate_limits() -> Result<(), String> {
    if MAX_TOKEN_SIZE == 0 {
        return Err("MAX_TOKEN_SIZE cannot be zero".to_string());
    }
    if MAX_TOKEN_COUNT == 0 {
        return Err("MAX_TOKEN_COUNT cannot be zero".to_string());
    }
    if READ_CHUNK_SIZE == 0 || READ_CHUNK_SIZE > MAX_TOKEN_SIZE {
        return Err(format!(
            "READ_CHUNK_SIZE must be within 1..={} (got {})",
            MAX_TOKEN_SIZE, READ_CHUNK_SIZE
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_lexical_logging() {
        assert!(init_lexical_logging().is_ok());
    }

    #[test]
    fn test_compiled_limits_are_usable() {
        assert!(validate_limits().is_ok());
        assert!(READ_CHUNK_SIZE <= MAX_TOKEN_SIZE);
    }
}
