//! Consolidated error codes and classification system
//!
//! Single source of truth for every code the pipeline emits, together with the
//! behavioral metadata (severity, category, recoverability) attached to it.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Input source error codes
pub mod input {
    use super::Code;

    pub const READ_FAILURE: Code = Code::new("E005");
    pub const SOURCE_NOT_FOUND: Code = Code::new("E006");
    pub const INVALID_PREFERENCES: Code = Code::new("E007");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const BAD_TOKEN: Code = Code::new("E020");
    pub const TOKEN_TOO_LONG: Code = Code::new("E021");
    pub const TOO_MANY_TOKENS: Code = Code::new("E022");
}

/// Syntax analysis error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E040");
    pub const UNEXPECTED_EOF: Code = Code::new("E041");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E042");
}

/// Evaluation error codes
pub mod evaluation {
    use super::Code;

    pub const ARITHMETIC_OVERFLOW: Code = Code::new("E060");
    pub const LITERAL_OUT_OF_RANGE: Code = Code::new("E061");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const TREE_CONSTRUCTION_COMPLETE: Code = Code::new("I040");
    pub const EVALUATION_COMPLETE: Code = Code::new("I060");
    pub const STATEMENT_PROCESSED: Code = Code::new("I070");
    pub const SESSION_COMPLETE: Code = Code::new("I071");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System errors
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal system error",
                "File a bug report with the input that triggered it",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "System initialization failed",
                "Check configuration and environment variables",
            ),
            // Input errors
            ErrorMetadata::new(
                "E005",
                "Input",
                Severity::High,
                false,
                true,
                "Failed to read from the input source",
                "Check that the input stream or file is readable",
            ),
            ErrorMetadata::new(
                "E006",
                "Input",
                Severity::High,
                false,
                true,
                "Input file does not exist or cannot be opened",
                "Verify the path passed with --file",
            ),
            ErrorMetadata::new(
                "E007",
                "Input",
                Severity::Medium,
                false,
                true,
                "Preferences file is unreadable or malformed",
                "Fix the TOML preferences file or remove the --config flag",
            ),
            // Lexical errors
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Input contains a character sequence that is not a token",
                "Use only digits, '+', '*', '(', ')' and whitespace",
            ),
            ErrorMetadata::new(
                "E021",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "A single token exceeds the maximum buffered size",
                "Shorten the numeric literal",
            ),
            ErrorMetadata::new(
                "E022",
                "Lexical",
                Severity::High,
                true,
                false,
                "Statement contains too many tokens",
                "Split the expression across several lines",
            ),
            // Syntax errors
            ErrorMetadata::new(
                "E040",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Token is not valid at this point of the expression",
                "Check operator and parenthesis placement",
            ),
            ErrorMetadata::new(
                "E041",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Statement ended before the expression was complete",
                "Supply the missing operand",
            ),
            ErrorMetadata::new(
                "E042",
                "Syntax",
                Severity::High,
                true,
                false,
                "Expression nesting exceeds the maximum parse depth",
                "Reduce nesting or the number of chained operators",
            ),
            // Evaluation errors
            ErrorMetadata::new(
                "E060",
                "Evaluation",
                Severity::Medium,
                true,
                false,
                "Result does not fit in an unsigned 64-bit integer",
                "Use smaller operands",
            ),
            ErrorMetadata::new(
                "E061",
                "Evaluation",
                Severity::Medium,
                true,
                false,
                "Numeric literal does not fit in an unsigned 64-bit integer",
                "Use a literal no larger than 18446744073709551615",
            ),
            // Success codes
            ErrorMetadata::new(
                "I004",
                "System",
                Severity::Low,
                true,
                false,
                "System initialization completed",
                "Continue processing",
            ),
            ErrorMetadata::new(
                "I020",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Tokenization completed successfully",
                "Continue to parsing",
            ),
            ErrorMetadata::new(
                "I040",
                "Syntax",
                Severity::Low,
                true,
                false,
                "Syntax tree constructed successfully",
                "Continue to evaluation",
            ),
            ErrorMetadata::new(
                "I060",
                "Evaluation",
                Severity::Low,
                true,
                false,
                "Expression evaluated successfully",
                "Print the result",
            ),
            ErrorMetadata::new(
                "I070",
                "Pipeline",
                Severity::Low,
                true,
                false,
                "Statement processed through the full pipeline",
                "Read the next line",
            ),
            ErrorMetadata::new(
                "I071",
                "Pipeline",
                Severity::Low,
                true,
                false,
                "Input exhausted and session finished",
                "No action required",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

/// Verify that every code in `codes` has registry metadata
pub fn ensure_registered(stage: &str, codes: &[Code]) -> Result<(), String> {
    for code in codes {
        if get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "{} code {} not found in metadata registry",
                stage,
                code.as_str()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_constant_is_registered() {
        let all = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            input::READ_FAILURE,
            input::SOURCE_NOT_FOUND,
            input::INVALID_PREFERENCES,
            lexical::BAD_TOKEN,
            lexical::TOKEN_TOO_LONG,
            lexical::TOO_MANY_TOKENS,
            syntax::UNEXPECTED_TOKEN,
            syntax::UNEXPECTED_EOF,
            syntax::MAX_RECURSION_DEPTH,
            evaluation::ARITHMETIC_OVERFLOW,
            evaluation::LITERAL_OUT_OF_RANGE,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::TOKENIZATION_COMPLETE,
            success::TREE_CONSTRUCTION_COMPLETE,
            success::EVALUATION_COMPLETE,
            success::STATEMENT_PROCESSED,
            success::SESSION_COMPLETE,
        ];

        assert!(ensure_registered("all", &all).is_ok());
    }

    #[test]
    fn test_classification_lookups() {
        assert_eq!(get_category("E020"), "Lexical");
        assert_eq!(get_category("E041"), "Syntax");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt("ERR001"));
        assert!(is_recoverable("E040"));
        assert!(!requires_halt("E060"));
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_action("Z999"), "No specific action available");
        assert!(get_error_metadata("Z999").is_none());
    }

    #[test]
    fn test_ensure_registered_reports_missing() {
        let err = ensure_registered("Lexical", &[Code::new("E999")]).unwrap_err();
        assert!(err.contains("E999"));
        assert!(err.starts_with("Lexical"));
    }
}
