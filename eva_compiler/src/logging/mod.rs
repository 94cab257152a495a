//! Global logging for the eva pipeline
//!
//! A process-wide `LoggingService` behind a `OnceLock`, plus a thread-local
//! statement context so that events raised while processing a line carry the
//! input source and line number.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, Logger, LoggingService, MemoryLogger, MultiLogger, StructuredLogger,
};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Where the statement currently being processed came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementContext {
    pub source: String,
    pub line: usize,
}

thread_local! {
    static STATEMENT_CONTEXT: RefCell<Option<StatementContext>> = RefCell::new(None);
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the installed runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    codes::ensure_registered(
        "System",
        &[
            codes::system::INTERNAL_ERROR,
            codes::system::INITIALIZATION_FAILURE,
            codes::input::READ_FAILURE,
        ],
    )?;

    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with a caller-provided service
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;

    Ok(())
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether a debug event would reach any logger
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// STATEMENT CONTEXT MANAGEMENT
// ============================================================================

pub fn set_statement_context(source: &str, line: usize) {
    STATEMENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(StatementContext {
            source: source.to_string(),
            line,
        });
    });
}

pub fn clear_statement_context() {
    STATEMENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with the statement context set, clearing it afterwards
pub fn with_statement_context<F, R>(source: &str, line: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_statement_context(source, line);
    let result = f();
    clear_statement_context();
    result
}

pub fn get_current_statement_context() -> Option<StatementContext> {
    STATEMENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

fn attach_statement_context(event: LogEvent) -> LogEvent {
    match get_current_statement_context() {
        Some(ctx) => event
            .with_context("source", &ctx.source)
            .with_context("line", &ctx.line.to_string()),
        None => event,
    }
}

/// Tag an event with the statement context and hand it to the global logger
pub fn dispatch_with_statement(event: LogEvent) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(attach_statement_context(event));
    }
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Used by `log_error!`
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);

    if let Some(s) = span {
        event = event.with_span(s);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch_with_statement(event);
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch_with_statement(event);
}

/// Used by `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::info(message);

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    dispatch_with_statement(event);
}

/// Logger state and the effective configuration, for `--info`
pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    match try_get_global_logger() {
        Some(logger) => {
            diagnostics.push_str(&format!("Active level: {}\n", logger.min_level().as_str()))
        }
        None => diagnostics.push_str("Global logger: not started\n"),
    }

    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_context_management() {
        assert!(get_current_statement_context().is_none());

        set_statement_context("<stdin>", 3);
        let context = get_current_statement_context().unwrap();
        assert_eq!(context.source, "<stdin>");
        assert_eq!(context.line, 3);

        clear_statement_context();
        assert!(get_current_statement_context().is_none());
    }

    #[test]
    fn test_with_statement_context() {
        let result = with_statement_context("input.txt", 9, || {
            let context = get_current_statement_context().unwrap();
            assert_eq!(context.line, 9);
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_statement_context().is_none());
    }

    #[test]
    fn test_context_is_attached_to_events() {
        let event = with_statement_context("input.txt", 4, || {
            attach_statement_context(LogEvent::info("hello"))
        });

        assert_eq!(event.context.get("source").map(String::as_str), Some("input.txt"));
        assert_eq!(event.context.get("line").map(String::as_str), Some("4"));
    }

    #[test]
    fn test_diagnostics() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
        assert!(diagnostics.contains("Min log level"));
    }
}
