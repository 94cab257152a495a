use eva_compiler::logging::{self, codes, LogLevel, LoggingService, MemoryLogger};
use eva_compiler::pipeline;
use std::sync::Arc;

// One test per binary: the global logger can be installed only once per process
#[test]
fn statement_events_reach_the_global_logger() {
    let memory = Arc::new(MemoryLogger::new());
    let service = LoggingService::new(memory.clone(), LogLevel::Debug);
    logging::init_global_logging_with_service(Arc::new(service)).unwrap();

    // Startup validation evaluates its own check statement silently
    pipeline::validate_pipeline().unwrap();
    assert!(memory.has_success_with_code(codes::success::SYSTEM_INITIALIZATION_COMPLETED));
    assert!(memory
        .get_events_with_code(codes::success::TOKENIZATION_COMPLETE)
        .is_empty());
    assert!(memory
        .get_events_with_code(codes::success::STATEMENT_PROCESSED)
        .is_empty());

    // A rejected line is reported exactly once, with its position stated once
    memory.clear();
    let error = logging::with_statement_context("input.txt", 4, || pipeline::process_line("1+a"))
        .unwrap_err();
    assert_eq!(error.error_code(), codes::lexical::BAD_TOKEN);

    let errors = memory.get_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, codes::lexical::BAD_TOKEN);
    assert_eq!(errors[0].format().matches("1:3").count(), 1);
    assert_eq!(errors[0].context.get("line").map(String::as_str), Some("4"));
    assert_eq!(
        errors[0].context.get("source").map(String::as_str),
        Some("input.txt")
    );

    memory.clear();
    pipeline::process_line("18446744073709551615+1").unwrap_err();
    let errors = memory.get_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, codes::evaluation::ARITHMETIC_OVERFLOW);

    // A good line walks every stage
    memory.clear();
    assert_eq!(pipeline::process_line("(1+2)*3").unwrap().value, 9);
    for code in [
        codes::success::TREE_CONSTRUCTION_COMPLETE,
        codes::success::TOKENIZATION_COMPLETE,
        codes::success::EVALUATION_COMPLETE,
        codes::success::STATEMENT_PROCESSED,
    ] {
        assert_eq!(memory.get_events_with_code(code).len(), 1, "{}", code);
    }
    assert!(memory.get_errors().is_empty());
}
