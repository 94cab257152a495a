/// Validate that every stage is configured and the pipeline evaluates a known statement
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::logging::config::validate_config()?;
    crate::lexical::init_lexical_logging()?;
    crate::syntax::init_syntax_logging()?;
    crate::evaluation::init_evaluation_logging()?;

    codes_check()?;

    // Unlogged, so the check adds no statement events to the session
    let check = crate::syntax::parse_statement("(1+2)*3;")
        .map_err(|e| format!("Pipeline self-check failed to parse: {}", e))
        .and_then(|tree| {
            crate::evaluation::evaluate(&tree)
                .map_err(|e| format!("Pipeline self-check failed to evaluate: {}", e))
        })?;
    if check != 9 {
        return Err(format!("Pipeline self-check produced {} instead of 9", check));
    }

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "stages_validated" => 3
    );

    Ok(())
}

fn codes_check() -> Result<(), String> {
    use crate::logging::codes;

    codes::ensure_registered(
        "Pipeline",
        &[
            codes::success::STATEMENT_PROCESSED,
            codes::success::SESSION_COMPLETE,
            codes::input::SOURCE_NOT_FOUND,
            codes::input::INVALID_PREFERENCES,
        ],
    )
}
