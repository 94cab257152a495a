use super::{PipelineError, StatementOutcome};
use serde::Serialize;
use std::time::Duration;

/// Counters for one driver session
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionStats {
    pub lines_read: usize,
    pub evaluated: usize,
    pub parse_failures: usize,
    pub evaluation_failures: usize,
    pub total_tokens: usize,
    pub total_duration: Duration,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, outcome: &StatementOutcome) {
        self.lines_read += 1;
        self.evaluated += 1;
        self.total_tokens += outcome.token_count;
        self.total_duration += outcome.duration;
    }

    pub fn record_failure(&mut self, error: &PipelineError) {
        self.lines_read += 1;
        if error.is_parse_failure() {
            self.parse_failures += 1;
        } else {
            self.evaluation_failures += 1;
        }
    }

    pub fn failures(&self) -> usize {
        self.parse_failures + self.evaluation_failures
    }

    pub fn success_rate(&self) -> f64 {
        if self.lines_read == 0 {
            0.0
        } else {
            self.evaluated as f64 / self.lines_read as f64
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} lines read: {} evaluated, {} parse errors, {} evaluation errors ({:.1}% ok, {} tokens, {:.3} ms)",
            self.lines_read,
            self.evaluated,
            self.parse_failures,
            self.evaluation_failures,
            self.success_rate() * 100.0,
            self.total_tokens,
            self.total_duration.as_secs_f64() * 1000.0
        )
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
