use crate::syntax::SyntaxTree;
use std::time::Duration;

/// Everything produced by one successfully evaluated statement
#[derive(Debug, Clone)]
pub struct StatementOutcome {
    pub value: u64,
    pub tree: SyntaxTree,
    pub token_count: usize,
    pub duration: Duration,
}

impl StatementOutcome {
    pub fn new(value: u64, tree: SyntaxTree, token_count: usize, duration: Duration) -> Self {
        Self {
            value,
            tree,
            token_count,
            duration,
        }
    }

    /// Value followed by the blank line that separates results
    pub fn render_result(&self) -> String {
        format!("{}\n\n", self.value)
    }

    pub fn log_success(&self) {
        crate::log_performance!(
            crate::logging::codes::success::STATEMENT_PROCESSED,
            "Statement processed",
            duration = self.duration,
            "value" => self.value,
            "tokens" => self.token_count,
            "tree_depth" => self.tree.depth()
        );
    }
}
