use crate::config::build_info;
use crate::config::compile_time::{lexical, syntax};

/// Static description of the pipeline and the limits it was built with
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub version: &'static str,
    pub stages: Vec<&'static str>,
    pub grammar: &'static str,
    pub integer_width_bits: u32,
    pub max_token_size: usize,
    pub max_token_count: usize,
    pub max_parse_depth: usize,
    pub build_profile: &'static str,
    pub config_source: String,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "eva pipeline {}:\n\
             - Stages: {}\n\
             - Grammar: {}\n\
             - Integers: unsigned {}-bit, checked\n\
             - Max token size: {} bytes\n\
             - Max tokens per statement: {}\n\
             - Max parse depth: {}\n\
             - Build profile: {} ({})",
            self.version,
            self.stages.join(" -> "),
            self.grammar,
            self.integer_width_bits,
            self.max_token_size,
            self.max_token_count,
            self.max_parse_depth,
            self.build_profile,
            self.config_source
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{}-stage evaluator, {} grammar, u{} arithmetic",
            self.stages.len(),
            self.grammar,
            self.integer_width_bits
        )
    }
}

pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        version: env!("CARGO_PKG_VERSION"),
        stages: vec!["tokenize", "parse", "evaluate"],
        grammar: "right-recursive",
        integer_width_bits: u64::BITS,
        max_token_size: lexical::MAX_TOKEN_SIZE,
        max_token_count: lexical::MAX_TOKEN_COUNT,
        max_parse_depth: syntax::MAX_PARSE_DEPTH,
        build_profile: build_info::profile(),
        config_source: build_info::source_info(),
    }
}
