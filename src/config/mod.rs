//! Configuration module for skitter
//!
//! Loads, parses, and validates TOML configuration, and compiles it into
//! the kernel's live components (sniffer, priority engine, extraction
//! pipeline, frontier limits). Everything is settable before the driver
//! starts; nothing reads the config after that.

mod build;
mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{
    Config, DirectiveConfig, ExtractConfig, ExtractorConfig, LimitsConfig, PriorityRuleConfig,
    SniffRuleConfig,
};
pub use validation::validate;
