use crate::config::build::{compile, directive_from};
use crate::config::types::{Config, ExtractorConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_limits(config)?;
    validate_user_agent(config)?;
    validate_sniff_rules(config)?;
    validate_priority_rules(config)?;
    validate_extractors(&config.extract.link)?;
    validate_extractors(&config.extract.data)?;
    Ok(())
}

fn validate_limits(config: &Config) -> Result<(), ConfigError> {
    if config.limits.max_link_fetch_time == 0 {
        return Err(ConfigError::Validation(
            "max-link-fetch-time must be > 0; every fetch needs a timeout".to_string(),
        ));
    }
    Ok(())
}

fn validate_user_agent(config: &Config) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_sniff_rules(config: &Config) -> Result<(), ConfigError> {
    for rule in &config.sniff {
        compile(&rule.pattern)?;
        validate_mime(&rule.mime)?;
    }
    Ok(())
}

fn validate_priority_rules(config: &Config) -> Result<(), ConfigError> {
    for rule in &config.priority {
        compile(&rule.pattern)?;
        directive_from(&rule.directive)?;
    }
    Ok(())
}

fn validate_extractors(extractors: &[ExtractorConfig]) -> Result<(), ConfigError> {
    for entry in extractors {
        compile(&entry.pattern)?;
        validate_mime(&entry.mime)?;
    }
    Ok(())
}

fn validate_mime(mime: &str) -> Result<(), ConfigError> {
    if mime.is_empty() || !mime.contains('/') {
        return Err(ConfigError::Validation(format!(
            "'{mime}' is not a mime type (expected type/subtype or */*)"
        )));
    }
    Ok(())
}
