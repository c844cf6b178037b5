//! Turns the passive configuration into live kernel components.
//!
//! All patterns are compiled here; a pattern that fails to compile is a
//! configuration error, never a runtime surprise. When the config leaves
//! a table empty, the builtin rules below apply.

use crate::config::types::{Config, DirectiveConfig, ExtractorConfig};
use crate::extract::{PatternDataExtractor, PatternLinkExtractor, Pipeline};
use crate::frontier::FrontierLimits;
use crate::priority::{Directive, PriorityEngine, PriorityRule};
use crate::sniff::{SniffRule, Sniffer};
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use std::time::Duration;

/// Builtin sniff rules, in evaluation order
const DEFAULT_SNIFF: &[(&str, &str)] = &[
    (r"(?i)<(?:!doctype\s+html|html|head|body|a\s|div|p>)", "text/html"),
    (r"(?i)<\?xml|<rss|<feed", "application/xml"),
];

/// Builtin link extraction patterns; the HTML pattern carries two
/// mutually exclusive capture groups (anchor hrefs, link-tag hrefs)
const DEFAULT_LINKS: &[(&str, &str)] = &[
    (
        "text/html",
        r#"(?i)<a\s[^>]*?href\s*=\s*["']([^"']+)["']|<link\s[^>]*?href\s*=\s*["']([^"']+)["']"#,
    ),
    ("application/xml", r"(?i)<link[^>]*>([^<\s][^<]*)</link>"),
];

/// Builtin data extraction patterns
const DEFAULT_DATA: &[(&str, &str)] = &[("text/html", r"(?i)<title[^>]*>([^<]+)</title>")];

impl Config {
    /// Frontier bounds from the limits table
    pub fn frontier_limits(&self) -> FrontierLimits {
        FrontierLimits {
            max_depth: self.limits.max_crawl_depth,
            max_links: self.limits.max_crawled_links,
            max_crawl_time: Duration::from_millis(self.limits.max_crawl_time),
            max_fetch_time: Duration::from_millis(self.limits.max_link_fetch_time),
        }
    }

    /// Compiles the sniffer, falling back to the builtin rules
    pub fn sniffer(&self) -> ConfigResult<Sniffer> {
        let rules = if self.sniff.is_empty() {
            DEFAULT_SNIFF
                .iter()
                .map(|(pattern, mime)| {
                    Ok(SniffRule {
                        pattern: compile(pattern)?,
                        mime: mime.to_string(),
                    })
                })
                .collect::<ConfigResult<Vec<_>>>()?
        } else {
            self.sniff
                .iter()
                .map(|rule| {
                    Ok(SniffRule {
                        pattern: compile(&rule.pattern)?,
                        mime: rule.mime.clone(),
                    })
                })
                .collect::<ConfigResult<Vec<_>>>()?
        };
        Ok(Sniffer::new(rules))
    }

    /// Compiles the priority rules into a fresh session engine
    pub fn priority_engine(&self) -> ConfigResult<PriorityEngine> {
        let rules = self
            .priority
            .iter()
            .map(|rule| {
                Ok(PriorityRule {
                    pattern: compile(&rule.pattern)?,
                    directive: directive_from(&rule.directive)?,
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(PriorityEngine::new(rules))
    }

    /// Compiles the extractor registries into a fresh session pipeline
    pub fn pipeline(&self) -> ConfigResult<Pipeline> {
        let mut pipeline = Pipeline::new();

        if self.extract.link.is_empty() {
            for (mime, pattern) in DEFAULT_LINKS {
                pipeline.register_link(
                    *mime,
                    Box::new(PatternLinkExtractor::new(compile(pattern)?)),
                );
            }
        } else {
            for ExtractorConfig { mime, pattern } in &self.extract.link {
                pipeline.register_link(
                    mime.clone(),
                    Box::new(PatternLinkExtractor::new(compile(pattern)?)),
                );
            }
        }

        if self.extract.data.is_empty() {
            for (mime, pattern) in DEFAULT_DATA {
                pipeline.register_data(
                    *mime,
                    Box::new(PatternDataExtractor::new(compile(pattern)?)),
                );
            }
        } else {
            for ExtractorConfig { mime, pattern } in &self.extract.data {
                pipeline.register_data(
                    mime.clone(),
                    Box::new(PatternDataExtractor::new(compile(pattern)?)),
                );
            }
        }

        Ok(pipeline)
    }
}

pub(crate) fn compile(pattern: &str) -> ConfigResult<Regex> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn directive_from(config: &DirectiveConfig) -> ConfigResult<Directive> {
    match config {
        DirectiveConfig::Fixed(n) => Ok(Directive::Fixed(*n)),
        DirectiveConfig::Named(name) => match name.as_str() {
            "++" => Ok(Directive::AboveHighest),
            "--" => Ok(Directive::BelowLowest),
            "drop" => Ok(Directive::Discard),
            other => Err(ConfigError::InvalidDirective(other.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{PriorityRuleConfig, SniffRuleConfig};

    #[test]
    fn test_default_config_builds_every_component() {
        let config = Config::default();
        assert!(config.sniffer().is_ok());
        assert!(config.priority_engine().is_ok());
        assert!(config.pipeline().is_ok());
    }

    #[test]
    fn test_default_limits() {
        let limits = Config::default().frontier_limits();
        assert_eq!(limits.max_depth, 0);
        assert_eq!(limits.max_links, 0);
        assert_eq!(limits.max_crawl_time, Duration::ZERO);
        assert_eq!(limits.max_fetch_time, Duration::from_secs(30));
    }

    #[test]
    fn test_builtin_sniff_classifies_html_and_xml() {
        let sniffer = Config::default().sniffer().unwrap();
        assert_eq!(sniffer.sniff("<!DOCTYPE html><html>"), Some("text/html"));
        assert_eq!(
            sniffer.sniff(r#"<?xml version="1.0"?><rss>"#),
            Some("application/xml")
        );
        assert_eq!(sniffer.sniff("just bytes"), None);
    }

    #[test]
    fn test_configured_sniff_replaces_builtins() {
        let config = Config {
            sniff: vec![SniffRuleConfig {
                pattern: "PDF".to_string(),
                mime: "application/pdf".to_string(),
            }],
            ..Config::default()
        };
        let sniffer = config.sniffer().unwrap();
        assert_eq!(sniffer.sniff("%PDF-1.4"), Some("application/pdf"));
        assert_eq!(sniffer.sniff("<html>"), None);
    }

    #[test]
    fn test_bad_pattern_is_config_error() {
        let config = Config {
            priority: vec![PriorityRuleConfig {
                pattern: "(unclosed".to_string(),
                directive: DirectiveConfig::Fixed(1),
            }],
            ..Config::default()
        };
        let err = config.priority_engine().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_directive_names() {
        let plus = directive_from(&DirectiveConfig::Named("++".to_string())).unwrap();
        assert_eq!(plus, Directive::AboveHighest);
        let minus = directive_from(&DirectiveConfig::Named("--".to_string())).unwrap();
        assert_eq!(minus, Directive::BelowLowest);
        let drop = directive_from(&DirectiveConfig::Named("drop".to_string())).unwrap();
        assert_eq!(drop, Directive::Discard);
        assert!(directive_from(&DirectiveConfig::Named("sideways".to_string())).is_err());
    }

    #[test]
    fn test_builtin_link_pattern_sees_anchors_and_link_tags() {
        let mut pipeline = Config::default().pipeline().unwrap();
        let doc = url::Url::parse("http://example.com/").unwrap();
        let content = r#"<a href="/one">x</a><link rel="alternate" href="/feed">"#;
        let extracted = pipeline.run(Some("text/html"), content, &doc, 0);
        let paths: Vec<&str> = extracted.links.iter().map(|l| l.url.path()).collect();
        assert_eq!(paths, vec!["/one", "/feed"]);
    }
}
