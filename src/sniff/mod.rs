//! Content type sniffing
//!
//! Heuristic content classification from a content prefix, independent of
//! any transport-declared content type. Rules are evaluated in the order
//! they were registered; the first matching pattern wins.

use regex::Regex;

/// How much of the content the sniffer inspects.
const SNIFF_WINDOW: usize = 512;

/// A single ordered sniffing rule
#[derive(Debug)]
pub struct SniffRule {
    /// Pattern matched against the content prefix
    pub pattern: Regex,

    /// Mime type assigned when the pattern matches
    pub mime: String,
}

/// Ordered first-match content classifier
#[derive(Debug, Default)]
pub struct Sniffer {
    rules: Vec<SniffRule>,
}

impl Sniffer {
    pub fn new(rules: Vec<SniffRule>) -> Self {
        Self { rules }
    }

    /// Classifies content by evaluating each rule against the first 512
    /// bytes. Returns `None` when no rule matches.
    pub fn sniff(&self, content: &str) -> Option<&str> {
        let prefix = head(content, SNIFF_WINDOW);
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(prefix))
            .map(|rule| rule.mime.as_str())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// Takes a prefix of at most `limit` bytes, clamped to a char boundary.
fn head(content: &str, limit: usize) -> &str {
    if content.len() <= limit {
        return content;
    }
    let mut end = limit;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}
