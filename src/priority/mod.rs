//! Priority rule engine
//!
//! Maps a serialized link to an integer priority via ordered rules. The
//! first matching rule wins; later rules are never consulted. Directives
//! let operators pin link classes to the front or back of the frontier
//! without knowing numeric bounds in advance: `AboveHighest` resolves to
//! one more than the highest priority assigned so far, `BelowLowest` to
//! one less than the lowest.

use regex::Regex;

/// What to do with a link once its rule matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Assign this exact priority
    Fixed(i32),

    /// Assign one more than the highest priority seen this session ("++")
    AboveHighest,

    /// Assign one less than the lowest priority seen this session ("--")
    BelowLowest,

    /// Do not enqueue the link at all ("drop")
    Discard,
}

/// A single ordered priority rule
#[derive(Debug)]
pub struct PriorityRule {
    /// Pattern matched against the link's serialized `"<depth> <url>"` form
    pub pattern: Regex,

    pub directive: Directive,
}

/// Session-scoped priority engine
///
/// The high/low watermarks live for the whole crawl session and are never
/// reset. Each session gets its own engine instance.
#[derive(Debug, Default)]
pub struct PriorityEngine {
    rules: Vec<PriorityRule>,
    highest: i32,
    lowest: i32,
}

impl PriorityEngine {
    pub fn new(rules: Vec<PriorityRule>) -> Self {
        Self {
            rules,
            highest: 0,
            lowest: 0,
        }
    }

    /// Computes the priority for a serialized link.
    ///
    /// Returns `None` when the matching rule says to discard the link.
    /// When no rule matches the priority is 0 and the watermarks are left
    /// untouched.
    pub fn compute(&mut self, serialized: &str) -> Option<i32> {
        for rule in &self.rules {
            if !rule.pattern.is_match(serialized) {
                continue;
            }
            return match rule.directive {
                Directive::Fixed(n) => {
                    self.highest = self.highest.max(n);
                    self.lowest = self.lowest.min(n);
                    Some(n)
                }
                Directive::AboveHighest => {
                    self.highest += 1;
                    Some(self.highest)
                }
                Directive::BelowLowest => {
                    self.lowest -= 1;
                    Some(self.lowest)
                }
                Directive::Discard => None,
            };
        }
        Some(0)
    }

    /// Current (highest, lowest) watermarks
    pub fn watermarks(&self) -> (i32, i32) {
        (self.highest, self.lowest)
    }
}
