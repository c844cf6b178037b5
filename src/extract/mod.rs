//! Extraction pipeline
//!
//! Per-mime pluggable extractors pull structured records and candidate
//! links out of fetched content. Extraction is deliberately pattern-based
//! rather than DOM-based: a pattern may carry several mutually exclusive
//! capture groups (e.g. anchor hrefs vs feed-link hrefs), and the first
//! non-empty group of each match is the candidate. The scan never stops
//! at a failed candidate; malformed URLs in untrusted content are routine
//! input and are simply skipped.

use crate::dedup::DedupIndex;
use crate::frontier::CrawlLink;
use crate::scope::resolve_loadable;
use regex::{Captures, Regex};
use std::collections::HashMap;
use url::Url;

/// Registry key that supplies a fallback extractor when no mime-specific
/// one is registered
pub const WILDCARD_MIME: &str = "*/*";

/// Probe for a `<base href="...">` tag; only consulted for `text/html`
const BASE_HREF_PATTERN: &str = r#"(?i)<base\s[^>]*?href\s*=\s*["']([^"']+)["']"#;

/// Produces output records from raw content
pub trait DataExtractor: Send {
    fn extract(&self, content: &str) -> Vec<String>;
}

/// Produces candidate URL strings from raw content
pub trait LinkExtractor: Send {
    fn extract(&self, content: &str) -> Vec<String>;
}

/// Regex-driven record extractor: one record per match, taken from the
/// first non-empty capture group, or the whole match when the pattern has
/// no groups
#[derive(Debug)]
pub struct PatternDataExtractor {
    pattern: Regex,
}

impl PatternDataExtractor {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl DataExtractor for PatternDataExtractor {
    fn extract(&self, content: &str) -> Vec<String> {
        self.pattern
            .captures_iter(content)
            .filter_map(|caps| {
                first_nonempty_group(&caps)
                    .or_else(|| caps.get(0).map(|m| m.as_str().to_string()))
            })
            .collect()
    }
}

/// Regex-driven link extractor: one candidate URL string per match, taken
/// from the first non-empty capture group
#[derive(Debug)]
pub struct PatternLinkExtractor {
    pattern: Regex,
}

impl PatternLinkExtractor {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl LinkExtractor for PatternLinkExtractor {
    fn extract(&self, content: &str) -> Vec<String> {
        self.pattern
            .captures_iter(content)
            .filter_map(|caps| first_nonempty_group(&caps))
            .collect()
    }
}

fn first_nonempty_group(caps: &Captures) -> Option<String> {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// What one extraction pass produced
#[derive(Debug, Default)]
pub struct Extracted {
    /// Newly seen records, already deduplicated against the session's
    /// record index
    pub records: Vec<String>,

    /// In-scope candidate links at `document_depth + 1`
    pub links: Vec<CrawlLink>,
}

/// Per-mime extraction pipeline
///
/// Owns the record dedup index for the session: an extractor is invoked
/// once per match, but a duplicate record is suppressed before it becomes
/// externally visible.
pub struct Pipeline {
    link_extractors: HashMap<String, Box<dyn LinkExtractor>>,
    data_extractors: HashMap<String, Box<dyn DataExtractor>>,
    record_index: DedupIndex,
    base_probe: Option<Regex>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            link_extractors: HashMap::new(),
            data_extractors: HashMap::new(),
            record_index: DedupIndex::new(),
            base_probe: Regex::new(BASE_HREF_PATTERN).ok(),
        }
    }

    /// Registers a link extractor for a mime type (or [`WILDCARD_MIME`])
    pub fn register_link(&mut self, mime: impl Into<String>, extractor: Box<dyn LinkExtractor>) {
        self.link_extractors.insert(mime.into(), extractor);
    }

    /// Registers a data extractor for a mime type (or [`WILDCARD_MIME`])
    pub fn register_data(&mut self, mime: impl Into<String>, extractor: Box<dyn DataExtractor>) {
        self.data_extractors.insert(mime.into(), extractor);
    }

    /// Runs data and link extraction over one fetched document.
    ///
    /// `mime` of `None` (unsniffable content) selects only the wildcard
    /// registrations. Data and link extraction are independent; either may
    /// run without the other.
    pub fn run(
        &mut self,
        mime: Option<&str>,
        content: &str,
        document_url: &Url,
        document_depth: u32,
    ) -> Extracted {
        let key = mime.unwrap_or(WILDCARD_MIME);
        let mut extracted = Extracted::default();

        if let Some(extractor) = lookup(&self.data_extractors, key) {
            for record in extractor.extract(content) {
                if self.record_index.first_sighting(&record) {
                    extracted.records.push(record);
                } else {
                    tracing::trace!("suppressing duplicate record");
                }
            }
        }

        if let Some(extractor) = lookup(&self.link_extractors, key) {
            let base = self.base_url(mime, content, document_url);
            for candidate in extractor.extract(content) {
                match resolve_loadable(&candidate, &base, document_url) {
                    Some(resolved) => {
                        extracted
                            .links
                            .push(CrawlLink::new(resolved, document_depth + 1));
                    }
                    None => {
                        tracing::trace!(%candidate, "candidate not loadable, skipping");
                    }
                }
            }
        }

        extracted
    }

    /// Determines the base URL for resolving relative candidates.
    ///
    /// For `text/html` a `<base href="...">` tag takes precedence when
    /// present and parseable as an absolute URL; otherwise, and for every
    /// other mime, the document URL is the base.
    fn base_url(&self, mime: Option<&str>, content: &str, document_url: &Url) -> Url {
        if mime == Some("text/html") {
            if let Some(probe) = &self.base_probe {
                if let Some(caps) = probe.captures(content) {
                    if let Ok(base) = Url::parse(&caps[1]) {
                        return base;
                    }
                    tracing::debug!("malformed base href, falling back to document URL");
                }
            }
        }
        document_url.clone()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup<'a, T: ?Sized>(map: &'a HashMap<String, Box<T>>, mime: &str) -> Option<&'a T> {
    map.get(mime)
        .or_else(|| map.get(WILDCARD_MIME))
        .map(|boxed| boxed.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR_PATTERN: &str = r#"(?i)<a\s[^>]*?href\s*=\s*["']([^"']+)["']"#;

    fn doc_url() -> Url {
        Url::parse("http://example.com/dir/page.html").unwrap()
    }

    fn pipeline_with_html_links() -> Pipeline {
        let mut pipeline = Pipeline::new();
        pipeline.register_link(
            "text/html",
            Box::new(PatternLinkExtractor::new(
                Regex::new(ANCHOR_PATTERN).unwrap(),
            )),
        );
        pipeline
    }

    #[test]
    fn test_links_resolved_and_depth_incremented() {
        let mut pipeline = pipeline_with_html_links();
        let content = r#"<a href="/p1">x</a><a href="sibling">y</a>"#;
        let extracted = pipeline.run(Some("text/html"), content, &doc_url(), 2);

        let urls: Vec<&str> = extracted.links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["http://example.com/p1", "http://example.com/dir/sibling"]
        );
        assert!(extracted.links.iter().all(|l| l.depth == 3));
    }

    #[test]
    fn test_out_of_scope_candidates_skipped() {
        let mut pipeline = pipeline_with_html_links();
        let content = r#"<a href="http://other.com/p3">z</a><a href="/ok">k</a>"#;
        let extracted = pipeline.run(Some("text/html"), content, &doc_url(), 0);
        assert_eq!(extracted.links.len(), 1);
        assert_eq!(extracted.links[0].url.as_str(), "http://example.com/ok");
    }

    #[test]
    fn test_malformed_candidate_does_not_abort_scan() {
        let mut pipeline = pipeline_with_html_links();
        let content = r#"<a href="http://[bad">a</a><a href="/good">b</a>"#;
        let extracted = pipeline.run(Some("text/html"), content, &doc_url(), 0);
        assert_eq!(extracted.links.len(), 1);
        assert_eq!(extracted.links[0].url.path(), "/good");
    }

    #[test]
    fn test_base_href_overrides_document_url() {
        let mut pipeline = pipeline_with_html_links();
        let content = r#"<base href="http://example.com/other/"><a href="rel">x</a>"#;
        let extracted = pipeline.run(Some("text/html"), content, &doc_url(), 0);
        assert_eq!(extracted.links[0].url.as_str(), "http://example.com/other/rel");
    }

    #[test]
    fn test_malformed_base_falls_back_to_document_url() {
        let mut pipeline = pipeline_with_html_links();
        let content = r#"<base href="::nonsense::"><a href="rel">x</a>"#;
        let extracted = pipeline.run(Some("text/html"), content, &doc_url(), 0);
        assert_eq!(
            extracted.links[0].url.as_str(),
            "http://example.com/dir/rel"
        );
    }

    #[test]
    fn test_base_ignored_for_non_html() {
        let mut pipeline = Pipeline::new();
        pipeline.register_link(
            WILDCARD_MIME,
            Box::new(PatternLinkExtractor::new(
                Regex::new(ANCHOR_PATTERN).unwrap(),
            )),
        );
        let content = r#"<base href="http://example.com/other/"><a href="rel">x</a>"#;
        let extracted = pipeline.run(None, content, &doc_url(), 0);
        assert_eq!(
            extracted.links[0].url.as_str(),
            "http://example.com/dir/rel"
        );
    }

    #[test]
    fn test_wildcard_fallback_when_mime_unregistered() {
        let mut pipeline = Pipeline::new();
        pipeline.register_link(
            WILDCARD_MIME,
            Box::new(PatternLinkExtractor::new(
                Regex::new(ANCHOR_PATTERN).unwrap(),
            )),
        );
        let content = r#"<a href="/p">x</a>"#;
        let extracted = pipeline.run(Some("text/plain"), content, &doc_url(), 0);
        assert_eq!(extracted.links.len(), 1);
    }

    #[test]
    fn test_mime_specific_beats_wildcard() {
        let mut pipeline = Pipeline::new();
        pipeline.register_data(
            "text/html",
            Box::new(PatternDataExtractor::new(Regex::new("html-(\\w+)").unwrap())),
        );
        pipeline.register_data(
            WILDCARD_MIME,
            Box::new(PatternDataExtractor::new(Regex::new("any-(\\w+)").unwrap())),
        );
        let extracted = pipeline.run(Some("text/html"), "html-one any-two", &doc_url(), 0);
        assert_eq!(extracted.records, vec!["one"]);
    }

    #[test]
    fn test_no_link_extractor_no_links_but_data_still_runs() {
        let mut pipeline = Pipeline::new();
        pipeline.register_data(
            "text/html",
            Box::new(PatternDataExtractor::new(
                Regex::new(r"(?i)<title>([^<]+)</title>").unwrap(),
            )),
        );
        let content = r#"<title>Hello</title><a href="/p">x</a>"#;
        let extracted = pipeline.run(Some("text/html"), content, &doc_url(), 0);
        assert!(extracted.links.is_empty());
        assert_eq!(extracted.records, vec!["Hello"]);
    }

    #[test]
    fn test_records_deduped_across_runs() {
        let mut pipeline = Pipeline::new();
        pipeline.register_data(
            "text/html",
            Box::new(PatternDataExtractor::new(
                Regex::new(r"(?i)<title>([^<]+)</title>").unwrap(),
            )),
        );
        let content = "<title>Same</title>";
        let first = pipeline.run(Some("text/html"), content, &doc_url(), 0);
        let second = pipeline.run(Some("text/html"), content, &doc_url(), 0);
        assert_eq!(first.records, vec!["Same"]);
        assert!(second.records.is_empty());
    }

    #[test]
    fn test_first_nonempty_group_across_alternatives() {
        // Two mutually exclusive capture groups, as in anchor-vs-feed hrefs
        let pattern =
            Regex::new(r#"<a href="([^"]+)"|<link href="([^"]+)""#).unwrap();
        let extractor = PatternLinkExtractor::new(pattern);
        let candidates =
            extractor.extract(r#"<a href="/one"><link href="/two"><a href="/three">"#);
        assert_eq!(candidates, vec!["/one", "/two", "/three"]);
    }

    #[test]
    fn test_whole_match_record_when_pattern_has_no_groups() {
        let extractor = PatternDataExtractor::new(Regex::new(r"\bITEM-\d+\b").unwrap());
        let records = extractor.extract("ITEM-1 noise ITEM-2");
        assert_eq!(records, vec!["ITEM-1", "ITEM-2"]);
    }

    #[test]
    fn test_adjacent_matches_all_found() {
        let extractor = PatternLinkExtractor::new(
            Regex::new(r#"<a href="([^"]+)">"#).unwrap(),
        );
        let candidates = extractor.extract(r#"<a href="/a"><a href="/b"><a href="/c">"#);
        assert_eq!(candidates.len(), 3);
    }
}
