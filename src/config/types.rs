use serde::Deserialize;

/// Main configuration structure for skitter
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub limits: LimitsConfig,

    /// User agent string for the HTTP transport
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Ordered content sniffing rules; builtins apply when empty
    #[serde(default)]
    pub sniff: Vec<SniffRuleConfig>,

    /// Ordered priority rules; links score 0 when empty
    #[serde(default)]
    pub priority: Vec<PriorityRuleConfig>,

    /// Per-mime extractor patterns; builtins apply when empty
    #[serde(default)]
    pub extract: ExtractConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: LimitsConfig::default(),
            user_agent: default_user_agent(),
            sniff: Vec::new(),
            priority: Vec::new(),
            extract: ExtractConfig::default(),
        }
    }
}

fn default_user_agent() -> String {
    format!("skitter/{}", env!("CARGO_PKG_VERSION"))
}

/// Crawl resource bounds; zero means unlimited
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum elapsed crawl time in milliseconds
    #[serde(rename = "max-crawl-time", default)]
    pub max_crawl_time: u64,

    /// Maximum link depth from the seed
    #[serde(rename = "max-crawl-depth", default)]
    pub max_crawl_depth: u32,

    /// Maximum number of links fetched
    #[serde(rename = "max-crawled-links", default)]
    pub max_crawled_links: u64,

    /// Per-fetch timeout in milliseconds; always enforced
    #[serde(rename = "max-link-fetch-time", default = "default_fetch_time_ms")]
    pub max_link_fetch_time: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_crawl_time: 0,
            max_crawl_depth: 0,
            max_crawled_links: 0,
            max_link_fetch_time: default_fetch_time_ms(),
        }
    }
}

fn default_fetch_time_ms() -> u64 {
    30_000
}

/// One ordered content sniffing rule
#[derive(Debug, Clone, Deserialize)]
pub struct SniffRuleConfig {
    /// Pattern matched against the first 512 bytes of content
    pub pattern: String,

    /// Mime type assigned on match
    pub mime: String,
}

/// One ordered priority rule
#[derive(Debug, Clone, Deserialize)]
pub struct PriorityRuleConfig {
    /// Pattern matched against the serialized `"<depth> <url>"` link form
    pub pattern: String,

    /// A fixed integer, or one of "++", "--", "drop"
    pub directive: DirectiveConfig,
}

/// Priority directive as written in TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DirectiveConfig {
    Fixed(i32),
    Named(String),
}

/// Extractor pattern tables
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExtractConfig {
    #[serde(default)]
    pub link: Vec<ExtractorConfig>,

    #[serde(default)]
    pub data: Vec<ExtractorConfig>,
}

/// One per-mime extractor pattern; `*/*` registers the wildcard fallback
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    pub mime: String,
    pub pattern: String,
}
