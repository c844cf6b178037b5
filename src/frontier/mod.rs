//! Crawl frontier
//!
//! A priority queue of pending links plus the bookkeeping that governs
//! when crawling stops. Higher priorities are dequeued first; among equal
//! priorities the frontier is FIFO, which keeps discovery order
//! deterministic and fair. The frontier owns the link dedup index and the
//! priority engine, so `enqueue` is idempotent per normalized URL.

use crate::dedup::DedupIndex;
use crate::priority::PriorityEngine;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};
use url::Url;

/// A link pending fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlLink {
    /// Absolute URL; guaranteed to carry a scheme by the time it is
    /// enqueued
    pub url: Url,

    /// Distance from the seed, in link hops
    pub depth: u32,
}

impl CrawlLink {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }

    /// Serialized `"<depth> <url>"` form used for priority rule matching
    pub fn serialize(&self) -> String {
        format!("{} {}", self.depth, self.url)
    }

    /// Reconstructs a link from its serialized form
    pub fn parse(serialized: &str) -> Option<Self> {
        let (depth, url) = serialized.split_once(' ')?;
        Some(Self {
            url: Url::parse(url).ok()?,
            depth: depth.parse().ok()?,
        })
    }
}

/// Resource bounds for a crawl session; zero means unlimited except for
/// `max_fetch_time`, which always bounds a single fetch
#[derive(Debug, Clone)]
pub struct FrontierLimits {
    /// Maximum link depth from the seed
    pub max_depth: u32,

    /// Maximum number of links fetched
    pub max_links: u64,

    /// Maximum elapsed wall-clock time for the whole session
    pub max_crawl_time: Duration,

    /// Per-fetch timeout
    pub max_fetch_time: Duration,
}

impl Default for FrontierLimits {
    fn default() -> Self {
        Self {
            max_depth: 0,
            max_links: 0,
            max_crawl_time: Duration::ZERO,
            max_fetch_time: Duration::from_secs(30),
        }
    }
}

/// Per-session crawl bookkeeping, owned by the driver
#[derive(Debug)]
pub struct CrawlSession {
    pub started_at: Instant,
    pub links_crawled: u64,
}

impl CrawlSession {
    pub fn begin() -> Self {
        Self {
            started_at: Instant::now(),
            links_crawled: 0,
        }
    }
}

/// Heap entry; ordering makes the binary heap pop the highest priority
/// first and the lowest sequence number among equal priorities
#[derive(Debug)]
struct QueuedLink {
    priority: i32,
    seq: u64,
    link: CrawlLink,
}

impl Ord for QueuedLink {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedLink {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedLink {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for QueuedLink {}

/// Priority-ordered frontier of pending links
pub struct Frontier {
    heap: BinaryHeap<QueuedLink>,
    link_index: DedupIndex,
    engine: PriorityEngine,
    limits: FrontierLimits,
    next_seq: u64,
}

impl Frontier {
    pub fn new(limits: FrontierLimits, engine: PriorityEngine) -> Self {
        Self {
            heap: BinaryHeap::new(),
            link_index: DedupIndex::new(),
            engine,
            limits,
            next_seq: 0,
        }
    }

    /// Adds a link to the frontier.
    ///
    /// Silently discards links beyond the depth bound, links whose
    /// normalized URL has already been enqueued, and links a priority rule
    /// says to drop. A dropped link's identity is still marked seen so the
    /// same URL is not re-evaluated on rediscovery.
    pub fn enqueue(&mut self, url: Url, depth: u32) {
        if self.limits.max_depth != 0 && depth > self.limits.max_depth {
            tracing::trace!(%url, depth, "discarding link beyond depth bound");
            return;
        }

        let identity = DedupIndex::digest(url.as_str());
        if self.link_index.seen(&identity) {
            tracing::trace!(%url, "link already seen");
            return;
        }
        self.link_index.mark_seen(identity);

        let link = CrawlLink::new(url, depth);
        let Some(priority) = self.engine.compute(&link.serialize()) else {
            tracing::debug!(url = %link.url, "link dropped by priority rule");
            return;
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueuedLink {
            priority,
            seq,
            link,
        });
    }

    /// Removes and returns the highest-priority link, FIFO among ties
    pub fn dequeue_next(&mut self) -> Option<CrawlLink> {
        self.heap.pop().map(|queued| queued.link)
    }

    /// Whether the crawl should proceed to another fetch
    pub fn should_continue(&self, session: &CrawlSession) -> bool {
        if self.heap.is_empty() {
            return false;
        }
        if self.limits.max_links != 0 && session.links_crawled >= self.limits.max_links {
            tracing::debug!(crawled = session.links_crawled, "link count bound reached");
            return false;
        }
        if !self.limits.max_crawl_time.is_zero()
            && session.started_at.elapsed() >= self.limits.max_crawl_time
        {
            tracing::debug!("elapsed time bound reached");
            return false;
        }
        true
    }

    pub fn limits(&self) -> &FrontierLimits {
        &self.limits
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
