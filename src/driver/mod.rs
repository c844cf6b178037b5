//! Crawl driver - the fetch-driven control loop
//!
//! The driver owns the session and holds the frontier, sniffer, and
//! extraction pipeline for the session's lifetime. Scheduling is
//! single-flight: at most one fetch is in progress at any time, and the
//! loop suspends only at the fetch boundary. A failed fetch is swallowed
//! and the loop simply advances; the only way the driver stops is via the
//! frontier's bounds or frontier exhaustion.

mod sink;
mod transport;

pub use sink::{MemorySink, RecordSink, StdoutSink};
pub use transport::{FetchError, FetchTransport, FetchedPage, HttpTransport};

use crate::extract::Pipeline;
use crate::frontier::{CrawlSession, Frontier};
use crate::sniff::Sniffer;
use crate::CrawlError;
use std::time::Duration;
use url::Url;

/// How often the loop logs progress, in crawled links
const PROGRESS_INTERVAL: u64 = 10;

/// Driver lifecycle; `Stopped` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Stopped,
}

impl DriverState {
    fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }
}

/// What a finished crawl session amounted to
#[derive(Debug)]
pub struct CrawlSummary {
    pub links_crawled: u64,
    pub records_emitted: u64,
    /// Links still queued when a bound stopped the crawl
    pub frontier_remainder: usize,
    pub elapsed: Duration,
}

/// Single-session crawl driver
pub struct Driver<T, S> {
    frontier: Frontier,
    sniffer: Sniffer,
    pipeline: Pipeline,
    transport: T,
    sink: S,
    state: DriverState,
}

impl<T: FetchTransport, S: RecordSink> Driver<T, S> {
    pub fn new(
        frontier: Frontier,
        sniffer: Sniffer,
        pipeline: Pipeline,
        transport: T,
        sink: S,
    ) -> Self {
        Self {
            frontier,
            sniffer,
            pipeline,
            transport,
            sink,
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs a crawl session from the seed until a stop condition is met.
    ///
    /// Errors with `InvalidState` when called on a driver that is not
    /// idle; a driver runs exactly one session.
    pub async fn start(&mut self, seed: Url) -> Result<CrawlSummary, CrawlError> {
        if self.state != DriverState::Idle {
            return Err(CrawlError::InvalidState {
                expected: "idle",
                actual: self.state.name(),
            });
        }
        self.state = DriverState::Running;

        let mut session = CrawlSession::begin();
        let mut records_emitted = 0u64;

        tracing::info!(%seed, "starting crawl session");
        self.frontier.enqueue(seed, 0);

        while self.frontier.should_continue(&session) {
            let Some(link) = self.frontier.dequeue_next() else {
                break;
            };
            session.links_crawled += 1;

            let timeout = self.frontier.limits().max_fetch_time;
            match self.transport.fetch(&link.url, timeout).await {
                Ok(page) => {
                    let mime = self.sniffer.sniff(&page.body);
                    tracing::debug!(
                        url = %link.url,
                        mime = mime.unwrap_or("unknown"),
                        bytes = page.body.len(),
                        "fetched"
                    );

                    let extracted =
                        self.pipeline
                            .run(mime, &page.body, &page.final_url, link.depth);
                    for record in &extracted.records {
                        self.sink.emit(record);
                        records_emitted += 1;
                    }
                    for discovered in extracted.links {
                        self.frontier.enqueue(discovered.url, discovered.depth);
                    }
                }
                Err(error) => {
                    // No retry, no failure record; just move on
                    tracing::debug!(url = %link.url, %error, "fetch failed, skipping");
                }
            }

            if session.links_crawled % PROGRESS_INTERVAL == 0 {
                let elapsed = session.started_at.elapsed();
                let rate = session.links_crawled as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    crawled = session.links_crawled,
                    queued = self.frontier.len(),
                    "progress: {:.2} links/sec",
                    rate
                );
            }
        }

        self.state = DriverState::Stopped;

        let summary = CrawlSummary {
            links_crawled: session.links_crawled,
            records_emitted,
            frontier_remainder: self.frontier.len(),
            elapsed: session.started_at.elapsed(),
        };
        tracing::info!(
            crawled = summary.links_crawled,
            emitted = summary.records_emitted,
            remaining = summary.frontier_remainder,
            "crawl session finished in {:?}",
            summary.elapsed
        );

        Ok(summary)
    }
}
