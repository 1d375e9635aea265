use crate::analyzer::{Outcome, analyze};
use crate::error::{Result, ScanError};
use crate::fetch::{DEFAULT_USER_AGENT, Fetcher, HttpFetcher};
use crate::frontier::{Admission, Frontier, FrontierEntry};
use crate::links::authority;
use crate::result::{CrawlOutput, CrawlProgress, LinkRecord};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(CrawlProgress) + Send + Sync>;

/// Tunables for a single crawl.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Cap on admitted URLs; `None` or `Some(0)` means unbounded.
    pub max_pages: Option<usize>,
    /// Minimum spacing between two dispatches.
    pub delay: Duration,
    /// Upper bound on fetches in flight.
    pub max_workers: usize,
    /// Per-fetch timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            delay: Duration::from_millis(500),
            max_workers: 10,
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Single-site crawler.
///
/// One scheduling loop owns the frontier and the result collections. Fetch
/// and analysis run on spawned tasks whose outcomes are folded back into the
/// results by the loop, so workers never share mutable state.
pub struct Crawler<F: Fetcher = HttpFetcher> {
    fetcher: Arc<F>,
    config: CrawlConfig,
    progress_callback: Option<ProgressCallback>,
    cancel: CancellationToken,
}

impl Crawler<HttpFetcher> {
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.timeout, &config.user_agent)?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: Fetcher> Crawler<F> {
    pub fn with_fetcher(config: CrawlConfig, fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            config,
            progress_callback: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.config.max_workers = max_workers;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Stop dispatching once `token` is cancelled. Fetches already running
    /// finish (or time out) normally.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub async fn crawl(&self, seed_url: &str) -> Result<CrawlOutput> {
        let workers = self.config.max_workers.max(1);
        info!("Starting crawl of {} with {} workers", seed_url, workers);

        let mut seed = Url::parse(seed_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed_url, e)))?;
        if !matches!(seed.scheme(), "http" | "https") {
            return Err(ScanError::InvalidUrl(format!(
                "{}: only http and https are supported",
                seed_url
            )));
        }
        let base_domain = authority(&seed)
            .ok_or_else(|| ScanError::InvalidUrl(format!("{}: URL has no host", seed_url)))?;
        seed.set_fragment(None);
        let seed = seed.to_string();

        let mut frontier = Frontier::new(self.config.max_pages);
        frontier.enqueue(seed.clone(), seed);

        let mut output = CrawlOutput::default();
        // Dispatched-but-unfinished tasks; its length is the in-flight count.
        let mut in_flight: JoinSet<Option<Outcome>> = JoinSet::new();
        let mut accepting = true;
        let mut next_dispatch = Instant::now();

        loop {
            if accepting && self.cancel.is_cancelled() {
                info!("Crawl cancelled, waiting for {} in-flight pages", in_flight.len());
                accepting = false;
            }

            if accepting && in_flight.len() < workers {
                match frontier.next_admission() {
                    Admission::Dispatch(entry) => {
                        tokio::time::sleep_until(next_dispatch).await;
                        self.dispatch(&mut in_flight, entry, &base_domain);
                        next_dispatch = Instant::now() + self.config.delay;
                        continue;
                    }
                    Admission::CapReached => {
                        info!("Page limit reached after {} URLs", frontier.visited_count());
                        accepting = false;
                    }
                    Admission::Empty => {}
                }
            }

            // Pool full, frontier momentarily empty, or no longer accepting:
            // wait for a task to finish. None means nothing is in flight and
            // nothing could be dispatched, so the crawl is complete.
            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            if let Some(outcome) = joined? {
                absorb(outcome, &mut frontier, &mut output);
            }

            if let Some(ref callback) = self.progress_callback {
                callback(CrawlProgress {
                    pages: output.pages.len(),
                    visited: frontier.visited_count(),
                    broken: output.broken_links.len(),
                    external: output.external_links.len(),
                    in_flight: in_flight.len(),
                    pending: frontier.pending_count(),
                });
            }
        }

        info!(
            "Crawl complete. {} pages, {} external links, {} broken links",
            output.pages.len(),
            output.external_links.len(),
            output.broken_links.len()
        );
        Ok(output)
    }

    fn dispatch(
        &self,
        in_flight: &mut JoinSet<Option<Outcome>>,
        entry: FrontierEntry,
        base_domain: &str,
    ) {
        debug!("Dispatching {} (found on {})", entry.url, entry.source_url);
        let fetcher = self.fetcher.clone();
        let cancel = self.cancel.clone();
        let base_domain = base_domain.to_string();
        let timeout = self.config.timeout;

        in_flight.spawn(async move {
            if cancel.is_cancelled() {
                debug!("Skipping {} after cancellation", entry.url);
                return None;
            }
            Some(
                analyze(
                    fetcher.as_ref(),
                    &entry.url,
                    &entry.source_url,
                    &base_domain,
                    timeout,
                )
                .await,
            )
        });
    }
}

/// Fold one finished task into the crawl state.
fn absorb(outcome: Outcome, frontier: &mut Frontier, output: &mut CrawlOutput) {
    match outcome {
        Outcome::Analyzed(analysis) => {
            let source = analysis.record.url.clone();
            for link in analysis.external_links {
                output.external_links.push(LinkRecord::new(link, source.as_str()));
            }
            for link in analysis.internal_links {
                if frontier.enqueue(link.as_str(), source.as_str()) {
                    debug!("Queued {}", link);
                }
            }
            output.pages.push(analysis.record);
        }
        Outcome::Failed { link, reason } => {
            warn!("Crawl error for {}: {}", link.target_url, reason);
            output.broken_links.push(link);
        }
    }
}
