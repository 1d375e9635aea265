use crate::hierarchy::{DepthMatch, compare_hierarchies};
use colored::{ColoredString, Colorize};
use crumbtrail_scanner::result::{CrawlOutput, CrawlProgress};
use crumbtrail_scanner::{CancellationToken, CrawlConfig, Crawler, ScanError};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub url: String,
    /// 0 means unbounded
    pub max_pages: usize,
    /// Seconds between dispatches
    pub delay: f64,
    pub threads: usize,
    pub timeout_secs: u64,
    pub show_progress_bars: bool,
    pub cancel: Option<CancellationToken>,
}

impl CrawlOptions {
    pub fn new(url: impl Into<String>) -> Self {
        let defaults = CrawlConfig::default();
        Self {
            url: url.into(),
            max_pages: 0,
            delay: defaults.delay.as_secs_f64(),
            threads: defaults.max_workers,
            timeout_secs: defaults.timeout.as_secs(),
            show_progress_bars: false,
            cancel: None,
        }
    }

    /// Negative delays count as zero; infinite or out-of-range ones are rejected.
    pub fn to_config(&self) -> Result<CrawlConfig, ScanError> {
        let delay = Duration::try_from_secs_f64(self.delay.max(0.0)).map_err(|e| {
            ScanError::InvalidConfig(format!("delay of {} seconds: {}", self.delay, e))
        })?;
        Ok(CrawlConfig {
            max_pages: (self.max_pages > 0).then_some(self.max_pages),
            delay,
            max_workers: self.threads.max(1),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            ..CrawlConfig::default()
        })
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(CrawlProgress) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Execute a crawl with the given options
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutput, ScanError> {
    let config = options.to_config()?;
    let CrawlOptions {
        url,
        show_progress_bars,
        cancel,
        ..
    } = options;

    // Set up single progress bar for overall crawl progress (only if enabled)
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let internal_progress_callback: crumbtrail_scanner::ProgressCallback =
        Arc::new(move |progress: CrawlProgress| {
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!(
                    "Crawling... {} pages, {} broken, {} in flight, {} queued",
                    progress.pages, progress.broken, progress.in_flight, progress.pending
                ));
            }
            if let Some(ref callback) = progress_callback {
                callback(progress);
            }
        });

    let mut crawler = Crawler::new(config)?.with_progress_callback(internal_progress_callback);
    if let Some(token) = cancel {
        crawler = crawler.with_cancellation(token);
    }

    let result = crawler.crawl(&url).await;

    if let Some(ref pb) = progress_bar {
        match &result {
            Ok(output) => pb.finish_with_message(format!(
                "Crawl complete! {} pages processed",
                output.pages.len()
            )),
            Err(e) => pb.abandon_with_message(format!("Crawl failed: {}", e)),
        }
    }

    result
}

fn paint(text: &str, color: bool, style: fn(&str) -> ColoredString) -> String {
    if color {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// Generate a crawl report from results. `color` adds terminal styling.
pub fn generate_crawl_report(output: &CrawlOutput, color: bool) -> String {
    let comparisons = compare_hierarchies(&output.pages);
    let with_breadcrumb = comparisons.iter().filter(|c| c.has_breadcrumb).count();
    let mismatched = comparisons
        .iter()
        .filter(|c| c.depth_match == DepthMatch::Mismatch)
        .count();

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Pages crawled: {}\n", output.pages.len()));
    report.push_str(&format!("  External links: {}\n", output.external_links.len()));
    report.push_str(&format!("  Broken links: {}\n", output.broken_links.len()));
    report.push_str(&format!("  Pages with breadcrumb: {}\n", with_breadcrumb));
    report.push_str(&format!("  Depth mismatches: {}\n", mismatched));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    if !comparisons.is_empty() {
        report.push_str("## Pages\n");
        for row in &comparisons {
            let marker = match row.depth_match {
                DepthMatch::Match => paint("=", color, |s| s.green()),
                DepthMatch::Mismatch => paint("≠", color, |s| s.yellow()),
                DepthMatch::NotApplicable => paint("·", color, |s| s.bright_black()),
            };
            let depths = format!("[url {} / crumb {}]", row.url_depth, row.breadcrumb_depth);
            report.push_str(&format!(
                "  {} {} {} {}\n",
                marker,
                extract_url_path(&row.url),
                paint(&depths, color, |s| s.bright_black()),
                row.title
            ));
        }
        report.push('\n');
    }

    if !output.broken_links.is_empty() {
        report.push_str("## Broken links\n");
        for link in &output.broken_links {
            let source = format!("(from {})", link.source_url);
            report.push_str(&format!(
                "  {} {} {}\n",
                paint("✗", color, |s| s.red()),
                link.target_url,
                paint(&source, color, |s| s.bright_black())
            ));
        }
        report.push('\n');
    }

    report
}
