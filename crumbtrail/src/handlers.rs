use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use crumbtrail_core::hierarchy::{
    HierarchyComparison, HierarchyKind, HierarchyLevel, compare_hierarchies, flatten_hierarchy,
};
use crumbtrail_core::report::{
    ReportFormat, generate_tree_report, load_pages_json, write_crawl_exports,
};
use crumbtrail_scanner::CancellationToken;
use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;

// Re-export crawl types and functions from crumbtrail-core
pub use crumbtrail_core::crawl::{
    CrawlOptions, CrawlProgressCallback, execute_crawl, extract_url_path, generate_crawl_report,
};

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    // Try to parse as-is
    if let Ok(url) = Url::parse(line)
        && url.has_host()
    {
        return Some(line.to_string());
    }

    // Try adding http://
    let with_scheme = format!("http://{}", line);
    if let Ok(url) = Url::parse(&with_scheme)
        && url.has_host()
    {
        return Some(with_scheme);
    }

    None
}

/// Expand `~` and environment variables in a user-supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

fn kind_arg(args: &ArgMatches, name: &str) -> Option<HierarchyKind> {
    args.get_one::<String>(name)
        .and_then(|s| HierarchyKind::from_str(s))
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let raw_url = sub_matches
        .get_one::<String>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;
    let url =
        parse_url_line(raw_url).ok_or_else(|| anyhow!("Invalid seed URL '{}'", raw_url))?;

    let mut options = CrawlOptions::new(url);
    if let Some(max_pages) = sub_matches.get_one::<usize>("max-pages") {
        options.max_pages = *max_pages;
    }
    if let Some(delay) = sub_matches.get_one::<f64>("delay") {
        options.delay = *delay;
    }
    if let Some(threads) = sub_matches.get_one::<usize>("threads") {
        options.threads = *threads;
    }
    if let Some(timeout) = sub_matches.get_one::<u64>("timeout") {
        options.timeout_secs = *timeout;
    }
    options.show_progress_bars = !quiet;

    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Csv);
    let output_dir = sub_matches
        .get_one::<String>("output")
        .map(|dir| expand_path(dir));
    let tree = kind_arg(sub_matches, "tree");
    let max_tree_depth = sub_matches.get_one::<usize>("max-tree-depth").copied();

    // Ctrl-C stops dispatching; pages already in flight are still collected
    let cancel = CancellationToken::new();
    options.cancel = Some(cancel.clone());
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping crawl");
            signal_token.cancel();
        }
    });

    if !quiet {
        println!("\n{} Crawling {}", "→".blue().bold(), options.url.bright_white());
        println!("Workers: {}", options.threads);
        println!("Delay: {}s", options.delay);
        match options.max_pages {
            0 => println!("Max pages: unbounded\n"),
            n => println!("Max pages: {}\n", n),
        }
    }

    let output = execute_crawl(options, None)
        .await
        .context("Crawl failed")?;

    if cancel.is_cancelled() {
        println!("{} Crawl interrupted, partial results follow", "⚠".yellow().bold());
    } else {
        println!("\n{} Crawl complete!\n", "✓".green().bold());
    }

    print!("{}", generate_crawl_report(&output, true));

    if let Some(kind) = tree {
        print!("{}", generate_tree_report(&output.pages, kind, max_tree_depth));
    }

    if let Some(dir) = output_dir {
        let written = write_crawl_exports(&output, &dir, format)
            .with_context(|| format!("Failed to write exports to {}", dir.display()))?;
        info!("Wrote {} export files", written.len());
        for path in written {
            println!(
                "{} {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
    }

    Ok(())
}

pub fn handle_hierarchy(sub_matches: &ArgMatches) -> Result<()> {
    let raw_path = sub_matches
        .get_one::<String>("pages")
        .ok_or_else(|| anyhow!("--pages is required"))?;
    let path = expand_path(raw_path);
    let pages = load_pages_json(&path)
        .with_context(|| format!("Failed to read pages from {}", path.display()))?;

    let kind = kind_arg(sub_matches, "kind").unwrap_or(HierarchyKind::Url);
    let max_depth = sub_matches.get_one::<usize>("max-depth").copied();

    if sub_matches.get_flag("compare") {
        print!("{}", format_comparison_table(&compare_hierarchies(&pages)));
    } else if sub_matches.get_flag("flat") {
        print!("{}", format_flat_listing(&flatten_hierarchy(&pages, kind)));
    } else {
        print!("{}", generate_tree_report(&pages, kind, max_depth));
    }

    Ok(())
}

/// One line per page: match marker, both depths, URL, then both hierarchies.
pub fn format_comparison_table(rows: &[HierarchyComparison]) -> String {
    let mut table = String::new();
    for row in rows {
        let marker = match row.depth_match.as_bool() {
            Some(true) => "=".green(),
            Some(false) => "≠".yellow(),
            None => "·".dimmed(),
        };
        table.push_str(&format!(
            "{} [url {} / crumb {}] {}\n",
            marker, row.url_depth, row.breadcrumb_depth, row.url
        ));
        table.push_str(&format!("    url:   {}\n", row.url_hierarchy));
        if row.has_breadcrumb {
            table.push_str(&format!("    crumb: {}\n", row.breadcrumb_hierarchy));
        }
    }
    table
}

pub fn format_flat_listing(levels: &[HierarchyLevel]) -> String {
    let mut listing = String::new();
    for level in levels {
        listing.push_str(&format!(
            "{}{} ({} pages)\n",
            "  ".repeat(level.level),
            level.path,
            level.pages.len()
        ));
    }
    listing
}
