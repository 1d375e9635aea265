// Report and export generation from crawl output

use crate::crawl::generate_crawl_report;
use crate::error::{ReportError, Result};
use crate::hierarchy::{
    HierarchyKind, PATH_SEPARATOR, build_hierarchy_tree, compare_hierarchies, render_tree,
};
use chrono::Local;
use crumbtrail_scanner::result::{CrawlOutput, LinkRecord, PageRecord};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }
}

/// Which link collection a link export holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    External,
    Broken,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::External => "external",
            LinkKind::Broken => "broken",
        }
    }
}

pub const PAGE_COLUMNS: [&str; 9] = [
    "url",
    "title",
    "keywords",
    "description",
    "breadcrumb",
    "breadcrumb_depth",
    "url_hierarchy",
    "url_depth",
    "notes",
];

pub const LINK_COLUMNS: [&str; 2] = ["link_url", "source_url"];

pub const COMPARISON_COLUMNS: [&str; 8] = [
    "url",
    "title",
    "url_hierarchy",
    "breadcrumb_hierarchy",
    "url_depth",
    "breadcrumb_depth",
    "depth_match",
    "has_breadcrumb",
];

/// `<prefix>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn timestamped_filename(prefix: &str, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        prefix,
        Local::now().format("%Y%m%d_%H%M%S"),
        extension
    )
}

fn output_path(
    dir: &Path,
    filename: Option<&str>,
    prefix: &str,
    extension: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    Ok(dir.join(
        filename
            .map(str::to_string)
            .unwrap_or_else(|| timestamped_filename(prefix, extension)),
    ))
}

/// Written ahead of every CSV export.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn csv_writer(path: &Path) -> Result<csv::Writer<File>> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;
    Ok(csv::Writer::from_writer(file))
}

/// Write the page table. Returns `None` when there is nothing to write.
pub fn export_pages_csv(
    pages: &[PageRecord],
    dir: &Path,
    filename: Option<&str>,
) -> Result<Option<PathBuf>> {
    if pages.is_empty() {
        warn!("No pages to export");
        return Ok(None);
    }

    let path = output_path(dir, filename, "pages", "csv")?;
    let mut writer = csv_writer(&path)?;
    writer.write_record(PAGE_COLUMNS)?;
    for page in pages {
        let breadcrumb = page
            .breadcrumb
            .as_ref()
            .map(|b| b.join(PATH_SEPARATOR))
            .unwrap_or_default();
        let breadcrumb_depth = page.breadcrumb_depth.to_string();
        let url_hierarchy = page.url_hierarchy.join(PATH_SEPARATOR);
        let url_depth = page.url_depth.to_string();
        writer.write_record([
            page.url.as_str(),
            page.title.as_str(),
            page.keywords.as_str(),
            page.description.as_str(),
            breadcrumb.as_str(),
            breadcrumb_depth.as_str(),
            url_hierarchy.as_str(),
            url_depth.as_str(),
            page.notes.as_str(),
        ])?;
    }
    writer.flush()?;

    info!("Exported {} pages to {}", pages.len(), path.display());
    Ok(Some(path))
}

pub fn export_links_csv(
    links: &[LinkRecord],
    dir: &Path,
    filename: Option<&str>,
    kind: LinkKind,
) -> Result<Option<PathBuf>> {
    if links.is_empty() {
        warn!("No {} links to export", kind.as_str());
        return Ok(None);
    }

    let prefix = format!("{}_links", kind.as_str());
    let path = output_path(dir, filename, &prefix, "csv")?;
    let mut writer = csv_writer(&path)?;
    writer.write_record(LINK_COLUMNS)?;
    for link in links {
        writer.write_record([link.target_url.as_str(), link.source_url.as_str()])?;
    }
    writer.flush()?;

    info!(
        "Exported {} {} links to {}",
        links.len(),
        kind.as_str(),
        path.display()
    );
    Ok(Some(path))
}

pub fn export_comparison_csv(
    pages: &[PageRecord],
    dir: &Path,
    filename: Option<&str>,
) -> Result<Option<PathBuf>> {
    if pages.is_empty() {
        warn!("No pages to compare");
        return Ok(None);
    }

    let path = output_path(dir, filename, "hierarchy_comparison", "csv")?;
    let mut writer = csv_writer(&path)?;
    writer.write_record(COMPARISON_COLUMNS)?;
    for row in compare_hierarchies(pages) {
        let depth_match = row
            .depth_match
            .as_bool()
            .map(|m| m.to_string())
            .unwrap_or_default();
        writer.write_record([
            row.url,
            row.title,
            row.url_hierarchy,
            row.breadcrumb_hierarchy,
            row.url_depth.to_string(),
            row.breadcrumb_depth.to_string(),
            depth_match,
            row.has_breadcrumb.to_string(),
        ])?;
    }
    writer.flush()?;

    info!("Exported hierarchy comparison to {}", path.display());
    Ok(Some(path))
}

pub fn export_tree_json(
    pages: &[PageRecord],
    dir: &Path,
    filename: Option<&str>,
    kind: HierarchyKind,
) -> Result<Option<PathBuf>> {
    let tree = build_hierarchy_tree(pages, kind);
    if tree.is_empty() {
        warn!("No {} hierarchy to export", kind);
        return Ok(None);
    }

    let prefix = format!("{}_hierarchy", kind);
    let path = output_path(dir, filename, &prefix, "json")?;
    save_report(&serde_json::to_string_pretty(&tree)?, &path)?;

    info!("Exported {} hierarchy tree to {}", kind, path.display());
    Ok(Some(path))
}

pub fn generate_tree_report(
    pages: &[PageRecord],
    kind: HierarchyKind,
    max_depth: Option<usize>,
) -> String {
    let tree = build_hierarchy_tree(pages, kind);
    let title = match kind {
        HierarchyKind::Url => "URL HIERARCHY TREE",
        HierarchyKind::Breadcrumb => "BREADCRUMB HIERARCHY TREE",
    };

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str(title);
    report.push('\n');
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    if tree.is_empty() {
        report.push_str("  (empty)\n");
    } else {
        report.push_str(&render_tree(&tree, max_depth));
        report.push('\n');
    }
    report
}

pub fn export_tree_text(
    pages: &[PageRecord],
    dir: &Path,
    filename: Option<&str>,
    kind: HierarchyKind,
) -> Result<Option<PathBuf>> {
    if !pages.iter().any(|page| kind.of(page).is_some()) {
        warn!("No {} hierarchy to export", kind);
        return Ok(None);
    }

    let prefix = format!("{}_hierarchy", kind);
    let path = output_path(dir, filename, &prefix, "txt")?;
    save_report(&generate_tree_report(pages, kind, None), &path)?;
    info!("Exported {} hierarchy text to {}", kind, path.display());
    Ok(Some(path))
}

/// Page records as JSON, readable again with [`load_pages_json`].
pub fn export_pages_json(
    pages: &[PageRecord],
    dir: &Path,
    filename: Option<&str>,
) -> Result<Option<PathBuf>> {
    if pages.is_empty() {
        warn!("No pages to export");
        return Ok(None);
    }

    let path = output_path(dir, filename, "pages", "json")?;
    save_report(&serde_json::to_string_pretty(pages)?, &path)?;
    info!("Exported {} pages to {}", pages.len(), path.display());
    Ok(Some(path))
}

pub fn load_pages_json(path: &Path) -> Result<Vec<PageRecord>> {
    let content = fs::read_to_string(path)?;
    let pages: Vec<PageRecord> = serde_json::from_str(&content)?;
    Ok(pages)
}

/// Write every export for `format` into `dir` and return the files created.
pub fn write_crawl_exports(
    output: &CrawlOutput,
    dir: &Path,
    format: ReportFormat,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    match format {
        ReportFormat::Csv => {
            written.extend(export_pages_csv(&output.pages, dir, None)?);
            written.extend(export_links_csv(
                &output.external_links,
                dir,
                None,
                LinkKind::External,
            )?);
            written.extend(export_links_csv(
                &output.broken_links,
                dir,
                None,
                LinkKind::Broken,
            )?);
            written.extend(export_comparison_csv(&output.pages, dir, None)?);
        }
        ReportFormat::Json => {
            written.extend(export_pages_json(&output.pages, dir, None)?);
            let path = output_path(dir, None, "links", "json")?;
            let links = serde_json::json!({
                "external_links": output.external_links,
                "broken_links": output.broken_links,
            });
            save_report(&serde_json::to_string_pretty(&links)?, &path)?;
            written.push(path);
            for kind in [HierarchyKind::Url, HierarchyKind::Breadcrumb] {
                written.extend(export_tree_json(&output.pages, dir, None, kind)?);
            }
        }
        ReportFormat::Text => {
            let path = output_path(dir, None, "crawl_report", "txt")?;
            save_report(&generate_crawl_report(output, false), &path)?;
            written.push(path);
            for kind in [HierarchyKind::Url, HierarchyKind::Breadcrumb] {
                written.extend(export_tree_text(&output.pages, dir, None, kind)?);
            }
        }
    }

    if written.is_empty() {
        return Err(ReportError::NothingToExport);
    }
    Ok(written)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamped_filename_shape() {
        let name = timestamped_filename("pages", "csv");
        assert!(name.starts_with("pages_"));
        assert!(name.ends_with(".csv"));
        // pages_ + 8 date digits + _ + 6 time digits + .csv
        assert_eq!(name.len(), "pages_".len() + 15 + ".csv".len());
    }
}
