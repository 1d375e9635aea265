use serde::{Deserialize, Serialize};

/// Title recorded for pages without a `<title>` element.
pub const NO_TITLE: &str = "No Title";

/// Metadata gathered for one successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub keywords: String,
    pub description: String,
    pub breadcrumb: Option<Vec<String>>,
    pub breadcrumb_depth: usize,
    pub url_hierarchy: Vec<String>,
    pub url_depth: usize,
    #[serde(default)]
    pub notes: String,
}

impl PageRecord {
    pub fn new(
        url: String,
        title: String,
        keywords: String,
        description: String,
        breadcrumb: Option<Vec<String>>,
        url_hierarchy: Vec<String>,
    ) -> Self {
        let breadcrumb_depth = breadcrumb.as_ref().map_or(0, Vec::len);
        let url_depth = url_hierarchy.len();
        Self {
            url,
            title,
            keywords,
            description,
            breadcrumb,
            breadcrumb_depth,
            url_hierarchy,
            url_depth,
            notes: String::new(),
        }
    }

    pub fn has_breadcrumb(&self) -> bool {
        self.breadcrumb.as_ref().is_some_and(|b| !b.is_empty())
    }
}

/// A link target together with the page it was found on.
///
/// Used both for external links and for broken links (where `target_url` is
/// the page that failed to load and `source_url` the page that linked to it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub target_url: String,
    pub source_url: String,
}

impl LinkRecord {
    pub fn new(target_url: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            source_url: source_url.into(),
        }
    }
}

/// Everything a finished crawl produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlOutput {
    pub pages: Vec<PageRecord>,
    pub external_links: Vec<LinkRecord>,
    pub broken_links: Vec<LinkRecord>,
}

/// Running totals handed to the progress callback after each finished task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlProgress {
    pub pages: usize,
    pub visited: usize,
    pub broken: usize,
    pub external: usize,
    pub in_flight: usize,
    pub pending: usize,
}
