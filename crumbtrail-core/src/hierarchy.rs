//! Reconciliation of URL-path hierarchies with breadcrumb trails.
//!
//! Everything here is a pure function of the finished crawl's page records.

use crumbtrail_scanner::PageRecord;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Separator used when a hierarchy is flattened into a single string.
pub const PATH_SEPARATOR: &str = " > ";

/// Which notion of a page's position to build a tree from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyKind {
    Url,
    Breadcrumb,
}

impl HierarchyKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "url" => Some(HierarchyKind::Url),
            "breadcrumb" | "crumb" => Some(HierarchyKind::Breadcrumb),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HierarchyKind::Url => "url",
            HierarchyKind::Breadcrumb => "breadcrumb",
        }
    }

    /// The page's hierarchy of this kind, if it has a non-empty one.
    pub fn of<'a>(&self, page: &'a PageRecord) -> Option<&'a [String]> {
        let path = match self {
            HierarchyKind::Url => Some(page.url_hierarchy.as_slice()),
            HierarchyKind::Breadcrumb => page.breadcrumb.as_deref(),
        };
        path.filter(|p| !p.is_empty())
    }
}

impl fmt::Display for HierarchyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lightweight reference to a page stored at every node on its path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub url: String,
    pub title: String,
    pub depth: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyNode {
    pub label: String,
    pub pages: Vec<PageRef>,
    /// Children in first-seen order.
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }

    pub fn child(&self, label: &str) -> Option<&HierarchyNode> {
        self.children.iter().find(|c| c.label == label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyTree {
    pub roots: Vec<HierarchyNode>,
}

impl HierarchyTree {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn root(&self, label: &str) -> Option<&HierarchyNode> {
        self.roots.iter().find(|n| n.label == label)
    }

    /// Walk down from the roots following `path`.
    pub fn node_at(&self, path: &[&str]) -> Option<&HierarchyNode> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.root(first)?, |node, label| node.child(label))
    }
}

// Serialized as nested objects keyed by label, children in insertion order:
// {"/": {"pages": [...], "children": {"products": {...}}}}
struct Children<'a>(&'a [HierarchyNode]);

#[derive(Serialize)]
struct NodeBody<'a> {
    pages: &'a [PageRef],
    children: Children<'a>,
}

impl Serialize for Children<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for node in self.0 {
            map.serialize_entry(
                &node.label,
                &NodeBody {
                    pages: &node.pages,
                    children: Children(&node.children),
                },
            )?;
        }
        map.end()
    }
}

impl Serialize for HierarchyTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Children(&self.roots).serialize(serializer)
    }
}

fn child_mut<'a>(children: &'a mut Vec<HierarchyNode>, label: &str) -> &'a mut HierarchyNode {
    let index = match children.iter().position(|c| c.label == label) {
        Some(index) => index,
        None => {
            children.push(HierarchyNode::new(label));
            children.len() - 1
        }
    };
    &mut children[index]
}

/// Build a tree from the chosen hierarchy of every page.
///
/// Pages without that hierarchy are skipped. A page is recorded at each
/// node along its path, not only at its deepest one.
pub fn build_hierarchy_tree(pages: &[PageRecord], kind: HierarchyKind) -> HierarchyTree {
    let mut tree = HierarchyTree::default();

    for page in pages {
        let Some(path) = kind.of(page) else {
            continue;
        };

        let mut level = &mut tree.roots;
        for (depth, label) in path.iter().enumerate() {
            let node = child_mut(level, label);
            node.pages.push(PageRef {
                url: page.url.clone(),
                title: page.title.clone(),
                depth,
            });
            level = &mut node.children;
        }
    }

    tree
}

/// Whether a page's breadcrumb depth agrees with its URL depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthMatch {
    Match,
    Mismatch,
    /// The page has no breadcrumb, so depths were not compared.
    NotApplicable,
}

impl DepthMatch {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DepthMatch::Match => Some(true),
            DepthMatch::Mismatch => Some(false),
            DepthMatch::NotApplicable => None,
        }
    }
}

impl fmt::Display for DepthMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DepthMatch::Match => "match",
            DepthMatch::Mismatch => "mismatch",
            DepthMatch::NotApplicable => "n/a",
        })
    }
}

/// One row of the URL-vs-breadcrumb comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyComparison {
    pub url: String,
    pub title: String,
    pub url_hierarchy: String,
    pub breadcrumb_hierarchy: String,
    pub url_depth: usize,
    pub breadcrumb_depth: usize,
    pub depth_match: DepthMatch,
    pub has_breadcrumb: bool,
}

pub fn compare_page(page: &PageRecord) -> HierarchyComparison {
    let has_breadcrumb = page.has_breadcrumb();
    let depth_match = if !has_breadcrumb {
        DepthMatch::NotApplicable
    } else if page.url_depth == page.breadcrumb_depth {
        DepthMatch::Match
    } else {
        DepthMatch::Mismatch
    };

    HierarchyComparison {
        url: page.url.clone(),
        title: page.title.clone(),
        url_hierarchy: page.url_hierarchy.join(PATH_SEPARATOR),
        breadcrumb_hierarchy: page
            .breadcrumb
            .as_ref()
            .map(|b| b.join(PATH_SEPARATOR))
            .unwrap_or_default(),
        url_depth: page.url_depth,
        breadcrumb_depth: page.breadcrumb_depth,
        depth_match,
        has_breadcrumb,
    }
}

pub fn compare_hierarchies(pages: &[PageRecord]) -> Vec<HierarchyComparison> {
    pages.iter().map(compare_page).collect()
}

/// Render a tree with box-drawing connectors, one `label (page count)` per line.
///
/// `max_depth` limits how many levels are printed; `Some(0)` renders nothing.
pub fn render_tree(tree: &HierarchyTree, max_depth: Option<usize>) -> String {
    let mut lines = Vec::new();
    render_level(&tree.roots, "", 0, max_depth, &mut lines);
    lines.join("\n")
}

fn render_level(
    nodes: &[HierarchyNode],
    prefix: &str,
    depth: usize,
    max_depth: Option<usize>,
    lines: &mut Vec<String>,
) {
    if max_depth.is_some_and(|max| depth >= max) {
        return;
    }

    for (i, node) in nodes.iter().enumerate() {
        let is_last = i + 1 == nodes.len();
        let (branch, continuation) = if is_last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        lines.push(format!(
            "{}{}{} ({})",
            prefix,
            branch,
            node.label,
            node.pages.len()
        ));
        render_level(
            &node.children,
            &format!("{}{}", prefix, continuation),
            depth + 1,
            max_depth,
            lines,
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub url: String,
    pub title: String,
}

/// A unique hierarchy prefix and the pages passing through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyLevel {
    pub level: usize,
    pub path: String,
    pub pages: Vec<PageSummary>,
}

/// List every distinct path prefix once, ordered by depth then path.
pub fn flatten_hierarchy(pages: &[PageRecord], kind: HierarchyKind) -> Vec<HierarchyLevel> {
    let mut by_path: HashMap<String, HierarchyLevel> = HashMap::new();

    for page in pages {
        let Some(path) = kind.of(page) else {
            continue;
        };
        for level in 0..path.len() {
            let key = path[..=level].join(PATH_SEPARATOR);
            by_path
                .entry(key)
                .or_insert_with_key(|key| HierarchyLevel {
                    level,
                    path: key.clone(),
                    pages: Vec::new(),
                })
                .pages
                .push(PageSummary {
                    url: page.url.clone(),
                    title: page.title.clone(),
                });
        }
    }

    let mut levels: Vec<HierarchyLevel> = by_path.into_values().collect();
    levels.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.path.cmp(&b.path)));
    levels
}
