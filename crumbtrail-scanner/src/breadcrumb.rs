//! Breadcrumb recovery from parsed HTML.
//!
//! Sites mark up breadcrumbs in many ways, so extraction is a fixed list of
//! heuristics tried in order. Each one is total: it either yields labels or
//! an empty list, and the first non-empty result wins. Nothing is merged
//! across heuristics and labels are returned verbatim, duplicates included.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Glyphs sites commonly place between breadcrumb items.
const SEPARATORS: [&str; 4] = [">", "/", "»", "›"];

static NAV: LazyLock<Selector> = LazyLock::new(|| selector("nav"));
static LIST: LazyLock<Selector> = LazyLock::new(|| selector("ol, ul"));
static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("li"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static INLINE: LazyLock<Selector> = LazyLock::new(|| selector("a, span"));
static SCHEMA_LIST: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        r#"[itemtype="http://schema.org/BreadcrumbList"], [itemtype="https://schema.org/BreadcrumbList"]"#,
    )
});
static SCHEMA_NAME: LazyLock<Selector> = LazyLock::new(|| selector(r#"[itemprop="name"]"#));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

type Strategy = fn(&Html) -> Vec<String>;

/// Heuristics in priority order.
const STRATEGIES: [Strategy; 3] = [from_nav, from_list, from_schema_org];

/// Recover the breadcrumb trail of a page, or `None` if no heuristic matched.
pub fn extract_breadcrumb(document: &Html) -> Option<Vec<String>> {
    STRATEGIES
        .iter()
        .map(|strategy| strategy(document))
        .find(|items| !items.is_empty())
}

/// `<nav aria-label="breadcrumb">`, or a `<nav>` with a breadcrumb-ish class.
fn from_nav(document: &Html) -> Vec<String> {
    let nav = document
        .select(&NAV)
        .find(|nav| nav.value().attr("aria-label") == Some("breadcrumb"))
        .or_else(|| document.select(&NAV).find(|nav| has_breadcrumb_class(nav)));

    let Some(nav) = nav else {
        return Vec::new();
    };

    if nav.select(&LIST_ITEM).next().is_some() {
        list_item_labels(nav)
    } else {
        nav.select(&INLINE)
            .map(|element| stripped_text(element))
            .filter(|text| is_label(text))
            .collect()
    }
}

/// First `<ol>`/`<ul>` whose class mentions "breadcrumb".
fn from_list(document: &Html) -> Vec<String> {
    document
        .select(&LIST)
        .find(|list| has_breadcrumb_class(list))
        .map(list_item_labels)
        .unwrap_or_default()
}

/// schema.org `BreadcrumbList` microdata, every `itemprop="name"` inside.
fn from_schema_org(document: &Html) -> Vec<String> {
    document
        .select(&SCHEMA_LIST)
        .flat_map(|list| list.select(&SCHEMA_NAME).map(stripped_text))
        .filter(|text| !text.is_empty())
        .collect()
}

fn list_item_labels(container: ElementRef<'_>) -> Vec<String> {
    container
        .select(&LIST_ITEM)
        .map(|item| match item.select(&ANCHOR).next() {
            Some(link) => stripped_text(link),
            None => stripped_text(item),
        })
        .filter(|text| is_label(text))
        .collect()
}

/// Case-insensitive substring match of "breadcrumb" against any class token.
pub fn has_breadcrumb_class(element: &ElementRef<'_>) -> bool {
    element.value().attr("class").is_some_and(|classes| {
        classes
            .split_whitespace()
            .any(|token| token.to_lowercase().contains("breadcrumb"))
    })
}

fn is_label(text: &str) -> bool {
    !text.is_empty() && !SEPARATORS.contains(&text)
}

/// Descendant text nodes, each trimmed, concatenated.
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
