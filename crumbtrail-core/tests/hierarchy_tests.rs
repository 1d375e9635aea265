// Tests for hierarchy reconciliation

use crumbtrail_core::hierarchy::{
    DepthMatch, HierarchyKind, build_hierarchy_tree, compare_hierarchies, compare_page,
    flatten_hierarchy, render_tree,
};
use crumbtrail_scanner::PageRecord;

fn page(url: &str, title: &str, breadcrumb: Option<&[&str]>, hierarchy: &[&str]) -> PageRecord {
    PageRecord::new(
        url.to_string(),
        title.to_string(),
        String::new(),
        String::new(),
        breadcrumb.map(|b| b.iter().map(|s| s.to_string()).collect()),
        hierarchy.iter().map(|s| s.to_string()).collect(),
    )
}

fn sample_pages() -> Vec<PageRecord> {
    vec![
        page("https://example.com/", "ホーム", Some(&["ホーム"]), &["/"]),
        page(
            "https://example.com/products/",
            "製品",
            Some(&["ホーム", "製品"]),
            &["/", "products"],
        ),
        page(
            "https://example.com/products/electronics/",
            "電子機器",
            Some(&["ホーム", "製品", "電子機器"]),
            &["/", "products", "electronics"],
        ),
        page("https://example.com/about", "About", None, &["/", "about"]),
    ]
}

// ============================================================================
// Hierarchy Kind Tests
// ============================================================================

#[test]
fn test_hierarchy_kind_from_str() {
    assert_eq!(HierarchyKind::from_str("url"), Some(HierarchyKind::Url));
    assert_eq!(
        HierarchyKind::from_str("Breadcrumb"),
        Some(HierarchyKind::Breadcrumb)
    );
    assert_eq!(
        HierarchyKind::from_str("crumb"),
        Some(HierarchyKind::Breadcrumb)
    );
    assert_eq!(HierarchyKind::from_str("sitemap"), None);
}

#[test]
fn test_hierarchy_kind_skips_empty_breadcrumb() {
    let mut record = page("https://example.com/x", "X", Some(&[]), &["/", "x"]);
    assert!(HierarchyKind::Breadcrumb.of(&record).is_none());
    record.breadcrumb = Some(vec!["Home".to_string()]);
    assert_eq!(
        HierarchyKind::Breadcrumb.of(&record),
        Some(&["Home".to_string()][..])
    );
}

// ============================================================================
// Tree Build Tests
// ============================================================================

#[test]
fn test_build_url_tree() {
    let tree = build_hierarchy_tree(&sample_pages(), HierarchyKind::Url);

    assert_eq!(tree.roots.len(), 1);
    let root = tree.root("/").unwrap();
    assert_eq!(root.pages.len(), 4);

    let labels: Vec<&str> = root.children.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["products", "about"]);

    let electronics = tree.node_at(&["/", "products", "electronics"]).unwrap();
    assert_eq!(electronics.pages.len(), 1);
    assert_eq!(
        electronics.pages[0].url,
        "https://example.com/products/electronics/"
    );
    assert_eq!(electronics.pages[0].depth, 2);
}

#[test]
fn test_build_breadcrumb_tree_skips_pages_without_breadcrumb() {
    let tree = build_hierarchy_tree(&sample_pages(), HierarchyKind::Breadcrumb);

    let home = tree.root("ホーム").unwrap();
    assert_eq!(home.pages.len(), 3);
    assert!(home.pages.iter().all(|p| p.url != "https://example.com/about"));

    let products = tree.node_at(&["ホーム", "製品"]).unwrap();
    assert_eq!(products.pages.len(), 2);
    assert!(tree.node_at(&["ホーム", "製品", "電子機器"]).is_some());
}

#[test]
fn test_build_tree_records_page_at_every_level() {
    let tree = build_hierarchy_tree(&sample_pages(), HierarchyKind::Url);
    let deep = "https://example.com/products/electronics/";

    for path in [
        &["/"][..],
        &["/", "products"][..],
        &["/", "products", "electronics"][..],
    ] {
        let node = tree.node_at(path).unwrap();
        let entry = node.pages.iter().find(|p| p.url == deep).unwrap();
        assert_eq!(entry.depth, path.len() - 1);
        assert_eq!(entry.title, "電子機器");
    }
}

#[test]
fn test_build_tree_order_independent() {
    let pages = sample_pages();
    let mut reversed = pages.clone();
    reversed.reverse();

    let forward = build_hierarchy_tree(&pages, HierarchyKind::Url);
    let backward = build_hierarchy_tree(&reversed, HierarchyKind::Url);

    for path in [
        &["/"][..],
        &["/", "products"][..],
        &["/", "about"][..],
        &["/", "products", "electronics"][..],
    ] {
        let mut a: Vec<&str> = forward
            .node_at(path)
            .unwrap()
            .pages
            .iter()
            .map(|p| p.url.as_str())
            .collect();
        let mut b: Vec<&str> = backward
            .node_at(path)
            .unwrap()
            .pages
            .iter()
            .map(|p| p.url.as_str())
            .collect();
        a.sort();
        b.sort();
        assert_eq!(a, b, "pages differ at {:?}", path);
    }
}

#[test]
fn test_build_tree_empty_input() {
    assert!(build_hierarchy_tree(&[], HierarchyKind::Url).is_empty());
}

#[test]
fn test_tree_json_shape() {
    let tree = build_hierarchy_tree(&sample_pages(), HierarchyKind::Url);
    let json = serde_json::to_value(&tree).unwrap();

    let root = &json["/"];
    assert_eq!(root["pages"].as_array().unwrap().len(), 4);
    assert_eq!(
        root["children"]["products"]["children"]["electronics"]["pages"][0]["title"],
        "電子機器"
    );
    assert_eq!(root["children"]["about"]["pages"][0]["depth"], 1);
}

// ============================================================================
// Comparison Tests
// ============================================================================

#[test]
fn test_compare_match_and_not_applicable() {
    let rows = compare_hierarchies(&sample_pages());

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].depth_match, DepthMatch::Match);
    assert_eq!(rows[2].breadcrumb_hierarchy, "ホーム > 製品 > 電子機器");
    assert_eq!(rows[2].url_hierarchy, "/ > products > electronics");

    let about = &rows[3];
    assert!(!about.has_breadcrumb);
    assert_eq!(about.depth_match, DepthMatch::NotApplicable);
    assert_eq!(about.breadcrumb_hierarchy, "");
    assert_eq!(about.breadcrumb_depth, 0);
}

#[test]
fn test_compare_mismatch() {
    let row = compare_page(&page(
        "https://example.com/a/b/c",
        "C",
        Some(&["Home", "C"]),
        &["/", "a", "b", "c"],
    ));
    assert_eq!(row.depth_match, DepthMatch::Mismatch);
    assert_eq!(row.depth_match.as_bool(), Some(false));
    assert_eq!(row.url_depth, 4);
    assert_eq!(row.breadcrumb_depth, 2);
}

#[test]
fn test_compare_not_applicable_iff_no_breadcrumb() {
    for record in sample_pages() {
        let row = compare_page(&record);
        assert_eq!(
            row.depth_match == DepthMatch::NotApplicable,
            !row.has_breadcrumb
        );
    }
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_render_url_tree() {
    let tree = build_hierarchy_tree(&sample_pages(), HierarchyKind::Url);
    let expected = [
        "└── / (4)",
        "    ├── products (2)",
        "    │   └── electronics (1)",
        "    └── about (1)",
    ]
    .join("\n");
    assert_eq!(render_tree(&tree, None), expected);
}

#[test]
fn test_render_tree_max_depth() {
    let tree = build_hierarchy_tree(&sample_pages(), HierarchyKind::Url);
    let expected = ["└── / (4)", "    ├── products (2)", "    └── about (1)"].join("\n");
    assert_eq!(render_tree(&tree, Some(2)), expected);
    assert_eq!(render_tree(&tree, Some(0)), "");
}

#[test]
fn test_render_multiple_roots() {
    let pages = vec![
        page("https://example.com/a", "A", Some(&["Shop", "A"]), &["/", "a"]),
        page("https://example.com/b", "B", Some(&["Blog"]), &["/", "b"]),
    ];
    let tree = build_hierarchy_tree(&pages, HierarchyKind::Breadcrumb);
    let expected = ["├── Shop (1)", "│   └── A (1)", "└── Blog (1)"].join("\n");
    assert_eq!(render_tree(&tree, None), expected);
}

// ============================================================================
// Flattening Tests
// ============================================================================

#[test]
fn test_flatten_url_hierarchy() {
    let levels = flatten_hierarchy(&sample_pages(), HierarchyKind::Url);
    let summary: Vec<(usize, &str, usize)> = levels
        .iter()
        .map(|l| (l.level, l.path.as_str(), l.pages.len()))
        .collect();

    assert_eq!(
        summary,
        vec![
            (0, "/", 4),
            (1, "/ > about", 1),
            (1, "/ > products", 2),
            (2, "/ > products > electronics", 1),
        ]
    );
}

#[test]
fn test_flatten_breadcrumb_hierarchy() {
    let levels = flatten_hierarchy(&sample_pages(), HierarchyKind::Breadcrumb);
    assert_eq!(levels.len(), 3);
    assert_eq!(levels[0].path, "ホーム");
    assert_eq!(levels[2].path, "ホーム > 製品 > 電子機器");
    assert_eq!(levels[2].pages[0].title, "電子機器");
}
