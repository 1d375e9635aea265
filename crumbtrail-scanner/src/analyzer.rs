use crate::breadcrumb::{extract_breadcrumb, stripped_text};
use crate::error::ScanError;
use crate::fetch::Fetcher;
use crate::hierarchy::url_hierarchy;
use crate::links::{LinkClass, classify};
use crate::result::{LinkRecord, NO_TITLE, PageRecord};
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;
use url::Url;

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static KEYWORDS: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[name="keywords"]"#));
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// A parsed page and the links it points at, already classified.
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    pub record: PageRecord,
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
}

/// Result of analyzing one frontier entry.
#[derive(Debug, Clone)]
pub enum Outcome {
    Analyzed(PageAnalysis),
    /// The page could not be loaded; `link` is the broken link to record.
    Failed { link: LinkRecord, reason: String },
}

/// Fetch `url` and analyze it.
///
/// Never returns an error: transport failures, timeouts and non-200
/// responses all come back as [`Outcome::Failed`].
pub async fn analyze<F: Fetcher>(
    fetcher: &F,
    url: &str,
    source_url: &str,
    base_domain: &str,
    timeout: Duration,
) -> Outcome {
    let failed = |reason: String| Outcome::Failed {
        link: LinkRecord::new(url, source_url),
        reason,
    };

    let page = match tokio::time::timeout(timeout, fetcher.fetch(url)).await {
        Ok(Ok(page)) => page,
        Ok(Err(e)) => return failed(e.to_string()),
        Err(_) => return failed(ScanError::Timeout(timeout).to_string()),
    };

    if page.status != 200 {
        return failed(ScanError::BadStatus(page.status).to_string());
    }

    match analyze_document(url, &page.body, base_domain) {
        Ok(analysis) => Outcome::Analyzed(analysis),
        Err(e) => failed(e.to_string()),
    }
}

/// Build a page record from an HTML body and classify its links.
pub fn analyze_document(
    url: &str,
    html: &str,
    base_domain: &str,
) -> crate::error::Result<PageAnalysis> {
    let page_url =
        Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(stripped_text)
        .unwrap_or_else(|| NO_TITLE.to_string());
    let keywords = meta_content(&document, &KEYWORDS);
    let description = meta_content(&document, &DESCRIPTION);

    let record = PageRecord::new(
        url.to_string(),
        title,
        keywords,
        description,
        extract_breadcrumb(&document),
        url_hierarchy(&page_url),
    );

    let mut internal_links = Vec::new();
    let mut external_links = Vec::new();
    for element in document.select(&LINK) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        match classify(href, &page_url, base_domain) {
            LinkClass::Internal(link) => {
                debug!("Found internal link: {}", link);
                internal_links.push(link);
            }
            LinkClass::External(link) => {
                debug!("Found external link: {}", link);
                external_links.push(link);
            }
            LinkClass::Ignored => {}
        }
    }

    Ok(PageAnalysis {
        record,
        internal_links,
        external_links,
    })
}

fn meta_content(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::fetch::FetchedPage;
    use std::collections::HashMap;
    use std::future::Future;

    const SAMPLE: &str = r##"
        <html>
          <head>
            <title>テストページ</title>
            <meta name="description" content="テスト用の説明文">
            <meta name="keywords" content="テスト, クローラー">
          </head>
          <body>
            <nav aria-label="breadcrumb"><ol><li><a href="/">Home</a></li><li>Test</li></ol></nav>
            <a href="https://example.com/page1">ページ1</a>
            <a href="/page2#section">ページ2</a>
            <a href="https://external.com/page">外部リンク</a>
            <a href="javascript:void(0)">noop</a>
            <a href="#top">top</a>
          </body>
        </html>"##;

    struct StubFetcher {
        pages: HashMap<String, FetchedPage>,
    }

    impl StubFetcher {
        fn with(url: &str, status: u16, body: &str) -> Self {
            let mut pages = HashMap::new();
            pages.insert(
                url.to_string(),
                FetchedPage {
                    status,
                    body: body.to_string(),
                },
            );
            Self { pages }
        }
    }

    impl Fetcher for StubFetcher {
        fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage>> + Send {
            let page = self
                .pages
                .get(url)
                .cloned()
                .ok_or_else(|| ScanError::InvalidUrl(url.to_string()));
            async move { page }
        }
    }

    struct SlowFetcher;

    impl Fetcher for SlowFetcher {
        fn fetch(&self, _url: &str) -> impl Future<Output = Result<FetchedPage>> + Send {
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(ScanError::BadStatus(500))
            }
        }
    }

    #[test]
    fn test_document_metadata() {
        let analysis = analyze_document("https://example.com/", SAMPLE, "example.com").unwrap();
        let record = analysis.record;
        assert_eq!(record.url, "https://example.com/");
        assert_eq!(record.title, "テストページ");
        assert_eq!(record.description, "テスト用の説明文");
        assert_eq!(record.keywords, "テスト, クローラー");
        assert_eq!(
            record.breadcrumb,
            Some(vec!["Home".to_string(), "Test".to_string()])
        );
        assert_eq!(record.breadcrumb_depth, 2);
        assert_eq!(record.url_hierarchy, vec!["/"]);
        assert_eq!(record.url_depth, 1);
        assert!(record.notes.is_empty());
    }

    #[test]
    fn test_document_links_are_classified() {
        let analysis = analyze_document("https://example.com/", SAMPLE, "example.com").unwrap();
        assert_eq!(
            analysis.internal_links,
            vec![
                "https://example.com/".to_string(),
                "https://example.com/page1".to_string(),
                "https://example.com/page2".to_string()
            ]
        );
        assert_eq!(
            analysis.external_links,
            vec!["https://external.com/page".to_string()]
        );
    }

    #[test]
    fn test_missing_metadata_uses_sentinels() {
        let analysis =
            analyze_document("https://example.com/a", "<p>bare</p>", "example.com").unwrap();
        assert_eq!(analysis.record.title, NO_TITLE);
        assert_eq!(analysis.record.keywords, "");
        assert_eq!(analysis.record.description, "");
        assert_eq!(analysis.record.breadcrumb, None);
        assert_eq!(analysis.record.breadcrumb_depth, 0);
    }

    #[tokio::test]
    async fn test_non_200_is_failed() {
        let fetcher = StubFetcher::with("https://example.com/gone", 404, "not found");
        let outcome = analyze(
            &fetcher,
            "https://example.com/gone",
            "https://example.com/",
            "example.com",
            Duration::from_secs(5),
        )
        .await;
        match outcome {
            Outcome::Failed { link, reason } => {
                assert_eq!(link.target_url, "https://example.com/gone");
                assert_eq!(link.source_url, "https://example.com/");
                assert!(reason.contains("404"));
            }
            Outcome::Analyzed(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_fetch_error_is_failed() {
        let fetcher = StubFetcher {
            pages: HashMap::new(),
        };
        let outcome = analyze(
            &fetcher,
            "https://example.com/missing",
            "https://example.com/",
            "example.com",
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(outcome, Outcome::Failed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_times_out() {
        let outcome = analyze(
            &SlowFetcher,
            "https://example.com/slow",
            "https://example.com/",
            "example.com",
            Duration::from_secs(1),
        )
        .await;
        match outcome {
            Outcome::Failed { reason, .. } => assert!(reason.contains("timed out")),
            Outcome::Analyzed(_) => panic!("expected timeout"),
        }
    }

    #[tokio::test]
    async fn test_success_is_analyzed() {
        let fetcher = StubFetcher::with("https://example.com/", 200, SAMPLE);
        let outcome = analyze(
            &fetcher,
            "https://example.com/",
            "https://example.com/",
            "example.com",
            Duration::from_secs(5),
        )
        .await;
        match outcome {
            Outcome::Analyzed(analysis) => assert_eq!(analysis.record.title, "テストページ"),
            Outcome::Failed { reason, .. } => panic!("unexpected failure: {}", reason),
        }
    }
}
