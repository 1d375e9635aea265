use url::Url;

/// How a discovered `href` relates to the site being crawled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    /// Empty, anchor-only, script pseudo-link or not a usable web URL.
    Ignored,
    /// Same host as the seed; candidate for the frontier.
    Internal(String),
    /// Any other host.
    External(String),
}

/// The network location used to decide whether a URL is on-site.
///
/// Host plus explicit port; default ports are elided by the `url` crate, so
/// `https://example.com:443/` and `https://example.com/` share an authority.
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Classify a raw `href` found on `source` against the crawl's base domain.
pub fn classify(raw_href: &str, source: &Url, base_domain: &str) -> LinkClass {
    let href = raw_href.trim();
    if href.is_empty() || href.starts_with("javascript:") || href.starts_with('#') {
        return LinkClass::Ignored;
    }

    let Ok(mut resolved) = source.join(href) else {
        return LinkClass::Ignored;
    };

    if !matches!(resolved.scheme(), "http" | "https") {
        return LinkClass::Ignored;
    }

    // Remove fragment
    resolved.set_fragment(None);

    match authority(&resolved) {
        Some(host) if host == base_domain => LinkClass::Internal(resolved.to_string()),
        Some(_) => LinkClass::External(resolved.to_string()),
        None => LinkClass::Ignored,
    }
}
