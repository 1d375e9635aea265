use url::Url;

/// Marker used as the first element of every URL hierarchy.
pub const ROOT_SEGMENT: &str = "/";

/// Decompose a URL's path into its directory-like segments.
///
/// Always returns at least `["/"]`.
pub fn url_hierarchy(url: &Url) -> Vec<String> {
    hierarchy_from_path(url.path())
}

/// Same as [`url_hierarchy`] but working on a bare path.
pub fn hierarchy_from_path(path: &str) -> Vec<String> {
    let mut hierarchy = vec![ROOT_SEGMENT.to_string()];
    if path.is_empty() || path == ROOT_SEGMENT {
        return hierarchy;
    }

    let path = path.strip_suffix('/').unwrap_or(path);
    hierarchy.extend(
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .map(decode_segment),
    );
    hierarchy
}

/// Percent-decoded label; segments that do not decode to UTF-8 stay as-is.
fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn of(url: &str) -> Vec<String> {
        url_hierarchy(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_root_paths() {
        assert_eq!(of("https://example.com"), vec!["/"]);
        assert_eq!(of("https://example.com/"), vec!["/"]);
        assert_eq!(hierarchy_from_path(""), vec!["/"]);
    }

    #[test]
    fn test_single_segment_with_and_without_trailing_slash() {
        assert_eq!(of("https://example.com/products"), vec!["/", "products"]);
        assert_eq!(of("https://example.com/products/"), vec!["/", "products"]);
    }

    #[test]
    fn test_nested_segments() {
        assert_eq!(
            of("https://example.com/products/electronics/phones"),
            vec!["/", "products", "electronics", "phones"]
        );
    }

    #[test]
    fn test_repeated_slashes_are_collapsed() {
        assert_eq!(
            hierarchy_from_path("//products///phones//"),
            vec!["/", "products", "phones"]
        );
    }

    #[test]
    fn test_query_and_fragment_do_not_matter() {
        assert_eq!(
            of("https://example.com/a/b?page=2#top"),
            vec!["/", "a", "b"]
        );
    }

    #[test]
    fn test_segments_are_percent_decoded() {
        assert_eq!(
            of("https://example.com/製品/電子機器"),
            vec!["/", "製品", "電子機器"]
        );
        assert_eq!(of("https://example.com/a%20b/"), vec!["/", "a b"]);
    }

    #[test]
    fn test_undecodable_segment_kept_encoded() {
        assert_eq!(hierarchy_from_path("/bad%FF/x"), vec!["/", "bad%FF", "x"]);
    }
}
