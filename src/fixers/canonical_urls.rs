use url::{ParseError, Url};

use crate::domain::{FeedInfo, ParsedDocument};
use crate::fixers::traits::Fixer;

/// Makes entry links and images absolute, relative to the feed URL.
#[derive(Debug, Default)]
pub struct CanonicalUrls;

impl CanonicalUrls {
    pub fn new() -> Self {
        Self
    }

    fn build_url(base: &str, partial: &str) -> String {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            partial.trim_start_matches('/')
        )
    }

    /// Resolve `url` against `base`.
    ///
    /// - `/path` is appended to `base`, trailing and leading slashes collapsed into one.
    /// - `//host/path` takes the scheme of `base`.
    /// - `path/without/scheme` is appended like `/path`, but only when `base` is
    ///   itself absolute, so that a second pass never rewrites the result.
    /// - Absolute URLs, fragments and query-only references pass through.
    pub fn as_canonical(base: &str, url: &str) -> String {
        let absolute_base = Url::parse(base).ok();

        if url.starts_with("//") {
            return match absolute_base {
                Some(base) => format!("{}:{}", base.scheme(), url),
                None => url.to_string(),
            };
        }

        if url.starts_with('/') {
            return Self::build_url(base, url);
        }

        if url.is_empty() || url.starts_with('#') || url.starts_with('?') {
            return url.to_string();
        }

        match Url::parse(url) {
            Err(ParseError::RelativeUrlWithoutBase) if absolute_base.is_some() => {
                Self::build_url(base, url)
            }
            _ => url.to_string(),
        }
    }
}

impl Fixer for CanonicalUrls {
    fn name(&self) -> &'static str {
        "canonical-urls"
    }

    fn fix(&self, document: &mut ParsedDocument, feed: &FeedInfo) {
        if document.link.is_empty() {
            document.link = feed.url.clone();
        }

        for entry in &mut document.entries {
            entry.link = Self::as_canonical(&feed.url, &entry.link);
            if let Some(image) = entry.image.as_mut() {
                *image = Self::as_canonical(&feed.url, image);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParsedEntry;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://example.com/feed/";

    fn feed() -> FeedInfo {
        FeedInfo::new(BASE, "Example")
    }

    #[test]
    fn test_leading_slash_joined_with_single_slash() {
        assert_eq!(
            CanonicalUrls::as_canonical(BASE, "/a1"),
            "https://example.com/feed/a1"
        );
        assert_eq!(
            CanonicalUrls::as_canonical("https://example.com", "/a1"),
            "https://example.com/a1"
        );
    }

    #[test]
    fn test_absolute_urls_untouched() {
        for url in [
            "https://other.org/x",
            "http://example.com/feed/a1",
            "mailto:someone@example.com",
            "#top",
            "",
        ] {
            assert_eq!(CanonicalUrls::as_canonical(BASE, url), url);
        }
    }

    #[test]
    fn test_protocol_relative_takes_base_scheme() {
        assert_eq!(
            CanonicalUrls::as_canonical(BASE, "//cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_scheme_less_relative_path() {
        assert_eq!(
            CanonicalUrls::as_canonical(BASE, "images/a.png"),
            "https://example.com/feed/images/a.png"
        );
        // Without an absolute base there is nothing sensible to resolve against.
        assert_eq!(
            CanonicalUrls::as_canonical("example.com", "images/a.png"),
            "images/a.png"
        );
    }

    #[test]
    fn test_fix_fills_link_and_rewrites_entries() {
        let mut document = ParsedDocument {
            entries: vec![
                ParsedEntry::new("/a1").with_image(Some("/img/1.jpg".to_string())),
                ParsedEntry::new("https://other.org/2"),
            ],
            ..Default::default()
        };

        CanonicalUrls::new().fix(&mut document, &feed());

        assert_eq!(document.link, BASE);
        assert_eq!(document.entries[0].link, "https://example.com/feed/a1");
        assert_eq!(
            document.entries[0].image.as_deref(),
            Some("https://example.com/feed/img/1.jpg")
        );
        assert_eq!(document.entries[1].link, "https://other.org/2");
        assert_eq!(document.entries[1].image, None);
    }

    #[test]
    fn test_page_canonical_link_kept() {
        let mut document = ParsedDocument {
            link: "https://example.com/news".to_string(),
            ..Default::default()
        };

        CanonicalUrls::new().fix(&mut document, &feed());
        assert_eq!(document.link, "https://example.com/news");
    }

    #[test]
    fn test_fix_is_idempotent() {
        let mut once = ParsedDocument {
            entries: vec![
                ParsedEntry::new("/a1").with_image(Some("//cdn.example.com/1.jpg".to_string())),
                ParsedEntry::new("relative/2").with_image(Some("img/2.jpg".to_string())),
                ParsedEntry::new("https://other.org/3"),
            ],
            ..Default::default()
        };
        CanonicalUrls::new().fix(&mut once, &feed());

        let mut twice = once.clone();
        CanonicalUrls::new().fix(&mut twice, &feed());

        assert_eq!(once, twice);
    }
}
