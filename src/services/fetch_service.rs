use tracing::Span;

use crate::errors::ScrapeResult;
use crate::sources::PageSource;
use crate::storage::CacheStore;

/// Network fetches short-circuited by the cache.
pub struct FetchService<C: CacheStore, S: PageSource> {
    cache: C,
    source: S,
    span: Span,
}

impl<C: CacheStore, S: PageSource> FetchService<C, S> {
    pub fn new(cache: C, source: S, span: Span) -> Self {
        Self { cache, source, span }
    }

    /// Cached bytes when fresh, otherwise fetch and populate the cache
    pub fn fetch(&self, url: &str) -> ScrapeResult<Vec<u8>> {
        match self.cache.get(url) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.is_cache_miss() => self.fetch_fresh(url),
            Err(e) => Err(e),
        }
    }

    /// Skip the cache read but still store what was fetched
    pub fn fetch_fresh(&self, url: &str) -> ScrapeResult<Vec<u8>> {
        let _enter = self.span.enter();

        let bytes = self.source.fetch(url)?;
        self.cache.set(url, &bytes)?;

        tracing::info!(url, bytes = bytes.len(), "Fetched and cached page");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScrapeError;
    use crate::sources::traits::MockPageSource;
    use crate::storage::traits::MockCacheStore;
    use mockall::predicate::eq;

    const URL: &str = "https://example.com/news/";

    #[test]
    fn test_hit_skips_network() {
        let mut cache = MockCacheStore::new();
        cache
            .expect_get()
            .with(eq(URL))
            .times(1)
            .returning(|_| Ok(b"cached".to_vec()));
        cache.expect_set().never();

        let mut source = MockPageSource::new();
        source.expect_fetch().never();

        let service = FetchService::new(cache, source, Span::none());
        assert_eq!(service.fetch(URL).unwrap(), b"cached");
    }

    #[test]
    fn test_miss_fetches_and_populates() {
        let mut cache = MockCacheStore::new();
        cache
            .expect_get()
            .times(1)
            .returning(|key| Err(ScrapeError::CacheMiss(key.to_string())));
        cache
            .expect_set()
            .withf(|key, contents| key == URL && contents == b"fresh")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut source = MockPageSource::new();
        source
            .expect_fetch()
            .with(eq(URL))
            .times(1)
            .returning(|_| Ok(b"fresh".to_vec()));

        let service = FetchService::new(cache, source, Span::none());
        assert_eq!(service.fetch(URL).unwrap(), b"fresh");
    }

    #[test]
    fn test_cache_io_error_is_not_a_miss() {
        let mut cache = MockCacheStore::new();
        cache.expect_get().returning(|_| {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        });

        let mut source = MockPageSource::new();
        source.expect_fetch().never();

        let service = FetchService::new(cache, source, Span::none());
        assert!(matches!(service.fetch(URL), Err(ScrapeError::Io(_))));
    }

    #[test]
    fn test_failed_store_is_reported() {
        let mut cache = MockCacheStore::new();
        cache.expect_set().returning(|_, _| {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        });

        let mut source = MockPageSource::new();
        source.expect_fetch().returning(|_| Ok(b"fresh".to_vec()));

        let service = FetchService::new(cache, source, Span::none());
        assert!(matches!(service.fetch_fresh(URL), Err(ScrapeError::Io(_))));
    }
}
