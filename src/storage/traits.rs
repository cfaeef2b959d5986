use std::time::SystemTime;

use crate::errors::ScrapeResult;

#[cfg_attr(test, mockall::automock)]
pub trait CacheStore: Send + Sync {
    /// Stored bytes for `key`, `ScrapeError::CacheMiss` when absent or expired.
    fn get(&self, key: &str) -> ScrapeResult<Vec<u8>>;
    fn set(&self, key: &str, contents: &[u8]) -> ScrapeResult<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
