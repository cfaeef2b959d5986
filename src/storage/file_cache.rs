use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::Span;

use crate::errors::{ScrapeError, ScrapeResult};
use crate::storage::traits::{CacheStore, Clock, SystemClock};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60 * 2);

/// Byte store on disk, one file per key, sharded by the key's sha256.
///
/// `<root>/a/a8/a87e31...fb22` holds the bytes cached for the key hashing to
/// `a87e31...fb22`. The file's modification time is the record timestamp;
/// records at least `ttl` old read as misses and are left for the next
/// `set` to overwrite.
pub struct FileCache {
    root: PathBuf,
    ttl: Duration,
    clock: Box<dyn Clock>,
    span: Span,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>, ttl: Duration, span: Span) -> Self {
        Self {
            root: root.into(),
            ttl,
            clock: Box::new(SystemClock),
            span,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn digest(key: &str) -> String {
        format!("{:x}", Sha256::digest(key.as_bytes()))
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let digest = Self::digest(key);
        self.root
            .join(&digest[..1])
            .join(&digest[..2])
            .join(&digest)
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> ScrapeResult<Vec<u8>> {
        let _enter = self.span.enter();
        let path = self.path_for(key);

        let modified = match fs::metadata(&path) {
            Ok(metadata) => metadata.modified()?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(key, "cache miss");
                return Err(ScrapeError::CacheMiss(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        // A timestamp ahead of the clock counts as brand new.
        let age = self
            .clock
            .now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);

        if age >= self.ttl {
            tracing::debug!(key, age_secs = age.as_secs(), "cache expired");
            return Err(ScrapeError::CacheMiss(key.to_string()));
        }

        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ScrapeError::CacheMiss(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(key, bytes = contents.len(), "cache hit");
        Ok(contents)
    }

    fn set(&self, key: &str, contents: &[u8]) -> ScrapeResult<()> {
        let _enter = self.span.enter();
        let path = self.path_for(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;

        tracing::debug!(key, bytes = contents.len(), "cache save");
        Ok(())
    }
}
