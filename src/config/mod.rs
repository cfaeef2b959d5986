use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{slugify, FeedInfo, Queries};
use crate::errors::{ScrapeError, ScrapeResult};
use crate::extract::CompiledQuery;
use crate::storage::DEFAULT_TTL;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub queries: Queries,
}

impl FeedConfig {
    pub fn info(&self) -> FeedInfo {
        FeedInfo::new(&self.url, &self.name)
            .with_title(self.title.clone())
            .with_description(self.description.clone())
    }

    pub fn slug(&self) -> ScrapeResult<String> {
        slugify(&self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub output_dir: PathBuf,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Read the YAML file, then let `.env` and the environment override paths and TTL
    pub fn load<P: AsRef<Path>>(path: P) -> ScrapeResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        let mut config = Self::from_path(path)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> ScrapeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScrapeError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> ScrapeResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, var: F) -> ScrapeResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = var("SCRAPEFEED_CACHE_DIR") {
            self.cache_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = var("SCRAPEFEED_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(ttl) = var("SCRAPEFEED_CACHE_TTL") {
            let secs = ttl.trim().parse::<u64>().map_err(|_| {
                ScrapeError::Config(format!("SCRAPEFEED_CACHE_TTL must be seconds, got '{}'", ttl))
            })?;
            self.cache_ttl_secs = Some(secs);
        }

        Ok(())
    }

    pub fn validate(&self) -> ScrapeResult<()> {
        if self.cache_ttl_secs == Some(0) {
            return Err(ScrapeError::Config("cache_ttl_secs must be positive".to_string()));
        }

        let mut slugs = HashSet::new();
        for feed in &self.feeds {
            if feed.url.trim().is_empty() {
                return Err(ScrapeError::Config(format!("feed '{}' has no url", feed.name)));
            }
            if feed.queries.entries.trim().is_empty() {
                return Err(ScrapeError::Config(format!(
                    "feed '{}' has an empty entries selector",
                    feed.name
                )));
            }

            let slug = feed.slug()?;
            if !slugs.insert(slug.clone()) {
                return Err(ScrapeError::Config(format!(
                    "feed '{}' would overwrite the output of another feed ({}.rss)",
                    feed.name, slug
                )));
            }
        }

        Ok(())
    }

    /// Compile every selector of every feed, without touching the network
    pub fn check_selectors(&self) -> ScrapeResult<()> {
        for feed in &self.feeds {
            let queries = &feed.queries;
            crate::extract::compile_selector(&queries.entries)?;
            CompiledQuery::new(&queries.link)?;

            for spec in [&queries.title, &queries.content, &queries.date, &queries.image]
                .into_iter()
                .flatten()
            {
                CompiledQuery::new(spec)?;
            }
        }

        Ok(())
    }

    /// Default cache location is next to the executable
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            Self::exe_dir()
                .map(|d| d.join("cache"))
                .unwrap_or_else(|| PathBuf::from("./cache"))
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL)
    }

    pub fn find_feed(&self, name: &str) -> Option<&FeedConfig> {
        self.feeds.iter().find(|f| f.name == name)
    }
}
