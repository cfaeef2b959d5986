use std::fs;
use std::path::{Path, PathBuf};

use tracing::Span;

use crate::config::FeedConfig;
use crate::domain::{FeedInfo, ParsedDocument, Queries};
use crate::errors::ScrapeResult;
use crate::fixers::FixerPipeline;
use crate::parser::Parser;
use crate::services::{BuildService, FetchService};
use crate::sources::PageSource;
use crate::storage::CacheStore;

/// Runs one feed from page bytes to RSS text: fetch, parse, fix, build.
pub struct FeedService<C: CacheStore, S: PageSource> {
    fetcher: FetchService<C, S>,
    fixers: FixerPipeline,
    builder: BuildService,
    span: Span,
}

impl<C: CacheStore, S: PageSource> FeedService<C, S> {
    pub fn new(fetcher: FetchService<C, S>, fixers: FixerPipeline, span: Span) -> Self {
        Self {
            fetcher,
            fixers,
            builder: BuildService::new(),
            span,
        }
    }

    /// Parsed and fixed document for `buffer`, ready for the builder
    pub fn document(
        &self,
        info: &FeedInfo,
        queries: &Queries,
        buffer: &[u8],
    ) -> ScrapeResult<ParsedDocument> {
        let parser = Parser::new(queries, self.span.clone())?;
        let mut document = parser.parse(buffer)?;
        self.fixers.run(&mut document, info);

        Ok(document)
    }

    /// RSS text for one configured feed
    pub fn render(&self, feed: &FeedConfig, fresh: bool) -> ScrapeResult<String> {
        let _enter = self.span.enter();

        let buffer = if fresh {
            self.fetcher.fetch_fresh(&feed.url)?
        } else {
            self.fetcher.fetch(&feed.url)?
        };

        let document = self.document(&feed.info(), &feed.queries, &buffer)?;
        tracing::info!(
            feed = %feed.name,
            entries = document.entries.len(),
            "Built feed"
        );

        self.builder.build(&document)
    }

    /// Render and write `<output_dir>/<slug>.rss`, returning the written path
    pub fn write(&self, feed: &FeedConfig, output_dir: &Path, fresh: bool) -> ScrapeResult<PathBuf> {
        // Fail on a bad name before spending a fetch on it
        let path = output_dir.join(format!("{}.rss", feed.slug()?));
        let rss = self.render(feed, fresh)?;

        fs::create_dir_all(output_dir)?;
        fs::write(&path, rss)?;

        tracing::debug!(path = %path.display(), "Wrote feed");
        Ok(path)
    }
}
