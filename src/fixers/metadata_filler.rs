use crate::domain::{FeedInfo, ParsedDocument};
use crate::fixers::traits::Fixer;

/// Falls back on the configured title and description when the page has none.
#[derive(Debug, Default)]
pub struct MetadataFiller;

impl MetadataFiller {
    pub fn new() -> Self {
        Self
    }
}

fn fill(field: &mut Option<String>, fallback: &str) {
    if field.as_deref().map_or(true, str::is_empty) {
        *field = Some(fallback.to_string());
    }
}

impl Fixer for MetadataFiller {
    fn name(&self) -> &'static str {
        "metadata-filler"
    }

    fn fix(&self, document: &mut ParsedDocument, feed: &FeedInfo) {
        fill(&mut document.title, &feed.title);
        fill(&mut document.description, &feed.description);
    }
}
