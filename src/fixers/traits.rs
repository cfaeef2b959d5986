use crate::domain::{FeedInfo, ParsedDocument};

pub trait Fixer: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Normalize `document` in place using the feed's configuration
    fn fix(&self, document: &mut ParsedDocument, feed: &FeedInfo);
}
