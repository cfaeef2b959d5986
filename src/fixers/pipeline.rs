use crate::domain::{FeedInfo, ParsedDocument};
use crate::fixers::{CanonicalUrls, Fixer, MetadataFiller};

pub struct FixerPipeline {
    fixers: Vec<Box<dyn Fixer>>,
}

impl FixerPipeline {
    pub fn new() -> Self {
        let mut pipeline = Self::empty();

        // Reference order: metadata first, then URLs
        pipeline.register(Box::new(MetadataFiller::new()));
        pipeline.register(Box::new(CanonicalUrls::new()));

        pipeline
    }

    pub fn empty() -> Self {
        Self { fixers: Vec::new() }
    }

    pub fn register(&mut self, fixer: Box<dyn Fixer>) {
        self.fixers.push(fixer);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fixers.iter().map(|f| f.name()).collect()
    }

    /// Apply every fixer in registration order
    pub fn run(&self, document: &mut ParsedDocument, feed: &FeedInfo) {
        for fixer in &self.fixers {
            fixer.fix(document, feed);
            tracing::trace!(fixer = fixer.name(), "Applied fixer");
        }
    }
}

impl Default for FixerPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParsedEntry;

    struct Uppercase;

    impl Fixer for Uppercase {
        fn name(&self) -> &'static str {
            "uppercase"
        }

        fn fix(&self, document: &mut ParsedDocument, _feed: &FeedInfo) {
            if let Some(title) = document.title.as_mut() {
                *title = title.to_uppercase();
            }
        }
    }

    #[test]
    fn test_default_order() {
        let pipeline = FixerPipeline::new();
        assert_eq!(pipeline.names(), vec!["metadata-filler", "canonical-urls"]);
    }

    #[test]
    fn test_run_completes_document() {
        let feed = FeedInfo::new("https://example.com/", "Example");
        let mut document = ParsedDocument {
            title: Some(String::new()),
            entries: vec![ParsedEntry::new("/a1")],
            ..Default::default()
        };

        FixerPipeline::new().run(&mut document, &feed);

        assert_eq!(document.link, "https://example.com/");
        assert_eq!(document.title.as_deref(), Some("Example"));
        assert_eq!(document.description.as_deref(), Some("Example"));
        assert_eq!(document.entries[0].link, "https://example.com/a1");
    }

    #[test]
    fn test_registered_fixers_run_after_defaults() {
        let feed = FeedInfo::new("https://example.com/", "Example");
        let mut document = ParsedDocument::default();

        let mut pipeline = FixerPipeline::new();
        pipeline.register(Box::new(Uppercase));
        pipeline.run(&mut document, &feed);

        assert_eq!(document.title.as_deref(), Some("EXAMPLE"));
    }
}
