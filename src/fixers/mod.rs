pub mod traits;
pub mod pipeline;
pub mod metadata_filler;
pub mod canonical_urls;

pub use traits::Fixer;
pub use pipeline::FixerPipeline;
pub use metadata_filler::MetadataFiller;
pub use canonical_urls::CanonicalUrls;
