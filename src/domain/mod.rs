pub mod document;
pub mod feed;
pub mod query;

pub use document::{ParsedDocument, ParsedEntry};
pub use feed::{slugify, FeedInfo, Queries};
pub use query::{Query, QuerySpec};
