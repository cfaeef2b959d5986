pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod fixers;
pub mod parser;
pub mod services;
pub mod sources;
pub mod storage;

pub use crate::domain::{FeedInfo, ParsedDocument, ParsedEntry, Queries, Query, QuerySpec};
pub use crate::errors::{ScrapeError, ScrapeResult};
pub use crate::parser::Parser;
