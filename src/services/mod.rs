pub mod fetch_service;
pub mod build_service;
pub mod feed_service;

pub use fetch_service::FetchService;
pub use build_service::BuildService;
pub use feed_service::FeedService;
