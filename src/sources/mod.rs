pub mod traits;
pub mod http;

pub use traits::PageSource;
pub use http::HttpPageSource;
