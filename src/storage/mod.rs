pub mod traits;
pub mod file_cache;

pub use traits::{CacheStore, Clock, SystemClock};
pub use file_cache::{FileCache, DEFAULT_TTL};
