use crate::errors::ScrapeResult;

#[cfg_attr(test, mockall::automock)]
pub trait PageSource: Send + Sync {
    /// Raw bytes served at `url`
    fn fetch(&self, url: &str) -> ScrapeResult<Vec<u8>>;
}
