use std::time::Duration;

use reqwest::blocking::Client;

use crate::errors::ScrapeResult;
use crate::sources::traits::PageSource;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for HttpPageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&self, url: &str) -> ScrapeResult<Vec<u8>> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let bytes = response.bytes()?;

        tracing::debug!(url, bytes = bytes.len(), "Fetched page");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("scrapefeed/"));
    }

    #[test]
    fn test_unreachable_host_is_http_error() {
        let source = HttpPageSource::new();
        let result = source.fetch("http://127.0.0.1:9/unreachable");

        assert!(matches!(result, Err(crate::errors::ScrapeError::Http(_))));
    }
}
