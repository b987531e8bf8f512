// static_page.rs
use crate::scraper::extract::{parse_selector, select_texts};
use crate::scraper::{FieldSource, ScraperError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// Plain HTTP fetch for pages that render their prices server side.
pub struct StaticPageFetcher {
    client: Client,
}

impl StaticPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FieldSource for StaticPageFetcher {
    async fn fetch_texts(&self, url: &str, selector: &str) -> Result<Vec<String>, ScraperError> {
        let selector = parse_selector(selector)?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScraperError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::Navigation {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        let html = resp
            .text()
            .await
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let texts = select_texts(&html, &selector);
        debug!(url, matches = texts.len(), "static page parsed");
        Ok(texts)
    }
}
