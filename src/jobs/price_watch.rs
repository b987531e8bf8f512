use crate::errors::JobError;
use crate::jobs::Job;
use crate::notifier::Notifier;
use crate::scraper::FieldSource;
use crate::templates;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Reads one field (the price) from a fixed product page and reports it.
pub struct PriceWatchJob {
    source: Arc<dyn FieldSource>,
    notifier: Notifier,
    chat_id: String,
    url: String,
    selector: String,
}

impl PriceWatchJob {
    pub fn new(
        source: Arc<dyn FieldSource>,
        notifier: Notifier,
        chat_id: String,
        url: String,
        selector: String,
    ) -> Self {
        Self {
            source,
            notifier,
            chat_id,
            url,
            selector,
        }
    }
}

#[async_trait]
impl Job for PriceWatchJob {
    fn name(&self) -> &str {
        "price-watch"
    }

    async fn run(&self) -> Result<(), JobError> {
        let texts = self.source.fetch_texts(&self.url, &self.selector).await?;

        match texts.first() {
            Some(price) => {
                info!(price = %price, "price found");
                self.notifier
                    .send_text(&self.chat_id, &templates::price_alert(price))
                    .await;
            }
            None => info!(url = %self.url, selector = %self.selector, "no elements found"),
        }

        Ok(())
    }
}
