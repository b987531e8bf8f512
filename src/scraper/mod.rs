pub mod browser;
pub mod extract;
pub mod models;
mod scraper_error;
pub mod sites;
mod static_page;

pub use browser::BrowserFetcher;
pub use models::{Field, RawListing};
pub use scraper_error::ScraperError;
pub use sites::{Site, AMAZON_BASE_URL, MERCADOLIBRE_BASE_URL};
pub use static_page::StaticPageFetcher;

use async_trait::async_trait;

/// Anything that can turn a search query into raw listings.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listings(&self, query: &str) -> Result<Vec<RawListing>, ScraperError>;
}

/// Anything that can return the texts matching a selector on a fixed page.
#[async_trait]
pub trait FieldSource: Send + Sync {
    async fn fetch_texts(&self, url: &str, selector: &str) -> Result<Vec<String>, ScraperError>;
}
