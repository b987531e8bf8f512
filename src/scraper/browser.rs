// browser.rs
use crate::config::{BrowserConfig, SearchConfig};
use crate::scraper::extract::{extract_listings, ParsedSelectors};
use crate::scraper::models::{ListingSelectors, PromptTexts, RawListing};
use crate::scraper::sites::Site;
use crate::scraper::{ListingSource, ScraperError};
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const POLL_EVERY: Duration = Duration::from_millis(100);

/// The handful of page operations a search needs from a browser.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn goto(&self, url: &Url) -> Result<(), ScraperError>;

    /// Waits until an element matches the CSS selector.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), ScraperError>;

    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), ScraperError>;

    /// Clicks `prompt.dismiss` if `prompt.marker` shows up in time. Never fails.
    async fn dismiss_prompt(&self, prompt: &PromptTexts, timeout: Duration);

    async fn source(&self) -> Result<String, ScraperError>;

    async fn close(&self);
}

/// Opens one browser session per site searched.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    type Driver: PageDriver;

    async fn open(&self) -> Result<Self::Driver, ScraperError>;
}

/// WebDriver sessions (chromedriver, geckodriver, selenium).
pub struct WebDriverFactory {
    config: BrowserConfig,
}

impl WebDriverFactory {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DriverFactory for WebDriverFactory {
    type Driver = WebDriverPage;

    async fn open(&self) -> Result<WebDriverPage, ScraperError> {
        let mut args = vec!["--window-size=1366,900", "--disable-gpu"];
        if self.config.headless {
            args.push("--headless=new");
        }

        let mut caps = serde_json::Map::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&self.config.webdriver_url)
            .await
            .map_err(|e| ScraperError::Session(e.to_string()))?;

        Ok(WebDriverPage { client })
    }
}

pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    async fn find_css(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<fantoccini::elements::Element, ScraperError> {
        self.client
            .wait()
            .at_most(timeout)
            .every(POLL_EVERY)
            .for_element(Locator::Css(selector))
            .await
            .map_err(|e| match e {
                CmdError::WaitTimeout => ScraperError::Timeout {
                    selector: selector.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                },
                other => ScraperError::Session(other.to_string()),
            })
    }
}

#[async_trait]
impl PageDriver for WebDriverPage {
    async fn goto(&self, url: &Url) -> Result<(), ScraperError> {
        self.client
            .goto(url.as_str())
            .await
            .map_err(|e| ScraperError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), ScraperError> {
        self.find_css(selector, timeout).await.map(|_| ())
    }

    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), ScraperError> {
        let element = self.find_css(selector, timeout).await?;
        element
            .click()
            .await
            .map_err(|e| ScraperError::Session(e.to_string()))
    }

    async fn dismiss_prompt(&self, prompt: &PromptTexts, timeout: Duration) {
        let marker = contains_text_xpath(&prompt.marker);
        let found = self
            .client
            .wait()
            .at_most(timeout)
            .every(POLL_EVERY)
            .for_element(Locator::XPath(&marker))
            .await;

        if let Err(e) = found {
            debug!("no prompt: {e}");
            return;
        }

        let dismiss = exact_text_xpath(&prompt.dismiss);
        match self.client.find(Locator::XPath(&dismiss)).await {
            Ok(button) => match button.click().await {
                Ok(()) => debug!("prompt dismissed"),
                Err(e) => warn!("could not dismiss prompt: {e}"),
            },
            Err(e) => warn!("prompt without dismiss button: {e}"),
        }
    }

    async fn source(&self) -> Result<String, ScraperError> {
        self.client
            .source()
            .await
            .map_err(|e| ScraperError::Session(e.to_string()))
    }

    async fn close(&self) {
        if let Err(e) = self.client.clone().close().await {
            warn!("failed to close browser session: {e}");
        }
    }
}

/// Scrapes search results site by site, one browser session per site.
/// Every session is closed before moving on, whether the site worked or not.
pub struct BrowserFetcher<F = WebDriverFactory> {
    factory: F,
    search: SearchConfig,
}

impl BrowserFetcher<WebDriverFactory> {
    pub fn new(browser: BrowserConfig, search: SearchConfig) -> Self {
        Self::with_factory(WebDriverFactory::new(browser), search)
    }
}

impl<F: DriverFactory> BrowserFetcher<F> {
    pub fn with_factory(factory: F, search: SearchConfig) -> Self {
        Self { factory, search }
    }

    async fn scrape_site(&self, site: Site, query: &str) -> Result<Vec<RawListing>, ScraperError> {
        let base_url = self.search.base_url_for(site);
        let url = site.search_url(base_url, query)?;
        let selectors = site.selectors(base_url);
        let filter = match site {
            Site::MercadoLibre => self.search.filter_selector.as_deref(),
            Site::Amazon => None,
        };

        let driver = self.factory.open().await?;
        let result = self.scrape_pages(&driver, &selectors, filter, url).await;
        driver.close().await;

        result
    }

    async fn scrape_pages(
        &self,
        driver: &F::Driver,
        selectors: &ListingSelectors,
        filter: Option<&str>,
        start: Url,
    ) -> Result<Vec<RawListing>, ScraperError> {
        let parsed = ParsedSelectors::parse(selectors)?;
        let mut listings = Vec::new();
        let mut seen = HashSet::new();
        let mut url = start;

        // Either the item list or the page's "loaded" marker ends the wait.
        let ready = format!("{}, {}", selectors.item, selectors.empty);

        for page in 1..=self.search.max_pages {
            if !seen.insert(url.to_string()) {
                debug!(%url, "page already visited, stopping");
                break;
            }

            info!(page, %url, "loading results page");
            driver.goto(&url).await?;

            if page == 1 {
                if let Some(prompt) = &selectors.prompt {
                    driver.dismiss_prompt(prompt, self.search.popup_timeout).await;
                }
                if let Some(filter) = filter {
                    driver.click(filter, self.search.results_timeout).await?;
                    debug!(selector = %filter, "filter applied");
                }
            }

            driver.wait_for(&ready, self.search.results_timeout).await?;

            let html = driver.source().await?;
            let extracted = extract_listings(&html, &url, &parsed);
            info!(page, items = extracted.listings.len(), "page extracted");

            if extracted.listings.is_empty() {
                break;
            }
            listings.extend(extracted.listings);

            match extracted.next_page {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(listings)
    }
}

#[async_trait]
impl<F: DriverFactory> ListingSource for BrowserFetcher<F> {
    async fn fetch_listings(&self, query: &str) -> Result<Vec<RawListing>, ScraperError> {
        let mut listings = Vec::new();

        for &site in &self.search.sites {
            let found = self.scrape_site(site, query).await?;
            info!(site = site.name(), items = found.len(), "site scraped");
            listings.extend(found);
        }

        Ok(listings)
    }
}

fn contains_text_xpath(text: &str) -> String {
    format!("//*[text()[contains(., '{text}')]]")
}

fn exact_text_xpath(text: &str) -> String {
    format!("//*[normalize-space(text())='{text}']")
}
