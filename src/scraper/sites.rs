use crate::scraper::models::ListingSelectors;
use crate::scraper::ScraperError;
use url::Url;

pub const MERCADOLIBRE_BASE_URL: &str = "https://listado.mercadolibre.com.mx";
pub const AMAZON_BASE_URL: &str = "https://www.amazon.com.mx";

/// A store whose search results can be scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    MercadoLibre,
    Amazon,
}

impl Site {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "mercadolibre" | "ml" => Some(Site::MercadoLibre),
            "amazon" => Some(Site::Amazon),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Site::MercadoLibre => "mercadolibre",
            Site::Amazon => "amazon",
        }
    }

    pub fn selectors(self, base_url: &str) -> ListingSelectors {
        match self {
            Site::MercadoLibre => ListingSelectors::mercadolibre(),
            Site::Amazon => ListingSelectors::amazon(base_url),
        }
    }

    /// - MercadoLibre: `tarja de acero` -> `{base}/tarja-de-acero`
    /// - Amazon: `tarja de acero` -> `{base}/s?k=tarja+de+acero`
    pub fn search_url(self, base_url: &str, query: &str) -> Result<Url, ScraperError> {
        let words: Vec<&str> = query.split_whitespace().collect();
        if words.is_empty() {
            return Err(ScraperError::Url("empty search query".to_string()));
        }

        let mut url =
            Url::parse(base_url).map_err(|e| ScraperError::Url(format!("{base_url}: {e}")))?;

        match self {
            Site::MercadoLibre => {
                url.path_segments_mut()
                    .map_err(|_| ScraperError::Url(format!("{base_url} cannot take a path")))?
                    .pop_if_empty()
                    .push(&words.join("-"));
            }
            Site::Amazon => {
                url.set_path("/s");
                url.query_pairs_mut().clear().append_pair("k", &words.join(" "));
            }
        }
        Ok(url)
    }
}
