// extract.rs
use crate::scraper::models::{Field, ListingSelectors, RawListing};
use crate::scraper::ScraperError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub struct ParsedSelectors {
    item: Selector,
    title: Selector,
    price: Selector,
    link: Selector,
    next_page: Selector,
    link_base: Option<Url>,
}

impl ParsedSelectors {
    pub fn parse(selectors: &ListingSelectors) -> Result<Self, ScraperError> {
        Ok(Self {
            item: parse_selector(&selectors.item)?,
            title: parse_selector(&selectors.title)?,
            price: parse_selector(&selectors.price)?,
            link: parse_selector(&selectors.link)?,
            next_page: parse_selector(&selectors.next_page)?,
            link_base: selectors
                .link_base
                .as_deref()
                .map(|base| Url::parse(base).map_err(|e| ScraperError::Url(format!("{base}: {e}"))))
                .transpose()?,
        })
    }
}

#[derive(Debug)]
pub struct ExtractedPage {
    pub listings: Vec<RawListing>,
    pub next_page: Option<Url>,
}

pub fn parse_selector(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|_| ScraperError::Selector(selector.to_string()))
}

/// Pulls every item node out of a results page. Item links are kept exactly
/// as the page writes them unless the selectors carry a link base. The
/// next-page href is always resolved, since the browser has to navigate to it.
pub fn extract_listings(html: &str, page_url: &Url, selectors: &ParsedSelectors) -> ExtractedPage {
    let document = Html::parse_document(html);

    let listings = document
        .select(&selectors.item)
        .map(|item| RawListing {
            title: Field::from_option(first_text(&item, &selectors.title)),
            price: Field::from_option(first_text(&item, &selectors.price)),
            link: Field::from_option(
                first_attr(&item, &selectors.link, "href")
                    .map(|href| absolute_link(href, selectors.link_base.as_ref())),
            ),
        })
        .collect();

    let next_page = document
        .select(&selectors.next_page)
        .find_map(|a| a.value().attr("href"))
        .and_then(|href| page_url.join(href).ok());

    ExtractedPage {
        listings,
        next_page,
    }
}

/// Trimmed text of every node matching `selector`, in document order.
pub fn select_texts(html: &str, selector: &Selector) -> Vec<String> {
    Html::parse_document(html)
        .select(selector)
        .map(|el| collapse_whitespace(el.text()))
        .filter(|text| !text.is_empty())
        .collect()
}

// A node with no text counts as absent.
fn first_text(item: &ElementRef, selector: &Selector) -> Option<String> {
    item.select(selector)
        .next()
        .map(|el| collapse_whitespace(el.text()))
        .filter(|text| !text.is_empty())
}

fn first_attr(item: &ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    item.select(selector)
        .find_map(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn absolute_link(href: String, base: Option<&Url>) -> String {
    match base.and_then(|base| base.join(&href).ok()) {
        Some(url) => url.to_string(),
        None => href,
    }
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
