// One search result item, as found on the page:
//
// li.ui-search-layout__item
//  ├── h3                                  -> title
//  ├── span.andes-money-amount__fraction   -> price
//  └── a[href]                             -> link

/// A sub-element that may or may not exist under an item node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Present(T),
    Absent,
}

impl<T> Field<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Present(v),
            None => Field::Absent,
        }
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Field::Present(v) => Some(v),
            Field::Absent => None,
        }
    }
}

impl Field<String> {
    pub fn into_text_or_empty(self) -> String {
        match self {
            Field::Present(v) => v,
            Field::Absent => String::new(),
        }
    }
}

impl From<&str> for Field<String> {
    fn from(value: &str) -> Self {
        Field::Present(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListing {
    pub title: Field<String>,
    pub price: Field<String>,
    pub link: Field<String>,
}

/// Dialog that may cover the results, dismissed by clicking a button by text.
#[derive(Debug, Clone)]
pub struct PromptTexts {
    pub marker: String,
    pub dismiss: String,
}

/// CSS selectors and prompt texts describing a results page.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    pub item: String,
    /// Present on a loaded page even when the search has no results.
    pub empty: String,
    pub title: String,
    pub price: String,
    pub link: String,
    pub next_page: String,
    /// Relative item links are joined onto this when set.
    pub link_base: Option<String>,
    pub prompt: Option<PromptTexts>,
}

impl ListingSelectors {
    pub fn mercadolibre() -> Self {
        Self {
            item: "li.ui-search-layout__item".into(),
            empty: ".ui-search-rescue".into(),
            title: "h3".into(),
            price: "span.andes-money-amount__fraction".into(),
            link: "a".into(),
            next_page: "li.andes-pagination__button--next a".into(),
            link_base: None,
            prompt: Some(PromptTexts {
                marker: "Agregar ubicación".into(),
                dismiss: "Más tarde".into(),
            }),
        }
    }

    // Amazon result cards:
    //
    // div[data-component-type=s-search-result]
    //  ├── span.a-text-normal                  -> title
    //  ├── span.a-price-whole                  -> price
    //  └── a.a-link-normal.s-no-outline[href]  -> link (relative)
    pub fn amazon(base_url: &str) -> Self {
        Self {
            item: r#"div[data-component-type="s-search-result"]"#.into(),
            empty: "div.s-main-slot".into(),
            title: "span.a-text-normal".into(),
            price: "span.a-price-whole".into(),
            link: "a.a-link-normal.s-no-outline".into(),
            next_page: "a.s-pagination-next".into(),
            link_base: Some(base_url.to_string()),
            prompt: None,
        }
    }
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self::mercadolibre()
    }
}
