use crate::scraper::extract::{extract_listings, ParsedSelectors};
use crate::scraper::models::ListingSelectors;
use crate::scraper::{ListingSource, RawListing, ScraperError};
use crate::telegram::models::{Chat, Message, Update, User};
use crate::telegram::{ChatApi, TelegramError, TextFormat};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

pub const TWO_ITEM_PAGE: &str = r#"
<html><body>
  <ol class="ui-search-layout">
    <li class="ui-search-layout__item">
      <h3>Producto A</h3>
      <span class="andes-money-amount__fraction">$1,234</span>
      <a href="/a">ver</a>
    </li>
    <li class="ui-search-layout__item">
      <h3>Producto B</h3>
      <span class="andes-money-amount__fraction">$999</span>
      <a href="/b">ver</a>
    </li>
  </ol>
</body></html>
"#;

pub const EMPTY_PAGE: &str = r#"
<html><body>
  <div class="ui-search-rescue">No hay publicaciones que coincidan con tu búsqueda.</div>
</body></html>
"#;

/// Fresh directory under the system temp dir.
pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "{prefix}_{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn text_update(update_id: i64, chat_id: i64, user_id: i64, text: &str) -> Update {
    Update {
        update_id,
        message: Some(Message {
            message_id: update_id,
            chat: Chat { id: chat_id },
            from: Some(User {
                id: user_id,
                username: None,
            }),
            text: Some(text.to_string()),
        }),
    }
}

/// Serves a fixed HTML page for every query.
pub struct HtmlPageSource {
    html: String,
    selectors: ListingSelectors,
    pub queries: Mutex<Vec<String>>,
}

impl HtmlPageSource {
    pub fn new(html: &str) -> Self {
        Self::with_selectors(html, ListingSelectors::default())
    }

    pub fn with_selectors(html: &str, selectors: ListingSelectors) -> Self {
        Self {
            html: html.to_string(),
            selectors,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ListingSource for HtmlPageSource {
    async fn fetch_listings(&self, query: &str) -> Result<Vec<RawListing>, ScraperError> {
        self.queries.lock().unwrap().push(query.to_string());
        let selectors = ParsedSelectors::parse(&self.selectors)?;
        let page_url = Url::parse("https://listado.mercadolibre.com.mx/").unwrap();
        Ok(extract_listings(&self.html, &page_url, &selectors).listings)
    }
}

/// Times out waiting for the results list on the first `failures` calls,
/// then serves the page.
pub struct FlakySource {
    failures: usize,
    calls: AtomicUsize,
    page: HtmlPageSource,
}

impl FlakySource {
    pub fn new(failures: usize, html: &str) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
            page: HtmlPageSource::new(html),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingSource for FlakySource {
    async fn fetch_listings(&self, query: &str) -> Result<Vec<RawListing>, ScraperError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(ScraperError::Timeout {
                selector: "li.ui-search-layout__item".to_string(),
                timeout_ms: 5000,
            });
        }
        self.page.fetch_listings(query).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: String,
        text: String,
        format: TextFormat,
    },
    File {
        chat_id: String,
        name: String,
        caption: String,
        contents: String,
    },
}

/// Records everything sent. The file is read at send time because callers
/// may delete it right after.
#[derive(Default)]
pub struct FakeChat {
    pub sent: Mutex<Vec<Sent>>,
    pub fail_texts: bool,
}

impl FakeChat {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_texts: true,
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                Sent::File { .. } => None,
            })
            .collect()
    }

    pub fn files(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| matches!(s, Sent::File { .. }))
            .collect()
    }
}

#[async_trait]
impl ChatApi for FakeChat {
    async fn send_text(&self, chat_id: &str, text: &str, format: TextFormat) -> Result<(), TelegramError> {
        if self.fail_texts {
            return Err(TelegramError::Api {
                code: Some(502),
                description: "Bad Gateway".to_string(),
            });
        }
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            format,
        });
        Ok(())
    }

    async fn send_file(&self, chat_id: &str, path: &Path, caption: &str) -> Result<(), TelegramError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TelegramError::Attachment {
            path: path.to_path_buf(),
            source,
        })?;
        self.sent.lock().unwrap().push(Sent::File {
            chat_id: chat_id.to_string(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            caption: caption.to_string(),
            contents,
        });
        Ok(())
    }
}

pub const AMAZON_PAGE: &str = r#"
<html><body>
  <div class="s-main-slot s-result-list">
    <div data-component-type="s-search-result">
      <a class="a-link-normal s-no-outline" href="/Tarja-Acero-Inoxidable/dp/B0TARJA01">
        <img alt="">
      </a>
      <h2><span class="a-size-base-plus a-text-normal">Tarja de Acero Inoxidable 80x45</span></h2>
      <span class="a-price"><span class="a-price-whole">2,150</span></span>
    </div>
    <div data-component-type="s-search-result">
      <a class="a-link-normal s-no-outline" href="https://www.amazon.com.mx/dp/B0TARJA02">
        <img alt="">
      </a>
      <h2><span class="a-size-base-plus a-text-normal">Tarja Doble</span></h2>
      <span class="a-price"><span class="a-price-whole">3,499</span></span>
    </div>
  </div>
</body></html>
"#;
