//! Application configuration, read once at startup from `.env` and the
//! process environment.

use crate::scraper::{Site, AMAZON_BASE_URL, MERCADOLIBRE_BASE_URL};
use crate::spreadsheets::ExportFormat;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_WATCH_URL: &str = "https://articulo.mercadolibre.com.mx/MLM-2051886252-base-soporte-para-laptop-tableta-portatil-ajustable-plegable-_JM?searchVariation=177696748063";

/// Load `.env` into the environment if present.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value `{value}` for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Long-polling conversational bot.
    Bot,
    /// Fixed-interval job loop.
    Timer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerJobKind {
    PriceWatch,
    Search,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    /// Destination for timer-mode notifications.
    pub chat_id: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub headless: bool,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Searched in order; results are concatenated.
    pub sites: Vec<Site>,
    pub base_url: String,
    pub amazon_base_url: String,
    /// Clicked once before waiting for results, when set.
    pub filter_selector: Option<String>,
    pub max_pages: usize,
    pub popup_timeout: Duration,
    pub results_timeout: Duration,
}

impl SearchConfig {
    pub fn base_url_for(&self, site: Site) -> &str {
        match site {
            Site::MercadoLibre => &self.base_url,
            Site::Amazon => &self.amazon_base_url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimerConfig {
    pub job: TimerJobKind,
    pub interval: Duration,
    pub job_timeout: Duration,
    pub watch_url: String,
    pub watch_selector: String,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub format: ExportFormat,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: Mode,
    pub telegram: TelegramConfig,
    pub browser: BrowserConfig,
    pub search: SearchConfig,
    pub timer: TimerConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let mode = match vars.or("APP_MODE", "bot").to_lowercase().as_str() {
            "bot" => Mode::Bot,
            "timer" => Mode::Timer,
            other => return Err(invalid("APP_MODE", other)),
        };

        let telegram = TelegramConfig {
            token: vars.required("TELEGRAM_TOKEN")?,
            chat_id: vars.opt("CHAT_ID"),
            api_base: vars.or("TELEGRAM_API_BASE", "https://api.telegram.org"),
        };

        if mode == Mode::Timer && telegram.chat_id.is_none() {
            return Err(ConfigError::Missing("CHAT_ID"));
        }

        let browser = BrowserConfig {
            webdriver_url: vars.or("WEBDRIVER_URL", "http://localhost:4444"),
            headless: vars.parsed("BROWSER_HEADLESS", true)?,
        };

        let max_pages: usize = vars.parsed("SEARCH_MAX_PAGES", 1)?;
        if max_pages == 0 {
            return Err(invalid("SEARCH_MAX_PAGES", "0"));
        }

        let sites_raw = vars.or("SEARCH_SITES", "mercadolibre");
        let sites = sites_raw
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(|name| Site::from_name(name).ok_or_else(|| invalid("SEARCH_SITES", name.trim())))
            .collect::<Result<Vec<_>, _>>()?;
        if sites.is_empty() {
            return Err(invalid("SEARCH_SITES", &sites_raw));
        }

        let search = SearchConfig {
            sites,
            base_url: vars.or("SEARCH_BASE_URL", MERCADOLIBRE_BASE_URL),
            amazon_base_url: vars.or("AMAZON_BASE_URL", AMAZON_BASE_URL),
            filter_selector: vars.opt("SEARCH_FILTER_SELECTOR"),
            max_pages,
            popup_timeout: Duration::from_millis(vars.parsed("POPUP_TIMEOUT_MS", 360)?),
            results_timeout: Duration::from_millis(vars.parsed("RESULTS_TIMEOUT_MS", 5000)?),
        };

        let job = match vars.or("TIMER_JOB", "price-watch").to_lowercase().as_str() {
            "price-watch" => TimerJobKind::PriceWatch,
            "search" => TimerJobKind::Search,
            other => return Err(invalid("TIMER_JOB", other)),
        };

        let interval_secs: u64 = vars.parsed("TIMER_INTERVAL_SECS", 10)?;
        if interval_secs == 0 {
            return Err(invalid("TIMER_INTERVAL_SECS", "0"));
        }

        let timer = TimerConfig {
            job,
            interval: Duration::from_secs(interval_secs),
            job_timeout: Duration::from_secs(vars.parsed("TIMER_JOB_TIMEOUT_SECS", 120)?),
            watch_url: vars.or("WATCH_URL", DEFAULT_WATCH_URL),
            watch_selector: vars.or("WATCH_SELECTOR", "span.andes-money-amount__fraction"),
            query: vars.or("TIMER_QUERY", "tarja de acero 80 45 22"),
        };

        let format_raw = vars.or("EXPORT_FORMAT", "csv");
        let export = ExportConfig {
            output_dir: PathBuf::from(vars.or("OUTPUT_DIR", "./output")),
            format: ExportFormat::from_name(&format_raw)
                .ok_or_else(|| invalid("EXPORT_FORMAT", &format_raw))?,
        };

        Ok(Self {
            mode,
            telegram,
            browser,
            search,
            timer,
            export,
        })
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn opt(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.opt(key).ok_or(ConfigError::Missing(key))
    }

    fn parsed<T: std::str::FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.opt(key) {
            Some(raw) => raw.parse().map_err(|_| invalid(key, &raw)),
            None => Ok(default),
        }
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}
