#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("Browser session error: {0}")]
    Session(String),
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    #[error("Timed out after {timeout_ms}ms waiting for `{selector}`")]
    Timeout { selector: String, timeout_ms: u64 },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid selector `{0}`")]
    Selector(String),
    #[error("Invalid URL: {0}")]
    Url(String),
}
