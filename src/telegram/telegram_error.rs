use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Telegram API error {code:?}: {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
    #[error("Failed to read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration error: {0}")]
    Config(String),
}
