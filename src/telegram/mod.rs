mod client;
pub mod models;
mod telegram_error;

pub use client::TelegramClient;
pub use models::Update;
pub use telegram_error::TelegramError;

use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

impl TextFormat {
    pub fn parse_mode(self) -> Option<&'static str> {
        match self {
            TextFormat::Plain => None,
            TextFormat::Html => Some("HTML"),
        }
    }
}

/// Outgoing side of a chat platform.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn send_text(&self, chat_id: &str, text: &str, format: TextFormat) -> Result<(), TelegramError>;

    async fn send_file(&self, chat_id: &str, path: &Path, caption: &str) -> Result<(), TelegramError>;
}
