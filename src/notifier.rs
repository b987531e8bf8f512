// src/notifier.rs

use crate::telegram::{ChatApi, TextFormat};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Clone)]
pub struct Attachment {
    pub path: PathBuf,
    pub caption: String,
}

/// One outgoing message, sent at most once.
#[derive(Debug, Clone)]
pub struct NotificationMessage {
    pub text: String,
    pub format: TextFormat,
    pub attachment: Option<Attachment>,
}

impl NotificationMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            attachment: None,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Html,
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, path: PathBuf, caption: impl Into<String>) -> Self {
        self.attachment = Some(Attachment {
            path,
            caption: caption.into(),
        });
        self
    }
}

/// Delivers messages through a chat API. Failures are logged and dropped;
/// nothing is retried.
#[derive(Clone)]
pub struct Notifier {
    api: Arc<dyn ChatApi>,
}

impl Notifier {
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self { api }
    }

    /// Sends the text, then the attachment if any. The attachment is skipped
    /// when the text could not be delivered.
    pub async fn notify(&self, chat_id: &str, message: &NotificationMessage) {
        if let Err(e) = self.api.send_text(chat_id, &message.text, message.format).await {
            error!(chat_id, "Failed to send notification: {e}");
            return;
        }

        if let Some(attachment) = &message.attachment {
            if let Err(e) = self
                .api
                .send_file(chat_id, &attachment.path, &attachment.caption)
                .await
            {
                error!(chat_id, file = %attachment.path.display(), "Failed to send document: {e}");
            }
        }
    }

    pub async fn send_text(&self, chat_id: &str, text: &str) {
        self.notify(chat_id, &NotificationMessage::plain(text)).await
    }

    pub async fn send_html(&self, chat_id: &str, html: &str) {
        self.notify(chat_id, &NotificationMessage::html(html)).await
    }

    pub async fn send_file(&self, chat_id: &str, path: &Path, caption: &str) {
        if let Err(e) = self.api.send_file(chat_id, path, caption).await {
            error!(chat_id, file = %path.display(), "Failed to send document: {e}");
        }
    }
}
