//! Minimal Telegram Bot API client: `sendMessage`, `sendDocument` and
//! long-polling `getUpdates`.

use crate::spreadsheets::mime_for_path;
use crate::telegram::models::{ApiResponse, Update};
use crate::telegram::{ChatApi, TelegramError, TextFormat};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Must exceed the long-poll timeout passed to `getUpdates`.
const HTTP_TIMEOUT: Duration = Duration::from_secs(90);

pub struct TelegramClient {
    token: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: String, api_base: String) -> Result<Self, TelegramError> {
        if token.trim().is_empty() {
            return Err(TelegramError::Config(
                "Telegram bot token must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

        Ok(Self {
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Long-polls for new updates. `offset` is one past the last update seen.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let mut body = json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }

        let response = self
            .client
            .post(self.method_url("getUpdates"))
            .json(&body)
            .send()
            .await?;

        let updates: Vec<Update> = into_result(response).await?;
        debug!(count = updates.len(), "updates received");
        Ok(updates)
    }

    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        format: TextFormat,
    ) -> Result<(), TelegramError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(mode) = format.parse_mode() {
            body["parse_mode"] = json!(mode);
        }

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await?;

        into_result::<serde_json::Value>(response).await?;
        info!(chat_id, "Telegram message sent");
        Ok(())
    }

    pub async fn send_document(
        &self,
        chat_id: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), TelegramError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| TelegramError::Attachment {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resultados".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime_for_path(path).as_ref())?;

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("document", part);

        let response = self
            .client
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;

        into_result::<serde_json::Value>(response).await?;
        info!(chat_id, file = %file_name, "Telegram document sent");
        Ok(())
    }
}

#[async_trait]
impl ChatApi for TelegramClient {
    async fn send_text(&self, chat_id: &str, text: &str, format: TextFormat) -> Result<(), TelegramError> {
        self.send_message(chat_id, text, format).await
    }

    async fn send_file(&self, chat_id: &str, path: &Path, caption: &str) -> Result<(), TelegramError> {
        self.send_document(chat_id, path, caption).await
    }
}

async fn into_result<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TelegramError> {
    let status = response.status();
    let envelope: ApiResponse<T> = response.json().await?;

    match envelope {
        ApiResponse {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        ApiResponse {
            description,
            error_code,
            ..
        } => Err(TelegramError::Api {
            code: error_code.or(Some(status.as_u16() as i64)),
            description: description.unwrap_or_else(|| "Unknown Telegram API error".to_string()),
        }),
    }
}
