use async_trait::async_trait;
use reqwest::Url;

use super::ChatTransport;
use crate::errors::{ChatError, TransportError};
use crate::models::{ChatReply, ChatRequest};

pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, ChatError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ChatError::Config(format!("invalid backend url '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ChatError::Config(format!(
                "backend url must be http or https, got '{base_url}'"
            )));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, path: &str, body: Option<&ChatRequest<'_>>) -> Result<ChatReply, TransportError> {
        let url = format!("{}/{path}", self.base_url);
        let mut req = self.client.post(&url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(%url, %status, "backend rejected request");
            return Err(TransportError::Status(status));
        }

        let bytes = resp.bytes().await?;
        ChatReply::from_slice(&bytes)
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send_chat_message(&self, text: &str) -> Result<ChatReply, TransportError> {
        self.post("chat", Some(&ChatRequest { message: text })).await
    }

    async fn reset_session(&self) -> Result<ChatReply, TransportError> {
        self.post("reset", None).await
    }
}
