pub mod http;

use async_trait::async_trait;

use crate::errors::TransportError;
use crate::models::ChatReply;

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_chat_message(&self, text: &str) -> Result<ChatReply, TransportError>;

    async fn reset_session(&self) -> Result<ChatReply, TransportError>;
}
