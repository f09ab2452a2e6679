use serde::{Deserialize, Serialize};

use super::AppointmentInfo;
use crate::errors::TransportError;

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Body returned by both `/chat` and `/reset`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChatReply {
    pub reply: String,
    #[serde(rename = "appointmentInfo", default)]
    pub appointment_info: Option<AppointmentInfo>,
    #[serde(rename = "isComplete", default)]
    pub is_complete: Option<bool>,
}

impl ChatReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            appointment_info: None,
            is_complete: None,
        }
    }

    pub fn with_info(mut self, info: AppointmentInfo) -> Self {
        self.appointment_info = Some(info);
        self
    }

    pub fn from_slice(body: &[u8]) -> Result<Self, TransportError> {
        serde_json::from_slice(body).map_err(|e| TransportError::MalformedResponse(e.to_string()))
    }
}
