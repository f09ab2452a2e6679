use std::fmt;

use uuid::Uuid;

use crate::display::{DisplaySurface, ViewUpdate};
use crate::errors::{ChatError, TransportError};
use crate::models::{all_complete, derive_status_fields, AppointmentInfo, ChatReply, FieldStatus, Message};
use crate::services::ticket::find_ticket_number;
use crate::services::transport::ChatTransport;

pub const SEND_ERROR_REPLY: &str = "Sorry, there was an error processing your request.";
pub const RESET_ERROR_REPLY: &str = "Sorry, there was an error resetting the chat.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingRequest {
    Send,
    Reset,
}

impl fmt::Display for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingRequest::Send => f.write_str("chat"),
            PendingRequest::Reset => f.write_str("reset"),
        }
    }
}

/// View-model for one chat session.
///
/// Holds the transcript, the latest appointment snapshot and the ticket
/// state, and queues the [`ViewUpdate`]s a display needs to mirror them.
/// At most one backend request may be pending at a time.
pub struct ChatSession {
    id: Uuid,
    transcript: Vec<Message>,
    draft: String,
    snapshot: Option<AppointmentInfo>,
    status: Vec<FieldStatus>,
    ticket: Option<String>,
    pending: Option<PendingRequest>,
    updates: Vec<ViewUpdate>,
}

impl ChatSession {
    pub fn new(greeting: impl Into<String>) -> Self {
        let greeting = Message::bot(greeting);
        Self {
            id: Uuid::new_v4(),
            updates: vec![ViewUpdate::Append(greeting.clone())],
            transcript: vec![greeting],
            draft: String::new(),
            snapshot: None,
            status: Vec::new(),
            ticket: None,
            pending: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn snapshot(&self) -> Option<&AppointmentInfo> {
        self.snapshot.as_ref()
    }

    pub fn status_fields(&self) -> &[FieldStatus] {
        &self.status
    }

    pub fn pending(&self) -> Option<PendingRequest> {
        self.pending
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// The ticket currently on display, if any.
    ///
    /// A revealed ticket stays stored until reset but is only displayed
    /// while every field of the latest snapshot is complete.
    pub fn visible_ticket(&self) -> Option<&str> {
        match (&self.ticket, &self.snapshot) {
            (Some(ticket), Some(_)) if all_complete(&self.status) => Some(ticket.as_str()),
            _ => None,
        }
    }

    pub fn is_ticket_visible(&self) -> bool {
        self.visible_ticket().is_some()
    }

    pub fn drain_updates(&mut self) -> Vec<ViewUpdate> {
        std::mem::take(&mut self.updates)
    }

    /// Pushes queued updates to `surface`. Rendering failures are logged and
    /// never affect session state.
    pub fn flush(&mut self, surface: &mut dyn DisplaySurface) {
        for update in self.drain_updates() {
            if let Err(e) = surface.apply(&update) {
                tracing::warn!(session = %self.id, error = %e, "failed to render update");
            }
        }
    }

    /// First half of a send: validates `raw`, echoes it into the transcript
    /// and marks the request as pending.
    ///
    /// Returns the trimmed text to hand to the transport, or `None` when the
    /// input is blank and nothing happened.
    pub fn begin_send(&mut self, raw: &str) -> Result<Option<String>, ChatError> {
        let text = raw.trim();
        if text.is_empty() {
            return Ok(None);
        }
        if let Some(pending) = self.pending {
            return Err(ChatError::RequestInFlight(pending));
        }

        self.push(Message::user(text));
        self.draft.clear();
        self.pending = Some(PendingRequest::Send);
        Ok(Some(text.to_string()))
    }

    pub fn finish_send(&mut self, outcome: Result<ChatReply, TransportError>) {
        self.pending = None;

        match outcome {
            Ok(reply) => {
                self.push(Message::bot(reply.reply));
                if let Some(info) = reply.appointment_info {
                    let before = self.visible_ticket().map(str::to_string);
                    self.replace_snapshot(info, reply.is_complete);
                    if all_complete(&self.status) {
                        if let Some(ticket) = find_ticket_number(&self.transcript) {
                            tracing::info!(session = %self.id, %ticket, "ticket number found");
                            self.ticket = Some(ticket);
                        }
                    }
                    self.queue_panel(before);
                }
            }
            Err(e) => {
                let err = ChatError::SendFailed(e);
                tracing::warn!(session = %self.id, error = %err, "chat request failed");
                self.push(Message::bot(SEND_ERROR_REPLY));
            }
        }
    }

    pub fn begin_reset(&mut self) -> Result<(), ChatError> {
        if let Some(pending) = self.pending {
            return Err(ChatError::RequestInFlight(pending));
        }
        self.pending = Some(PendingRequest::Reset);
        Ok(())
    }

    pub fn finish_reset(&mut self, outcome: Result<ChatReply, TransportError>) {
        self.pending = None;

        match outcome {
            Ok(reply) => {
                self.transcript.truncate(1);
                self.updates.push(ViewUpdate::Truncate { keep: 1 });
                self.push(Message::bot(reply.reply));
                self.ticket = None;
                self.updates.push(ViewUpdate::Ticket(None));
                if let Some(info) = reply.appointment_info {
                    self.replace_snapshot(info, reply.is_complete);
                    self.updates.push(ViewUpdate::Status(self.status.clone()));
                }
                tracing::info!(session = %self.id, "session reset");
            }
            Err(e) => {
                let err = ChatError::ResetFailed(e);
                tracing::warn!(session = %self.id, error = %err, "reset request failed");
                self.push(Message::bot(RESET_ERROR_REPLY));
            }
        }
    }

    /// Sends `raw` to the backend and applies the reply.
    ///
    /// The echoed user entry reaches `surface` before the transport is
    /// called. Returns `Ok(false)` for blank input. Transport failures are
    /// absorbed into the transcript; only a pending request is an error.
    pub async fn submit_user_message(
        &mut self,
        transport: &dyn ChatTransport,
        surface: &mut dyn DisplaySurface,
        raw: &str,
    ) -> Result<bool, ChatError> {
        let Some(text) = self.begin_send(raw)? else {
            return Ok(false);
        };
        self.flush(surface);

        tracing::debug!(session = %self.id, "sending chat message");
        let outcome = transport.send_chat_message(&text).await;
        self.finish_send(outcome);
        self.flush(surface);
        Ok(true)
    }

    pub async fn submit_draft(
        &mut self,
        transport: &dyn ChatTransport,
        surface: &mut dyn DisplaySurface,
    ) -> Result<bool, ChatError> {
        let draft = self.draft.clone();
        self.submit_user_message(transport, surface, &draft).await
    }

    pub async fn reset_session(
        &mut self,
        transport: &dyn ChatTransport,
        surface: &mut dyn DisplaySurface,
    ) -> Result<(), ChatError> {
        self.begin_reset()?;

        tracing::debug!(session = %self.id, "resetting session");
        let outcome = transport.reset_session().await;
        self.finish_reset(outcome);
        self.flush(surface);
        Ok(())
    }

    fn push(&mut self, message: Message) {
        self.updates.push(ViewUpdate::Append(message.clone()));
        self.transcript.push(message);
    }

    fn replace_snapshot(&mut self, info: AppointmentInfo, reported_complete: Option<bool>) {
        self.status = derive_status_fields(&info);
        self.snapshot = Some(info);

        let complete = all_complete(&self.status);
        if reported_complete.is_some_and(|r| r != complete) {
            tracing::debug!(
                session = %self.id,
                reported = ?reported_complete,
                derived = complete,
                "backend completeness disagrees with status fields"
            );
        }
    }

    /// Queues the status panel together with any ticket change. A ticket
    /// that is hidden or replaced goes out before the panel so the surface
    /// never draws it next to the new fields.
    fn queue_panel(&mut self, before: Option<String>) {
        let after = self.visible_ticket().map(str::to_string);
        let changed = after != before;
        if changed && before.is_some() {
            self.updates.push(ViewUpdate::Ticket(after.clone()));
        }
        self.updates.push(ViewUpdate::Status(self.status.clone()));
        if changed && before.is_none() {
            self.updates.push(ViewUpdate::Ticket(after));
        }
    }
}
