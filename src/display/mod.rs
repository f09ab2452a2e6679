pub mod terminal;

use std::io;

use crate::models::{FieldStatus, Message};

/// A single change the view-model asks the display to make.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    Append(Message),
    /// Drop every rendered entry past the first `keep`.
    Truncate { keep: usize },
    Status(Vec<FieldStatus>),
    /// `None` hides the ticket region.
    Ticket(Option<String>),
}

pub trait DisplaySurface {
    fn append_entry(&mut self, message: &Message) -> io::Result<()>;

    fn truncate_entries(&mut self, keep: usize) -> io::Result<()>;

    fn show_status(&mut self, fields: &[FieldStatus]) -> io::Result<()>;

    fn show_ticket(&mut self, ticket: Option<&str>) -> io::Result<()>;

    fn apply(&mut self, update: &ViewUpdate) -> io::Result<()> {
        match update {
            ViewUpdate::Append(message) => self.append_entry(message),
            ViewUpdate::Truncate { keep } => self.truncate_entries(*keep),
            ViewUpdate::Status(fields) => self.show_status(fields),
            ViewUpdate::Ticket(ticket) => self.show_ticket(ticket.as_deref()),
        }
    }
}

/// Records every update it receives. Useful wherever a surface is required
/// but nothing should be drawn.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub updates: Vec<ViewUpdate>,
}

impl DisplaySurface for RecordingSurface {
    fn append_entry(&mut self, message: &Message) -> io::Result<()> {
        self.updates.push(ViewUpdate::Append(message.clone()));
        Ok(())
    }

    fn truncate_entries(&mut self, keep: usize) -> io::Result<()> {
        self.updates.push(ViewUpdate::Truncate { keep });
        Ok(())
    }

    fn show_status(&mut self, fields: &[FieldStatus]) -> io::Result<()> {
        self.updates.push(ViewUpdate::Status(fields.to_vec()));
        Ok(())
    }

    fn show_ticket(&mut self, ticket: Option<&str>) -> io::Result<()> {
        self.updates.push(ViewUpdate::Ticket(ticket.map(str::to_string)));
        Ok(())
    }
}
