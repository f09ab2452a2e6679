use std::io::{self, Write};

use chrono::Local;

use super::DisplaySurface;
use crate::models::{FieldStatus, Message, Origin, StatusField};

const MISSING_LABEL: &str = "Missing";

/// Line-oriented surface. Entries are printed as they arrive, which keeps
/// the newest one in view without any scrolling logic.
pub struct TerminalSurface<W: Write> {
    out: W,
    entries: Vec<Message>,
    status: Vec<FieldStatus>,
    ticket: Option<String>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            entries: Vec::new(),
            status: Vec::new(),
            ticket: None,
        }
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn ticket(&self) -> Option<&str> {
        self.ticket.as_deref()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }

    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Prints the current status panel and ticket region. The ticket is left
    /// out while any field is missing.
    pub fn render_panel(&mut self) -> io::Result<()> {
        if self.status.is_empty() {
            writeln!(self.out, "Appointment: no details yet")?;
        } else {
            writeln!(self.out, "Appointment:")?;
            let width = self.status.iter().map(|f| f.field.len()).max().unwrap_or(0);
            for f in &self.status {
                let value = match &f.status {
                    StatusField::Complete(v) => v.as_str(),
                    StatusField::Missing => MISSING_LABEL,
                };
                writeln!(self.out, "  {:<width$}  {value}", f.field)?;
            }
        }
        if let Some(ticket) = &self.ticket {
            if self.status.iter().all(|f| f.status.is_complete()) {
                writeln!(self.out, "Ticket number: {ticket}")?;
            }
        }
        self.out.flush()
    }

    fn write_entry(&mut self, message: &Message) -> io::Result<()> {
        let who = match message.origin {
            Origin::User => "You",
            Origin::Bot => "Bot",
        };
        let stamp = message.created_at.with_timezone(&Local).format("%H:%M");
        let mut lines = message.text.lines();
        writeln!(self.out, "[{stamp}] {who}: {}", lines.next().unwrap_or(""))?;
        for line in lines {
            writeln!(self.out, "             {line}")?;
        }
        Ok(())
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn append_entry(&mut self, message: &Message) -> io::Result<()> {
        self.write_entry(message)?;
        self.entries.push(message.clone());
        self.out.flush()
    }

    fn truncate_entries(&mut self, keep: usize) -> io::Result<()> {
        self.entries.truncate(keep);
        writeln!(self.out, "---- conversation reset ----")?;
        let kept = self.entries.clone();
        for message in &kept {
            self.write_entry(message)?;
        }
        self.out.flush()
    }

    fn show_status(&mut self, fields: &[FieldStatus]) -> io::Result<()> {
        self.status = fields.to_vec();
        self.render_panel()
    }

    fn show_ticket(&mut self, ticket: Option<&str>) -> io::Result<()> {
        self.ticket = ticket.map(str::to_string);
        if let Some(ticket) = ticket {
            writeln!(self.out, "Ticket number: {ticket}")?;
        }
        self.out.flush()
    }
}
