use std::sync::LazyLock;

use regex::Regex;

use crate::models::Message;

/// Number of most recent bot messages searched for a ticket.
pub const TICKET_SCAN_DEPTH: usize = 3;

static TICKET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"APPT-\d+").expect("ticket pattern is valid"));

/// Returns the first `APPT-<digits>` found in the last few bot messages,
/// checking the most recent message first.
pub fn find_ticket_number(transcript: &[Message]) -> Option<String> {
    transcript
        .iter()
        .rev()
        .filter(|m| m.is_bot())
        .take(TICKET_SCAN_DEPTH)
        .find_map(|m| TICKET_PATTERN.find(&m.text))
        .map(|m| m.as_str().to_string())
}
