use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Bot,
}

/// One transcript entry. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub origin: Origin,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Origin::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Origin::Bot)
    }

    fn new(text: impl Into<String>, origin: Origin) -> Self {
        Self {
            text: text.into(),
            origin,
            created_at: Utc::now(),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.origin == Origin::Bot
    }
}
