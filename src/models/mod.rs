pub mod appointment;
pub mod message;
pub mod reply;

pub use appointment::{all_complete, derive_status_fields, AppointmentInfo, FieldStatus, StatusField};
pub use message::{Message, Origin};
pub use reply::{ChatReply, ChatRequest};
