//! Core conversation components
//!
//! The orchestrator owns the message store, the input controller and the
//! pending notifications, and is the only place they change.

mod input;
mod notification;
mod orchestrator;

pub use notification::{Notification, NotificationText};
pub use orchestrator::{ConversationSnapshot, Orchestrator, Rejection, SubmitOutcome};
