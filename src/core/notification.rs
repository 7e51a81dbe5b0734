//! User-visible error notifications

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::providers::CompletionError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

/// Copy used when a completion fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationText {
    pub error_title: String,
    /// Shown when the error carries no usable message
    pub fallback_message: String,
}

impl Default for NotificationText {
    fn default() -> Self {
        Self {
            error_title: "Error".to_string(),
            fallback_message: "Failed to send message. Please try again.".to_string(),
        }
    }
}

impl NotificationText {
    pub fn for_error(&self, error: &CompletionError) -> Notification {
        let message = error.to_string();
        let body = if message.trim().is_empty() {
            self.fallback_message.clone()
        } else {
            message
        };
        Notification::new(self.error_title.clone(), body)
    }
}
