//! Interface copy loaded from TOML
//!
//! Every piece of text the page shows around the conversation can be
//! overridden. All sections are optional.
//!
//! ```toml
//! [header]
//! title = "Project Starter Kit"
//! subtitle = "AI Assistant with Web Search"
//! github_url = "https://github.com/example/starter"
//!
//! [assistant]
//! name = "Claude"
//!
//! [welcome]
//! heading = "Welcome"
//! body = "Start a conversation."
//!
//! [input]
//! placeholder = "Message the assistant..."
//!
//! [notifications]
//! error_title = "Error"
//! fallback_message = "Failed to send message. Please try again."
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::NotificationText;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterfaceConfig {
    #[serde(default)]
    pub header: HeaderConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub welcome: WelcomeConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl InterfaceConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: InterfaceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.header.title.trim().is_empty() {
            return Err(ConfigError::Validation("header.title must not be blank".into()));
        }
        if self.notifications.fallback_message.trim().is_empty() {
            return Err(ConfigError::Validation(
                "notifications.fallback_message must not be blank".into(),
            ));
        }
        Ok(())
    }

    pub fn notification_text(&self) -> NotificationText {
        NotificationText {
            error_title: self.notifications.error_title.clone(),
            fallback_message: self.notifications.fallback_message.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_subtitle")]
    pub subtitle: String,

    /// Shown as a header link when set
    #[serde(default)]
    pub github_url: Option<String>,
}

fn default_title() -> String {
    "Project Starter Kit".to_string()
}

fn default_subtitle() -> String {
    "AI Assistant with Web Search".to_string()
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            github_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_name")]
    pub name: String,
}

fn default_assistant_name() -> String {
    "Claude".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeConfig {
    #[serde(default = "default_welcome_heading")]
    pub heading: String,

    #[serde(default = "default_welcome_body")]
    pub body: String,
}

fn default_welcome_heading() -> String {
    "Welcome to Project Starter Kit".to_string()
}

fn default_welcome_body() -> String {
    "Start a conversation with Claude. Toggle web search to get current information from the internet."
        .to_string()
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        Self {
            heading: default_welcome_heading(),
            body: default_welcome_body(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    #[serde(default = "default_hint")]
    pub hint: String,
}

fn default_placeholder() -> String {
    "Message the assistant...".to_string()
}

fn default_hint() -> String {
    "Web search is applied only if the server supports it".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            hint: default_hint(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_error_title")]
    pub error_title: String,

    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

fn default_error_title() -> String {
    NotificationText::default().error_title
}

fn default_fallback_message() -> String {
    NotificationText::default().fallback_message
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            error_title: default_error_title(),
            fallback_message: default_fallback_message(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}
