//! Application configuration

pub mod interface;

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use interface::{ConfigError, InterfaceConfig};

const DEFAULT_COMPLETION_URL: &str = "http://127.0.0.1:54321/functions/v1/chat";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub completion_url: String,
    pub completion_api_key: Option<String>,
    pub interface_config: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            completion_url: env::var("COMPLETION_URL")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_URL.into()),
            completion_api_key: env::var("COMPLETION_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            interface_config: env::var("INTERFACE_CONFIG").ok().map(PathBuf::from),
        })
    }

    /// Interface copy from `INTERFACE_CONFIG`, or the built-in defaults
    pub fn load_interface(&self) -> Result<InterfaceConfig, ConfigError> {
        match &self.interface_config {
            Some(path) => InterfaceConfig::from_file(path),
            None => Ok(InterfaceConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config(interface_config: Option<PathBuf>) -> Config {
        Config {
            host: "127.0.0.1".into(),
            port: 3000,
            completion_url: DEFAULT_COMPLETION_URL.into(),
            completion_api_key: None,
            interface_config,
        }
    }

    #[test]
    fn test_default_interface_without_path() {
        let interface = config(None).load_interface().unwrap();
        assert_eq!(interface.header.title, "Project Starter Kit");
    }

    #[test]
    fn test_interface_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[header]\ntitle = \"Support Desk\"").unwrap();

        let interface = config(Some(file.path().to_path_buf()))
            .load_interface()
            .unwrap();
        assert_eq!(interface.header.title, "Support Desk");
    }

    #[test]
    fn test_missing_interface_file() {
        let err = config(Some(PathBuf::from("/nonexistent/interface.toml")))
            .load_interface()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
