/// Server Configuration
///
/// A plain value built once in `main` and handed to the transport by
/// reference. Defaults below; the CLI layers its overrides on top.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::core::logging::LogLevel;

pub const DEFAULT_NAME: &str = "MCP Server Template";
pub const DEFAULT_DESCRIPTION: &str = "A boilerplate for Model Context Protocol servers in Rust";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Channel carrying requests to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportMode {
    Http,
    /// Accepted on the command line but not implemented; startup fails.
    Stdio,
}

impl TransportMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Http => "http",
            TransportMode::Stdio => "stdio",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    pub name: String,
    pub description: String,
    pub version: String,
    pub port: u16,
    pub host: String,
    pub debug: bool,
    pub log_level: LogLevel,
    pub metadata: Map<String, Value>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let mut metadata = Map::new();
        metadata.insert(
            "github".to_string(),
            json!("https://github.com/yourusername/mcp-server-template-rust"),
        );

        Self {
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            debug: false,
            log_level: LogLevel::Info,
            metadata,
        }
    }
}

impl ServerConfig {
    /// Configuration as a JSON mapping.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// `host:port` pair handed to the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_template() {
        let config = ServerConfig::default();
        assert_eq!(config.name, "MCP Server Template");
        assert_eq!(config.version, "0.1.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert!(!config.debug);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn to_value_contains_every_field() {
        let value = ServerConfig::default().to_value();
        for key in [
            "name",
            "description",
            "version",
            "port",
            "host",
            "debug",
            "log_level",
            "metadata",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["log_level"], "info");
        assert!(value["metadata"]["github"].is_string());
    }
}
