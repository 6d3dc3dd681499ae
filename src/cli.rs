//! Command-line arguments and their merge into `ServerConfig`.
use clap::Parser;

use crate::core::config::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig, TransportMode};
use crate::core::logging::{LogLevel, resolve_log_level};

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "mcp-server-template", about = "MCP Server Template", long_about = None)]
pub struct LaunchArgs {
    /// HTTP server port (default: 8080).
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// HTTP server host (default: 0.0.0.0).
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,
    /// Transport type (default: http).
    #[arg(long, value_enum, default_value_t = TransportMode::Http)]
    pub transport: TransportMode,
    /// Enable debug mode.
    #[arg(long, default_value_t = false)]
    pub debug: bool,
    /// Set logging level (falls back to LOG_LEVEL, then info).
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
    /// Show version information and exit.
    #[arg(long, default_value_t = false)]
    pub version: bool,
}

impl LaunchArgs {
    /// Layer the parsed flags over `defaults`.
    ///
    /// `env_log_level` is the raw `LOG_LEVEL` value, consulted only when
    /// `--log-level` is absent.
    pub fn apply(&self, defaults: ServerConfig, env_log_level: Option<&str>) -> ServerConfig {
        let log_level = resolve_log_level(self.log_level, env_log_level, defaults.log_level);
        ServerConfig {
            port: self.port,
            host: self.host.clone(),
            debug: self.debug || defaults.debug,
            log_level,
            ..defaults
        }
    }
}

/// Line printed by `--version`.
pub fn version_line(config: &ServerConfig) -> String {
    format!("{} v{}", config.name, config.version)
}
