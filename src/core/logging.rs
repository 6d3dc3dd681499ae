/// Logging Setup
///
/// Installs a `tracing` subscriber whose filter comes from the resolved log
/// level. Actix emits through the `log` crate; those records are bridged into
/// `tracing` by the subscriber's `tracing-log` integration.

use clap::ValueEnum;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

use crate::core::errors::StartupError;

/// Targets belonging to the HTTP framework rather than this crate.
const FRAMEWORK_TARGETS: [&str; 2] = ["actix_web", "actix_server"];

/// Log levels accepted on the command line and in `LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Case-insensitive parse used for the `LOG_LEVEL` environment variable.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warning" | "warn" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            "critical" => Some(LogLevel::Critical),
            _ => None,
        }
    }

    /// Equivalent `tracing` filter directive. `critical` has no tracing
    /// counterpart and folds into `error`.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

/// Pick the effective level: explicit flag, then `LOG_LEVEL`, then `fallback`.
///
/// An unrecognized `LOG_LEVEL` value resolves to `info`.
pub fn resolve_log_level(
    flag: Option<LogLevel>,
    env_value: Option<&str>,
    fallback: LogLevel,
) -> LogLevel {
    match (flag, env_value) {
        (Some(level), _) => level,
        (None, Some(raw)) => LogLevel::parse(raw).unwrap_or(LogLevel::Info),
        (None, None) => fallback,
    }
}

/// Filter directives for `level`. Framework targets stay at `warn` unless
/// `debug` is set.
pub fn filter_directives(level: LogLevel, debug: bool) -> String {
    let framework = if debug { "debug" } else { "warn" };
    let mut directives = level.directive().to_string();
    for target in FRAMEWORK_TARGETS {
        directives.push_str(&format!(",{target}={framework}"));
    }
    directives
}

/// Initialize `tracing`. A second call is a no-op.
pub fn init_logging(level: LogLevel, debug: bool) -> Result<(), StartupError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = EnvFilter::try_new(filter_directives(level, debug))
        .map_err(|err| StartupError::Logging(err.to_string()))?;
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| StartupError::Logging(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_environment() {
        assert_eq!(
            resolve_log_level(Some(LogLevel::Error), Some("debug"), LogLevel::Info),
            LogLevel::Error
        );
    }

    #[test]
    fn environment_is_case_insensitive_with_info_fallback() {
        assert_eq!(
            resolve_log_level(None, Some("WARNING"), LogLevel::Info),
            LogLevel::Warning
        );
        assert_eq!(
            resolve_log_level(None, Some("verbose"), LogLevel::Error),
            LogLevel::Info
        );
        assert_eq!(resolve_log_level(None, None, LogLevel::Debug), LogLevel::Debug);
    }

    #[test]
    fn critical_folds_into_error() {
        assert_eq!(LogLevel::Critical.directive(), "error");
        assert_eq!(LogLevel::Warning.directive(), "warn");
    }

    #[test]
    fn framework_targets_quiet_unless_debug() {
        assert_eq!(
            filter_directives(LogLevel::Info, false),
            "info,actix_web=warn,actix_server=warn"
        );
        assert_eq!(
            filter_directives(LogLevel::Error, true),
            "error,actix_web=debug,actix_server=debug"
        );
    }

    #[test]
    fn directives_parse_as_env_filter() {
        assert!(EnvFilter::try_new(filter_directives(LogLevel::Critical, true)).is_ok());
    }
}
