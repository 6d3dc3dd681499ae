/// Error Types
///
/// Three families of failure exist in the server:
/// - `DispatchError`: per-request failures, terminal at the dispatch boundary
/// - `RegistryError`: registration mistakes made while building the registry
/// - `StartupError`: fatal errors raised before or while serving

use std::io;

use thiserror::Error;

/// JSON-RPC 2.0 error code for a request body that could not be parsed.
pub const PARSE_ERROR: i32 = -32700;
/// JSON-RPC 2.0 error code for an unknown method or unknown tool/prompt name.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC 2.0 error code for malformed or missing parameters.
pub const INVALID_PARAMS: i32 = -32602;
/// MCP error code for a resource URI that matches nothing.
pub const RESOURCE_NOT_FOUND: i32 = -32002;

/// Failure of a single tool call, resource read or prompt render.
///
/// These never escape the dispatcher as panics; the transport turns each one
/// into a structured response for the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),
    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },
    #[error("Parameter `{name}` must be {expected}")]
    InvalidParameterType { name: String, expected: &'static str },
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl DispatchError {
    /// JSON-RPC error code reported to the client for this failure.
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::UnknownTool(_) | DispatchError::UnknownPrompt(_) => METHOD_NOT_FOUND,
            DispatchError::UnknownResource(_) => RESOURCE_NOT_FOUND,
            DispatchError::MissingParameter { .. }
            | DispatchError::InvalidParameterType { .. }
            | DispatchError::InvalidArguments(_) => INVALID_PARAMS,
        }
    }

    /// True for failures caused by the caller's arguments rather than a lookup miss.
    pub fn is_validation(&self) -> bool {
        self.code() == INVALID_PARAMS
    }
}

/// Mistakes detected while populating the registry at startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool `{0}` is already registered")]
    DuplicateTool(String),
    #[error("resource `{0}` is already registered")]
    DuplicateResource(String),
    #[error("prompt `{0}` is already registered")]
    DuplicatePrompt(String),
    #[error("invalid URI template `{template}`: {reason}")]
    InvalidTemplate {
        template: String,
        reason: &'static str,
    },
}

/// Errors that stop the process with exit code 1.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("transport `{0}` is not supported in this version; use `http`")]
    UnsupportedTransport(&'static str),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("HTTP server error: {0}")]
    Serve(#[source] io::Error),
    #[error("failed to build registry: {0}")]
    Registry(#[from] RegistryError),
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_misses_and_validation_failures_use_distinct_codes() {
        assert_eq!(DispatchError::UnknownTool("x".into()).code(), METHOD_NOT_FOUND);
        assert_eq!(DispatchError::UnknownPrompt("x".into()).code(), METHOD_NOT_FOUND);
        assert_eq!(
            DispatchError::UnknownResource("x".into()).code(),
            RESOURCE_NOT_FOUND
        );
        assert!(DispatchError::MissingParameter { name: "a".into() }.is_validation());
        assert!(!DispatchError::UnknownTool("x".into()).is_validation());
    }

    #[test]
    fn messages_name_the_offending_parameter() {
        let err = DispatchError::InvalidParameterType {
            name: "b".into(),
            expected: "a number",
        };
        assert_eq!(err.to_string(), "Parameter `b` must be a number");
        let err = DispatchError::MissingParameter { name: "a".into() };
        assert_eq!(err.to_string(), "Missing required parameter: a");
    }
}
