/// Core Server Framework Module
///
/// - config.rs: server configuration record
/// - errors.rs: dispatch, registry and startup error types
/// - logging.rs: tracing subscriber setup
/// - registry.rs: tool/resource/prompt registry and dispatcher
/// - server.rs: JSON-RPC over HTTP transport
/// - utils.rs: small shared helpers

pub mod config;
pub mod errors;
pub mod logging;
pub mod registry;
pub mod server;
pub mod utils;
