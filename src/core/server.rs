/// MCP Server Implementation
///
/// This module contains the HTTP side of the MCP server:
/// - JSON-RPC 2.0 request/response structures
/// - Registry initialization
/// - Request dispatch for the MCP protocol methods
/// - HTTP server setup with Actix Web
///
/// The stdio transport is accepted on the command line but rejected at
/// startup with `StartupError::UnsupportedTransport`.

use actix_web::{
    App, HttpRequest, HttpResponse, HttpServer, Result,
    error::{InternalError, JsonPayloadError},
    middleware::{Compress, DefaultHeaders, Logger},
    web,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::config::{ServerConfig, TransportMode};
use crate::core::errors::{
    DispatchError, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, RegistryError, StartupError,
};
use crate::core::registry::Registry;
use crate::core::utils::{get_env_var, server_url};
use crate::{prompts, resources, tools};

/// MCP protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Application state shared across all worker threads in HTTP mode.
#[derive(Clone)]
pub struct AppState {
    /// Server name as reported in MCP initialize responses
    pub server_name: String,
    /// Server version string as reported in MCP initialize responses
    pub server_version: String,
    /// Returned as `instructions` from initialize
    pub description: String,
    pub metadata: Map<String, Value>,
    pub registry: Arc<Registry>,
    /// Total JSON-RPC requests received since start
    pub requests: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: &ServerConfig, registry: Arc<Registry>) -> Self {
        Self {
            server_name: config.name.clone(),
            server_version: config.version.clone(),
            description: config.description.clone(),
            metadata: config.metadata.clone(),
            registry,
            requests: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// JSON-RPC 2.0 request structure for MCP protocol.
///
/// `id` is None only when the member is absent (a notification). An explicit
/// `"id": null` is kept as `Some(Value::Null)` and still gets a response.
#[derive(Deserialize, Debug)]
pub struct MCPRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    #[serde(default, deserialize_with = "present_id")]
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC 2.0 response structure for MCP protocol.
///
/// Exactly one of `result` and `error` is present.
#[derive(Serialize, Debug)]
pub struct MCPResponse {
    jsonrpc: String,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<MCPError>,
}

impl MCPResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, error: MCPError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error structure.
#[derive(Serialize, Debug)]
pub struct MCPError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl MCPError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl From<DispatchError> for MCPError {
    fn from(err: DispatchError) -> Self {
        MCPError::new(err.code(), err.to_string())
    }
}

/// Build the registry with every example tool, resource and prompt.
///
/// Add new registrations here when implementing additional operations.
pub fn initialize_registry() -> Result<Arc<Registry>, RegistryError> {
    let mut registry = Registry::new();

    tools::calculator::register(&mut registry)?;
    resources::languages::register(&mut registry)?;
    prompts::math::register(&mut registry)?;
    prompts::comparison::register(&mut registry)?;

    Ok(Arc::new(registry))
}

/// Route one JSON-RPC request to its method handler.
///
/// Every outcome, including unknown methods and dispatch failures, becomes a
/// well-formed response.
pub fn dispatch(state: &AppState, req: MCPRequest) -> MCPResponse {
    let MCPRequest {
        id, method, params, ..
    } = req;
    debug!(method = %method, "Dispatching MCP request");

    let registry = &state.registry;
    let outcome = match method.as_str() {
        "initialize" => Ok(handle_initialize(state)),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({ "tools": registry.tools() })),
        "tools/call" => handle_tools_call(registry, params),
        "resources/list" => Ok(handle_resources_list(registry)),
        "resources/templates/list" => Ok(handle_resource_templates_list(registry)),
        "resources/read" => handle_resources_read(registry, params),
        "prompts/list" => Ok(json!({ "prompts": registry.prompts() })),
        "prompts/get" => handle_prompts_get(registry, params),
        _ => Err(MCPError::new(
            METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
        )),
    };

    match outcome {
        Ok(result) => MCPResponse::success(id, result),
        Err(error) => {
            debug!(
                method = %method,
                code = error.code,
                message = %error.message,
                "MCP request failed"
            );
            MCPResponse::failure(id, error)
        }
    }
}

/// Handle the MCP `initialize` handshake.
///
/// # Arguments
/// * `state` - Application state carrying the server name, version and description
///
/// # Returns
/// Protocol version, capabilities and server info
fn handle_initialize(state: &AppState) -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {},
            "resources": {},
            "prompts": {}
        },
        "serverInfo": {
            "name": state.server_name,
            "version": state.server_version
        },
        "instructions": state.description
    })
}

/// Execute a tool. Argument problems are reported inside the tool result
/// (`isError: true`); an unknown tool is a JSON-RPC error.
///
/// # Arguments
/// * `registry` - Registry holding the tool handlers
/// * `params` - `{name, arguments}` from the request
fn handle_tools_call(registry: &Registry, params: Option<Value>) -> Result<Value, MCPError> {
    let params = params.ok_or_else(|| MCPError::new(INVALID_PARAMS, "Invalid params"))?;
    let name = string_param(&params, "name")?;
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    match registry.invoke_tool(name, &arguments) {
        Ok(result) => Ok(json!({
            "content": [
                {
                    "type": "text",
                    "text": serde_json::to_string(&result).unwrap_or_default()
                }
            ],
            "isError": false
        })),
        Err(err) if err.is_validation() => {
            debug!(tool = name, error = %err, "Rejected tool arguments");
            Ok(json!({
                "content": [
                    {
                        "type": "text",
                        "text": format!("Error: {err}")
                    }
                ],
                "isError": true
            }))
        }
        Err(err) => Err(err.into()),
    }
}

/// List resources with a concrete URI. Templates are listed separately.
fn handle_resources_list(registry: &Registry) -> Value {
    let resources: Vec<_> = registry.resources().collect();
    json!({ "resources": resources })
}

/// List resources whose URI contains a `{placeholder}`.
fn handle_resource_templates_list(registry: &Registry) -> Value {
    let templates: Vec<Value> = registry
        .resource_templates()
        .map(|resource| {
            json!({
                "uriTemplate": resource.uri,
                "name": resource.name,
                "description": resource.description,
                "mimeType": resource.mime_type
            })
        })
        .collect();
    json!({ "resourceTemplates": templates })
}

/// Read a resource by URI.
///
/// # Arguments
/// * `registry` - Registry holding the resource handlers
/// * `params` - `{uri}` from the request
///
/// # Returns
/// The payload serialized as JSON text inside `contents`, or `-32002` when
/// no exact URI or template matches
fn handle_resources_read(registry: &Registry, params: Option<Value>) -> Result<Value, MCPError> {
    let params = params.ok_or_else(|| MCPError::new(INVALID_PARAMS, "Invalid params"))?;
    let uri = string_param(&params, "uri")?;
    let payload = registry.resolve_resource(uri)?;

    Ok(json!({
        "contents": [
            {
                "uri": uri,
                "mimeType": "application/json",
                "text": serde_json::to_string(&payload).unwrap_or_default()
            }
        ]
    }))
}

/// Render a prompt into a single user message.
///
/// # Arguments
/// * `registry` - Registry holding the prompt handlers
/// * `params` - `{name, arguments}` from the request
fn handle_prompts_get(registry: &Registry, params: Option<Value>) -> Result<Value, MCPError> {
    let params = params.ok_or_else(|| MCPError::new(INVALID_PARAMS, "Invalid params"))?;
    let name = string_param(&params, "name")?;
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
    let text = registry.render_prompt(name, &arguments)?;
    let description = registry
        .prompt(name)
        .map(|prompt| prompt.description.clone())
        .unwrap_or_default();

    Ok(json!({
        "description": description,
        "messages": [
            {
                "role": "user",
                "content": {
                    "type": "text",
                    "text": text
                }
            }
        ]
    }))
}

/// Extract a required string member from request params.
///
/// # Arguments
/// * `params` - The request's `params` object
/// * `key` - Member name
///
/// # Returns
/// The string, or an invalid-params error when absent or not a string
fn string_param<'p>(params: &'p Value, key: &str) -> Result<&'p str, MCPError> {
    params.get(key).and_then(Value::as_str).ok_or_else(|| {
        MCPError::new(INVALID_PARAMS, format!("Missing required parameter: {key}"))
    })
}

/// Health check endpoint handler.
///
/// # Arguments
/// * `state` - Application state
///
/// # Returns
/// JSON with status, service name, version and metadata
async fn health(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": state.server_name,
        "version": state.server_version,
        "metadata": state.metadata
    })))
}

/// Metrics endpoint handler: total JSON-RPC requests since start.
async fn metrics_handler(state: web::Data<AppState>) -> Result<HttpResponse> {
    let count = state.requests.load(Ordering::Relaxed);
    Ok(HttpResponse::Ok().json(json!({
        "requests_total": count,
        "status": "ok"
    })))
}

/// MCP JSON-RPC request handler.
///
/// Notifications (no `id` member) get `202 Accepted` with an empty body.
///
/// # Arguments
/// * `state` - Application state
/// * `req` - The decoded JSON-RPC request
async fn mcp_handler(
    state: web::Data<AppState>,
    req: web::Json<MCPRequest>,
) -> Result<HttpResponse> {
    // Relaxed is enough: the counter is only ever read for reporting.
    state.requests.fetch_add(1, Ordering::Relaxed);

    let req = req.into_inner();
    if req.id.is_none() {
        debug!(method = %req.method, "Received notification");
        return Ok(HttpResponse::Accepted().finish());
    }

    Ok(HttpResponse::Ok().json(dispatch(&state, req)))
}

/// Turn body deserialization failures into JSON-RPC parse errors.
///
/// # Arguments
/// * `err` - The payload error raised by the JSON extractor
/// * `_req` - The offending request (unused)
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "Rejected malformed JSON-RPC request");
    let error = MCPError::new(PARSE_ERROR, format!("Parse error: {err}"));
    let body = MCPResponse::failure(None, error);
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Register routes. Shared by `run_server_http` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health))
        .route("/metrics", web::get().to(metrics_handler))
        .route("/mcp", web::post().to(mcp_handler))
        .route("/", web::post().to(mcp_handler))
        .route("/", web::get().to(health));
}

/// Start the server on the selected transport.
pub async fn run(config: &ServerConfig, transport: TransportMode) -> Result<(), StartupError> {
    match transport {
        TransportMode::Http => run_server_http(config).await,
        TransportMode::Stdio => Err(StartupError::UnsupportedTransport(transport.as_str())),
    }
}

/// Run the MCP server in HTTP mode.
///
/// # Configuration
/// - Worker threads: `WORKER_THREADS`, else CPU count (max 16)
/// - Max connections: 10,000 concurrent connections
/// - Connection rate limit: 1,000 connections per second
/// - Keep-alive: 30 seconds
/// - Request timeout: 30 seconds
/// - Disconnect timeout: 2 seconds
/// - Shutdown timeout: 10 seconds
///
/// Returns once actix has shut down gracefully after SIGINT/SIGTERM.
pub async fn run_server_http(config: &ServerConfig) -> Result<(), StartupError> {
    let bind_addr = config.bind_addr();
    let state = web::Data::new(AppState::new(config, initialize_registry()?));
    let registry = &state.registry;

    let workers = get_env_var("WORKER_THREADS", "")
        .parse::<usize>()
        .ok()
        .filter(|&workers| workers > 0)
        .unwrap_or_else(|| num_cpus::get().clamp(1, 16));

    info!(
        name = %config.name,
        version = %config.version,
        bind_addr = %bind_addr,
        workers,
        debug = config.debug,
        tools = registry.tools().len(),
        resources = registry.resources().count() + registry.resource_templates().count(),
        prompts = registry.prompts().len(),
        "Starting MCP server"
    );

    let app_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            // Enable compression for JSON responses (gzip/brotli)
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
                    .add(("X-XSS-Protection", "1; mode=block")),
            )
            // %r = request line, %s = status, %D = duration in milliseconds
            .wrap(Logger::new("%r %s %Dms"))
            .configure(configure)
    })
    .workers(workers)
    .max_connections(10000)
    .max_connection_rate(1000)
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_secs(30))
    .client_disconnect_timeout(Duration::from_secs(2))
    .shutdown_timeout(10)
    .bind(&bind_addr)
    .map_err(|source| StartupError::Bind {
        addr: bind_addr.clone(),
        source,
    })?;

    info!(
        url = %server_url(&config.host, config.port, false),
        "MCP server listening"
    );

    server.run().await.map_err(StartupError::Serve)?;
    info!("Server stopped");
    Ok(())
}
