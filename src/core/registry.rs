/// Registry & Dispatcher
///
/// Holds the three name-keyed collections the server exposes:
/// - tools: named operations with a typed parameter schema
/// - resources: URI-addressed read-only payloads, exact or single-placeholder templates
/// - prompts: named text templates
///
/// Everything is registered explicitly at startup. After that the registry is
/// shared read-only behind an `Arc`, so dispatch needs no locking.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::core::errors::{DispatchError, RegistryError};

/// Value type accepted by a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Number,
    String,
    StringList,
}

impl ParamKind {
    /// JSON Schema fragment describing this kind.
    pub fn json_schema(self) -> Value {
        match self {
            ParamKind::Number => json!({ "type": "number" }),
            ParamKind::String => json!({ "type": "string" }),
            ParamKind::StringList => json!({ "type": "array", "items": { "type": "string" } }),
        }
    }

    fn expected(self) -> &'static str {
        match self {
            ParamKind::Number => "a number",
            ParamKind::String => "a string",
            ParamKind::StringList => "a list of strings",
        }
    }

    // Booleans are not numbers, even though some clients coerce them.
    fn accepts(self, value: &Value) -> bool {
        match self {
            ParamKind::Number => value.is_number(),
            ParamKind::String => value.is_string(),
            ParamKind::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

/// A single named parameter of a tool or prompt.
///
/// Serializes to the MCP prompt argument shape `{name, description, required}`;
/// tools expose the kind through their generated `inputSchema` instead.
#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(skip)]
    pub kind: ParamKind,
}

impl ParamSpec {
    pub fn required(name: &str, kind: ParamKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            required: true,
            kind,
        }
    }

    pub fn optional(name: &str, kind: ParamKind, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }
}

/// Arguments that passed validation against a parameter list.
#[derive(Debug, Clone, Default)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Check raw JSON arguments against `params`.
    ///
    /// `null` arguments are treated as an empty object and a `null` field as
    /// absent. Fields not named in `params` are ignored.
    pub fn validate(params: &[ParamSpec], raw: &Value) -> Result<Self, DispatchError> {
        let map = match raw {
            Value::Null => Map::new(),
            Value::Object(map) => map.clone(),
            _ => {
                return Err(DispatchError::InvalidArguments(
                    "arguments must be a JSON object".to_string(),
                ));
            }
        };

        for spec in params {
            match map.get(&spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        return Err(DispatchError::MissingParameter {
                            name: spec.name.clone(),
                        });
                    }
                }
                Some(value) if !spec.kind.accepts(value) => {
                    return Err(DispatchError::InvalidParameterType {
                        name: spec.name.clone(),
                        expected: spec.kind.expected(),
                    });
                }
                Some(_) => {}
            }
        }

        Ok(Self(map))
    }

    pub fn number(&self, name: &str) -> Result<f64, DispatchError> {
        self.0
            .get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| missing(name))
    }

    pub fn string(&self, name: &str) -> Result<&str, DispatchError> {
        self.0
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| missing(name))
    }

    pub fn string_list(&self, name: &str) -> Result<Vec<&str>, DispatchError> {
        let items = self
            .0
            .get(name)
            .and_then(Value::as_array)
            .ok_or_else(|| missing(name))?;
        items
            .iter()
            .map(|item| {
                item.as_str().ok_or_else(|| DispatchError::InvalidParameterType {
                    name: name.to_string(),
                    expected: ParamKind::StringList.expected(),
                })
            })
            .collect()
    }
}

fn missing(name: &str) -> DispatchError {
    DispatchError::MissingParameter {
        name: name.to_string(),
    }
}

/// MCP tool definition structure.
///
/// Serialized as `{name, description, inputSchema}` for `tools/list`. The
/// schema is generated from `params`, which also drive argument validation.
#[derive(Debug, Clone, Serialize)]
pub struct MCPTool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    #[serde(skip)]
    pub params: Vec<ParamSpec>,
}

impl MCPTool {
    pub fn new(name: &str, description: &str, params: Vec<ParamSpec>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: input_schema(&params),
            params,
        }
    }
}

fn input_schema(params: &[ParamSpec]) -> Value {
    let mut properties = Map::new();
    for spec in params {
        let mut schema = spec.kind.json_schema();
        if let Some(object) = schema.as_object_mut() {
            object.insert("description".to_string(), Value::from(spec.description.clone()));
        }
        properties.insert(spec.name.clone(), schema);
    }
    let required: Vec<&str> = params
        .iter()
        .filter(|spec| spec.required)
        .map(|spec| spec.name.as_str())
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

/// Tool handler function type definition.
///
/// Handlers receive arguments already validated against the tool's params.
/// Domain failures (such as division by zero) are part of the returned value;
/// `Err` is reserved for argument problems.
pub type ToolHandler = Box<dyn Fn(&Arguments) -> Result<Value, DispatchError> + Send + Sync>;

/// Registry of available MCP tools.
#[derive(Default)]
pub struct ToolRegistry {
    /// Registered tools in registration order (for tools/list)
    tools: Vec<MCPTool>,
    /// Map of tool names to their handler functions (for tools/call)
    handlers: HashMap<String, ToolHandler>,
}

impl ToolRegistry {
    pub fn register(&mut self, tool: MCPTool, handler: ToolHandler) -> Result<(), RegistryError> {
        if self.handlers.contains_key(&tool.name) {
            return Err(RegistryError::DuplicateTool(tool.name));
        }
        self.handlers.insert(tool.name.clone(), handler);
        self.tools.push(tool);
        Ok(())
    }

    pub fn list(&self) -> &[MCPTool] {
        &self.tools
    }

    pub fn invoke(&self, name: &str, args: &Value) -> Result<Value, DispatchError> {
        let (Some(tool), Some(handler)) = (
            self.tools.iter().find(|tool| tool.name == name),
            self.handlers.get(name),
        ) else {
            return Err(DispatchError::UnknownTool(name.to_string()));
        };
        let arguments = Arguments::validate(&tool.params, args)?;
        handler(&arguments)
    }
}

/// Parsed resource URI template.
///
/// Only one placeholder is supported, and it matches exactly one non-empty
/// path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriTemplate {
    Exact(String),
    Placeholder {
        prefix: String,
        name: String,
        suffix: String,
    },
}

impl UriTemplate {
    pub fn parse(template: &str) -> Result<Self, RegistryError> {
        let invalid = |reason| RegistryError::InvalidTemplate {
            template: template.to_string(),
            reason,
        };

        let Some(open) = template.find('{') else {
            if template.contains('}') {
                return Err(invalid("unbalanced `}`"));
            }
            return Ok(UriTemplate::Exact(template.to_string()));
        };
        let prefix = &template[..open];
        let rest = &template[open + 1..];
        let close = rest.find('}').ok_or_else(|| invalid("unterminated placeholder"))?;
        let name = &rest[..close];
        let suffix = &rest[close + 1..];

        if prefix.contains('}') {
            return Err(invalid("unbalanced `}`"));
        }
        if name.is_empty() || name.contains('{') {
            return Err(invalid("placeholder needs a name"));
        }
        if suffix.contains('{') || suffix.contains('}') {
            return Err(invalid("only one placeholder is supported"));
        }

        Ok(UriTemplate::Placeholder {
            prefix: prefix.to_string(),
            name: name.to_string(),
            suffix: suffix.to_string(),
        })
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, UriTemplate::Exact(_))
    }

    /// Match `uri` against this template.
    ///
    /// Returns `None` on no match, `Some(None)` for an exact match and
    /// `Some(Some(value))` with the captured placeholder value otherwise.
    pub fn capture<'u>(&self, uri: &'u str) -> Option<Option<&'u str>> {
        match self {
            UriTemplate::Exact(exact) => (exact == uri).then_some(None),
            UriTemplate::Placeholder { prefix, suffix, .. } => {
                let value = uri.strip_prefix(prefix.as_str())?.strip_suffix(suffix.as_str())?;
                (!value.is_empty() && !value.contains('/')).then_some(Some(value))
            }
        }
    }
}

/// MCP resource definition.
///
/// `uri` is either a concrete URI or a template such as `.../{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MCPResource {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

impl MCPResource {
    pub fn json(uri: &str, name: &str, description: &str) -> Self {
        Self {
            uri: uri.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            mime_type: "application/json".to_string(),
        }
    }
}

/// Resource resolver. Receives the placeholder value for template resources.
pub type ResourceHandler = Box<dyn Fn(Option<&str>) -> Value + Send + Sync>;

struct ResourceEntry {
    definition: MCPResource,
    template: UriTemplate,
    handler: ResourceHandler,
}

#[derive(Default)]
pub struct ResourceRegistry {
    entries: Vec<ResourceEntry>,
}

impl ResourceRegistry {
    pub fn register(
        &mut self,
        resource: MCPResource,
        handler: ResourceHandler,
    ) -> Result<(), RegistryError> {
        if self.entries.iter().any(|entry| entry.definition.uri == resource.uri) {
            return Err(RegistryError::DuplicateResource(resource.uri));
        }
        let template = UriTemplate::parse(&resource.uri)?;
        self.entries.push(ResourceEntry {
            definition: resource,
            template,
            handler,
        });
        Ok(())
    }

    /// Concrete resources (no placeholder).
    pub fn list(&self) -> impl Iterator<Item = &MCPResource> {
        self.entries
            .iter()
            .filter(|entry| entry.template.is_exact())
            .map(|entry| &entry.definition)
    }

    /// Template resources (one placeholder).
    pub fn templates(&self) -> impl Iterator<Item = &MCPResource> {
        self.entries
            .iter()
            .filter(|entry| !entry.template.is_exact())
            .map(|entry| &entry.definition)
    }

    /// Exact URIs win over templates; templates are tried in registration order.
    pub fn resolve(&self, uri: &str) -> Result<Value, DispatchError> {
        let exact = self
            .entries
            .iter()
            .filter(|entry| entry.template.is_exact())
            .find_map(|entry| entry.template.capture(uri).map(|captured| (entry, captured)));
        let matched = exact.or_else(|| {
            self.entries
                .iter()
                .filter(|entry| !entry.template.is_exact())
                .find_map(|entry| entry.template.capture(uri).map(|captured| (entry, captured)))
        });

        match matched {
            Some((entry, captured)) => Ok((entry.handler)(captured)),
            None => Err(DispatchError::UnknownResource(uri.to_string())),
        }
    }
}

/// MCP prompt definition, serialized as `{name, description, arguments}`.
#[derive(Debug, Clone, Serialize)]
pub struct MCPPrompt {
    pub name: String,
    pub description: String,
    pub arguments: Vec<ParamSpec>,
}

impl MCPPrompt {
    pub fn new(name: &str, description: &str, arguments: Vec<ParamSpec>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            arguments,
        }
    }
}

pub type PromptHandler = Box<dyn Fn(&Arguments) -> Result<String, DispatchError> + Send + Sync>;

#[derive(Default)]
pub struct PromptRegistry {
    prompts: Vec<MCPPrompt>,
    handlers: HashMap<String, PromptHandler>,
}

impl PromptRegistry {
    pub fn register(
        &mut self,
        prompt: MCPPrompt,
        handler: PromptHandler,
    ) -> Result<(), RegistryError> {
        if self.handlers.contains_key(&prompt.name) {
            return Err(RegistryError::DuplicatePrompt(prompt.name));
        }
        self.handlers.insert(prompt.name.clone(), handler);
        self.prompts.push(prompt);
        Ok(())
    }

    pub fn list(&self) -> &[MCPPrompt] {
        &self.prompts
    }

    pub fn get(&self, name: &str) -> Option<&MCPPrompt> {
        self.prompts.iter().find(|prompt| prompt.name == name)
    }

    pub fn render(&self, name: &str, args: &Value) -> Result<String, DispatchError> {
        let (Some(prompt), Some(handler)) = (self.get(name), self.handlers.get(name)) else {
            return Err(DispatchError::UnknownPrompt(name.to_string()));
        };
        let arguments = Arguments::validate(&prompt.arguments, args)?;
        handler(&arguments)
    }
}

/// Process-wide registry of tools, resources and prompts.
#[derive(Default)]
pub struct Registry {
    tools: ToolRegistry,
    resources: ResourceRegistry,
    prompts: PromptRegistry,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with its handler function.
    ///
    /// # Arguments
    /// * `tool` - Tool definition; its params drive validation and `inputSchema`
    /// * `handler` - Function to execute when the tool is called
    ///
    /// # Errors
    /// `RegistryError::DuplicateTool` if the name is already taken
    pub fn register_tool(
        &mut self,
        tool: MCPTool,
        handler: ToolHandler,
    ) -> Result<(), RegistryError> {
        self.tools.register(tool, handler)
    }

    /// Register a resource under a concrete URI or a single-placeholder template.
    ///
    /// # Errors
    /// `RegistryError::DuplicateResource` for a repeated URI, or
    /// `RegistryError::InvalidTemplate` for a malformed template
    pub fn register_resource(
        &mut self,
        resource: MCPResource,
        handler: ResourceHandler,
    ) -> Result<(), RegistryError> {
        self.resources.register(resource, handler)
    }

    pub fn register_prompt(
        &mut self,
        prompt: MCPPrompt,
        handler: PromptHandler,
    ) -> Result<(), RegistryError> {
        self.prompts.register(prompt, handler)
    }

    pub fn tools(&self) -> &[MCPTool] {
        self.tools.list()
    }

    pub fn resources(&self) -> impl Iterator<Item = &MCPResource> {
        self.resources.list()
    }

    pub fn resource_templates(&self) -> impl Iterator<Item = &MCPResource> {
        self.resources.templates()
    }

    pub fn prompts(&self) -> &[MCPPrompt] {
        self.prompts.list()
    }

    pub fn prompt(&self, name: &str) -> Option<&MCPPrompt> {
        self.prompts.get(name)
    }

    /// Look up `name`, validate `args` against its params and run it.
    pub fn invoke_tool(&self, name: &str, args: &Value) -> Result<Value, DispatchError> {
        self.tools.invoke(name, args)
    }

    /// Resolve a URI to its payload.
    ///
    /// # Arguments
    /// * `uri` - Concrete URI requested by the client
    ///
    /// # Errors
    /// `DispatchError::UnknownResource` when neither an exact URI nor a
    /// template matches
    pub fn resolve_resource(&self, uri: &str) -> Result<Value, DispatchError> {
        self.resources.resolve(uri)
    }

    pub fn render_prompt(&self, name: &str, args: &Value) -> Result<String, DispatchError> {
        self.prompts.render(name, args)
    }
}
