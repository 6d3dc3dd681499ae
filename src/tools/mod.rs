/// Tools Module
///
/// This module contains all MCP tool implementations. Each tool module
/// exports a `register` function that adds its tools to the registry during
/// server initialization.

pub mod calculator;
