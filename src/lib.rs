//! Library crate root: registry, transport and the example operations.

pub mod cli;
pub mod core;
pub mod prompts;
pub mod resources;
pub mod tools;
