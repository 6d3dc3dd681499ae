/// Prompts Module
///
/// Text templates exposed through `prompts/list` and `prompts/get`. Each
/// module exports a `register` function called while the registry is built.

pub mod comparison;
pub mod math;
