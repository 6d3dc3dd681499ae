/// Resources Module
///
/// Read-only, URI-addressed data. Each module exports a `register` function
/// called while the registry is built.

pub mod languages;
