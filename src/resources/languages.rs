/// Programming Language Resources
///
/// A read-only catalogue served at two URIs:
/// - `http://localhost/programming/languages`: summary of every language
/// - `http://localhost/programming/languages/{language_id}`: one language,
///   looked up case-insensitively

use serde_json::{Value, json};

use crate::core::errors::RegistryError;
use crate::core::registry::{MCPResource, Registry};

pub const LANGUAGES_URI: &str = "http://localhost/programming/languages";
pub const LANGUAGE_DETAIL_URI: &str = "http://localhost/programming/languages/{language_id}";

struct Language {
    id: &'static str,
    name: &'static str,
    creator: &'static str,
    year: u16,
    paradigms: &'static [&'static str],
    description: &'static str,
}

static LANGUAGES: [Language; 3] = [
    Language {
        id: "python",
        name: "Python",
        creator: "Guido van Rossum",
        year: 1991,
        paradigms: &["object-oriented", "imperative", "functional", "procedural"],
        description: "Python is a high-level, general-purpose programming language.",
    },
    Language {
        id: "typescript",
        name: "TypeScript",
        creator: "Microsoft",
        year: 2012,
        paradigms: &["object-oriented", "functional"],
        description: "TypeScript is a strongly typed programming language that builds on JavaScript.",
    },
    Language {
        id: "rust",
        name: "Rust",
        creator: "Graydon Hoare",
        year: 2010,
        paradigms: &["concurrent", "functional", "imperative", "structured"],
        description: "Rust is a multi-paradigm, high-level, general-purpose programming language.",
    },
];

/// Register the collection and detail resources.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_resource(
        MCPResource::json(
            LANGUAGES_URI,
            "languages",
            "Get a list of programming languages.",
        ),
        Box::new(|_: Option<&str>| list_languages()),
    )?;
    registry.register_resource(
        MCPResource::json(
            LANGUAGE_DETAIL_URI,
            "language_detail",
            "Get details for a specific programming language.",
        ),
        Box::new(|id: Option<&str>| language_detail(id.unwrap_or_default())),
    )
}

pub fn list_languages() -> Value {
    let languages: Vec<Value> = LANGUAGES
        .iter()
        .map(|language| {
            json!({
                "name": language.name,
                "creator": language.creator,
                "year": language.year,
                "description": language.description,
            })
        })
        .collect();
    json!({ "languages": languages })
}

pub fn language_detail(language_id: &str) -> Value {
    let language_id = language_id.to_lowercase();
    match LANGUAGES.iter().find(|language| language.id == language_id) {
        Some(language) => json!({
            "name": language.name,
            "creator": language.creator,
            "year": language.year,
            "paradigms": language.paradigms,
            "description": language.description,
        }),
        None => json!({ "error": format!("Language {language_id} not found") }),
    }
}
