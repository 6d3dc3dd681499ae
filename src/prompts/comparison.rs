/// Language Comparison Prompt

use crate::core::errors::{DispatchError, RegistryError};
use crate::core::registry::{Arguments, MCPPrompt, ParamKind, ParamSpec, Registry};

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    let prompt = MCPPrompt::new(
        "language_comparison",
        "Create a prompt for comparing programming languages.",
        vec![ParamSpec::required(
            "languages",
            ParamKind::StringList,
            "Programming languages to compare",
        )],
    );
    let handler = |args: &Arguments| -> Result<String, DispatchError> {
        Ok(language_comparison(&args.string_list("languages")?))
    };
    registry.register_prompt(prompt, Box::new(handler))
}

pub fn language_comparison(languages: &[&str]) -> String {
    let language_list = languages.join(", ");
    format!(
        "Please compare the following programming languages: {language_list}

For each language, please discuss:
- Key features and strengths
- Common use cases
- Ecosystem and community
- Performance characteristics

Then provide a concise comparison highlighting when each would be the best choice for different scenarios."
    )
}
