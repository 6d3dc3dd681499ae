/// Math Problem Prompt
///
/// Wraps a problem statement in step-by-step solving instructions.

use crate::core::errors::{DispatchError, RegistryError};
use crate::core::registry::{Arguments, MCPPrompt, ParamKind, ParamSpec, Registry};

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    let prompt = MCPPrompt::new(
        "math_problem",
        "Create a prompt for solving a math problem.",
        vec![ParamSpec::required(
            "problem",
            ParamKind::String,
            "The problem to solve",
        )],
    );
    let handler = |args: &Arguments| -> Result<String, DispatchError> {
        Ok(math_problem(args.string("problem")?))
    };
    registry.register_prompt(prompt, Box::new(handler))
}

pub fn math_problem(problem: &str) -> String {
    format!(
        "Please solve this mathematical problem:

Problem: {problem}

Steps:
1. Understand what the problem is asking
2. Identify the mathematical concepts involved
3. Solve step-by-step
4. Verify your answer

Answer:"
    )
}
