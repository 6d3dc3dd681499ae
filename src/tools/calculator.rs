/// Calculator Tools
///
/// Four binary arithmetic tools: `add`, `subtract`, `multiply` and `divide`.
/// Every result is `{result, operation, expression}`. Division by zero and
/// results that overflow the `f64` range are reported as
/// `{error, operation, expression}` instead of failing the call.

use serde_json::{Value, json};

use crate::core::errors::{DispatchError, RegistryError};
use crate::core::registry::{Arguments, MCPTool, ParamKind, ParamSpec, Registry};
use crate::core::utils::format_number;

type BinaryOp = fn(f64, f64) -> Value;

const OPERATIONS: [(&str, &str, BinaryOp); 4] = [
    ("add", "Add two numbers together.", add),
    ("subtract", "Subtract second number from first number.", subtract),
    ("multiply", "Multiply two numbers.", multiply),
    ("divide", "Divide first number by second number.", divide),
];

/// Register the calculator tools.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    for (name, description, op) in OPERATIONS {
        let tool = MCPTool::new(name, description, operands());
        let handler = move |args: &Arguments| -> Result<Value, DispatchError> {
            Ok(op(args.number("a")?, args.number("b")?))
        };
        registry.register_tool(tool, Box::new(handler))?;
    }
    Ok(())
}

fn operands() -> Vec<ParamSpec> {
    vec![
        ParamSpec::required("a", ParamKind::Number, "First number"),
        ParamSpec::required("b", ParamKind::Number, "Second number"),
    ]
}

fn outcome(operation: &str, symbol: &str, a: f64, b: f64, result: f64) -> Value {
    // JSON has no infinity; serde_json would emit `null`.
    if !result.is_finite() {
        return json!({
            "error": "Result is out of range",
            "operation": operation,
            "expression": format!(
                "{} {symbol} {} = undefined",
                format_number(a),
                format_number(b)
            ),
        });
    }
    json!({
        "result": result,
        "operation": operation,
        "expression": format!(
            "{} {symbol} {} = {}",
            format_number(a),
            format_number(b),
            format_number(result)
        ),
    })
}

pub fn add(a: f64, b: f64) -> Value {
    outcome("addition", "+", a, b, a + b)
}

pub fn subtract(a: f64, b: f64) -> Value {
    outcome("subtraction", "-", a, b, a - b)
}

pub fn multiply(a: f64, b: f64) -> Value {
    outcome("multiplication", "×", a, b, a * b)
}

pub fn divide(a: f64, b: f64) -> Value {
    // Also catches -0.0.
    if b == 0.0 {
        return json!({
            "error": "Division by zero is not allowed",
            "operation": "division",
            "expression": format!("{} ÷ {} = undefined", format_number(a), format_number(b)),
        });
    }
    outcome("division", "÷", a, b, a / b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        register(&mut registry).unwrap();
        registry
    }

    #[test]
    fn registers_all_four_tools_in_order() {
        let registry = registry();
        let names: Vec<&str> = registry.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["add", "subtract", "multiply", "divide"]);
        for tool in registry.tools() {
            assert_eq!(tool.input_schema["required"], json!(["a", "b"]));
        }
    }

    #[test]
    fn add_reports_operation_and_expression() {
        let out = registry().invoke_tool("add", &json!({ "a": 5, "b": 7 })).unwrap();
        assert_eq!(out["result"].as_f64(), Some(12.0));
        assert_eq!(out["operation"], "addition");
        assert_eq!(out["expression"], "5.0 + 7.0 = 12.0");
    }

    #[test]
    fn divide_six_by_three() {
        let out = registry().invoke_tool("divide", &json!({ "a": 6, "b": 3 })).unwrap();
        assert_eq!(out["result"].as_f64(), Some(2.0));
        assert_eq!(out["expression"], "6.0 ÷ 3.0 = 2.0");
    }

    #[test]
    fn divide_by_zero_is_a_structured_error() {
        let out = registry().invoke_tool("divide", &json!({ "a": 6, "b": 0 })).unwrap();
        assert_eq!(out["error"], "Division by zero is not allowed");
        assert_eq!(out["operation"], "division");
        assert_eq!(out["expression"], "6.0 ÷ 0.0 = undefined");
        assert!(out.get("result").is_none());

        let out = divide(1.5, -0.0);
        assert!(out.get("result").is_none());
        assert!(out.get("error").is_some());
    }

    #[test]
    fn overflowing_results_are_structured_errors() {
        let out = registry()
            .invoke_tool("add", &json!({ "a": 1.7e308, "b": 1.7e308 }))
            .unwrap();
        assert!(out.get("result").is_none());
        assert_eq!(out["error"], "Result is out of range");
        assert_eq!(out["operation"], "addition");
        assert_eq!(out["expression"], "1.7e+308 + 1.7e+308 = undefined");

        let out = multiply(-1e200, 1e200);
        assert!(out.get("result").is_none());
        assert_eq!(out["expression"], "-1e+200 × 1e+200 = undefined");

        let out = divide(1e308, 1e-10);
        assert!(out.get("result").is_none());
        assert_eq!(out["operation"], "division");
    }

    #[test]
    fn extreme_operands_render_in_exponent_form() {
        let out = add(1e16, 1e-7);
        assert_eq!(out["result"].as_f64(), Some(1e16));
        assert_eq!(out["expression"], "1e+16 + 1e-07 = 1e+16");
    }

    #[test]
    fn multiply_uses_times_sign() {
        let out = multiply(2.5, 4.0);
        assert_eq!(out["operation"], "multiplication");
        assert_eq!(out["expression"], "2.5 × 4.0 = 10.0");
    }

    #[test]
    fn string_operands_are_rejected_before_dispatch() {
        let err = registry()
            .invoke_tool("subtract", &json!({ "a": "5", "b": 1 }))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let registry = registry();
        let args = json!({ "a": 1.25, "b": -3 });
        for name in ["add", "subtract", "multiply", "divide"] {
            assert_eq!(
                registry.invoke_tool(name, &args).unwrap(),
                registry.invoke_tool(name, &args).unwrap()
            );
        }
    }

    proptest! {
        #[test]
        fn arithmetic_matches_operators(a in -1.0e9f64..1.0e9, b in -1.0e9f64..1.0e9) {
            let registry = registry();
            let args = json!({ "a": a, "b": b });
            let result = |name: &str| registry.invoke_tool(name, &args).unwrap()["result"].as_f64();
            prop_assert_eq!(result("add"), Some(a + b));
            prop_assert_eq!(result("subtract"), Some(a - b));
            prop_assert_eq!(result("multiply"), Some(a * b));
        }

        #[test]
        fn dividing_by_zero_never_yields_result(x in proptest::num::f64::NORMAL) {
            let out = registry().invoke_tool("divide", &json!({ "a": x, "b": 0 })).unwrap();
            prop_assert!(out.get("result").is_none());
            prop_assert!(out.get("error").is_some());
        }
    }
}
