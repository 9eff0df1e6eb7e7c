//! Literal expression evaluation.
//!
//! Schema and document attributes are evaluated with an empty
//! [`hcl::eval::Context`]: literals, arrays, objects and operators work,
//! while variable references and function calls fail to evaluate.

use hcl::Value;
use hcl::eval::{Context, Evaluate};
use hcl_edit::structure::Attribute;

/// Evaluates the value expression of `attr`.
///
/// # Errors
///
/// Returns the evaluator's error message if the expression cannot be
/// evaluated without variables or functions.
pub fn evaluate_attribute(attr: &Attribute) -> Result<Value, String> {
    let expr = hcl::Expression::from(attr.value.clone());
    expr.evaluate(&Context::new())
        .map_err(|err| err.to_string())
}

/// Evaluates `attr` and returns its value if it is a string.
pub fn string_value(attr: &Attribute) -> Option<String> {
    match evaluate_attribute(attr).ok()? {
        Value::String(s) => Some(s),
        _ => None,
    }
}
