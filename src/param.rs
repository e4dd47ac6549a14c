//! Parameter schemas and formula values.
//!
//! Every command declares a fixed set of parameters with default values.
//! Values are raw [`serde_json::Value`]s: numbers and strings pass through
//! uncoerced, and a string starting with `=[` is a formula that the renderer
//! evaluates. The core never performs arithmetic on formulas.

use serde_json::Value;

use crate::error::CommandError;

/// Marker prefix for formula values, e.g. `=[yPos] + 4.5`.
pub const FORMULA_PREFIX: &str = "=[";

/// Returns true if `value` is a formula string to be evaluated by the renderer.
pub fn is_formula(value: &Value) -> bool {
    value.as_str().map_or(false, |s| s.starts_with(FORMULA_PREFIX))
}

/// Renders a relative-position formula referencing `variable` with `margin`.
///
/// The margin is rendered verbatim with its sign, so a margin of `-2.5`
/// yields `=[name] + -2.5`.
pub fn relative_formula(variable: &str, margin: f64) -> String {
    format!("=[{}] + {}", variable, margin)
}

/// Declared parameters of a command with their current values.
///
/// The schema is fixed at construction; defaults pre-populate the values, so
/// `get` on a declared name always resolves. Access to an undeclared name is
/// an [`CommandError::UnknownParameter`] in both directions.
#[derive(Debug, Clone)]
pub struct ParamSet {
    schema: Vec<(&'static str, Value)>,
}

impl ParamSet {
    pub fn new(defaults: &[(&'static str, Value)]) -> Self {
        Self {
            schema: defaults.to_vec(),
        }
    }

    /// Stores `value` for `name` without coercion.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), CommandError> {
        match self.schema.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(CommandError::UnknownParameter(name.to_string())),
        }
    }

    /// Constructor-time setter for names the constructor itself declared.
    pub(crate) fn preset(&mut self, name: &'static str, value: impl Into<Value>) {
        if let Some((_, slot)) = self.schema.iter_mut().find(|(n, _)| *n == name) {
            *slot = value.into();
        }
    }

    pub fn get(&self, name: &str) -> Result<&Value, CommandError> {
        self.schema
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| CommandError::UnknownParameter(name.to_string()))
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.schema.iter().any(|(n, _)| *n == name)
    }

    /// Iterates declared params in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.schema.iter().map(|(n, v)| (*n, v))
    }

    /// Validation helper: fails if the string param `name` is empty.
    pub fn require_non_empty(&self, name: &str, label: &str) -> Result<(), CommandError> {
        let empty = match self.get(name)? {
            Value::String(s) => s.is_empty(),
            Value::Null => true,
            _ => false,
        };
        if empty {
            return Err(CommandError::validation(format!(
                "Required param '{}' is empty",
                label
            )));
        }
        Ok(())
    }

    /// Validation helper: fails unless the numeric param `name` is > 0.
    pub fn require_positive(&self, name: &str, label: &str) -> Result<(), CommandError> {
        let positive = self.get(name)?.as_f64().map_or(false, |v| v > 0.0);
        if !positive {
            return Err(CommandError::validation(format!(
                "Param '{}' must be a positive number",
                label
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ParamSet {
        ParamSet::new(&[("name", json!("")), ("value", json!(0))])
    }

    #[test]
    fn test_defaults_resolve() {
        let params = sample();
        assert_eq!(params.get("value").unwrap(), &json!(0));
    }

    #[test]
    fn test_unknown_param_rejected() {
        let mut params = sample();
        assert!(matches!(
            params.set("nope", 1),
            Err(CommandError::UnknownParameter(_))
        ));
        assert!(matches!(
            params.get("nope"),
            Err(CommandError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_formula_detection() {
        assert!(is_formula(&json!("=[yPos] + 3")));
        assert!(!is_formula(&json!("plain")));
        assert!(!is_formula(&json!(42)));
    }

    #[test]
    fn test_relative_formula_keeps_sign() {
        assert_eq!(relative_formula("x", 3.0), "=[x] + 3");
        assert_eq!(relative_formula("x", -2.5), "=[x] + -2.5");
    }
}
