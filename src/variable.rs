//! Variable declaration commands.
//!
//! A `Variable` publishes a named value in the renderer; later commands can
//! reference it for relative positioning or calculation. Used standalone it
//! declares run-global values (e.g. the `yPos` cursor), used as a component
//! of a placement command it publishes positions of the placed element.

use serde_json::Value;

use crate::error::CommandError;
use crate::param::ParamSet;

/// Command tag shared by literal and derived variable declarations.
pub const CMD_VARIABLE: &str = "variable";

/// Component ident under which variables nest inside a parent command.
pub const COMPONENT_VARIABLES: &str = "variables";

/// Declares a named literal value or a verbatim formula.
///
/// Redeclaring a name later in the run overwrites the previous value
/// silently; the queue only tracks that the name exists.
#[derive(Debug, Clone)]
pub struct Variable {
    params: ParamSet,
}

impl Variable {
    pub fn new(name: &str, value: impl Into<Value>) -> Self {
        let mut params = ParamSet::new(&[
            ("name", Value::String(String::new())),
            ("value", Value::Null),
        ]);
        params.preset("name", name);
        params.preset("value", value);
        Self { params }
    }

    /// Name the variable is registered under.
    pub fn name(&self) -> String {
        self.params
            .get("name")
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    pub(crate) fn validate(&self) -> Result<(), CommandError> {
        self.params.require_non_empty("name", "name")
    }
}

/// One term of a [`MathVariable`] expression.
#[derive(Debug, Clone)]
pub enum Term {
    Variable(String),
    Literal(f64),
}

/// Derived variable: a name bound to a computed expression instead of a
/// literal. The expression is rendered as a formula and evaluated entirely
/// by the renderer; the referenced names are dependencies the queue checks.
#[derive(Debug, Clone)]
pub struct MathVariable {
    name: String,
    terms: Vec<Term>,
}

impl MathVariable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            terms: Vec::new(),
        }
    }

    pub fn add_variable(&mut self, variable: &str) -> &mut Self {
        self.terms.push(Term::Variable(variable.to_string()));
        self
    }

    pub fn add_value(&mut self, value: f64) -> &mut Self {
        self.terms.push(Term::Literal(value));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of all referenced variables, in expression order.
    pub fn dependent_variables(&self) -> Vec<String> {
        self.terms
            .iter()
            .filter_map(|term| match term {
                Term::Variable(name) => Some(name.clone()),
                Term::Literal(_) => None,
            })
            .collect()
    }

    /// Renders the bound expression, e.g. `=[a] + 4 + [b]`.
    pub fn expression(&self) -> String {
        let rendered: Vec<String> = self
            .terms
            .iter()
            .map(|term| match term {
                Term::Variable(name) => format!("[{}]", name),
                Term::Literal(value) => value.to_string(),
            })
            .collect();
        format!("={}", rendered.join(" + "))
    }

    pub(crate) fn validate(&self) -> Result<(), CommandError> {
        if self.name.is_empty() {
            return Err(CommandError::validation("Required param 'name' is empty"));
        }
        match self.terms.first() {
            None => Err(CommandError::validation(
                "Math variable needs at least one term",
            )),
            // The rendered value must be a formula, so it has to open with
            // a variable reference.
            Some(Term::Literal(_)) => Err(CommandError::validation(
                "Math variable expression must start with a variable reference",
            )),
            Some(Term::Variable(_)) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_rendering() {
        let mut var = MathVariable::new("rowBottom");
        var.add_variable("yPos").add_value(12.5).add_variable("gap");
        assert_eq!(var.expression(), "=[yPos] + 12.5 + [gap]");
        assert_eq!(var.dependent_variables(), vec!["yPos", "gap"]);
    }

    #[test]
    fn test_leading_literal_rejected() {
        let mut var = MathVariable::new("x");
        var.add_value(1.0);
        assert!(var.validate().is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(Variable::new("", 1).validate().is_err());
        assert!(Variable::new("x", 1).validate().is_ok());
    }
}
