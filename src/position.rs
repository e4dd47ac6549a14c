//! Absolute and variable-relative positioning.
//!
//! Placement commands carry `left`/`top` params positioning the upper-left
//! corner of the element in mm. Alternatively an axis can be bound to a
//! previously declared variable: the param then holds a formula the renderer
//! resolves, and the binding is tracked so the queue can verify the variable
//! exists before the command is accepted.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::CommandError;
use crate::param::{self, ParamSet};

/// Box edges the renderer knows about. Only `Left` and `Top` may carry a
/// relative binding; `Right` and `Bottom` exist for published edge variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Axis {
    Left,
    Right,
    Top,
    Bottom,
}

impl Axis {
    pub fn param_name(self) -> &'static str {
        match self {
            Axis::Left => "left",
            Axis::Right => "right",
            Axis::Top => "top",
            Axis::Bottom => "bottom",
        }
    }

    fn supports_relative(self) -> bool {
        matches!(self, Axis::Left | Axis::Top)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_name())
    }
}

/// Per-axis relative-position bindings of one placement command.
///
/// A binding exists only while the axis param holds a formula value; setting
/// a literal clears it.
#[derive(Debug, Clone, Default)]
pub struct RelativeBindings {
    variables: BTreeMap<Axis, String>,
}

impl RelativeBindings {
    pub fn bind(&mut self, axis: Axis, variable: &str) {
        self.variables.insert(axis, variable.to_string());
    }

    pub fn clear(&mut self, axis: Axis) {
        self.variables.remove(&axis);
    }

    pub fn is_bound(&self) -> bool {
        !self.variables.is_empty()
    }

    pub fn is_bound_to(&self, variable: &str) -> bool {
        self.variables.values().any(|v| v == variable)
    }

    pub fn variables(&self) -> Vec<String> {
        self.variables.values().cloned().collect()
    }
}

/// Capability for commands that can be positioned in the document.
///
/// Implementors expose their param set and bindings; the shared placement
/// contract is provided here, so every position-capable command behaves
/// identically.
pub trait PositionCapable {
    fn position_params_mut(&mut self) -> &mut ParamSet;

    fn bindings(&self) -> &RelativeBindings;

    fn bindings_mut(&mut self) -> &mut RelativeBindings;

    /// Sets the left position in mm, or a formula string.
    fn set_left(&mut self, left: impl Into<Value>) -> Result<&mut Self, CommandError>
    where
        Self: Sized,
    {
        self.set_axis(Axis::Left, left.into())
    }

    /// Sets the top position in mm, or a formula string.
    fn set_top(&mut self, top: impl Into<Value>) -> Result<&mut Self, CommandError>
    where
        Self: Sized,
    {
        self.set_axis(Axis::Top, top.into())
    }

    /// Positions `axis` relative to `variable` with `margin` in mm.
    fn set_relative_position(
        &mut self,
        axis: Axis,
        variable: &str,
        margin: f64,
    ) -> Result<&mut Self, CommandError>
    where
        Self: Sized,
    {
        if !axis.supports_relative() {
            return Err(CommandError::InvalidAxis(axis));
        }
        self.bindings_mut().bind(axis, variable);
        self.position_params_mut()
            .set(axis.param_name(), param::relative_formula(variable, margin))?;
        Ok(self)
    }

    fn set_left_relative(&mut self, variable: &str, margin: f64) -> Result<&mut Self, CommandError>
    where
        Self: Sized,
    {
        self.set_relative_position(Axis::Left, variable, margin)
    }

    fn set_top_relative(&mut self, variable: &str, margin: f64) -> Result<&mut Self, CommandError>
    where
        Self: Sized,
    {
        self.set_relative_position(Axis::Top, variable, margin)
    }

    fn set_axis(&mut self, axis: Axis, value: Value) -> Result<&mut Self, CommandError>
    where
        Self: Sized,
    {
        let formula = param::is_formula(&value);
        self.position_params_mut().set(axis.param_name(), value)?;
        if !formula {
            self.bindings_mut().clear(axis);
        }
        Ok(self)
    }

    fn is_relative_positioned(&self) -> bool {
        self.bindings().is_bound()
    }

    fn is_relative_positioned_to(&self, variable: &str) -> bool {
        self.bindings().is_bound_to(variable)
    }

    fn relative_position_variables(&self) -> Vec<String> {
        self.bindings().variables()
    }

    /// Variables this command depends on. The queue validator calls this on
    /// every variable-dependent node before accepting the command.
    fn dependent_variables(&self) -> Vec<String> {
        self.relative_position_variables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::TextBox;

    #[test]
    fn test_literal_clears_binding() {
        let mut tb = TextBox::new();
        tb.set_left_relative("x", 2.0).unwrap();
        assert!(tb.is_relative_positioned());
        assert!(tb.is_relative_positioned_to("x"));

        tb.set_left(5.0).unwrap();
        assert!(!tb.is_relative_positioned());
        assert!(tb.dependent_variables().is_empty());
    }

    #[test]
    fn test_formula_keeps_binding() {
        let mut tb = TextBox::new();
        tb.set_top_relative("yPos", 4.0).unwrap();
        tb.set_left("=[xPos] + 0").unwrap();
        assert!(tb.is_relative_positioned_to("yPos"));
    }

    #[test]
    fn test_invalid_axis_rejected() {
        let mut tb = TextBox::new();
        let err = tb.set_relative_position(Axis::Bottom, "x", 0.0).unwrap_err();
        assert!(matches!(err, CommandError::InvalidAxis(Axis::Bottom)));
    }
}
