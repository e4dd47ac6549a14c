//! The command variant set and its wire serialization.
//!
//! One `Command` is one renderer operation. The open set of operations is
//! modeled as a tagged-variant enum; `validate`, `build` and `components`
//! are the extension points each variant implements. A command is built into
//! a self-contained JSON record: `cmd` tag plus resolved params, with nested
//! component output inlined under the component ident — single-slot
//! components as an object, multiple-slot components as an ordered list.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::boxes::{ImageBox, TextBox, CMD_IMAGE_BOX, CMD_TEXT_BOX};
use crate::error::CommandError;
use crate::flow::{CheckNewPage, GoToPage, PageMessage, CMD_CHECK_NEW_PAGE, CMD_GO_TO_PAGE, CMD_PAGE_MESSAGE};
use crate::param::ParamSet;
use crate::position::PositionCapable;
use crate::variable::{MathVariable, Variable, CMD_VARIABLE, COMPONENT_VARIABLES};

/// How a command nests inside a parent when used as a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSpec {
    /// Key under the parent's serialized params.
    pub ident: &'static str,
    /// Multiple-slot components append to a list in insertion order;
    /// single-slot components replace one field.
    pub multiple: bool,
}

#[derive(Debug, Clone)]
pub enum Command {
    Variable(Variable),
    MathVariable(MathVariable),
    PageMessage(PageMessage),
    GoToPage(GoToPage),
    CheckNewPage(CheckNewPage),
    TextBox(TextBox),
    ImageBox(ImageBox),
}

impl Command {
    /// Identifier tag of the renderer operation.
    pub fn cmd(&self) -> &'static str {
        match self {
            Command::Variable(_) | Command::MathVariable(_) => CMD_VARIABLE,
            Command::PageMessage(_) => CMD_PAGE_MESSAGE,
            Command::GoToPage(_) => CMD_GO_TO_PAGE,
            Command::CheckNewPage(_) => CMD_CHECK_NEW_PAGE,
            Command::TextBox(_) => CMD_TEXT_BOX,
            Command::ImageBox(_) => CMD_IMAGE_BOX,
        }
    }

    /// Component behavior, or `None` for top-level-only commands.
    pub fn component_spec(&self) -> Option<ComponentSpec> {
        match self {
            Command::Variable(_) | Command::MathVariable(_) => Some(ComponentSpec {
                ident: COMPONENT_VARIABLES,
                multiple: true,
            }),
            Command::CheckNewPage(_) => Some(ComponentSpec {
                ident: CMD_CHECK_NEW_PAGE,
                multiple: false,
            }),
            _ => None,
        }
    }

    /// Directly nested components in stable insertion order.
    pub fn components(&self) -> &[Command] {
        match self {
            Command::TextBox(b) => b.components(),
            Command::ImageBox(b) => b.components(),
            _ => &[],
        }
    }

    fn params(&self) -> Option<&ParamSet> {
        match self {
            Command::Variable(v) => Some(v.params()),
            Command::PageMessage(m) => Some(m.params()),
            Command::GoToPage(g) => Some(g.params()),
            Command::CheckNewPage(c) => Some(c.params()),
            Command::TextBox(b) => Some(b.params()),
            Command::ImageBox(b) => Some(b.params()),
            Command::MathVariable(_) => None,
        }
    }

    pub fn validate(&self) -> Result<(), CommandError> {
        match self {
            Command::Variable(v) => v.validate(),
            Command::MathVariable(v) => v.validate(),
            Command::PageMessage(m) => m.validate(),
            Command::GoToPage(g) => g.validate(),
            Command::CheckNewPage(_) => Ok(()),
            Command::TextBox(b) => b.validate(),
            Command::ImageBox(b) => b.validate(),
        }
    }

    /// Validates and serializes this command and all nested components.
    ///
    /// Non-mutating; for a command with only literal params repeated builds
    /// yield identical records. Null params are omitted from the wire.
    pub fn build(&self) -> Result<Value, CommandError> {
        self.validate()?;

        let mut record = Map::new();
        record.insert("cmd".to_string(), Value::from(self.cmd()));
        match self {
            Command::MathVariable(v) => {
                record.insert("name".to_string(), Value::from(v.name()));
                record.insert("value".to_string(), Value::from(v.expression()));
            }
            _ => {
                if let Some(params) = self.params() {
                    for (name, value) in params.iter() {
                        if !value.is_null() {
                            record.insert(name.to_string(), value.clone());
                        }
                    }
                }
            }
        }

        for component in self.components() {
            let spec = component
                .component_spec()
                .ok_or_else(|| CommandError::NotAComponent(component.cmd()))?;
            let built = component.build()?;
            if spec.multiple {
                let slot = record
                    .entry(spec.ident.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(list) = slot {
                    list.push(built);
                }
            } else {
                record.insert(spec.ident.to_string(), built);
            }
        }

        Ok(Value::Object(record))
    }

    /// Variables this node references; the queue walks all nested nodes.
    pub fn dependent_variables(&self) -> Vec<String> {
        match self {
            Command::MathVariable(v) => v.dependent_variables(),
            Command::TextBox(b) => b.dependent_variables(),
            Command::ImageBox(b) => b.dependent_variables(),
            _ => Vec::new(),
        }
    }

    /// Pre-order collection of variable names this command declares.
    /// Declaration nodes are leaves for this walk.
    pub(crate) fn collect_declared(&self, out: &mut Vec<String>) {
        match self {
            Command::Variable(v) => out.push(v.name()),
            Command::MathVariable(v) => out.push(v.name().to_string()),
            _ => {
                for component in self.components() {
                    component.collect_declared(out);
                }
            }
        }
    }

    /// Collects dependent names of this node and all nested components that
    /// are not in `known`.
    pub(crate) fn collect_missing(&self, known: &BTreeSet<String>, missing: &mut Vec<String>) {
        for name in self.dependent_variables() {
            if !known.contains(&name) && !missing.contains(&name) {
                missing.push(name);
            }
        }
        for component in self.components() {
            component.collect_missing(known, missing);
        }
    }

    /// Attaches `ident` to commands with an ident slot. Returns false for
    /// commands that carry none (variables, messages, flow commands).
    pub(crate) fn assign_ident(&mut self, ident: String) -> bool {
        match self {
            Command::TextBox(b) => {
                b.params_mut().preset("tid", ident);
                true
            }
            Command::ImageBox(b) => {
                b.params_mut().preset("tid", ident);
                true
            }
            _ => false,
        }
    }

    /// Collected image data of the top-level command, if it gathers any.
    pub(crate) fn collected_images(&self) -> Option<&std::collections::BTreeMap<i64, crate::assets::AssetRef>> {
        match self {
            Command::ImageBox(b) => Some(b.collected_images()),
            _ => None,
        }
    }
}

impl From<Variable> for Command {
    fn from(value: Variable) -> Self {
        Command::Variable(value)
    }
}

impl From<MathVariable> for Command {
    fn from(value: MathVariable) -> Self {
        Command::MathVariable(value)
    }
}

impl From<PageMessage> for Command {
    fn from(value: PageMessage) -> Self {
        Command::PageMessage(value)
    }
}

impl From<GoToPage> for Command {
    fn from(value: GoToPage) -> Self {
        Command::GoToPage(value)
    }
}

impl From<CheckNewPage> for Command {
    fn from(value: CheckNewPage) -> Self {
        Command::CheckNewPage(value)
    }
}

impl From<TextBox> for Command {
    fn from(value: TextBox) -> Self {
        Command::TextBox(value)
    }
}

impl From<ImageBox> for Command {
    fn from(value: ImageBox) -> Self {
        Command::ImageBox(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_is_pure() {
        let mut tb = TextBox::new();
        tb.set_width(50.0)
            .unwrap()
            .set_height(20.0)
            .unwrap()
            .set_text("hello")
            .unwrap();
        let command = Command::from(tb);

        let first = command.build().unwrap();
        let second = command.build().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_null_params_omitted() {
        let mut tb = TextBox::new();
        tb.set_width(10.0).unwrap().set_height(10.0).unwrap();
        let record = Command::from(tb).build().unwrap();

        // layer and tid were never set
        assert!(record.get("layer").is_none());
        assert!(record.get("tid").is_none());
        assert_eq!(record["cmd"], json!("textbox"));
    }

    #[test]
    fn test_multiple_components_keep_order() {
        let mut tb = TextBox::new();
        tb.set_width(10.0).unwrap().set_height(10.0).unwrap();
        tb.add_component(Variable::new("first", 1)).unwrap();
        tb.add_component(Variable::new("second", 2)).unwrap();
        let record = Command::from(tb).build().unwrap();

        let variables = record["variables"].as_array().unwrap();
        assert_eq!(variables.len(), 2);
        assert_eq!(variables[0]["name"], json!("first"));
        assert_eq!(variables[1]["name"], json!("second"));
    }

    #[test]
    fn test_single_component_inlined() {
        let mut tb = TextBox::new();
        tb.set_width(10.0).unwrap().set_height(10.0).unwrap();
        tb.add_component(CheckNewPage::new(250.0, 20.0)).unwrap();
        let record = Command::from(tb).build().unwrap();

        assert!(record["checknewpage"].is_object());
        assert_eq!(record["checknewpage"]["pos"], json!(250.0));
        // unset optional x position stays off the wire
        assert!(record["checknewpage"].get("newpos_x").is_none());
    }

    #[test]
    fn test_non_component_rejected() {
        let mut tb = TextBox::new();
        let err = tb.add_component(PageMessage::new("hi", false)).unwrap_err();
        assert!(matches!(err, CommandError::NotAComponent("message")));
    }

    #[test]
    fn test_build_runs_validation() {
        let tb = TextBox::new(); // width/height still 0
        assert!(matches!(
            Command::from(tb).build(),
            Err(CommandError::Validation(_))
        ));
    }
}
