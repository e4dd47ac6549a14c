//! JSON command scripts.
//!
//! A thin front end used by the CLI: a script is an ordered list of steps
//! that drive one queue through its public API, standing in for the CMS
//! content layer. Steps map one to one onto queue calls; they never touch
//! the serialized wire shape.

use serde::Deserialize;
use serde_json::Value;

use crate::boxes::{ImageBox, TextBox};
use crate::error::CommandError;
use crate::flow::GoToPage;
use crate::position::{Axis, PositionCapable};
use crate::queue::CommandQueue;
use crate::variable::Variable;

#[derive(Debug, Deserialize)]
pub struct Script {
    pub commands: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A coordinate in a script: literal mm, verbatim formula, or a relative
/// reference to a declared variable.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PositionSpec {
    Relative {
        variable: String,
        #[serde(default)]
        margin: f64,
    },
    Absolute(f64),
    Formula(String),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptStep {
    Variable {
        name: String,
        value: Value,
    },
    Message {
        message: String,
        #[serde(default)]
        on_page: bool,
    },
    GoToPage {
        page: i32,
    },
    SetYPos {
        value: f64,
        #[serde(default)]
        emit: bool,
    },
    IncrementYPos {
        value: f64,
        #[serde(default)]
        emit: bool,
    },
    IdentReference {
        reference: String,
    },
    TextBox {
        text: String,
        width: f64,
        height: f64,
        left: Option<PositionSpec>,
        top: Option<PositionSpec>,
        layer: Option<String>,
    },
    ImageBox {
        asset_id: i64,
        path: String,
        width: f64,
        height: f64,
        left: Option<PositionSpec>,
        top: Option<PositionSpec>,
        layer: Option<String>,
    },
}

/// Runs every step of `script` against `queue`, stopping at the first
/// failure.
pub fn run(queue: &mut CommandQueue, script: &Script) -> Result<(), CommandError> {
    for step in &script.commands {
        apply(queue, step)?;
    }
    Ok(())
}

fn apply(queue: &mut CommandQueue, step: &ScriptStep) -> Result<(), CommandError> {
    match step {
        ScriptStep::Variable { name, value } => {
            queue.add_command(Variable::new(name, value.clone()))?;
        }
        ScriptStep::Message { message, on_page } => {
            queue.add_page_message(message, *on_page)?;
        }
        ScriptStep::GoToPage { page } => {
            // The queue never advances the page cursor itself; the script
            // runner is the caller keeping it in step.
            queue.add_command(GoToPage::new(*page, true))?;
            queue.set_page_number(*page);
        }
        ScriptStep::SetYPos { value, emit } => {
            queue.set_y_pos(*value, *emit)?;
        }
        ScriptStep::IncrementYPos { value, emit } => {
            queue.increment_y_pos(*value, *emit)?;
        }
        ScriptStep::IdentReference { reference } => {
            queue.set_box_ident_reference(reference);
        }
        ScriptStep::TextBox {
            text,
            width,
            height,
            left,
            top,
            layer,
        } => {
            let mut command = TextBox::new();
            command.set_text(text)?.set_width(*width)?.set_height(*height)?;
            if let Some(layer) = layer {
                command.set_layer(layer)?;
            }
            apply_position(&mut command, Axis::Left, left)?;
            apply_position(&mut command, Axis::Top, top)?;
            queue.add_command(command)?;
        }
        ScriptStep::ImageBox {
            asset_id,
            path,
            width,
            height,
            left,
            top,
            layer,
        } => {
            let mut command = ImageBox::new();
            command
                .set_asset(*asset_id, path)?
                .set_width(*width)?
                .set_height(*height)?;
            if let Some(layer) = layer {
                command.set_layer(layer)?;
            }
            apply_position(&mut command, Axis::Left, left)?;
            apply_position(&mut command, Axis::Top, top)?;
            queue.add_command(command)?;
        }
    }
    Ok(())
}

fn apply_position<T: PositionCapable>(
    target: &mut T,
    axis: Axis,
    spec: &Option<PositionSpec>,
) -> Result<(), CommandError> {
    match spec {
        None => Ok(()),
        Some(PositionSpec::Absolute(value)) => target.set_axis(axis, Value::from(*value)).map(|_| ()),
        Some(PositionSpec::Formula(formula)) => {
            target.set_axis(axis, Value::from(formula.clone())).map(|_| ())
        }
        Some(PositionSpec::Relative { variable, margin }) => target
            .set_relative_position(axis, variable, *margin)
            .map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_round_trips_through_queue() {
        let script = Script::from_json(
            r#"{
                "commands": [
                    {"type": "go_to_page", "page": 1},
                    {"type": "variable", "name": "colLeft", "value": 12.5},
                    {"type": "text_box", "text": "Headline", "width": 120, "height": 20,
                     "left": {"variable": "colLeft"}, "top": 30.0}
                ]
            }"#,
        )
        .unwrap();

        let mut queue = CommandQueue::new();
        run(&mut queue, &script).unwrap();

        assert_eq!(queue.commands().len(), 3);
        assert_eq!(queue.page_number(), 1);
        assert_eq!(queue.commands()[2]["left"], "=[colLeft] + 0");
    }

    #[test]
    fn test_script_failure_stops_run() {
        let script = Script::from_json(
            r#"{
                "commands": [
                    {"type": "text_box", "text": "x", "width": 10, "height": 10,
                     "left": {"variable": "neverDeclared"}, "top": null},
                    {"type": "variable", "name": "late", "value": 1}
                ]
            }"#,
        )
        .unwrap();

        let mut queue = CommandQueue::new();
        let err = run(&mut queue, &script).unwrap_err();
        assert!(matches!(err, CommandError::UndeclaredVariables(_)));
        assert!(queue.commands().is_empty());
    }
}
