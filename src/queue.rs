//! The command queue.
//!
//! One queue per rendering run. It owns emission order, the page and
//! vertical cursors, the variable symbol table and the asset registries,
//! and validates and serializes every command before acceptance. The API is
//! synchronous and instance-scoped; parallel generation of independent
//! documents takes one queue per document.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde_json::Value;

use crate::assets::{AssetRef, MissingAssets};
use crate::command::Command;
use crate::error::CommandError;
use crate::flow::PageMessage;
use crate::ident::BoxIdentBuilder;
use crate::variable::Variable;

/// Reserved variable name publishing the vertical cursor.
pub const YPOS_VARIABLE: &str = "yPos";

/// Role prefix for queue-assigned box idents, distinct from the prefix space
/// of caller-declared content idents.
const QUEUE_IDENT_PREFIX: &str = "Q";

#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<Value>,
    page_number: i32,
    y_pos: f64,
    registered_variables: BTreeSet<String>,
    registered_assets: BTreeMap<i64, AssetRef>,
    missing_assets: MissingAssets,
    ident: BoxIdentBuilder,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates, serializes and appends `command`. Sole mutation entry
    /// point for the command stream.
    ///
    /// Acceptance is all-or-nothing: variables declared by a rejected
    /// command are not retained, and nothing is appended. Within one call
    /// registration strictly precedes dependency validation, so a command
    /// may declare a variable in one component and reference it from a
    /// sibling.
    pub fn add_command(&mut self, command: impl Into<Command>) -> Result<&mut Self, CommandError> {
        let mut command = command.into();

        let mut declared = Vec::new();
        command.collect_declared(&mut declared);

        self.validate_variables(&command, &declared)?;

        if command.assign_ident(self.ident.build(
            QUEUE_IDENT_PREFIX,
            self.page_number,
            self.commands.len(),
        )) {
            debug!("assigned box ident on page {}", self.page_number);
        }

        let built = command.build()?;

        // Commit point. Everything fallible happened above.
        self.registered_variables.extend(declared);
        debug!("queue[{}] <- {}", self.commands.len(), command.cmd());
        self.commands.push(built);
        self.register_assets(&command);

        Ok(self)
    }

    /// Checks that the command and its components use only known variables,
    /// counting names the same call declares.
    fn validate_variables(&self, command: &Command, declared: &[String]) -> Result<(), CommandError> {
        let mut known = self.registered_variables.clone();
        known.extend(declared.iter().cloned());

        let mut missing = Vec::new();
        command.collect_missing(&known, &mut missing);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommandError::UndeclaredVariables(missing))
        }
    }

    /// Merges collected images of the top-level command into the asset
    /// registry. Duplicate ids are no-ops.
    fn register_assets(&mut self, command: &Command) {
        if let Some(collected) = command.collected_images() {
            for (id, asset) in collected {
                self.registered_assets
                    .entry(*id)
                    .or_insert_with(|| asset.clone());
            }
        }
    }

    /// Current page number. The queue never advances it automatically;
    /// callers keep it in step with the page-break commands they emit.
    pub fn page_number(&self) -> i32 {
        self.page_number
    }

    pub fn set_page_number(&mut self, page_number: i32) -> &mut Self {
        self.page_number = page_number;
        self
    }

    /// Increments the page number and returns the new value.
    pub fn increment_page_number(&mut self, increment: i32) -> i32 {
        self.page_number += increment;
        self.page_number
    }

    /// Current vertical cursor in mm.
    pub fn y_pos(&self) -> f64 {
        self.y_pos
    }

    /// Sets the vertical cursor. With `emit` the new value is additionally
    /// published to the renderer as the reserved `yPos` variable.
    pub fn set_y_pos(&mut self, value: f64, emit: bool) -> Result<&mut Self, CommandError> {
        self.y_pos = value;
        if emit {
            self.add_command(Variable::new(YPOS_VARIABLE, value))?;
        }
        Ok(self)
    }

    /// Moves the vertical cursor by `value` and returns the new position.
    pub fn increment_y_pos(&mut self, value: f64, emit: bool) -> Result<f64, CommandError> {
        self.set_y_pos(self.y_pos + value, emit)?;
        Ok(self.y_pos)
    }

    /// Convenience method to queue a [`PageMessage`].
    pub fn add_page_message(&mut self, message: &str, on_page: bool) -> Result<&mut Self, CommandError> {
        self.add_command(PageMessage::new(message, on_page))
    }

    /// Records one element whose asset could not be resolved. A soft
    /// failure by design; generation continues.
    pub fn increment_missing_asset_counter(&mut self, asset_id: i64) {
        self.missing_assets.record(asset_id);
    }

    /// Sets the content reference used for box ident generation.
    /// Typical usage: CMS object ids.
    pub fn set_box_ident_reference(&mut self, reference: &str) -> &mut Self {
        self.ident.set_reference(reference);
        self
    }

    pub fn append_to_box_ident_reference(&mut self, reference: &str) -> &mut Self {
        self.ident.append_reference(reference);
        self
    }

    pub fn box_ident_reference(&self) -> &str {
        self.ident.reference()
    }

    pub fn set_box_ident_generic_postfix(&mut self, postfix: &str) -> &mut Self {
        self.ident.set_generic_postfix(postfix);
        self
    }

    pub fn box_ident_generic_postfix(&self) -> &str {
        self.ident.generic_postfix()
    }

    /// The built command stream, in exact acceptance order.
    pub fn commands(&self) -> &[Value] {
        &self.commands
    }

    /// Assets used in the generated publication, keyed by asset id.
    pub fn registered_assets(&self) -> &BTreeMap<i64, AssetRef> {
        &self.registered_assets
    }

    pub fn missing_assets(&self) -> &MissingAssets {
        &self.missing_assets
    }
}
