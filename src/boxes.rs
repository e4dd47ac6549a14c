//! Placement commands.
//!
//! Boxes are the position-capable commands that put content on a page. Both
//! carry the `tid` slot the queue fills with a box ident, a `layer` target,
//! and may nest components (variables publishing their edges, page-break
//! checks).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::assets::AssetRef;
use crate::command::Command;
use crate::error::CommandError;
use crate::param::ParamSet;
use crate::position::{PositionCapable, RelativeBindings};

pub const CMD_TEXT_BOX: &str = "textbox";
pub const CMD_IMAGE_BOX: &str = "imagebox";

fn box_schema(extra: &[(&'static str, Value)]) -> Vec<(&'static str, Value)> {
    let mut schema = vec![
        ("tid", Value::Null),
        ("left", Value::from(0)),
        ("top", Value::from(0)),
        ("width", Value::from(0)),
        ("height", Value::from(0)),
        ("layer", Value::Null),
    ];
    schema.extend(extra.iter().cloned());
    schema
}

/// Places a text frame with `text` content.
#[derive(Debug, Clone)]
pub struct TextBox {
    params: ParamSet,
    bindings: RelativeBindings,
    components: Vec<Command>,
}

impl TextBox {
    pub fn new() -> Self {
        Self {
            params: ParamSet::new(&box_schema(&[("text", Value::String(String::new()))])),
            bindings: RelativeBindings::default(),
            components: Vec::new(),
        }
    }

    pub fn set_text(&mut self, text: &str) -> Result<&mut Self, CommandError> {
        self.params.set("text", text)?;
        Ok(self)
    }

    pub fn set_width(&mut self, width: f64) -> Result<&mut Self, CommandError> {
        self.params.set("width", width)?;
        Ok(self)
    }

    pub fn set_height(&mut self, height: f64) -> Result<&mut Self, CommandError> {
        self.params.set("height", height)?;
        Ok(self)
    }

    /// Target layer for the placed element.
    pub fn set_layer(&mut self, layer: &str) -> Result<&mut Self, CommandError> {
        self.params.set("layer", layer)?;
        Ok(self)
    }

    /// Nests `component` under this box. Fails for commands that are no
    /// components.
    pub fn add_component(&mut self, component: impl Into<Command>) -> Result<&mut Self, CommandError> {
        let component = component.into();
        if component.component_spec().is_none() {
            return Err(CommandError::NotAComponent(component.cmd()));
        }
        self.components.push(component);
        Ok(self)
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    pub fn components(&self) -> &[Command] {
        &self.components
    }

    pub(crate) fn validate(&self) -> Result<(), CommandError> {
        self.params.require_positive("width", "width")?;
        self.params.require_positive("height", "height")
    }
}

impl Default for TextBox {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionCapable for TextBox {
    fn position_params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    fn bindings(&self) -> &RelativeBindings {
        &self.bindings
    }

    fn bindings_mut(&mut self) -> &mut RelativeBindings {
        &mut self.bindings
    }
}

/// Places an image frame referencing a CMS asset.
///
/// Referenced assets are collected per box and harvested into the queue's
/// asset registry when the command is accepted.
#[derive(Debug, Clone)]
pub struct ImageBox {
    params: ParamSet,
    bindings: RelativeBindings,
    components: Vec<Command>,
    collected: BTreeMap<i64, AssetRef>,
}

impl ImageBox {
    pub fn new() -> Self {
        Self {
            params: ParamSet::new(&box_schema(&[
                ("src", Value::String(String::new())),
                ("fit", Value::Null),
            ])),
            bindings: RelativeBindings::default(),
            components: Vec::new(),
            collected: BTreeMap::new(),
        }
    }

    /// Sets the placed asset and records it for registry harvesting.
    pub fn set_asset(&mut self, id: i64, path: &str) -> Result<&mut Self, CommandError> {
        self.params.set("src", path)?;
        self.collected.insert(id, AssetRef::new(id, path));
        Ok(self)
    }

    /// Fit mode passed through verbatim to the renderer.
    pub fn set_fit(&mut self, fit: &str) -> Result<&mut Self, CommandError> {
        self.params.set("fit", fit)?;
        Ok(self)
    }

    pub fn set_width(&mut self, width: f64) -> Result<&mut Self, CommandError> {
        self.params.set("width", width)?;
        Ok(self)
    }

    pub fn set_height(&mut self, height: f64) -> Result<&mut Self, CommandError> {
        self.params.set("height", height)?;
        Ok(self)
    }

    pub fn set_layer(&mut self, layer: &str) -> Result<&mut Self, CommandError> {
        self.params.set("layer", layer)?;
        Ok(self)
    }

    pub fn add_component(&mut self, component: impl Into<Command>) -> Result<&mut Self, CommandError> {
        let component = component.into();
        if component.component_spec().is_none() {
            return Err(CommandError::NotAComponent(component.cmd()));
        }
        self.components.push(component);
        Ok(self)
    }

    /// Collected image references, keyed by asset id.
    pub fn collected_images(&self) -> &BTreeMap<i64, AssetRef> {
        &self.collected
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    pub fn components(&self) -> &[Command] {
        &self.components
    }

    pub(crate) fn validate(&self) -> Result<(), CommandError> {
        self.params.require_positive("width", "width")?;
        self.params.require_positive("height", "height")
    }
}

impl Default for ImageBox {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionCapable for ImageBox {
    fn position_params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    fn bindings(&self) -> &RelativeBindings {
        &self.bindings
    }

    fn bindings_mut(&mut self) -> &mut RelativeBindings {
        &mut self.bindings
    }
}
