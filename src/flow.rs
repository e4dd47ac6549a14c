//! Page flow and messaging commands.

use serde_json::Value;

use crate::error::CommandError;
use crate::param::ParamSet;

pub const CMD_PAGE_MESSAGE: &str = "message";
pub const CMD_GO_TO_PAGE: &str = "gotopage";
pub const CMD_CHECK_NEW_PAGE: &str = "checknewpage";

/// Shows a message in the renderer, optionally placed on the current page.
#[derive(Debug, Clone)]
pub struct PageMessage {
    params: ParamSet,
}

impl PageMessage {
    pub fn new(message: &str, on_page: bool) -> Self {
        let mut params = ParamSet::new(&[
            ("message", Value::String(String::new())),
            ("onpage", Value::from(false)),
        ]);
        params.preset("message", message);
        params.preset("onpage", on_page);
        Self { params }
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    pub(crate) fn validate(&self) -> Result<(), CommandError> {
        self.params.require_non_empty("message", "message")
    }
}

/// Jumps to `page` in the rendered document. Pages are numbered from 1;
/// with `autoinsert` the renderer appends pages until the target exists.
#[derive(Debug, Clone)]
pub struct GoToPage {
    params: ParamSet,
}

impl GoToPage {
    pub fn new(page: i32, autoinsert: bool) -> Self {
        let mut params = ParamSet::new(&[
            ("page", Value::from(1)),
            ("autoinsert", Value::from(false)),
        ]);
        params.preset("page", page);
        params.preset("autoinsert", autoinsert);
        Self { params }
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    pub(crate) fn validate(&self) -> Result<(), CommandError> {
        let page = self.params.get("page")?.as_i64().unwrap_or(0);
        if page < 1 {
            return Err(CommandError::validation("Param 'page' must be >= 1"));
        }
        Ok(())
    }
}

/// Component for placement commands. If the placed element ends below
/// `max_y_pos`, the renderer repositions it on the following page at
/// `new_y_pos` and optionally `new_x_pos`.
#[derive(Debug, Clone)]
pub struct CheckNewPage {
    params: ParamSet,
}

impl CheckNewPage {
    pub fn new(max_y_pos: impl Into<Value>, new_y_pos: impl Into<Value>) -> Self {
        let mut params = ParamSet::new(&[
            ("pos", Value::Null),
            ("newpos", Value::Null),
            ("newpos_x", Value::Null),
        ]);
        params.preset("pos", max_y_pos);
        params.preset("newpos", new_y_pos);
        Self { params }
    }

    /// Optional new x position in mm on the following page.
    pub fn set_new_x_pos(&mut self, new_x_pos: impl Into<Value>) -> Result<&mut Self, CommandError> {
        self.params.set("newpos_x", new_x_pos)?;
        Ok(self)
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }
}
