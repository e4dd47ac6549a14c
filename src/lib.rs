//! PageWire Core - Print Command Compiler
//!
//! Assembles CMS content into multi-page desktop-publishing documents by
//! emitting an ordered, validated stream of structured commands for an
//! external layout renderer.
//!
//! # The Queue Contract (Non-Negotiable)
//! 1. Every command is validated before acceptance
//! 2. The command stream is append-only, never reordered
//! 3. Variables are declared before they are referenced
//! 4. Acceptance is atomic - a rejected command leaves no trace
//! 5. Formulas are renderer territory - the core never evaluates them
//! 6. Missing assets are counted, not raised

pub mod assets;
pub mod boxes;
pub mod command;
pub mod digest;
pub mod error;
pub mod flow;
pub mod ident;
pub mod param;
pub mod position;
pub mod queue;
pub mod report;
pub mod script;
pub mod variable;

pub use assets::{AssetRef, MissingAssets};
pub use boxes::{ImageBox, TextBox};
pub use command::{Command, ComponentSpec};
pub use digest::{canonical_json, command_stream_checksum};
pub use error::CommandError;
pub use flow::{CheckNewPage, GoToPage, PageMessage};
pub use ident::BoxIdentBuilder;
pub use param::ParamSet;
pub use position::{Axis, PositionCapable};
pub use queue::{CommandQueue, YPOS_VARIABLE};
pub use report::GenerationReport;
pub use variable::{MathVariable, Variable};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
