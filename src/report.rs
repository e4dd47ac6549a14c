//! Generation report artifact.
//!
//! The caller-visible read-out of one finished run: the command stream plus
//! the registries, consumed verbatim by the response layer. Carries a run
//! id, a timestamp and a deterministic checksum of the command stream so a
//! consumer can tell regenerated-but-unchanged output apart from changes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::assets::{AssetRef, MissingAssets};
use crate::error::CommandError;
use crate::queue::CommandQueue;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub success: bool,
    pub messages: Vec<String>,
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub commands: Vec<Value>,
    pub registered_assets: BTreeMap<i64, AssetRef>,
    pub missing_assets: MissingAssets,
    /// Checksum over the canonical command stream.
    pub checksum: String,
}

impl GenerationReport {
    /// Builds the success report from a finished queue.
    pub fn from_queue(queue: &CommandQueue) -> Result<Self, CommandError> {
        let mut messages = Vec::new();
        let missing = queue.missing_assets();
        if !missing.is_empty() {
            messages.push(format!(
                "{} elements have missing assets ({} distinct assets).",
                missing.elements,
                missing.asset_ids.len()
            ));
        }

        Ok(Self {
            success: true,
            messages,
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            commands: queue.commands().to_vec(),
            registered_assets: queue.registered_assets().clone(),
            missing_assets: missing.clone(),
            checksum: crate::digest::command_stream_checksum(queue.commands())?,
        })
    }

    /// Builds the failure report for an aborted run. One invalid command
    /// invalidates the renderer's interpretation of the whole stream, so no
    /// commands are carried.
    pub fn from_error(error: &CommandError) -> Self {
        Self {
            success: false,
            messages: vec![error.to_string()],
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            commands: Vec::new(),
            registered_assets: BTreeMap::new(),
            missing_assets: MissingAssets::default(),
            checksum: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variable;

    #[test]
    fn test_missing_assets_become_a_message() {
        let mut queue = CommandQueue::new();
        queue.add_command(Variable::new("x", 1)).unwrap();
        queue.increment_missing_asset_counter(42);
        queue.increment_missing_asset_counter(42);

        let report = GenerationReport::from_queue(&queue).unwrap();
        assert!(report.success);
        assert_eq!(report.messages.len(), 1);
        assert!(report.messages[0].contains("2 elements"));
        assert_eq!(report.commands.len(), 1);
        assert!(!report.checksum.is_empty());
    }

    #[test]
    fn test_error_report_carries_no_commands() {
        let report =
            GenerationReport::from_error(&CommandError::UndeclaredVariables(vec!["x".into()]));
        assert!(!report.success);
        assert!(report.commands.is_empty());
        assert!(report.messages[0].contains('x'));
    }
}
