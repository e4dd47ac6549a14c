//! Asset registries of a rendering run.
//!
//! Every placed image is registered by asset id so the response layer can
//! report which media a publication uses. Assets that cannot be resolved at
//! generation time are soft failures: they are counted, never raised.

use std::collections::BTreeMap;

use serde::Serialize;

/// One media resource referenced by a placement command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRef {
    pub id: i64,
    pub path: String,
}

impl AssetRef {
    pub fn new(id: i64, path: impl Into<String>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }
}

/// Occurrence counters for unresolved assets.
///
/// `asset_ids` maps asset id to how often it was missing; `elements` counts
/// every affected element across all ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingAssets {
    pub asset_ids: BTreeMap<i64, u32>,
    pub elements: u32,
}

impl MissingAssets {
    pub fn record(&mut self, asset_id: i64) {
        *self.asset_ids.entry(asset_id).or_insert(0) += 1;
        self.elements += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.elements == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut missing = MissingAssets::default();
        missing.record(42);
        missing.record(42);
        missing.record(42);
        missing.record(7);

        assert_eq!(missing.asset_ids.get(&42), Some(&3));
        assert_eq!(missing.asset_ids.get(&7), Some(&1));
        assert_eq!(missing.elements, 4);
    }
}
