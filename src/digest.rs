//! Deterministic checksums over the command stream.
//!
//! Two runs over unchanged content must produce the same artifact. The
//! checksum is computed over canonical JSON (sorted keys, no whitespace) so
//! it is independent of map iteration order.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// SHA-256 of `data` as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Serializes `value` to canonical JSON: object keys sorted, no whitespace.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::to_value(value)?;
    serde_json::to_string(&sorted(&value))
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sorted(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        _ => value.clone(),
    }
}

/// Checksum of a built command stream.
pub fn command_stream_checksum(commands: &[Value]) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(&commands)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorts_keys() {
        let value = json!({"top": 0, "cmd": "textbox", "left": 4});
        assert_eq!(
            canonical_json(&value).unwrap(),
            r#"{"cmd":"textbox","left":4,"top":0}"#
        );
    }

    #[test]
    fn test_checksum_ignores_key_order() {
        let a = vec![json!({"cmd": "variable", "name": "x", "value": 1})];
        let b = vec![json!({"value": 1, "name": "x", "cmd": "variable"})];
        assert_eq!(
            command_stream_checksum(&a).unwrap(),
            command_stream_checksum(&b).unwrap()
        );
    }

    #[test]
    fn test_checksum_sees_command_order() {
        let first = json!({"cmd": "gotopage", "page": 1});
        let second = json!({"cmd": "gotopage", "page": 2});
        assert_ne!(
            command_stream_checksum(&[first.clone(), second.clone()]).unwrap(),
            command_stream_checksum(&[second, first]).unwrap()
        );
    }
}
