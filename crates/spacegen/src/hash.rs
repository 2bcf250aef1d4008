use serde::Serialize;
use sha2::{Digest, Sha256};
use spacegen_core::{ErrorInfo, SpaceError};

/// Serializes the payload into canonical JSON bytes.
///
/// The value is round-tripped through `serde_json::Value`, whose object
/// representation keeps keys sorted, so equal payloads always produce equal
/// bytes regardless of field declaration order.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SpaceError> {
    let value = serde_json::to_value(value)
        .map_err(|err| SpaceError::Serde(ErrorInfo::new("json-value", err.to_string())))?;
    serde_json::to_vec(&value)
        .map_err(|err| SpaceError::Serde(ErrorInfo::new("json-encode", err.to_string())))
}

/// Computes a stable hexadecimal hash for the provided serializable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, SpaceError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_is_stable_across_key_order() {
        let a = json!({"x": 1, "y": [1, 2]});
        let b = json!({"y": [1, 2], "x": 1});
        assert_eq!(
            stable_hash_string(&a).unwrap(),
            stable_hash_string(&b).unwrap()
        );
    }

    #[test]
    fn distinct_payloads_hash_differently() {
        assert_ne!(
            stable_hash_string(&json!({"x": 1})).unwrap(),
            stable_hash_string(&json!({"x": 2})).unwrap()
        );
    }
}
