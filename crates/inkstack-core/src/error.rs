//! Decode errors for persisted shapes and operations.

use thiserror::Error;

/// Errors raised while decoding a persisted shape or operation record.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing \"{tag}\" discriminant in {kind} record")]
    MissingTag {
        kind: &'static str,
        tag: &'static str,
    },
    #[error("Unknown shape type: {0}")]
    UnknownShape(String),
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
    #[error("Malformed {kind} record: {source}")]
    Malformed {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Read the string discriminant `tag` from a JSON object.
pub(crate) fn read_tag<'v>(
    value: &'v serde_json::Value,
    kind: &'static str,
    tag: &'static str,
) -> DecodeResult<&'v str> {
    value
        .get(tag)
        .and_then(|t| t.as_str())
        .ok_or(DecodeError::MissingTag { kind, tag })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_tag() {
        let value = json!({ "type": "rect" });
        assert_eq!(read_tag(&value, "shape", "type").unwrap(), "rect");
    }

    #[test]
    fn test_read_tag_missing() {
        let value = json!({ "kind": "rect" });
        let err = read_tag(&value, "shape", "type").unwrap_err();
        assert!(matches!(err, DecodeError::MissingTag { kind: "shape", tag: "type" }));
    }

    #[test]
    fn test_read_tag_not_a_string() {
        let value = json!({ "type": 3 });
        assert!(read_tag(&value, "shape", "type").is_err());
    }
}
