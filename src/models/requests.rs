//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for the SET operation (PUT /ns/:namespace/items)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The logical key within the namespace
    pub key: String,
    /// The value to store
    pub value: String,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}

/// Request body for the batch operations (POST multi-get / multi-remove)
#[derive(Debug, Clone, Deserialize)]
pub struct KeysRequest {
    /// Logical keys, answered in this order
    pub keys: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, "hello");
    }

    #[test]
    fn test_validate_empty_key() {
        let req = SetRequest {
            key: "".to_string(),
            value: "test".to_string(),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SetRequest {
            key: "valid_key".to_string(),
            value: "test".to_string(),
        };
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_keys_request_deserialize() {
        let req: KeysRequest = serde_json::from_str(r#"{"keys": ["a", "b"]}"#).unwrap();
        assert_eq!(req.keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_keys_request_empty_list() {
        let req: KeysRequest = serde_json::from_str(r#"{"keys": []}"#).unwrap();
        assert!(req.keys.is_empty());
    }
}
