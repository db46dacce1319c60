//! On-disk record envelope and record names.

use serde::{Deserialize, Serialize};

use crate::error::{HostError, HostResult};

/// The JSON written to `<base_dir>/<name>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    /// Username the record was written by
    #[serde(rename = "user")]
    pub owner: String,

    /// Base64 ciphertext
    #[serde(rename = "data")]
    pub ciphertext: String,
}

impl StoreRecord {
    pub fn from_json(text: &str) -> HostResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| HostError::Storage(format!("Corrupt record envelope: {e}")))
    }

    pub fn to_json(&self) -> HostResult<String> {
        serde_json::to_string(self).map_err(|e| HostError::Serialization(e.to_string()))
    }
}

/// Record names are lowercase ASCII letters, digits and hyphens.
pub fn validate_name(name: &str) -> HostResult<()> {
    if name.is_empty() {
        return Err(HostError::Validation("name required".into()));
    }

    let valid = name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if !valid {
        return Err(HostError::Validation(format!(
            "Invalid record name '{name}': use lowercase letters, digits and hyphens"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_field_names() {
        let record = StoreRecord {
            owner: "alice".into(),
            ciphertext: "q83v".into(),
        };
        assert_eq!(record.to_json().unwrap(), r#"{"user":"alice","data":"q83v"}"#);
        assert_eq!(StoreRecord::from_json(r#"{"user":"alice","data":"q83v"}"#).unwrap(), record);
    }

    #[test]
    fn test_corrupt_envelope_is_storage_error() {
        assert!(matches!(
            StoreRecord::from_json("{\"user\": "),
            Err(HostError::Storage(_))
        ));
        assert!(matches!(
            StoreRecord::from_json(r#"{"owner": "alice"}"#),
            Err(HostError::Storage(_))
        ));
    }

    #[test]
    fn test_name_validation() {
        assert!(validate_name("team-standup").is_ok());
        assert!(validate_name("2024").is_ok());

        for bad in ["", "Team", "a_b", "../etc", "a.json", "spa ce", "日本"] {
            assert!(
                matches!(validate_name(bad), Err(HostError::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
