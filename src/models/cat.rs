use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub const DEFAULT_STATUS: &str = "In Foster";
pub const DEFAULT_GENDER: &str = "Unknown";

/// A cat in foster care.
///
/// Cats are never edited once created; the only lifecycle operations are
/// create and delete (which also removes the cat's care logs).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cat {
    pub id: Uuid,
    pub name: String,
    /// Free-form placement status, e.g. "In Foster" or "Adopted".
    pub status: String,
    /// Intake date as supplied by the caller; not parsed.
    pub intake_date: String,
    pub gender: String,
    pub notes: String,
    /// Short personality tags, in the order given.
    pub personality: Vec<String>,
    /// URL or other reference to a photo.
    pub photo: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a cat. Every field is optional.
///
/// Missing or empty strings fall back to their defaults when the cat is
/// stored; `personality` that is not a list becomes an empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCatInput {
    pub name: Option<String>,
    pub status: Option<String>,
    pub intake_date: Option<String>,
    pub gender: Option<String>,
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "personality_or_empty")]
    pub personality: Vec<String>,
    pub photo: Option<String>,
}

/// Accept a JSON list of strings; anything else (a bare string, an object,
/// `null`) yields an empty list. Non-string list items are dropped.
fn personality_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let tags = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(tags)
}

/// Response for a cat delete: how many cat records were removed (0 or 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCatResult {
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personality_string_becomes_empty_list() {
        let input: CreateCatInput =
            serde_json::from_str(r#"{"personality": "not-a-list"}"#).unwrap();
        assert!(input.personality.is_empty());
    }

    #[test]
    fn personality_null_becomes_empty_list() {
        let input: CreateCatInput = serde_json::from_str(r#"{"personality": null}"#).unwrap();
        assert!(input.personality.is_empty());
    }

    #[test]
    fn personality_list_keeps_order() {
        let input: CreateCatInput =
            serde_json::from_str(r#"{"personality": ["shy", 3, "playful"]}"#).unwrap();
        assert_eq!(input.personality, vec!["shy", "playful"]);
    }

    #[test]
    fn input_uses_camel_case_keys() {
        let input: CreateCatInput =
            serde_json::from_str(r#"{"name": "Milo", "intakeDate": "2024-01-01"}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("Milo"));
        assert_eq!(input.intake_date.as_deref(), Some("2024-01-01"));
    }
}
