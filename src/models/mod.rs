//! Domain models for FosterTrack.
//!
//! - [`Cat`]: one animal in foster care.
//! - [`CareLog`]: a dated care or observation entry for a cat. A cat has many
//!   logs, linked through [`CareLog::cat_id`]; the link is not enforced by the
//!   store, so logs may point at cats that no longer (or never did) exist.
//!
//! Request bodies arrive as the `*Input` structs, which carry the defaulting
//! rules for fields a client leaves out.

mod care_log;
mod cat;

pub use care_log::*;
pub use cat::*;

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Parse a client-supplied identifier.
pub fn parse_id(resource: &'static str, raw: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| StoreError::InvalidIdentifier {
        resource,
        id: raw.to_string(),
    })
}

/// Treat absent and empty strings alike, falling back to `default`.
pub(crate) fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("cat", &id.to_string()).unwrap(), id);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        let err = parse_id("cat", "not-an-id").unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidIdentifier { resource: "cat", ref id } if id == "not-an-id"
        ));
    }

    #[test]
    fn or_default_replaces_empty_strings() {
        assert_eq!(or_default(None, "x"), "x");
        assert_eq!(or_default(Some(String::new()), "x"), "x");
        assert_eq!(or_default(Some("y".into()), "x"), "y");
    }
}
