use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A daily care or observation entry for one cat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CareLog {
    pub id: Uuid,
    /// The cat this entry belongs to. Not checked against existing cats.
    pub cat_id: Uuid,
    /// Day of the observation as supplied by the caller. Logs sort on this
    /// value as text, so ISO dates (`YYYY-MM-DD`) order correctly.
    pub date: String,
    pub mood: String,
    pub medication: String,
    pub medication_details: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a care log. Missing fields are stored as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogInput {
    pub date: Option<String>,
    pub mood: Option<String>,
    pub medication: Option<String>,
    pub medication_details: Option<String>,
    pub notes: Option<String>,
}

/// Input for updating a care log.
///
/// This is a full overwrite of the editable fields, not a partial patch: a
/// field left out of the request replaces the stored value with an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLogInput {
    pub date: Option<String>,
    pub mood: Option<String>,
    pub medication: Option<String>,
    pub medication_details: Option<String>,
    pub notes: Option<String>,
}

/// Acknowledgement returned by a successful update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAck {
    pub ok: bool,
}
