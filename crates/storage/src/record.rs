use serde::{Deserialize, Serialize};

use formwright_core::FieldDefinition;

/// A named form definition as stored by a [`crate::FormStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedForm {
    pub id: String,
    pub name: String,
    pub fields: Vec<FieldDefinition>,
    /// RFC 3339 timestamp string.
    pub created_at: String,
    /// RFC 3339 timestamp string.
    pub updated_at: String,
}
