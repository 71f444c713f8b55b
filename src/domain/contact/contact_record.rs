// ============================================================
// CONTACT RECORD
// ============================================================
// One imported contact, before and after persistence

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Relationship strength assigned to imported contacts (1-5 scale).
pub const DEFAULT_RELATIONSHIP_STRENGTH: u8 = 3;

/// A normalized contact produced from one data row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactRecord {
    /// Display name, never empty
    #[validate(length(min = 1))]
    pub name: String,

    pub company: Option<String>,

    /// Job title / position
    pub title: Option<String>,

    pub email: Option<String>,

    pub location: Option<String>,

    /// Link to the contact's profile on the source platform
    pub profile_url: Option<String>,

    #[validate(range(min = 1, max = 5))]
    pub relationship_strength: u8,

    pub mutual_connections_count: u32,
}

impl ContactRecord {
    /// Create a record with only a name; every optional field is absent
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company: None,
            title: None,
            email: None,
            location: None,
            profile_url: None,
            relationship_strength: DEFAULT_RELATIONSHIP_STRENGTH,
            mutual_connections_count: 0,
        }
    }
}

/// A contact as persisted for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredContact {
    pub id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub record: ContactRecord,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
