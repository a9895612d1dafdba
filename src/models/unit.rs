//! Borrowed unit model

use serde::{Deserialize, Serialize};

use super::enums::UnitStatus;

/// One physically trackable borrowed instance of an equipment type
///
/// Read-only snapshot fetched per transaction; the client never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowedUnit {
    pub id: i64,
    /// Grouping key for the return screen
    pub equipment_name: String,
    pub status: UnitStatus,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
}
