//! Equipment catalog models

use serde::{Deserialize, Serialize};

/// Equipment record as listed by the catalog endpoint
///
/// `stock` is the backend's last reported availability and may be stale by
/// the time a booking is submitted; admission is decided server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Equipment category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
}
