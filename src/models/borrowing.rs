//! Borrowing transaction models and request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::BorrowingStatus;

/// One equipment line within a borrowing transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingItem {
    pub equipment_name: String,
    pub quantity: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
}

/// Full transaction detail, including the QR ticket token
///
/// Authoritative state lives on the backend; this is an eventually
/// consistent local copy refreshed by the status poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingDetail {
    pub id: i64,
    pub status: BorrowingStatus,
    /// Token rendered as the pickup QR ticket by a host UI
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub items: Vec<BorrowingItem>,
    #[serde(default)]
    pub mhs_id: Option<i64>,
    #[serde(default)]
    pub user_name: Option<String>,
}

/// Transaction summary as listed in the user's history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingSummary {
    pub id: i64,
    pub status: BorrowingStatus,
    #[serde(default)]
    pub booking_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pickup_time: Option<String>,
    #[serde(default)]
    pub items: Vec<BorrowingItem>,
}

/// One cart line in a booking request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingItem {
    /// Equipment identifier (the backend's `psaId`)
    pub psa_id: i64,
    pub quantity: i64,
}

/// Create booking request
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub mhs_id: i64,
    #[validate(length(min = 1, message = "cart is empty"))]
    pub items: Vec<BookingItem>,
    #[validate(length(min = 1, message = "pickup time is required"))]
    pub pickup_time: String,
    pub booking_date: DateTime<Utc>,
}

/// Return submission request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub borrowing_id: i64,
    /// Unit identifiers selected by the return grouper
    pub detail_ids: Vec<i64>,
}
