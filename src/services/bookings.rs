//! Booking checkout and transaction history

use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    api::BorrowingApi,
    error::{AppError, AppResult},
    models::{BookingItem, BookingRequest, BorrowingDetail, BorrowingStatus, BorrowingSummary},
    services::cart::CartStore,
};

/// Booking workflow against the backend
#[derive(Clone)]
pub struct BookingsService {
    api: Arc<dyn BorrowingApi>,
}

impl BookingsService {
    pub fn new(api: Arc<dyn BorrowingApi>) -> Self {
        Self { api }
    }

    /// Submit the cart as a pickup booking.
    ///
    /// An empty cart is rejected client-side before any network call. The
    /// cart is cleared only after the backend accepts the booking, so a
    /// failed submission leaves it intact for a manual retry.
    pub async fn checkout(
        &self,
        cart: &mut CartStore,
        mhs_id: i64,
        pickup_time: &str,
        booking_date: DateTime<Utc>,
    ) -> AppResult<i64> {
        if cart.is_empty() {
            return Err(AppError::Validation("Your cart is empty".to_string()));
        }

        let request = BookingRequest {
            mhs_id,
            items: cart
                .entries()
                .map(|entry| BookingItem {
                    psa_id: entry.equipment_id,
                    quantity: i64::from(entry.quantity),
                })
                .collect(),
            pickup_time: pickup_time.to_string(),
            booking_date,
        };
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let borrowing_id = self.api.create_booking(request).await?;
        tracing::info!(borrowing_id, "Booking created");
        cart.clear();
        Ok(borrowing_id)
    }

    /// Fetch the full detail (status, items, QR token) of one transaction
    pub async fn fetch_detail(&self, borrowing_id: i64) -> AppResult<BorrowingDetail> {
        self.api.borrowing_detail(borrowing_id).await
    }

    /// Fetch the user's transaction history
    pub async fn history(&self, user_id: i64) -> AppResult<Vec<BorrowingSummary>> {
        self.api.user_borrowings(user_id).await
    }
}

/// Filter a transaction list by normalized status and a case-insensitive
/// name query over its items. An empty query matches everything.
pub fn filter_history(
    list: &[BorrowingSummary],
    status: Option<&BorrowingStatus>,
    query: &str,
) -> Vec<BorrowingSummary> {
    let needle = query.trim().to_lowercase();
    list.iter()
        .filter(|summary| status.map_or(true, |s| summary.status == *s))
        .filter(|summary| {
            needle.is_empty()
                || summary
                    .items
                    .iter()
                    .any(|item| item.equipment_name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
