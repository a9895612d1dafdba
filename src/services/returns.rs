//! Return-item grouping and submission
//!
//! The backend tracks borrowed units individually; the return screen works
//! in named groups with an adjustable quantity per group. Grouping is
//! recomputed from scratch on every fetch and discarded after submission.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    api::BorrowingApi,
    error::{AppError, AppResult},
    models::{BorrowedUnit, ReturnRequest},
};

/// Units of one equipment name that are still out, with the quantity the
/// user wants to return
///
/// Invariant: `0 <= return_qty <= total_qty`. The fields are private and
/// `return_qty` only moves through the bounded adjusters, so the invariant
/// holds for any caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnGroup {
    name: String,
    return_qty: usize,
    /// Underlying unit ids in encounter order
    unit_ids: Vec<i64>,
}

impl ReturnGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Count of eligible units in the group
    pub fn total_qty(&self) -> usize {
        self.unit_ids.len()
    }

    /// Quantity currently selected for return
    pub fn return_qty(&self) -> usize {
        self.return_qty
    }

    pub fn unit_ids(&self) -> &[i64] {
        &self.unit_ids
    }

    /// Bounded increment, capped at `total_qty`
    pub fn increment(&mut self) {
        self.return_qty = self.total_qty().min(self.return_qty + 1);
    }

    /// Bounded decrement, floored at 0
    pub fn decrement(&mut self) {
        self.return_qty = self.return_qty.saturating_sub(1);
    }

    /// The unit ids that would be submitted: the first `return_qty` ids in
    /// encounter order. Units are treated as interchangeable within their
    /// equipment name; the backend offers no per-unit selection semantics.
    pub fn selected_ids(&self) -> &[i64] {
        &self.unit_ids[..self.return_qty]
    }
}

/// Group units that are still out by equipment name, in encounter order.
///
/// Units in any other state (already returned, pending) are excluded and
/// never reappear as returnable. `return_qty` starts at `total_qty`:
/// the default is to return everything.
pub fn group_returnable(units: &[BorrowedUnit]) -> Vec<ReturnGroup> {
    let mut by_name: IndexMap<String, Vec<i64>> = IndexMap::new();
    for unit in units {
        if unit.status.is_returnable() {
            by_name
                .entry(unit.equipment_name.clone())
                .or_default()
                .push(unit.id);
        }
    }

    by_name
        .into_iter()
        .map(|(name, unit_ids)| ReturnGroup {
            name,
            return_qty: unit_ids.len(),
            unit_ids,
        })
        .collect()
}

/// Build the submission payload from the user's adjusted groups.
///
/// Fails with a validation error when every group is at zero, so no
/// network call is made for an empty selection.
pub fn build_return_request(borrowing_id: i64, groups: &[ReturnGroup]) -> AppResult<ReturnRequest> {
    let detail_ids: Vec<i64> = groups
        .iter()
        .filter(|g| g.return_qty > 0)
        .flat_map(|g| g.selected_ids().iter().copied())
        .collect();

    if detail_ids.is_empty() {
        return Err(AppError::Validation(
            "Select at least one item to return".to_string(),
        ));
    }

    Ok(ReturnRequest {
        borrowing_id,
        detail_ids,
    })
}

/// Return workflow against the backend
#[derive(Clone)]
pub struct ReturnsService {
    api: Arc<dyn BorrowingApi>,
}

impl ReturnsService {
    pub fn new(api: Arc<dyn BorrowingApi>) -> Self {
        Self { api }
    }

    /// Fetch the transaction's unit list and group it fresh
    pub async fn fetch_groups(&self, borrowing_id: i64) -> AppResult<Vec<ReturnGroup>> {
        let units = self.api.borrowed_units(borrowing_id).await?;
        Ok(group_returnable(&units))
    }

    /// Submit the adjusted groups as a return request.
    ///
    /// Failures are surfaced to the caller; retry is a manual re-submit.
    pub async fn submit(&self, borrowing_id: i64, groups: &[ReturnGroup]) -> AppResult<()> {
        let request = build_return_request(borrowing_id, groups)?;
        tracing::info!(
            borrowing_id,
            units = request.detail_ids.len(),
            "Submitting return"
        );
        self.api.return_units(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBorrowingApi;
    use crate::models::UnitStatus;

    fn unit(id: i64, name: &str, status: &str) -> BorrowedUnit {
        BorrowedUnit {
            id,
            equipment_name: name.to_string(),
            status: UnitStatus::parse(status),
            category_name: None,
            location_name: None,
        }
    }

    #[test]
    fn test_grouping_excludes_non_borrowed_units() {
        let units = vec![
            unit(1, "Drill", "dipinjam"),
            unit(2, "Drill", "dipinjam"),
            unit(3, "Caliper", "dikembalikan"),
        ];

        let groups = group_returnable(&units);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name(), "Drill");
        assert_eq!(groups[0].total_qty(), 2);
        assert_eq!(groups[0].return_qty(), 2);
        assert_eq!(groups[0].unit_ids(), &[1, 2]);
    }

    #[test]
    fn test_no_group_without_eligible_units() {
        let units = vec![unit(3, "Caliper", "dikembalikan")];
        assert!(group_returnable(&units).is_empty());
    }

    #[test]
    fn test_grouping_preserves_encounter_order() {
        let units = vec![
            unit(5, "Caliper", "dipinjam"),
            unit(1, "Drill", "dipinjam"),
            unit(7, "Caliper", "Dipinjam "),
        ];

        let groups = group_returnable(&units);
        let names: Vec<&str> = groups.iter().map(|g| g.name()).collect();
        assert_eq!(names, ["Caliper", "Drill"]);
        assert_eq!(groups[0].unit_ids(), &[5, 7]);
    }

    #[test]
    fn test_adjusters_are_bounded() {
        let mut group = ReturnGroup {
            name: "Drill".to_string(),
            return_qty: 2,
            unit_ids: vec![1, 2],
        };

        group.increment();
        assert_eq!(group.return_qty(), 2);

        group.decrement();
        group.decrement();
        group.decrement();
        assert_eq!(group.return_qty(), 0);
    }

    #[test]
    fn test_selected_ids_stays_in_bounds_through_any_adjustment() {
        let mut groups = group_returnable(&[
            unit(1, "Drill", "dipinjam"),
            unit(2, "Drill", "dipinjam"),
        ]);

        for _ in 0..5 {
            groups[0].increment();
        }
        assert_eq!(groups[0].selected_ids(), &[1, 2]);

        for _ in 0..5 {
            groups[0].decrement();
        }
        assert!(groups[0].selected_ids().is_empty());
    }

    #[test]
    fn test_partial_return_takes_first_ids() {
        let mut groups = group_returnable(&[
            unit(1, "Drill", "dipinjam"),
            unit(2, "Drill", "dipinjam"),
        ]);
        groups[0].decrement();

        let request = build_return_request(9, &groups).unwrap();
        assert_eq!(request.borrowing_id, 9);
        assert_eq!(request.detail_ids, vec![1]);
    }

    #[test]
    fn test_payload_concatenates_across_groups() {
        let mut groups = group_returnable(&[
            unit(1, "Drill", "dipinjam"),
            unit(2, "Drill", "dipinjam"),
            unit(3, "Caliper", "dipinjam"),
        ]);
        groups[0].decrement();

        let request = build_return_request(9, &groups).unwrap();
        assert_eq!(request.detail_ids, vec![1, 3]);
    }

    #[test]
    fn test_all_zero_selection_is_rejected() {
        let mut groups = group_returnable(&[unit(1, "Drill", "dipinjam")]);
        groups[0].decrement();

        let err = build_return_request(9, &groups).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_submit_makes_no_call_for_empty_selection() {
        // No expectation set: any call to the mock would panic.
        let api = MockBorrowingApi::new();
        let service = ReturnsService::new(Arc::new(api));

        let mut groups = group_returnable(&[unit(1, "Drill", "dipinjam")]);
        groups[0].decrement();

        let err = service.submit(9, &groups).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_submit_sends_selected_ids() {
        let mut api = MockBorrowingApi::new();
        api.expect_return_units()
            .withf(|req| req.borrowing_id == 9 && req.detail_ids == vec![1, 2])
            .times(1)
            .returning(|_| Ok(()));
        let service = ReturnsService::new(Arc::new(api));

        let groups = group_returnable(&[
            unit(1, "Drill", "dipinjam"),
            unit(2, "Drill", "dipinjam"),
        ]);

        service.submit(9, &groups).await.unwrap();
    }
}
