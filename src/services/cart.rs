//! Cart aggregation
//!
//! In-memory collection of equipment the user intends to borrow, keyed by
//! equipment id with insertion order preserved. The store is an owned,
//! injectable value rather than a hidden global, so each session (and each
//! test) gets an isolated instance. Nothing here touches the network; stock
//! checks against the catalog snapshot are the caller's concern and final
//! admission is decided by the backend at checkout.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::Equipment;

/// One distinct equipment item selected by the user
///
/// Invariant: `quantity >= 1` while the entry exists. An entry is removed
/// outright, never kept at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEntry {
    pub equipment_id: i64,
    pub name: String,
    pub quantity: u32,
    /// Display-only catalog snapshot, not authoritative
    pub stock: i64,
    pub price: Option<i64>,
    pub image: Option<String>,
}

/// Session-scoped cart store
#[derive(Debug, Default, Clone)]
pub struct CartStore {
    entries: IndexMap<i64, CartEntry>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of the given equipment.
    ///
    /// If the item is already in the cart only its quantity is bumped;
    /// the metadata captured on first add wins.
    pub fn add(&mut self, equipment: &Equipment) {
        match self.entries.get_mut(&equipment.id) {
            Some(entry) => entry.quantity += 1,
            None => {
                self.entries.insert(
                    equipment.id,
                    CartEntry {
                        equipment_id: equipment.id,
                        name: equipment.name.clone(),
                        quantity: 1,
                        stock: equipment.stock,
                        price: equipment.price,
                        image: equipment.image.clone(),
                    },
                );
            }
        }
    }

    /// Increment quantity; no client-side stock ceiling, over-booking is
    /// rejected by the backend at checkout.
    pub fn increase(&mut self, equipment_id: i64) {
        if let Some(entry) = self.entries.get_mut(&equipment_id) {
            entry.quantity += 1;
        }
    }

    /// Decrement quantity, floored at 1. Use [`CartStore::remove`] to delete.
    pub fn decrease(&mut self, equipment_id: i64) {
        if let Some(entry) = self.entries.get_mut(&equipment_id) {
            if entry.quantity > 1 {
                entry.quantity -= 1;
            }
        }
    }

    /// Delete the entry regardless of quantity
    pub fn remove(&mut self, equipment_id: i64) {
        self.entries.shift_remove(&equipment_id);
    }

    /// Empty the cart; called after a successful checkout round-trip
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of all quantities, recomputed on every read (badge counts)
    pub fn total_items(&self) -> u64 {
        self.entries.values().map(|e| u64::from(e.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.values()
    }

    pub fn get(&self, equipment_id: i64) -> Option<&CartEntry> {
        self.entries.get(&equipment_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drill() -> Equipment {
        Equipment {
            id: 1,
            name: "Drill".to_string(),
            stock: 5,
            price: Some(1000),
            image: None,
            category_id: Some(2),
        }
    }

    fn caliper() -> Equipment {
        Equipment {
            id: 2,
            name: "Caliper".to_string(),
            stock: 3,
            price: None,
            image: None,
            category_id: None,
        }
    }

    #[test]
    fn test_repeat_add_merges_into_one_entry() {
        let mut cart = CartStore::new();
        cart.add(&drill());
        cart.add(&drill());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(1).unwrap().quantity, 2);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_first_seen_metadata_wins() {
        let mut cart = CartStore::new();
        cart.add(&drill());

        let mut renamed = drill();
        renamed.name = "Impact Drill".to_string();
        renamed.stock = 99;
        cart.add(&renamed);

        let entry = cart.get(1).unwrap();
        assert_eq!(entry.name, "Drill");
        assert_eq!(entry.stock, 5);
        assert_eq!(entry.quantity, 2);
    }

    #[test]
    fn test_decrease_floors_at_one() {
        let mut cart = CartStore::new();
        cart.add(&drill());
        cart.decrease(1);

        assert_eq!(cart.get(1).unwrap().quantity, 1);
    }

    #[test]
    fn test_remove_deletes_regardless_of_quantity() {
        let mut cart = CartStore::new();
        cart.add(&drill());
        cart.increase(1);
        cart.increase(1);
        cart.remove(1);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_mutations_on_missing_id_are_noops() {
        let mut cart = CartStore::new();
        cart.increase(42);
        cart.decrease(42);
        cart.remove(42);

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut cart = CartStore::new();
        cart.add(&drill());
        cart.add(&caliper());
        cart.increase(2);
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_quantities_stay_positive_through_any_sequence() {
        let mut cart = CartStore::new();
        cart.add(&drill());
        cart.add(&caliper());
        cart.add(&drill());
        cart.decrease(1);
        cart.decrease(1);
        cart.decrease(2);
        cart.increase(2);

        assert!(cart.entries().all(|e| e.quantity >= 1));
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = CartStore::new();
        cart.add(&caliper());
        cart.add(&drill());

        let names: Vec<&str> = cart.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Caliper", "Drill"]);
    }
}
