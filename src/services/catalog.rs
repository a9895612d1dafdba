//! Equipment catalog browsing

use std::sync::Arc;

use crate::{
    api::BorrowingApi,
    error::AppResult,
    models::{Category, Equipment},
};

/// Catalog reads against the backend
#[derive(Clone)]
pub struct CatalogService {
    api: Arc<dyn BorrowingApi>,
}

impl CatalogService {
    pub fn new(api: Arc<dyn BorrowingApi>) -> Self {
        Self { api }
    }

    pub async fn list_equipment(&self) -> AppResult<Vec<Equipment>> {
        self.api.list_equipment().await
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.api.list_categories().await
    }
}

/// Filter the fetched catalog by category and a case-insensitive name
/// query. Both filters are optional; an empty query matches everything.
pub fn filter_equipment(
    list: &[Equipment],
    category_id: Option<i64>,
    query: &str,
) -> Vec<Equipment> {
    let needle = query.trim().to_lowercase();
    list.iter()
        .filter(|eq| category_id.map_or(true, |c| eq.category_id == Some(c)))
        .filter(|eq| needle.is_empty() || eq.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equipment(id: i64, name: &str, category_id: Option<i64>) -> Equipment {
        Equipment {
            id,
            name: name.to_string(),
            stock: 1,
            price: None,
            image: None,
            category_id,
        }
    }

    #[test]
    fn test_filter_by_category_and_name() {
        let list = vec![
            equipment(1, "Drill", Some(1)),
            equipment(2, "Digital Caliper", Some(2)),
            equipment(3, "Caliper", Some(2)),
        ];

        assert_eq!(filter_equipment(&list, Some(2), "").len(), 2);
        assert_eq!(filter_equipment(&list, None, "caliper").len(), 2);

        let narrowed = filter_equipment(&list, Some(2), "digital");
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].id, 2);
    }
}
