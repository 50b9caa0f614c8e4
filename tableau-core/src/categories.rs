use std::sync::Arc;

use crate::storage::BoardStorage;
use crate::types::{Category, CategoryPatch};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    NotFound(i64),
}

/// CRUD over the flat category list. Deleting a category leaves tickets that
/// reference its id untouched.
pub struct CategoryService {
    storage: Arc<dyn BoardStorage>,
}

impl CategoryService {
    pub fn new(storage: Arc<dyn BoardStorage>) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> Vec<Category> {
        self.storage.load_categories()
    }

    pub fn find(&self, id: i64) -> Option<Category> {
        self.list().into_iter().find(|c| c.id == id)
    }

    /// Ids are one past the current maximum, so they restart at 1 once the
    /// list is emptied.
    pub fn create(&self, name: String, color: String) -> Category {
        let mut categories = self.storage.load_categories();
        let id = categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let category = Category { id, name, color };
        categories.push(category.clone());
        self.persist(&categories);
        log::info!(target: "tableau.categories", "Created category {} ({})", id, category.name);
        category
    }

    pub fn update(&self, id: i64, patch: CategoryPatch) -> Result<Category, CategoryError> {
        let mut categories = self.storage.load_categories();
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CategoryError::NotFound(id))?;
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(color) = patch.color {
            category.color = color;
        }
        let updated = category.clone();
        self.persist(&categories);
        Ok(updated)
    }

    /// Always succeeds; the remaining list is written back even when `id`
    /// was not present.
    pub fn delete(&self, id: i64) {
        let mut categories = self.storage.load_categories();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() < before {
            log::info!(target: "tableau.categories", "Deleted category {}", id);
        }
        self.persist(&categories);
    }

    fn persist(&self, categories: &[Category]) {
        if let Err(e) = self.storage.save_categories(categories) {
            log::error!(target: "tableau.categories", "Failed to save categories: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardService, NewTicket};
    use crate::clock::FixedClock;
    use crate::storage::memory::MemoryStorage;
    use crate::types::Column;

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_first_id_is_one_and_ids_restart_after_clearing() {
        let svc = service();
        assert_eq!(svc.create("Urgent".into(), "red".into()).id, 1);
        assert_eq!(svc.create("Soon".into(), "orange".into()).id, 2);

        svc.delete(1);
        svc.delete(2);
        assert!(svc.list().is_empty());
        assert_eq!(svc.create("Again".into(), "blue".into()).id, 1);
    }

    #[test]
    fn test_id_follows_max_not_count() {
        let svc = service();
        for name in ["a", "b", "c"] {
            svc.create(name.into(), "grey".into());
        }
        svc.delete(1);
        assert_eq!(svc.create("d".into(), "grey".into()).id, 4);
        let ids: Vec<i64> = svc.list().iter().map(|c| c.id).collect();
        assert_eq!(ids, [2, 3, 4]);
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let svc = service();
        let created = svc.create("Urgent".into(), "red".into());

        let updated = svc
            .update(
                created.id,
                CategoryPatch {
                    color: Some("#ff0000".into()),
                    ..CategoryPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Urgent");
        assert_eq!(updated.color, "#ff0000");
        assert_eq!(svc.find(created.id), Some(updated));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let svc = service();
        assert_eq!(
            svc.update(9, CategoryPatch::default()),
            Err(CategoryError::NotFound(9))
        );
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let svc = service();
        svc.create("Keep".into(), "green".into());
        svc.delete(42);
        assert_eq!(svc.list().len(), 1);
    }

    #[test]
    fn test_delete_does_not_cascade_to_tickets() {
        let storage = Arc::new(MemoryStorage::new());
        let categories = CategoryService::new(storage.clone());
        let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let board = BoardService::new(storage.clone(), Arc::new(FixedClock(today)));

        let cat = categories.create("Label".into(), "purple".into());
        board.add_ticket(NewTicket {
            column: "À faire".into(),
            title: "tagged".into(),
            category: Some(cat.id.to_string()),
            ..NewTicket::default()
        });
        categories.delete(cat.id);

        let loaded = board.view();
        assert_eq!(loaded.tickets(Column::Todo)[0].category, Some(cat.id));
        assert_eq!(categories.find(cat.id), None);
    }

    #[test]
    fn test_create_keeps_incomplete_categories() {
        let storage = Arc::new(MemoryStorage::with_documents(
            None,
            Some(r#"[{"id": 1, "name": "Urgent", "color": "red"}, {"id": 2, "name": "No color"}]"#),
        ));
        let svc = CategoryService::new(storage);
        assert_eq!(svc.list().len(), 2);

        assert_eq!(svc.create("Third".into(), "blue".into()).id, 3);
        let names: Vec<String> = svc.list().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Urgent", "No color", "Third"]);
    }

    #[test]
    fn test_create_returns_record_when_save_fails() {
        let svc = CategoryService::new(Arc::new(MemoryStorage::with_failing_writes()));
        let created = svc.create("Urgent".into(), "red".into());
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Urgent");
        assert!(svc.list().is_empty());
    }
}
