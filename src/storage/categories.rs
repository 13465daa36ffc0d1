//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json. Shared default
//! categories live in the same table as user categories.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{Category, CategoryId, UserId};

use super::file_io::{lock_error, read_json, write_json_atomic};

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| lock_error("write", e))?;

        data.clear();
        for category in file_data.categories {
            data.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;

        let mut categories: Vec<_> = data.values().cloned().collect();
        categories.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        write_json_atomic(&self.path, &CategoryData { categories })
    }

    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;
        Ok(data.get(&id).cloned())
    }

    /// The user's own categories plus every shared default, by kind then name
    pub fn list_visible(&self, user: &UserId) -> Result<Vec<Category>, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;

        let mut categories: Vec<_> = data
            .values()
            .filter(|c| c.is_visible_to(user))
            .cloned()
            .collect();
        categories.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(categories)
    }

    /// Whether any shared default exists yet
    pub fn has_defaults(&self) -> Result<bool, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;
        Ok(data.values().any(Category::is_default))
    }

    /// Insert a new category, or replace one with the same id
    ///
    /// Fails with a conflict if another category with the same owner, kind
    /// and name (case-insensitive) exists.
    pub fn insert_unique(&self, category: Category) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(|e| lock_error("write", e))?;

        let name_lower = category.name.to_lowercase();
        let taken = data.values().any(|c| {
            c.id != category.id
                && c.owner == category.owner
                && c.kind == category.kind
                && c.name.to_lowercase() == name_lower
        });
        if taken {
            return Err(TallyError::Conflict {
                entity_type: "Category",
                identifier: format!("{} ({})", category.name, category.kind),
            });
        }

        data.insert(category.id, category);
        Ok(())
    }

    pub fn delete(&self, id: CategoryId) -> Result<bool, TallyError> {
        let mut data = self.data.write().map_err(|e| lock_error("write", e))?;
        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;
        Ok(data.len())
    }
}
