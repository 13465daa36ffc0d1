//! Storage initialization
//!
//! First-run setup: seeds the shared default categories. This is the only
//! path that creates `Shared` categories.

use tracing::info;

use crate::error::TallyError;
use crate::models::{Category, CategoryKind};

use super::Storage;

const DEFAULT_COLOR: &str = "#6B7280";

/// (name, kind, icon)
const DEFAULT_CATEGORIES: &[(&str, CategoryKind, &str)] = &[
    ("Salary", CategoryKind::Income, "attach_money"),
    ("Investments", CategoryKind::Income, "trending_up"),
    ("Gifts", CategoryKind::Income, "card_giftcard"),
    ("Other income", CategoryKind::Income, "more_horiz"),
    ("Food", CategoryKind::Expense, "restaurant"),
    ("Fuel", CategoryKind::Expense, "local_gas_station"),
    ("Transport", CategoryKind::Expense, "directions_bus"),
    ("Housing", CategoryKind::Expense, "home"),
    ("Shopping", CategoryKind::Expense, "shopping_cart"),
    ("Health", CategoryKind::Expense, "medical_services"),
    ("Education", CategoryKind::Expense, "school"),
    ("Leisure", CategoryKind::Expense, "sports_esports"),
    ("Clothing", CategoryKind::Expense, "checkroom"),
    ("Other", CategoryKind::Expense, "more_horiz"),
];

/// Seed the shared categories if none exist yet
///
/// Returns how many categories were created; zero on an already initialized
/// store.
pub fn initialize_storage(storage: &Storage) -> Result<usize, TallyError> {
    storage.paths().ensure_directories()?;

    if storage.categories.has_defaults()? {
        return Ok(0);
    }

    for (name, kind, icon) in DEFAULT_CATEGORIES {
        storage
            .categories
            .insert_unique(Category::new_default(*name, *kind, icon, DEFAULT_COLOR))?;
    }
    storage.categories.save()?;

    info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
    Ok(DEFAULT_CATEGORIES.len())
}

/// Whether the shared categories still need seeding
pub fn needs_initialization(storage: &Storage) -> Result<bool, TallyError> {
    Ok(!storage.categories.has_defaults()?)
}
