//! Category display formatting
//!
//! Formats categories for terminal output, grouped by kind.

use crate::models::{Category, CategoryKind};

/// Format categories as a tree under their kind
///
/// Expects the list in storage order (kind, then name).
pub fn format_category_tree(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'tally init' to create default categories.\n"
            .to_string();
    }

    let mut output = String::new();

    for (i, kind) in [CategoryKind::Income, CategoryKind::Expense]
        .into_iter()
        .enumerate()
    {
        let in_kind: Vec<_> = categories.iter().filter(|c| c.kind == kind).collect();

        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("{}\n", kind));

        if in_kind.is_empty() {
            output.push_str("  (no categories)\n");
            continue;
        }

        for (j, category) in in_kind.iter().enumerate() {
            let prefix = if j == in_kind.len() - 1 {
                "└── "
            } else {
                "├── "
            };
            let marker = if category.is_default() { "" } else { " *" };

            output.push_str(&format!(
                "  {}{}{}  [{}]\n",
                prefix, category.name, marker, category.id
            ));
        }
    }

    output.push_str("\n* your own category\n");
    output
}

/// Format a single category's details
pub fn format_category_details(category: &Category) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:    {}\n", category.id));
    output.push_str(&format!("  Kind:  {}\n", category.kind));
    output.push_str(&format!("  Icon:  {}\n", category.icon));
    output.push_str(&format!("  Color: {}\n", category.color));
    output.push_str(&format!(
        "  Owner: {}\n",
        if category.is_default() { "default" } else { "you" }
    ));

    output
}
