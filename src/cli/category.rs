//! Category CLI commands
//!
//! Implements CLI commands for category management. Defaults are listed
//! alongside the user's own categories but cannot be changed from here.

use clap::Subcommand;

use crate::display::category::{format_category_details, format_category_tree};
use crate::error::{TallyError, TallyResult};
use crate::models::{CategoryKind, UserId};
use crate::services::{CategoryService, CreateCategoryInput};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List your categories and the defaults, grouped by kind
    List,

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// income or expense
        #[arg(short, long, default_value = "expense")]
        kind: String,
        /// Display icon
        #[arg(long)]
        icon: Option<String>,
        /// Display color (#RRGGBB)
        #[arg(long)]
        color: Option<String>,
    },

    /// Rename one of your categories
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },

    /// Delete one of your categories
    ///
    /// Transactions that used it are kept and become uncategorized.
    Delete {
        /// Category name or ID
        category: String,
    },
}

fn parse_kind(kind: &str) -> TallyResult<CategoryKind> {
    CategoryKind::parse(kind).ok_or_else(|| {
        TallyError::InvalidInput(format!(
            "Invalid category kind: '{}'. Use income or expense",
            kind
        ))
    })
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    owner: &UserId,
    cmd: CategoryCommands,
) -> TallyResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list(owner)?;
            print!("{}", format_category_tree(&categories));
        }

        CategoryCommands::Show { category } => {
            let category = service.resolve(owner, &category, None)?;
            print!("{}", format_category_details(&category));
        }

        CategoryCommands::Create {
            name,
            kind,
            icon,
            color,
        } => {
            let category = service.create(
                owner,
                CreateCategoryInput {
                    name,
                    kind: parse_kind(&kind)?,
                    icon,
                    color,
                },
            )?;

            println!("Created category: {}", category.name);
            println!("  Kind: {}", category.kind);
            println!("  ID:   {}", category.id);
        }

        CategoryCommands::Rename { category, name } => {
            let found = service.resolve(owner, &category, None)?;
            let renamed = service.rename(owner, found.id, &name)?;
            println!("Renamed category: {} -> {}", found.name, renamed.name);
        }

        CategoryCommands::Delete { category } => {
            let found = service.resolve(owner, &category, None)?;
            let (deleted, detached) = service.delete(owner, found.id)?;
            println!("Deleted category: {}", deleted.name);
            if detached > 0 {
                println!("  {} transaction(s) are now uncategorized", detached);
            }
        }
    }

    Ok(())
}
