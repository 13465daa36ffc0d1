//! Configuration module for Tally
//!
//! Path resolution for the data directory and persisted user settings.

pub mod paths;
pub mod settings;

pub use paths::TallyPaths;
pub use settings::{BillingSettings, Settings};
