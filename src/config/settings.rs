//! User settings for Tally
//!
//! Display preferences, the default log level, and the billing parameters
//! that turn a verified purchase into an entitlement window.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::paths::TallyPaths;
use crate::error::TallyError;
use crate::models::Plan;

/// Store product ids and plan lengths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingSettings {
    /// Length of a monthly plan in days
    #[serde(default = "default_monthly_days")]
    pub monthly_days: i64,

    /// Length of a yearly plan in days
    #[serde(default = "default_yearly_days")]
    pub yearly_days: i64,

    /// Store product id for the monthly plan
    #[serde(default = "default_monthly_product")]
    pub monthly_product_id: String,

    /// Store product id for the yearly plan
    #[serde(default = "default_yearly_product")]
    pub yearly_product_id: String,
}

fn default_monthly_days() -> i64 {
    Plan::Monthly.default_duration_days()
}

fn default_yearly_days() -> i64 {
    Plan::Yearly.default_duration_days()
}

fn default_monthly_product() -> String {
    "com.quantogastei.pro.mensal".to_string()
}

fn default_yearly_product() -> String {
    "com.quantogastei.pro.anual".to_string()
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            monthly_days: default_monthly_days(),
            yearly_days: default_yearly_days(),
            monthly_product_id: default_monthly_product(),
            yearly_product_id: default_yearly_product(),
        }
    }
}

impl BillingSettings {
    /// Length of one paid window for `plan`
    pub fn duration(&self, plan: Plan) -> Duration {
        match plan {
            Plan::Monthly => Duration::days(self.monthly_days),
            Plan::Yearly => Duration::days(self.yearly_days),
        }
    }

    pub fn product_id(&self, plan: Plan) -> &str {
        match plan {
            Plan::Monthly => &self.monthly_product_id,
            Plan::Yearly => &self.yearly_product_id,
        }
    }
}

/// User settings for Tally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub billing: BillingSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            log_level: default_log_level(),
            billing: BillingSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &TallyPaths) -> Result<Self, TallyError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller saves
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| TallyError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| TallyError::Config(format!("Failed to parse settings file: {}", e)))?;

        if settings.billing.monthly_days <= 0 || settings.billing.yearly_days <= 0 {
            return Err(TallyError::Config(
                "billing plan durations must be positive".into(),
            ));
        }

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TallyPaths) -> Result<(), TallyError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TallyError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TallyError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn format_money(&self, amount: crate::models::Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.billing.duration(Plan::Monthly), Duration::days(30));
        assert_eq!(settings.billing.duration(Plan::Yearly), Duration::days(365));
        assert_eq!(
            settings.billing.product_id(Plan::Yearly),
            "com.quantogastei.pro.anual"
        );
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "R$".into();
        settings.billing.monthly_days = 31;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "R$");
        assert_eq!(loaded.billing.duration(Plan::Monthly), Duration::days(31));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"billing": {"yearly_days": 366}}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "$");
        assert_eq!(loaded.billing.yearly_days, 366);
        assert_eq!(loaded.billing.monthly_days, 30);
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"billing": {"monthly_days": 0}}"#).unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(TallyError::Config(_))
        ));
    }
}
