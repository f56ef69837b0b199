use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

use crate::barcode::PaperSize;

pub const PAGE_SIZE_RANGE: (usize, usize) = (5, 100);
pub const SKELETON_ROWS_RANGE: (usize, usize) = (1, 20);

/// Optional hex overrides for the built-in palette
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Shown in the title bar and on printed label sheets
    pub store_name: String,

    /// Currency symbol prefixed to amounts
    pub currency: String,

    /// Rows per page on list screens
    pub page_size: usize,

    /// Placeholder rows shown while a page loads
    pub skeleton_rows: usize,

    /// Default sheet for barcode labels
    #[serde(deserialize_with = "paper_or_default")]
    pub paper_size: PaperSize,

    /// Show desktop notifications
    pub notifications: bool,

    /// Artificial delay on every data request, in milliseconds
    pub mock_latency_ms: u64,

    /// Offer to install the desktop launcher on startup
    pub install_prompt: bool,

    pub theme: ThemeConfig,
}

/// An unknown paper name falls back to the default instead of rejecting the file
fn paper_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PaperSize, D::Error> {
    let name = String::deserialize(deserializer)?;
    Ok(name.parse().unwrap_or_else(|e| {
        tracing::warn!("{}, using {}", e, PaperSize::default());
        PaperSize::default()
    }))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_name: "Backroom".to_string(),
            currency: "$".to_string(),
            page_size: 10,
            skeleton_rows: 5,
            paper_size: PaperSize::A4,
            notifications: false,
            mock_latency_ms: 250,
            install_prompt: true,
            theme: ThemeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("backroom");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            // An existing file is never overwritten here
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => return Ok(config.sanitized()),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        let _ = config.save();
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(&self.clone().sanitized())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Clamp numeric settings into their supported ranges and fill blanks
    pub fn sanitized(mut self) -> Self {
        self.page_size = self.page_size.clamp(PAGE_SIZE_RANGE.0, PAGE_SIZE_RANGE.1);
        self.skeleton_rows = self
            .skeleton_rows
            .clamp(SKELETON_ROWS_RANGE.0, SKELETON_ROWS_RANGE.1);
        if self.store_name.trim().is_empty() {
            self.store_name = AppConfig::default().store_name;
        }
        if self.currency.trim().is_empty() {
            self.currency = AppConfig::default().currency;
        }
        self
    }

    pub fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            store_name: "Corner Shop".to_string(),
            currency: "€".to_string(),
            paper_size: PaperSize::Letter,
            theme: ThemeConfig {
                accent: Some("#ffc107".to_string()),
                ..ThemeConfig::default()
            },
            ..AppConfig::default()
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = toml::from_str("store_name = \"Kiosk\"\n").unwrap();
        assert_eq!(config.store_name, "Kiosk");
        assert_eq!(config.page_size, AppConfig::default().page_size);
        assert_eq!(config.paper_size, PaperSize::A4);
    }

    #[test]
    fn test_paper_size_ignores_case() {
        let config: AppConfig =
            toml::from_str("store_name = \"Corner Shop\"\npaper_size = \"letter\"\n").unwrap();
        assert_eq!(config.store_name, "Corner Shop");
        assert_eq!(config.paper_size, PaperSize::Letter);

        let config: AppConfig = toml::from_str("paper_size = \"LEGAL\"\n").unwrap();
        assert_eq!(config.paper_size, PaperSize::Legal);
    }

    #[test]
    fn test_unknown_paper_size_keeps_other_settings() {
        let config: AppConfig =
            toml::from_str("store_name = \"Corner Shop\"\ncurrency = \"€\"\npaper_size = \"tabloid\"\n")
                .unwrap();
        assert_eq!(config.store_name, "Corner Shop");
        assert_eq!(config.currency, "€");
        assert_eq!(config.paper_size, PaperSize::A4);
    }

    #[test]
    fn test_sanitized_clamps_ranges() {
        let config = AppConfig {
            page_size: 0,
            skeleton_rows: 500,
            currency: "  ".to_string(),
            ..AppConfig::default()
        }
        .sanitized();

        assert_eq!(config.page_size, PAGE_SIZE_RANGE.0);
        assert_eq!(config.skeleton_rows, SKELETON_ROWS_RANGE.1);
        assert_eq!(config.currency, "$");
    }

    #[test]
    fn test_money() {
        assert_eq!(AppConfig::default().money(3.5), "$3.50");
    }
}
