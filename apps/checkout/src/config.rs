//! # Checkout Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BASKET_OUTPUT=json                                                 │
//! │     BASKET_SCENARIO=./scenarios/default.toml                           │
//! │     BASKET_DELIVERY_ENABLED=false                                      │
//! │     BASKET_COST_PER_DELIVERY / _PER_PRODUCT / BASKET_FIXED_COST        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/checkout/checkout.toml (Linux)                           │
//! │     ~/Library/Application Support/com.basket.checkout/checkout.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # checkout.toml
//! output = "text"          # text | json
//! scenario = "scenarios/default.toml"
//!
//! [delivery]
//! enabled = true
//! cost_per_delivery = 500  # cents, per distinct category
//! cost_per_product = 100   # cents, per distinct product
//! fixed_cost = 299         # cents
//! ```

use basket_core::Money;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

// =============================================================================
// Output Format
// =============================================================================

/// How a receipt is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// The fixed human-readable block.
    #[default]
    Text,

    /// The same summary as pretty-printed JSON.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::Config(format!(
                "Unknown output format: '{}'. Valid options: text, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Delivery Settings
// =============================================================================

/// Parameters of the delivery cost formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySettings {
    /// Skip delivery pricing entirely when false.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Charged once per distinct category in the cart (cents).
    #[serde(default = "default_cost_per_delivery")]
    pub cost_per_delivery: Money,

    /// Charged once per distinct product in the cart (cents).
    #[serde(default = "default_cost_per_product")]
    pub cost_per_product: Money,

    /// Added to every non-empty cart (cents).
    #[serde(default = "default_fixed_cost")]
    pub fixed_cost: Money,
}

fn default_true() -> bool {
    true
}

fn default_cost_per_delivery() -> Money {
    Money::from_cents(500)
}

fn default_cost_per_product() -> Money {
    Money::from_cents(100)
}

fn default_fixed_cost() -> Money {
    Money::from_cents(299)
}

impl Default for DeliverySettings {
    fn default() -> Self {
        DeliverySettings {
            enabled: true,
            cost_per_delivery: default_cost_per_delivery(),
            cost_per_product: default_cost_per_product(),
            fixed_cost: default_fixed_cost(),
        }
    }
}

// =============================================================================
// Main Checkout Configuration
// =============================================================================

/// Complete checkout configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Receipt format.
    #[serde(default)]
    pub output: OutputFormat,

    /// Scenario file used when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<PathBuf>,

    /// Delivery pricing.
    #[serde(default)]
    pub delivery: DeliverySettings,
}

impl CheckoutConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (checkout.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load checkout config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a config document without touching the environment.
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> AppResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| AppError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Checkout config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        let costs = [
            ("cost_per_delivery", self.delivery.cost_per_delivery),
            ("cost_per_product", self.delivery.cost_per_product),
            ("fixed_cost", self.delivery.fixed_cost),
        ];
        for (field, cost) in costs {
            if cost.is_negative() {
                return Err(AppError::Config(format!(
                    "delivery.{} must not be negative, got {}",
                    field, cost
                )));
            }
        }

        if let Some(ref path) = self.scenario {
            if path.as_os_str().is_empty() {
                return Err(AppError::Config("scenario path must not be empty".into()));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(format) = lookup("BASKET_OUTPUT") {
            match format.parse() {
                Ok(parsed) => {
                    debug!(format = %format, "Overriding output format from environment");
                    self.output = parsed;
                }
                Err(_) => warn!(format = %format, "Unknown output format in environment"),
            }
        }

        if let Some(path) = lookup("BASKET_SCENARIO") {
            debug!(path = %path, "Overriding scenario from environment");
            self.scenario = Some(PathBuf::from(path));
        }

        if let Some(enabled) = lookup("BASKET_DELIVERY_ENABLED") {
            if let Ok(enabled) = enabled.parse::<bool>() {
                self.delivery.enabled = enabled;
            }
        }

        let cents = |key: &str| lookup(key).and_then(|value| value.parse::<i64>().ok());

        if let Some(value) = cents("BASKET_COST_PER_DELIVERY") {
            self.delivery.cost_per_delivery = Money::from_cents(value);
        }
        if let Some(value) = cents("BASKET_COST_PER_PRODUCT") {
            self.delivery.cost_per_product = Money::from_cents(value);
        }
        if let Some(value) = cents("BASKET_FIXED_COST") {
            self.delivery.fixed_cost = Money::from_cents(value);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "basket", "checkout")
            .map(|dirs| dirs.config_dir().join("checkout.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = CheckoutConfig::default();
        assert_eq!(config.output, OutputFormat::Text);
        assert!(config.delivery.enabled);
        assert_eq!(config.delivery.fixed_cost, Money::from_cents(299));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = CheckoutConfig::from_toml_str(
            r#"
            output = "json"

            [delivery]
            cost_per_product = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.delivery.cost_per_product, Money::from_cents(50));
        assert_eq!(config.delivery.cost_per_delivery, Money::from_cents(500));
        assert!(config.scenario.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CheckoutConfig::default();
        config.delivery.fixed_cost = Money::from_cents(-1);
        assert!(config.validate().is_err());

        config.delivery.fixed_cost = Money::zero();
        config.scenario = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BASKET_OUTPUT", "json"),
            ("BASKET_DELIVERY_ENABLED", "false"),
            ("BASKET_FIXED_COST", "0"),
            ("BASKET_COST_PER_PRODUCT", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = CheckoutConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.output, OutputFormat::Json);
        assert!(!config.delivery.enabled);
        assert_eq!(config.delivery.fixed_cost, Money::zero());
        assert_eq!(config.delivery.cost_per_product, Money::from_cents(100));
    }

    #[test]
    fn test_save_then_load_from_file() {
        let path = std::env::temp_dir().join(format!("checkout-{}.toml", uuid::Uuid::new_v4()));
        let mut config = CheckoutConfig::default();
        config.output = OutputFormat::Json;

        config.save(Some(path.clone())).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(contents.contains("[delivery]"));
        assert_eq!(CheckoutConfig::from_toml_str(&contents).unwrap(), config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("missing-{}.toml", uuid::Uuid::new_v4()));
        let config = CheckoutConfig::load_or_default(Some(path));
        assert!(config.validate().is_ok());
    }
}
