//! # Pricing Configuration
//!
//! Workshop-wide rates and defaults applied to every product.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CIRERIE_VAT_RATE=5,5                                               │
//! │     CIRERIE_SHIPPING_SERVICE=PointRelais                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cirerie/pricing.toml (Linux)                             │
//! │     ~/Library/Application Support/fr.cirerie.cirerie/pricing.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     VAT 20 %, business charges 13.4 %, multiplier 1                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pricing.toml
//! [rates]
//! vat = 20.0
//! transaction_fee = 1.4
//! depot_commission = 25.0
//! business_charges = 13.4
//!
//! [defaults]
//! margin_multiplier = 2.5
//! shipping_service = "Locker"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use cirerie_core::parse::{lenient_f64, parse_number};
use cirerie_core::validation::{validate_margin_multiplier, validate_percentage};
use cirerie_core::{
    Percentage, PricingParameters, SaleChannel, ShippingService, DEFAULT_BUSINESS_CHARGES_RATE,
};

use crate::error::{CatalogError, CatalogResult};

// =============================================================================
// Rates
// =============================================================================

/// Rates in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSettings {
    #[serde(default = "default_vat", deserialize_with = "lenient_f64")]
    pub vat: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub transaction_fee: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub depot_commission: f64,

    #[serde(default = "default_business_charges", deserialize_with = "lenient_f64")]
    pub business_charges: f64,
}

fn default_vat() -> f64 {
    20.0
}

fn default_business_charges() -> f64 {
    DEFAULT_BUSINESS_CHARGES_RATE
}

impl Default for RateSettings {
    fn default() -> Self {
        RateSettings {
            vat: default_vat(),
            transaction_fee: 0.0,
            depot_commission: 0.0,
            business_charges: default_business_charges(),
        }
    }
}

// =============================================================================
// Defaults
// =============================================================================

/// Values used when a product does not set its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultSettings {
    #[serde(default = "default_margin_multiplier", deserialize_with = "lenient_f64")]
    pub margin_multiplier: f64,

    #[serde(default)]
    pub shipping_service: ShippingService,
}

fn default_margin_multiplier() -> f64 {
    1.0
}

impl Default for DefaultSettings {
    fn default() -> Self {
        DefaultSettings {
            margin_multiplier: default_margin_multiplier(),
            shipping_service: ShippingService::default(),
        }
    }
}

// =============================================================================
// Main Pricing Configuration
// =============================================================================

/// Complete pricing configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub rates: RateSettings,

    #[serde(default)]
    pub defaults: DefaultSettings,
}

impl PricingConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (pricing.toml)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` must exist. The platform default path is
    /// optional.
    pub fn load(config_path: Option<PathBuf>) -> CatalogResult<Self> {
        let mut config = Self::default();

        match config_path {
            Some(path) => config = Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => config = Self::from_file(&path)?,
                Some(path) => debug!(?path, "Config file not found, using defaults"),
                None => debug!("No platform config directory, using defaults"),
            },
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load pricing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    fn from_file(path: &Path) -> CatalogResult<Self> {
        info!(?path, "Loading pricing config from file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses a TOML document. Missing sections keep their defaults.
    pub fn from_toml_str(contents: &str) -> CatalogResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> CatalogResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CatalogResult<()> {
        let rates = [
            ("vat rate", self.rates.vat),
            ("transaction fee rate", self.rates.transaction_fee),
            ("depot commission rate", self.rates.depot_commission),
            ("business charges rate", self.rates.business_charges),
        ];
        for (field, value) in rates {
            validate_percentage(field, value)
                .map_err(|e| CatalogError::InvalidConfig(e.to_string()))?;
        }

        validate_margin_multiplier(self.defaults.margin_multiplier)
            .map_err(|e| CatalogError::InvalidConfig(e.to_string()))?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// Numbers go through the same lenient parser as form input; a value
    /// that does not parse is ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let numeric = [
            ("CIRERIE_VAT_RATE", &mut self.rates.vat),
            ("CIRERIE_TRANSACTION_FEE_RATE", &mut self.rates.transaction_fee),
            ("CIRERIE_DEPOT_COMMISSION_RATE", &mut self.rates.depot_commission),
            ("CIRERIE_BUSINESS_CHARGES_RATE", &mut self.rates.business_charges),
            ("CIRERIE_MARGIN_MULTIPLIER", &mut self.defaults.margin_multiplier),
        ];
        for (key, slot) in numeric {
            let Some(raw) = lookup(key) else { continue };
            match parse_number(&raw) {
                Some(value) => {
                    debug!(key, value, "Overriding pricing config from environment");
                    *slot = value;
                }
                None => warn!(key, value = %raw, "Ignoring non-numeric environment override"),
            }
        }

        if let Some(raw) = lookup("CIRERIE_SHIPPING_SERVICE") {
            match raw.parse::<ShippingService>() {
                Ok(service) => {
                    debug!(%service, "Overriding shipping service from environment");
                    self.defaults.shipping_service = service;
                }
                Err(e) => warn!(value = %raw, "Ignoring environment override: {}", e),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("fr", "cirerie", "cirerie")
            .map(|dirs| dirs.config_dir().join("pricing.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Engine parameters for one channel, using the default multiplier.
    pub fn parameters(&self, channel: SaleChannel) -> PricingParameters {
        PricingParameters {
            channel,
            shipping_service: self.defaults.shipping_service,
            margin_multiplier: self.defaults.margin_multiplier,
            vat_rate: self.vat_rate(),
            transaction_fee_rate: Percentage::new(self.rates.transaction_fee),
            depot_commission_rate: Percentage::new(self.rates.depot_commission),
            business_charges_rate: Percentage::new(self.rates.business_charges),
        }
    }

    /// VAT rate.
    pub fn vat_rate(&self) -> Percentage {
        Percentage::new(self.rates.vat)
    }
}
