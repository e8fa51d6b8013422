//! # Billing Configuration
//!
//! Per-tenant billing settings: tax policy, display currency and invoice
//! numbering.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VENUE_TENANT_ID=550e8400-...                                       │
//! │     VENUE_TAX_INCLUSIVE=true                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/venue-billing/billing.toml (Linux)                       │
//! │     ~/Library/Application Support/com.venue.billing/billing.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     taxable, exclusive, no tax-on-tax, INV-YYYY-MM-NNNN                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [tenant]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//! name = "Tilden Event Halls"
//!
//! [tax]
//! taxable = true
//! inclusive = false
//! tax_on_tax = true
//! currency_symbol = "₦"
//!
//! [invoice]
//! type = "prefix"
//! prefix = "TIL"
//! nextNumber = 1
//! padding = 4
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use venue_core::validation::{validate_invoice_config, validate_tenant_id};
use venue_core::{InvoiceFormatType, InvoiceNumberingConfig, TaxPolicy};

use crate::error::{BillingError, BillingResult};

// =============================================================================
// Tenant Settings
// =============================================================================

/// The tenant this configuration belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantSettings {
    /// Tenant identifier (UUID). Empty until the tenant is onboarded.
    #[serde(default)]
    pub id: String,

    /// Display name printed on invoices.
    #[serde(default)]
    pub name: String,
}

// =============================================================================
// Tax Settings
// =============================================================================

/// Tax policy and display currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Whether the tenant charges tax at all.
    #[serde(default = "default_true")]
    pub taxable: bool,

    /// Listed prices already contain tax.
    #[serde(default)]
    pub inclusive: bool,

    /// Taxes are computed on subtotal + service fee.
    #[serde(default)]
    pub tax_on_tax: bool,

    /// Currency symbol for formatted breakdowns.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_true() -> bool {
    true
}

fn default_currency_symbol() -> String {
    "₦".to_string()
}

impl Default for TaxSettings {
    fn default() -> Self {
        TaxSettings {
            taxable: true,
            inclusive: false,
            tax_on_tax: false,
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl TaxSettings {
    /// The policy flags in the form the calculator takes.
    pub fn policy(&self) -> TaxPolicy {
        TaxPolicy {
            is_taxable: self.taxable,
            is_tax_inclusive: self.inclusive,
            is_tax_on_tax: self.tax_on_tax,
        }
    }
}

// =============================================================================
// Main Billing Configuration
// =============================================================================

/// Complete billing configuration for one tenant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub tenant: TenantSettings,

    #[serde(default)]
    pub tax: TaxSettings,

    /// Numbering format. `next_number` here is only the starting value;
    /// the live counter is kept by the invoice store.
    #[serde(default)]
    pub invoice: InvoiceNumberingConfig,
}

impl BillingConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document and validates it. No env overrides.
    pub fn from_toml_str(contents: &str) -> BillingResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (billing.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> BillingResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading billing config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load billing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> BillingResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| BillingError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Billing config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> BillingResult<()> {
        if !self.tenant.id.is_empty() {
            validate_tenant_id(&self.tenant.id)?;
        }

        if self.tax.currency_symbol.trim().is_empty() {
            return Err(BillingError::InvalidConfig(
                "currency_symbol must not be empty".into(),
            ));
        }

        validate_invoice_config(&self.invoice)?;

        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// An unknown `VENUE_INVOICE_TYPE` fails the load.
    fn apply_env_overrides(&mut self) -> BillingResult<()> {
        if let Ok(id) = std::env::var("VENUE_TENANT_ID") {
            debug!(tenant_id = %id, "Overriding tenant ID from environment");
            self.tenant.id = id;
        }

        if let Some(taxable) = env_flag("VENUE_TAXABLE") {
            self.tax.taxable = taxable;
        }

        if let Some(inclusive) = env_flag("VENUE_TAX_INCLUSIVE") {
            debug!(inclusive, "Overriding tax-inclusive flag from environment");
            self.tax.inclusive = inclusive;
        }

        if let Some(on_tax) = env_flag("VENUE_TAX_ON_TAX") {
            debug!(on_tax, "Overriding tax-on-tax flag from environment");
            self.tax.tax_on_tax = on_tax;
        }

        if let Ok(symbol) = std::env::var("VENUE_CURRENCY_SYMBOL") {
            self.tax.currency_symbol = symbol;
        }

        if let Ok(kind) = std::env::var("VENUE_INVOICE_TYPE") {
            self.set_invoice_type(&kind)?;
        }

        if let Ok(prefix) = std::env::var("VENUE_INVOICE_PREFIX") {
            debug!(prefix = %prefix, "Overriding invoice prefix from environment");
            self.invoice.prefix = Some(prefix);
        }

        if let Ok(padding) = std::env::var("VENUE_INVOICE_PADDING") {
            if let Ok(p) = padding.parse::<usize>() {
                self.invoice.padding = p;
            }
        }

        Ok(())
    }

    /// Sets the numbering format from its wire name (`auto`, `prefix`,
    /// `paystack`).
    pub fn set_invoice_type(&mut self, kind: &str) -> BillingResult<()> {
        self.invoice.format_type = kind.parse::<InvoiceFormatType>()?;
        debug!(format_type = %self.invoice.format_type, "Invoice type set");
        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "venue", "billing")
            .map(|dirs| dirs.config_dir().join("billing.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the tenant ID, or `None` before onboarding.
    pub fn tenant_id(&self) -> Option<&str> {
        if self.tenant.id.is_empty() {
            None
        } else {
            Some(&self.tenant.id)
        }
    }

    /// Returns the calculator policy.
    pub fn policy(&self) -> TaxPolicy {
        self.tax.policy()
    }

    /// Returns the display currency symbol.
    pub fn currency_symbol(&self) -> &str {
        &self.tax.currency_symbol
    }
}

/// Reads a boolean env var. Accepts true/false, 1/0, yes/no.
fn env_flag(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        other => {
            warn!(key, value = %other, "Ignoring non-boolean environment value");
            None
        }
    }
}
