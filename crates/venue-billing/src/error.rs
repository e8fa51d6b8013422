//! # Billing Error Types
//!
//! Error types for the billing integration layer.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Billing Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Catalog      │  │      Issuance           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Json           │  │  UnknownTenant          │ │
//! │  │  Io / TomlParse │  │  Validation     │  │  LockPoisoned           │ │
//! │  │  TomlSerialize  │  │                 │  │  Store                  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use venue_core::{CoreError, ValidationError};

/// Result type alias for billing operations.
pub type BillingResult<T> = Result<T, BillingError>;

/// Billing error type covering config, catalog and issuance failures.
#[derive(Debug, Error)]
pub enum BillingError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid billing configuration.
    #[error("Invalid billing configuration: {0}")]
    InvalidConfig(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Config file could not be read or written.
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML.
    #[error("Failed to parse config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // =========================================================================
    // Catalog Errors
    // =========================================================================
    /// Tax catalog JSON could not be decoded.
    #[error("Failed to decode tax catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// Input failed a business rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Domain error from venue-core.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    // =========================================================================
    // Issuance Errors
    // =========================================================================
    /// No invoice numbering state exists for the tenant.
    #[error("Unknown tenant: {0}")]
    UnknownTenant(String),

    /// A thread panicked while holding a tenant's issuance lock.
    #[error("Issuance lock poisoned for tenant {0}")]
    LockPoisoned(String),

    /// The tenant used every sequence number of the current period.
    #[error("Invoice sequence exhausted for tenant {tenant_id} in {year}-{month:02}")]
    SequenceExhausted { tenant_id: String, year: i32, month: u32 },

    /// The invoice store rejected a read or write.
    #[error("Invoice store error: {0}")]
    Store(String),
}
