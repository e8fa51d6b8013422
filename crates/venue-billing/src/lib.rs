//! # venue-billing: Billing Integration for the Venue Storefront
//!
//! Connects the pure `venue-core` engine to tenant configuration, the tax
//! catalog and invoice number storage.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout → Invoice                                   │
//! │                                                                         │
//! │  1. BillingConfig::load ─────► tax policy, currency, numbering         │
//! │                                                                         │
//! │  2. quote_checkout ──────────► TaxCatalog::rules_for(tenant)           │
//! │                                 venue_core::calculate_taxes             │
//! │                                 venue_core::format_tax_breakdown        │
//! │                                                                         │
//! │  3. Payment confirmed                                                  │
//! │                                                                         │
//! │  4. InvoiceIssuer::issue ────► per-tenant lock                         │
//! │                                 next number computed and persisted      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - TOML + environment configuration
//! - [`catalog`] - Tax rule source
//! - [`checkout`] - Checkout quoting
//! - [`issuer`] - Invoice number issuance
//! - [`error`] - Error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod issuer;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{StaticCatalog, TaxCatalog};
pub use checkout::{quote_checkout, CheckoutKind, CheckoutQuote};
pub use config::BillingConfig;
pub use error::{BillingError, BillingResult};
pub use issuer::{InMemoryInvoiceStore, InvoiceIssuer, InvoiceStore, IssuedInvoice, TenantInvoiceState};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=venue_billing=trace` - Trace this crate only
/// - Default: `info,venue=debug`
///
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,venue=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
