//! # venue-core: Pure Billing Logic for the Venue Storefront
//!
//! This crate computes what a booking or rental costs and what its invoice
//! is called. Everything here is a pure function with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Venue Storefront Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Storefront / Admin console (TypeScript)             │   │
//! │  │   Booking checkout ──► Rental checkout ──► Billing settings     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ts-rs generated types                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                venue-billing (config, issuance)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ venue-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │    tax    │  │  invoice  │  │ validation│  │   │
//! │  │   │  TaxRule  │  │ resolver  │  │ generate  │  │   rules   │  │   │
//! │  │   │  TaxRate  │  │ calculator│  │ parse     │  │   checks  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (TaxRule, TaxRate, InvoiceNumberingConfig, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`tax`] - Tax resolution and calculation
//! - [`invoice`] - Invoice number generation, parsing and sequencing
//! - [`validation`] - Opt-in input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output; the clock is injectable
//! 2. **No I/O**: the invoice counter is owned and persisted by the caller
//! 3. **Integer Money**: minor units × millionths of a percent, never floats
//! 4. **Total Functions**: bad input degrades to a defined result, never a panic;
//!    money arithmetic saturates at the `i64` bounds
//!
//! ## Example Usage
//!
//! ```rust
//! use venue_core::money::Money;
//! use venue_core::tax::calculate_booking_taxes;
//! use venue_core::types::{TaxPolicy, TaxRate, TaxRule, TaxScope};
//!
//! let catalog = vec![TaxRule {
//!     id: "vat".into(),
//!     name: "VAT".into(),
//!     rate: TaxRate::from_bps(750),
//!     applies_to: TaxScope::Both,
//!     is_active: true,
//!     is_platform_tax: true,
//!     tenant_id: None,
//!     tax_type: "federal".into(),
//! }];
//!
//! let result = calculate_booking_taxes(Money::from_minor(20_000), &catalog, None, TaxPolicy::default());
//! assert_eq!(result.tax.minor(), 1500);
//! assert_eq!(result.total.minor(), 21_500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use invoice::{
    generate_invoice_number, generate_invoice_number_at, get_next_invoice_config,
    get_next_invoice_config_at, parse_invoice_number, update_company_invoice_format,
    update_company_invoice_format_at, validate_invoice_number, BillingPeriod, NextInvoiceConfig,
    ParsedInvoiceNumber,
};
pub use money::Money;
pub use tax::{
    calculate_booking_taxes, calculate_rental_taxes, calculate_taxes, calculate_transaction_taxes,
    format_tax_breakdown, get_applicable_taxes, get_vat_tax, TaxCalculationRequest,
    TaxCalculationResult,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix for `auto` invoice numbers, and the fallback for `prefix`
/// configs without a usable custom prefix.
pub const DEFAULT_INVOICE_PREFIX: &str = "INV";

/// Prefix for `paystack` invoice numbers.
pub const PAYSTACK_INVOICE_PREFIX: &str = "PS";

/// Default zero-pad width of the invoice sequence.
pub const DEFAULT_INVOICE_PADDING: usize = 4;

/// Widest accepted sequence padding.
pub const MAX_INVOICE_PADDING: usize = 12;

/// Longest accepted custom invoice prefix.
pub const MAX_PREFIX_LENGTH: usize = 10;

/// Longest accepted tax rule name.
pub const MAX_RULE_NAME_LENGTH: usize = 100;

/// Oldest year an invoice number may carry.
pub const MIN_INVOICE_YEAR: i32 = 2000;

/// Latest year an invoice number may carry.
pub const MAX_INVOICE_YEAR: i32 = 2100;
