//! # Error Types
//!
//! Domain-specific error types for venue-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  venue-core errors (this file)                                         │
//! │  ├── CoreError        - Domain construction errors                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  venue-billing errors (separate crate)                                 │
//! │  └── BillingError     - Config, catalog and issuance failures          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BillingError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Does NOT Error
//! The calculation and numbering functions are total. A non-taxable
//! subtotal, an unparseable invoice number or an empty catalog all produce
//! a defined, zeroed result. Errors only come from constructing domain
//! values (`TaxRate` from a wire percentage) and from the explicit
//! validators in [`crate::validation`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A tax rate percentage could not be represented.
    ///
    /// ## When This Occurs
    /// - Catalog JSON carries a negative rate
    /// - Rate is NaN or infinite
    #[error("Invalid tax rate: {value}")]
    InvalidTaxRate { value: f64 },

    /// Invoice numbering configuration cannot produce a number.
    #[error("Invalid invoice configuration: {reason}")]
    InvalidInvoiceConfig { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Returned by the opt-in validators that callers run before handing
/// data to the calculator.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid prefix characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two catalog rules sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
