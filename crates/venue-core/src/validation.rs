//! # Validation Module
//!
//! Opt-in input validation for tax catalogs, subtotals and invoice
//! numbering configuration.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin console (TypeScript)                                   │
//! │  ├── Basic format checks (empty name, rate field)                      │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Catalog / config loading (venue-billing)                     │
//! │  ├── Deserialization (negative rates rejected by TaxRate)              │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculator (venue-core::tax)                                 │
//! │  └── Accepts anything, always returns a result                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculator never calls into this module. Historical data that fails
//! today's rules still prices the same.
//!
//! ## Usage
//! ```rust
//! use venue_core::validation::{validate_invoice_config, validate_subtotal};
//! use venue_core::money::Money;
//! use venue_core::types::InvoiceNumberingConfig;
//!
//! validate_subtotal(Money::from_minor(10_000)).unwrap();
//! validate_invoice_config(&InvoiceNumberingConfig::with_prefix("TIL", 1)).unwrap();
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{InvoiceFormatType, InvoiceNumberingConfig, TaxRate, TaxRule};
use crate::{MAX_INVOICE_PADDING, MAX_PREFIX_LENGTH, MAX_RULE_NAME_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest accepted rate.
const MAX_RATE: TaxRate = TaxRate::from_bps(10_000);

// =============================================================================
// Tax Catalog Validators
// =============================================================================

/// Validates a single tax rule.
///
/// ## Rules
/// - `id` and `name` must not be empty
/// - `name` at most 100 characters
/// - rate between 0% and 100%
/// - a rule that is not platform-wide must name its owning tenant
pub fn validate_tax_rule(rule: &TaxRule) -> ValidationResult<()> {
    if rule.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    let name = rule.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_RULE_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_RULE_NAME_LENGTH,
        });
    }

    if rule.rate > MAX_RATE {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0,
            max: 100,
        });
    }

    if !rule.is_platform_tax && rule.tenant_id.as_deref().map_or(true, |t| t.trim().is_empty()) {
        return Err(ValidationError::Required {
            field: "tenantId".to_string(),
        });
    }

    Ok(())
}

/// Validates every rule of a catalog and rejects duplicate ids.
pub fn validate_tax_catalog(rules: &[TaxRule]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(rules.len());
    for rule in rules {
        validate_tax_rule(rule)?;
        if !seen.insert(rule.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: rule.id.clone(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Monetary Validators
// =============================================================================

/// Validates a subtotal before quoting.
///
/// Zero is allowed (free bookings); negative amounts are not.
pub fn validate_subtotal(subtotal: Money) -> ValidationResult<()> {
    if subtotal.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "subtotal".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Invoice Config Validators
// =============================================================================

/// Validates a custom invoice prefix.
///
/// ## Rules
/// - Must not be empty
/// - At most 10 characters
/// - ASCII letters and digits only (no `-` separator)
pub fn validate_invoice_prefix(prefix: &str) -> ValidationResult<()> {
    let prefix = prefix.trim();

    if prefix.is_empty() {
        return Err(ValidationError::Required {
            field: "prefix".to_string(),
        });
    }

    if prefix.len() > MAX_PREFIX_LENGTH {
        return Err(ValidationError::TooLong {
            field: "prefix".to_string(),
            max: MAX_PREFIX_LENGTH,
        });
    }

    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "prefix".to_string(),
            reason: "must contain only letters and numbers".to_string(),
        });
    }

    Ok(())
}

/// Validates a tenant's numbering configuration.
///
/// ## Rules
/// - `prefix` configs need a valid custom prefix
/// - padding between 1 and 12
pub fn validate_invoice_config(config: &InvoiceNumberingConfig) -> ValidationResult<()> {
    if config.format_type == InvoiceFormatType::Prefix {
        validate_invoice_prefix(config.prefix.as_deref().unwrap_or(""))?;
    }

    if config.padding == 0 || config.padding > MAX_INVOICE_PADDING {
        return Err(ValidationError::OutOfRange {
            field: "padding".to_string(),
            min: 1,
            max: MAX_INVOICE_PADDING as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a tenant identifier (UUID issued by the storefront backend).
///
/// ```rust
/// use venue_core::validation::validate_tenant_id;
///
/// assert!(validate_tenant_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_tenant_id("not-a-uuid").is_err());
/// ```
pub fn validate_tenant_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "tenant_id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "tenant_id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
