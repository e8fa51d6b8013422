//! # Domain Types
//!
//! Core domain types shared by the tax calculator and the invoice numbering
//! engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    TaxRule      │   │    TaxScope     │   │ InvoiceNumbering-    │  │
//! │  │  ─────────────  │   │  ─────────────  │   │ Config               │  │
//! │  │  id, name       │   │  Facility       │   │  ──────────────────  │  │
//! │  │  rate (µ%)      │   │  InventoryItem  │   │  type (auto|prefix|  │  │
//! │  │  applies_to     │   │  Both           │   │        paystack)     │  │
//! │  │  is_active      │   └─────────────────┘   │  prefix              │  │
//! │  │  owner          │                         │  next_number         │  │
//! │  └─────────────────┘   ┌─────────────────┐   │  padding             │  │
//! │                        │    TaxRate      │   └──────────────────────┘  │
//! │  ┌─────────────────┐   │  ─────────────  │                             │
//! │  │   TaxPolicy     │   │  µ% (u32)       │                             │
//! │  │  taxable        │   │  15_000_000=15% │                             │
//! │  │  inclusive      │   └─────────────────┘                             │
//! │  │  tax_on_tax     │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Types serialize with the camelCase field names the storefront backend
//! already uses (`appliesTo`, `isActive`, `nextNumber`, ...). Rates travel
//! as plain percentages (`"rate": 7.5`) and are held as millionths of a
//! percent here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::{DEFAULT_INVOICE_PADDING, DEFAULT_INVOICE_PREFIX, PAYSTACK_INVOICE_PREFIX};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in millionths of a percent.
///
/// ## Scale
/// ```text
/// 1 unit      = 0.000001%
/// 7_500_000   = 7.5%   (Nigerian VAT)
/// 125_000     = 0.125% (stamp duty)
/// 100_000_000 = 100%
/// ```
///
/// Fine enough that every percentage a tenant can type into the admin
/// console is held exactly. Percentages with more than six decimal places
/// are rejected by `TaxRate::try_from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "f64", into = "f64")]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Units per whole percent.
    pub const UNITS_PER_PERCENT: u32 = 1_000_000;

    /// Units per basis point (0.01%).
    const UNITS_PER_BPS: u32 = 10_000;

    /// Creates a tax rate from millionths of a percent.
    #[inline]
    pub const fn from_micro_percent(units: u32) -> Self {
        TaxRate(units)
    }

    /// Creates a tax rate from basis points. Saturates above ~4294%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps.saturating_mul(Self::UNITS_PER_BPS))
    }

    /// Creates a tax rate from a percentage, rounded to the nearest unit.
    ///
    /// Negative and non-finite inputs saturate to zero; use
    /// `TaxRate::try_from` when the input is untrusted.
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * Self::UNITS_PER_PERCENT as f64).round() as u32)
    }

    /// Returns the rate in millionths of a percent.
    #[inline]
    pub const fn micro_percent(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / Self::UNITS_PER_PERCENT as f64
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

impl TryFrom<f64> for TaxRate {
    type Error = CoreError;

    /// Rejects negative, non-finite and out-of-range percentages, and any
    /// percentage that is not a whole number of units.
    fn try_from(pct: f64) -> Result<Self, Self::Error> {
        let scaled = pct * TaxRate::UNITS_PER_PERCENT as f64;
        if !scaled.is_finite() || scaled < 0.0 || scaled > u32::MAX as f64 {
            return Err(CoreError::InvalidTaxRate { value: pct });
        }
        // f64 noise from the decimal literal stays well under 1e-3 units
        if (scaled - scaled.round()).abs() > 1e-3 {
            return Err(CoreError::InvalidTaxRate { value: pct });
        }
        Ok(TaxRate(scaled.round() as u32))
    }
}

impl From<TaxRate> for f64 {
    fn from(rate: TaxRate) -> f64 {
        rate.percentage()
    }
}

impl Add for TaxRate {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        TaxRate(self.0.saturating_add(other.0))
    }
}

impl Sum for TaxRate {
    fn sum<I: Iterator<Item = TaxRate>>(iter: I) -> Self {
        iter.fold(TaxRate::zero(), Add::add)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

// =============================================================================
// Tax Scope
// =============================================================================

/// What kind of transaction a tax rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxScope {
    /// Facility bookings (halls, courts, studios).
    Facility,
    /// Inventory item rentals (chairs, projectors).
    InventoryItem,
    /// Both kinds of transaction.
    Both,
}

impl TaxScope {
    /// Returns true if a rule scoped to `self` applies to a `requested`
    /// transaction: exact match, or the rule is scoped to `Both`.
    ///
    /// A `Both` request only picks up `Both` rules.
    #[inline]
    pub fn covers(&self, requested: TaxScope) -> bool {
        *self == requested || *self == TaxScope::Both
    }
}

impl fmt::Display for TaxScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxScope::Facility => write!(f, "facility"),
            TaxScope::InventoryItem => write!(f, "inventory_item"),
            TaxScope::Both => write!(f, "both"),
        }
    }
}

// =============================================================================
// Tax Rule
// =============================================================================

/// A named tax (or service fee) rule from a tenant's catalog.
///
/// ## Ownership
/// A rule is either platform-wide (`is_platform_tax`) and applies to every
/// tenant, or belongs to exactly one tenant via `tenant_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxRule {
    /// Catalog identifier.
    pub id: String,

    /// Display name. Also drives classification: see [`TaxRule::is_service_fee`].
    pub name: String,

    /// Rate as a percentage on the wire, millionths of a percent in memory.
    pub rate: TaxRate,

    /// Transaction scope.
    pub applies_to: TaxScope,

    /// Inactive rules never contribute.
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Platform-wide rule, applies to every tenant.
    #[serde(default)]
    pub is_platform_tax: bool,

    /// Owning tenant for tenant-specific rules.
    #[serde(default)]
    pub tenant_id: Option<String>,

    /// Free-text classification (jurisdiction, "state", "federal").
    #[serde(rename = "type", default)]
    pub tax_type: String,
}

fn default_true() -> bool {
    true
}

impl TaxRule {
    /// Normalized name used for classification: trimmed, all whitespace
    /// removed, lower-cased. `" Service  Fee "` becomes `"servicefee"`.
    pub fn normalized_name(&self) -> String {
        normalize_rule_name(&self.name)
    }

    /// Service fees are recognized by name, not by a flag.
    ///
    /// Any rule whose normalized name contains `servicefee` is billed as a
    /// fee rather than a tax. Historical invoices depend on this exact test.
    pub fn is_service_fee(&self) -> bool {
        self.normalized_name().contains("servicefee")
    }

    /// True if the normalized name is exactly `vat`.
    pub fn is_vat(&self) -> bool {
        self.normalized_name() == "vat"
    }

    /// True if the rule may be used for `tenant_id`.
    ///
    /// Tenant-owned rules never match an anonymous (`None`) request.
    pub fn is_owned_by(&self, tenant_id: Option<&str>) -> bool {
        if self.is_platform_tax {
            return true;
        }
        match (self.tenant_id.as_deref(), tenant_id) {
            (Some(owner), Some(requested)) => owner == requested,
            _ => false,
        }
    }

    /// Full applicability test: active, scope-compatible and owned.
    pub fn applies(&self, scope: TaxScope, tenant_id: Option<&str>) -> bool {
        self.is_active && self.applies_to.covers(scope) && self.is_owned_by(tenant_id)
    }
}

/// Trim, strip every whitespace character, lower-case.
pub fn normalize_rule_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

// =============================================================================
// Tax Policy
// =============================================================================

/// Per-tenant tax policy flags.
///
/// ```text
/// is_taxable = false     → no fees, no tax, total = subtotal
/// is_tax_inclusive       → prices already contain tax, total = subtotal
/// is_tax_on_tax          → taxes are computed on subtotal + service fee
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxPolicy {
    #[serde(default = "default_true")]
    pub is_taxable: bool,

    #[serde(default)]
    pub is_tax_inclusive: bool,

    #[serde(default)]
    pub is_tax_on_tax: bool,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        TaxPolicy {
            is_taxable: true,
            is_tax_inclusive: false,
            is_tax_on_tax: false,
        }
    }
}

// =============================================================================
// Invoice Numbering
// =============================================================================

/// Invoice number format chosen by the tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceFormatType {
    /// `INV-YYYY-MM-NNNN`
    #[default]
    Auto,
    /// `{custom prefix}-YYYY-MM-NNNN`
    Prefix,
    /// `PS-YYYY-MM-NNNN`, for tenants collecting through Paystack.
    Paystack,
}

impl fmt::Display for InvoiceFormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceFormatType::Auto => write!(f, "auto"),
            InvoiceFormatType::Prefix => write!(f, "prefix"),
            InvoiceFormatType::Paystack => write!(f, "paystack"),
        }
    }
}

impl FromStr for InvoiceFormatType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(InvoiceFormatType::Auto),
            "prefix" | "custom" => Ok(InvoiceFormatType::Prefix),
            "paystack" => Ok(InvoiceFormatType::Paystack),
            other => Err(CoreError::InvalidInvoiceConfig {
                reason: format!(
                    "Unknown invoice type: '{}'. Valid options: auto, prefix, paystack",
                    other
                ),
            }),
        }
    }
}

/// A tenant's invoice numbering configuration.
///
/// `next_number` is owned and persisted by the caller. This crate only ever
/// returns a new config with the advanced value; see
/// [`crate::invoice::update_company_invoice_format`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceNumberingConfig {
    #[serde(rename = "type", default)]
    pub format_type: InvoiceFormatType,

    /// Custom prefix, only used by `InvoiceFormatType::Prefix`.
    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default = "default_next_number")]
    pub next_number: u32,

    /// Zero-pad width of the sequence.
    #[serde(default = "default_padding")]
    pub padding: usize,
}

fn default_next_number() -> u32 {
    1
}

fn default_padding() -> usize {
    DEFAULT_INVOICE_PADDING
}

impl Default for InvoiceNumberingConfig {
    fn default() -> Self {
        InvoiceNumberingConfig {
            format_type: InvoiceFormatType::default(),
            prefix: None,
            next_number: default_next_number(),
            padding: default_padding(),
        }
    }
}

impl InvoiceNumberingConfig {
    /// Creates a `Prefix` config.
    pub fn with_prefix(prefix: impl Into<String>, next_number: u32) -> Self {
        InvoiceNumberingConfig {
            format_type: InvoiceFormatType::Prefix,
            prefix: Some(prefix.into()),
            next_number,
            ..Self::default()
        }
    }

    /// The prefix that actually appears in generated numbers.
    ///
    /// A `Prefix` config without a usable custom prefix falls back to `INV`.
    pub fn effective_prefix(&self) -> &str {
        match self.format_type {
            InvoiceFormatType::Auto => DEFAULT_INVOICE_PREFIX,
            InvoiceFormatType::Paystack => PAYSTACK_INVOICE_PREFIX,
            InvoiceFormatType::Prefix => match self.prefix.as_deref().map(str::trim) {
                Some(p) if !p.is_empty() => p,
                _ => DEFAULT_INVOICE_PREFIX,
            },
        }
    }

    /// The sequence to use when no previous number is known.
    /// Zero is treated as unset.
    #[inline]
    pub fn starting_number(&self) -> u32 {
        if self.next_number == 0 {
            1
        } else {
            self.next_number
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
