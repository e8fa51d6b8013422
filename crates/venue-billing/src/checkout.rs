//! # Checkout Quotes
//!
//! Prices a checkout for display: the calculator result plus the formatted
//! breakdown lines the storefront renders under the subtotal.

use serde::{Deserialize, Serialize};
use tracing::debug;
use venue_core::tax::{format_tax_breakdown, TaxBreakdownLine};
use venue_core::validation::validate_subtotal;
use venue_core::{calculate_taxes, Money, TaxCalculationRequest, TaxCalculationResult, TaxScope};

use crate::catalog::TaxCatalog;
use crate::config::BillingConfig;
use crate::error::{BillingError, BillingResult};

/// What is being checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutKind {
    /// Facility booking.
    Booking,
    /// Inventory rental.
    Rental,
    /// Cart mixing facilities and inventory.
    Mixed,
}

impl CheckoutKind {
    /// Tax scope the calculator is asked for.
    pub fn scope(&self) -> TaxScope {
        match self {
            CheckoutKind::Booking => TaxScope::Facility,
            CheckoutKind::Rental => TaxScope::InventoryItem,
            CheckoutKind::Mixed => TaxScope::Both,
        }
    }
}

/// A priced checkout, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutQuote {
    pub kind: CheckoutKind,
    pub result: TaxCalculationResult,
    pub breakdown: Vec<TaxBreakdownLine>,
    /// `result.total` with the tenant's currency symbol.
    pub total_display: String,
}

/// Quotes a checkout for the configured tenant.
///
/// Fails if the config has no tenant or the subtotal is negative.
pub fn quote_checkout(
    config: &BillingConfig,
    catalog: &dyn TaxCatalog,
    kind: CheckoutKind,
    subtotal: Money,
) -> BillingResult<CheckoutQuote> {
    validate_subtotal(subtotal)?;

    let tenant_id = config
        .tenant_id()
        .ok_or_else(|| BillingError::InvalidConfig("tenant id is not set".into()))?;
    let rules = catalog.rules_for(tenant_id)?;

    let request = TaxCalculationRequest::new(subtotal, &rules, kind.scope())
        .tenant(Some(tenant_id))
        .policy(config.policy());
    let result = calculate_taxes(&request);

    debug!(
        tenant_id,
        ?kind,
        subtotal = subtotal.minor(),
        total = result.total.minor(),
        "Checkout quoted"
    );

    let symbol = config.currency_symbol();
    Ok(CheckoutQuote {
        kind,
        breakdown: format_tax_breakdown(&result, symbol),
        total_display: result.total.format_with_symbol(symbol),
        result,
    })
}
