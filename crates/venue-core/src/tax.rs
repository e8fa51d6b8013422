//! # Tax Resolution & Calculation
//!
//! Resolves which rules of a tenant's tax catalog apply to a transaction,
//! separates service fees from regular taxes, and computes the payable
//! total.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      calculate_taxes()                                  │
//! │                                                                         │
//! │  taxable? subtotal > 0? ──no──► zeroed result (total = subtotal)       │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  filter: active ∧ scope covers request ∧ (platform ∨ owned by tenant)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  partition by name ──► service fee rules   ──► Σ rate ──► service_fee  │
//! │                   └──► regular tax rules                               │
//! │                              │                                          │
//! │       tax_base = subtotal (+ service_fee if tax-on-tax)                │
//! │                              │                                          │
//! │                              ▼                                          │
//! │       per rule: round(tax_base × rate) ──► breakdown ──► Σ = tax       │
//! │                                                                         │
//! │  total = subtotal                        (inclusive)                   │
//! │        = subtotal + service_fee + tax    (exclusive)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! The service fee and every individual tax line are rounded to a whole
//! minor unit before anything is summed. Invoices issued before this crate
//! existed were computed this way, so `tax` is the sum of rounded lines and
//! not the rounded sum.
//!
//! ## Input Checking
//! Nothing here validates rates or subtotals. A negative subtotal is simply
//! untaxed and rates above 100% are applied as given. Callers that want
//! stricter input run [`crate::validation`] first.
//!
//! ## Example
//! ```rust
//! use venue_core::money::Money;
//! use venue_core::tax::{calculate_taxes, TaxCalculationRequest};
//! use venue_core::types::{TaxRate, TaxRule, TaxScope};
//!
//! let rules = vec![
//!     TaxRule {
//!         id: "vat".into(),
//!         name: "VAT".into(),
//!         rate: TaxRate::from_bps(1500),
//!         applies_to: TaxScope::Both,
//!         is_active: true,
//!         is_platform_tax: true,
//!         tenant_id: None,
//!         tax_type: "federal".into(),
//!     },
//!     TaxRule {
//!         id: "fee".into(),
//!         name: "Service Fee".into(),
//!         rate: TaxRate::from_bps(500),
//!         applies_to: TaxScope::Both,
//!         is_active: true,
//!         is_platform_tax: true,
//!         tenant_id: None,
//!         tax_type: "platform".into(),
//!     },
//! ];
//!
//! let request = TaxCalculationRequest::new(Money::from_minor(10_000), &rules, TaxScope::Facility);
//! let result = calculate_taxes(&request);
//!
//! assert_eq!(result.service_fee.minor(), 500);
//! assert_eq!(result.tax.minor(), 1500);
//! assert_eq!(result.total.minor(), 12_000);
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{TaxPolicy, TaxRate, TaxRule, TaxScope};

/// Display name of the synthetic service fee line in formatted breakdowns.
pub const SERVICE_FEE_LABEL: &str = "Service Fee";

// =============================================================================
// Request
// =============================================================================

/// Inputs to [`calculate_taxes`].
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculationRequest<'a> {
    pub subtotal: Money,
    pub tax_rules: &'a [TaxRule],
    pub scope: TaxScope,
    /// Needed to pick up tenant-owned rules. `None` means platform rules only.
    pub tenant_id: Option<&'a str>,
    pub policy: TaxPolicy,
}

impl<'a> TaxCalculationRequest<'a> {
    /// Creates a request with the default (taxable, exclusive, no
    /// compounding) policy and no tenant.
    pub fn new(subtotal: Money, tax_rules: &'a [TaxRule], scope: TaxScope) -> Self {
        TaxCalculationRequest {
            subtotal,
            tax_rules,
            scope,
            tenant_id: None,
            policy: TaxPolicy::default(),
        }
    }

    pub fn tenant(mut self, tenant_id: Option<&'a str>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn policy(mut self, policy: TaxPolicy) -> Self {
        self.policy = policy;
        self
    }
}

// =============================================================================
// Result
// =============================================================================

/// One regular tax line: the rule, its computed amount and its rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxLine {
    pub rule: TaxRule,
    pub amount: Money,
    pub rate: TaxRate,
}

/// Output of [`calculate_taxes`]. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculationResult {
    pub subtotal: Money,
    pub service_fee: Money,
    pub tax: Money,
    pub total: Money,
    /// Sum of the applicable service fee percentages.
    pub service_fee_rate: TaxRate,
    /// Sum of the applicable regular tax percentages.
    pub total_tax_rate: TaxRate,
    /// Regular tax rules, VAT first then by name.
    pub applicable_taxes: Vec<TaxRule>,
    /// One line per regular tax rule, in catalog order.
    pub tax_breakdown: Vec<TaxLine>,
}

impl TaxCalculationResult {
    /// Result for non-taxable or non-positive subtotals.
    pub fn untaxed(subtotal: Money) -> Self {
        TaxCalculationResult {
            subtotal,
            service_fee: Money::zero(),
            tax: Money::zero(),
            total: subtotal,
            service_fee_rate: TaxRate::zero(),
            total_tax_rate: TaxRate::zero(),
            applicable_taxes: Vec::new(),
            tax_breakdown: Vec::new(),
        }
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Rules that apply to `scope` for `tenant_id`, in catalog order.
fn applicable_rules<'a>(
    tax_rules: &'a [TaxRule],
    scope: TaxScope,
    tenant_id: Option<&'a str>,
) -> impl Iterator<Item = &'a TaxRule> + 'a {
    tax_rules
        .iter()
        .filter(move |rule| rule.applies(scope, tenant_id))
}

/// Stable sort: a rule named exactly "vat" first, everything else by name.
fn sort_vat_first(rules: &mut [TaxRule]) {
    rules.sort_by_cached_key(|rule| (!rule.is_vat(), rule.name.clone()));
}

/// Returns the rules that apply to `scope` for `tenant_id`, VAT first.
///
/// Service fee rules are included; this is the plain applicability filter.
pub fn get_applicable_taxes(
    tax_rules: &[TaxRule],
    scope: TaxScope,
    tenant_id: Option<&str>,
) -> Vec<TaxRule> {
    let mut rules: Vec<TaxRule> = applicable_rules(tax_rules, scope, tenant_id)
        .cloned()
        .collect();
    sort_vat_first(&mut rules);
    rules
}

/// Returns the tenant's VAT rule for rentals, if one exists.
///
/// Qualifies: normalized name exactly `vat`, active, scoped to `Both` or
/// `InventoryItem`, platform-wide or owned by `tenant_id`. When several
/// rules qualify the first one in catalog order wins.
pub fn get_vat_tax<'a>(tax_rules: &'a [TaxRule], tenant_id: Option<&str>) -> Option<&'a TaxRule> {
    tax_rules.iter().find(|rule| {
        rule.is_vat()
            && rule.is_active
            && matches!(rule.applies_to, TaxScope::Both | TaxScope::InventoryItem)
            && rule.is_owned_by(tenant_id)
    })
}

// =============================================================================
// Calculation
// =============================================================================

/// Computes service fee, tax and total for a subtotal.
///
/// Always returns a value; see the module docs for the pipeline.
pub fn calculate_taxes(request: &TaxCalculationRequest<'_>) -> TaxCalculationResult {
    let subtotal = request.subtotal;
    let policy = request.policy;

    if !policy.is_taxable || !subtotal.is_positive() {
        trace!(
            subtotal = %subtotal,
            taxable = policy.is_taxable,
            "Skipping tax calculation"
        );
        return TaxCalculationResult::untaxed(subtotal);
    }

    let (service_fee_rules, regular_rules): (Vec<&TaxRule>, Vec<&TaxRule>) =
        applicable_rules(request.tax_rules, request.scope, request.tenant_id)
            .partition(|rule| rule.is_service_fee());

    let service_fee_rate: TaxRate = service_fee_rules.iter().map(|rule| rule.rate).sum();
    let service_fee = subtotal.percentage_of(service_fee_rate);

    let tax_base = if policy.is_tax_on_tax {
        subtotal + service_fee
    } else {
        subtotal
    };

    let tax_breakdown: Vec<TaxLine> = regular_rules
        .iter()
        .map(|rule| TaxLine {
            rule: (*rule).clone(),
            amount: tax_base.percentage_of(rule.rate),
            rate: rule.rate,
        })
        .collect();

    let total_tax_rate: TaxRate = regular_rules.iter().map(|rule| rule.rate).sum();
    let tax: Money = tax_breakdown.iter().map(|line| line.amount).sum();

    let total = if policy.is_tax_inclusive {
        subtotal
    } else {
        subtotal + service_fee + tax
    };

    let mut applicable_taxes: Vec<TaxRule> = regular_rules.into_iter().cloned().collect();
    sort_vat_first(&mut applicable_taxes);

    trace!(
        scope = %request.scope,
        subtotal = %subtotal,
        service_fee = %service_fee,
        tax = %tax,
        total = %total,
        "Calculated taxes"
    );

    TaxCalculationResult {
        subtotal,
        service_fee,
        tax,
        total,
        service_fee_rate,
        total_tax_rate,
        applicable_taxes,
        tax_breakdown,
    }
}

/// [`calculate_taxes`] for inventory item rentals.
pub fn calculate_rental_taxes(
    subtotal: Money,
    tax_rules: &[TaxRule],
    tenant_id: Option<&str>,
    policy: TaxPolicy,
) -> TaxCalculationResult {
    calculate_scoped(subtotal, tax_rules, TaxScope::InventoryItem, tenant_id, policy)
}

/// [`calculate_taxes`] for facility bookings.
pub fn calculate_booking_taxes(
    subtotal: Money,
    tax_rules: &[TaxRule],
    tenant_id: Option<&str>,
    policy: TaxPolicy,
) -> TaxCalculationResult {
    calculate_scoped(subtotal, tax_rules, TaxScope::Facility, tenant_id, policy)
}

/// [`calculate_taxes`] for transactions mixing bookings and rentals.
/// Only rules scoped to `Both` apply.
pub fn calculate_transaction_taxes(
    subtotal: Money,
    tax_rules: &[TaxRule],
    tenant_id: Option<&str>,
    policy: TaxPolicy,
) -> TaxCalculationResult {
    calculate_scoped(subtotal, tax_rules, TaxScope::Both, tenant_id, policy)
}

fn calculate_scoped(
    subtotal: Money,
    tax_rules: &[TaxRule],
    scope: TaxScope,
    tenant_id: Option<&str>,
    policy: TaxPolicy,
) -> TaxCalculationResult {
    let request = TaxCalculationRequest::new(subtotal, tax_rules, scope)
        .tenant(tenant_id)
        .policy(policy);
    calculate_taxes(&request)
}

// =============================================================================
// Display Formatting
// =============================================================================

/// Kind of a formatted breakdown line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownKind {
    ServiceFee,
    Tax,
}

/// A breakdown line ready for a receipt or checkout summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxBreakdownLine {
    pub name: String,
    pub rate: TaxRate,
    /// Amount with currency symbol, e.g. `₦1,500.00`.
    pub amount: String,
    #[serde(rename = "type")]
    pub kind: BreakdownKind,
}

/// Formats a calculation result for display.
///
/// The service fee line comes first (only when a fee was charged), then one
/// line per regular tax in breakdown order. Display only; the numbers in
/// `result` remain the source of truth.
pub fn format_tax_breakdown(result: &TaxCalculationResult, currency_symbol: &str) -> Vec<TaxBreakdownLine> {
    let service_fee_line = result.service_fee.is_positive().then(|| TaxBreakdownLine {
        name: SERVICE_FEE_LABEL.to_string(),
        rate: result.service_fee_rate,
        amount: result.service_fee.format_with_symbol(currency_symbol),
        kind: BreakdownKind::ServiceFee,
    });

    service_fee_line
        .into_iter()
        .chain(result.tax_breakdown.iter().map(|line| TaxBreakdownLine {
            name: line.rule.name.clone(),
            rate: line.rate,
            amount: line.amount.format_with_symbol(currency_symbol),
            kind: BreakdownKind::Tax,
        }))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn platform_rule(name: &str, pct: u32, scope: TaxScope) -> TaxRule {
        TaxRule {
            id: format!("rule-{}", name.to_lowercase().replace(' ', "-")),
            name: name.to_string(),
            rate: TaxRate::from_bps(pct * 100),
            applies_to: scope,
            is_active: true,
            is_platform_tax: true,
            tenant_id: None,
            tax_type: "federal".to_string(),
        }
    }

    fn tenant_rule(name: &str, pct: u32, scope: TaxScope, tenant: &str) -> TaxRule {
        TaxRule {
            is_platform_tax: false,
            tenant_id: Some(tenant.to_string()),
            tax_type: "state".to_string(),
            ..platform_rule(name, pct, scope)
        }
    }

    fn vat_and_fee() -> Vec<TaxRule> {
        vec![
            platform_rule("VAT", 15, TaxScope::Both),
            platform_rule("Service Fee", 5, TaxScope::Both),
        ]
    }

    fn names(rules: &[TaxRule]) -> Vec<&str> {
        rules.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_vat_and_service_fee_exclusive() {
        let rules = vat_and_fee();
        let result = calculate_booking_taxes(Money::from_minor(10_000), &rules, None, TaxPolicy::default());

        assert_eq!(result.service_fee.minor(), 500);
        assert_eq!(result.tax.minor(), 1500);
        assert_eq!(result.total.minor(), 12_000);
        assert_eq!(result.service_fee_rate, TaxRate::from_bps(500));
        assert_eq!(result.total_tax_rate, TaxRate::from_bps(1500));
        assert_eq!(names(&result.applicable_taxes), vec!["VAT"]);
        assert_eq!(result.tax_breakdown.len(), 1);
        assert_eq!(result.tax_breakdown[0].amount.minor(), 1500);
    }

    #[test]
    fn test_vat_and_service_fee_tax_on_tax() {
        let rules = vat_and_fee();
        let policy = TaxPolicy {
            is_tax_on_tax: true,
            ..TaxPolicy::default()
        };
        let result = calculate_booking_taxes(Money::from_minor(10_000), &rules, None, policy);

        assert_eq!(result.service_fee.minor(), 500);
        assert_eq!(result.tax.minor(), 1575);
        assert_eq!(result.total.minor(), 12_075);
    }

    #[test]
    fn test_three_decimal_rate_is_exact() {
        let json = r#"[{"id":"stamp","name":"Stamp Duty","rate":0.125,"appliesTo":"both","isPlatformTax":true}]"#;
        let rules: Vec<TaxRule> = serde_json::from_str(json).unwrap();
        let result = calculate_booking_taxes(Money::from_minor(1_000_000), &rules, None, TaxPolicy::default());

        assert_eq!(result.tax.minor(), 1250);
        assert_eq!(result.total.minor(), 1_001_250);
        assert_eq!(result.total_tax_rate, TaxRate::from_micro_percent(125_000));
    }

    #[test]
    fn test_near_max_subtotal_saturates() {
        let rules = vat_and_fee();
        let subtotal = Money::from_minor(i64::MAX - 1000);

        let result = calculate_booking_taxes(subtotal, &rules, None, TaxPolicy::default());
        assert_eq!(result.subtotal, subtotal);
        assert!(result.service_fee.is_positive());
        assert!(result.tax.is_positive());
        assert_eq!(result.total, Money::from_minor(i64::MAX));

        let policy = TaxPolicy {
            is_tax_on_tax: true,
            ..TaxPolicy::default()
        };
        let compounding = calculate_booking_taxes(subtotal, &rules, None, policy);
        assert_eq!(compounding.total, Money::from_minor(i64::MAX));
    }

    #[test]
    fn test_tax_inclusive_total_equals_subtotal() {
        let rules = vat_and_fee();
        let policy = TaxPolicy {
            is_tax_inclusive: true,
            ..TaxPolicy::default()
        };
        let result = calculate_booking_taxes(Money::from_minor(10_000), &rules, None, policy);

        assert_eq!(result.service_fee.minor(), 500);
        assert_eq!(result.tax.minor(), 1500);
        assert_eq!(result.total.minor(), 10_000);
    }

    #[test]
    fn test_zero_subtotal_short_circuits() {
        let rules = vat_and_fee();
        let result = calculate_booking_taxes(Money::zero(), &rules, None, TaxPolicy::default());
        assert_eq!(result, TaxCalculationResult::untaxed(Money::zero()));
    }

    #[test]
    fn test_negative_subtotal_short_circuits() {
        let rules = vat_and_fee();
        let result = calculate_booking_taxes(Money::from_minor(-500), &rules, None, TaxPolicy::default());
        assert!(result.service_fee.is_zero());
        assert!(result.tax.is_zero());
        assert_eq!(result.total.minor(), -500);
    }

    #[test]
    fn test_not_taxable_short_circuits() {
        let rules = vat_and_fee();
        let policy = TaxPolicy {
            is_taxable: false,
            ..TaxPolicy::default()
        };
        let result = calculate_booking_taxes(Money::from_minor(10_000), &rules, None, policy);

        assert!(result.service_fee.is_zero());
        assert!(result.tax.is_zero());
        assert_eq!(result.total.minor(), 10_000);
        assert!(result.applicable_taxes.is_empty());
        assert!(result.tax_breakdown.is_empty());
    }

    #[test]
    fn test_each_line_rounded_independently() {
        // 1005 × 7.5% = 75.375 → 75, twice = 150
        // rounding the sum instead would give round(150.75) = 151
        let rules = vec![
            TaxRule {
                rate: TaxRate::from_bps(750),
                ..platform_rule("State Tax", 0, TaxScope::Both)
            },
            TaxRule {
                rate: TaxRate::from_bps(750),
                ..platform_rule("City Tax", 0, TaxScope::Both)
            },
        ];
        let result = calculate_booking_taxes(Money::from_minor(1005), &rules, None, TaxPolicy::default());
        assert_eq!(result.tax.minor(), 150);
        assert_eq!(result.total_tax_rate, TaxRate::from_bps(1500));
    }

    #[test]
    fn test_multiple_service_fees_share_one_rounding() {
        // (2.5% + 2.5%) of 1010 = 50.5 → 51
        let rules = vec![
            TaxRule {
                rate: TaxRate::from_bps(250),
                ..platform_rule("Service Fee", 0, TaxScope::Both)
            },
            TaxRule {
                rate: TaxRate::from_bps(250),
                ..platform_rule("Platform Service Fee", 0, TaxScope::Both)
            },
        ];
        let result = calculate_rental_taxes(Money::from_minor(1010), &rules, None, TaxPolicy::default());
        assert_eq!(result.service_fee.minor(), 51);
        assert_eq!(result.service_fee_rate, TaxRate::from_bps(500));
        assert!(result.tax.is_zero());
    }

    #[test]
    fn test_scope_filtering() {
        let rules = vec![
            platform_rule("Booking Levy", 2, TaxScope::Facility),
            platform_rule("Rental Levy", 3, TaxScope::InventoryItem),
            platform_rule("VAT", 10, TaxScope::Both),
        ];
        let subtotal = Money::from_minor(10_000);

        let booking = calculate_booking_taxes(subtotal, &rules, None, TaxPolicy::default());
        assert_eq!(names(&booking.applicable_taxes), vec!["VAT", "Booking Levy"]);
        assert_eq!(booking.tax.minor(), 1200);

        let rental = calculate_rental_taxes(subtotal, &rules, None, TaxPolicy::default());
        assert_eq!(names(&rental.applicable_taxes), vec!["VAT", "Rental Levy"]);
        assert_eq!(rental.tax.minor(), 1300);

        let mixed = calculate_transaction_taxes(subtotal, &rules, None, TaxPolicy::default());
        assert_eq!(names(&mixed.applicable_taxes), vec!["VAT"]);
        assert_eq!(mixed.tax.minor(), 1000);
    }

    #[test]
    fn test_inactive_rules_ignored() {
        let mut rules = vat_and_fee();
        rules[0].is_active = false;
        let result = calculate_booking_taxes(Money::from_minor(10_000), &rules, None, TaxPolicy::default());
        assert!(result.tax.is_zero());
        assert_eq!(result.service_fee.minor(), 500);
    }

    #[test]
    fn test_tenant_ownership_filtering() {
        let rules = vec![
            platform_rule("VAT", 10, TaxScope::Both),
            tenant_rule("Lagos Levy", 2, TaxScope::Both, "tenant-a"),
            tenant_rule("Abuja Levy", 3, TaxScope::Both, "tenant-b"),
        ];
        let subtotal = Money::from_minor(10_000);

        let anonymous = calculate_booking_taxes(subtotal, &rules, None, TaxPolicy::default());
        assert_eq!(names(&anonymous.applicable_taxes), vec!["VAT"]);

        let tenant_a = calculate_booking_taxes(subtotal, &rules, Some("tenant-a"), TaxPolicy::default());
        assert_eq!(names(&tenant_a.applicable_taxes), vec!["VAT", "Lagos Levy"]);
        assert_eq!(tenant_a.tax.minor(), 1200);
    }

    #[test]
    fn test_breakdown_keeps_catalog_order_while_taxes_sorted() {
        let rules = vec![
            platform_rule("Zoning Tax", 1, TaxScope::Both),
            platform_rule("Consumption Tax", 2, TaxScope::Both),
            platform_rule("vat", 10, TaxScope::Both),
        ];
        let result = calculate_booking_taxes(Money::from_minor(10_000), &rules, None, TaxPolicy::default());

        assert_eq!(
            names(&result.applicable_taxes),
            vec!["vat", "Consumption Tax", "Zoning Tax"]
        );
        let breakdown: Vec<&str> = result.tax_breakdown.iter().map(|l| l.rule.name.as_str()).collect();
        assert_eq!(breakdown, vec!["Zoning Tax", "Consumption Tax", "vat"]);
    }

    #[test]
    fn test_get_applicable_taxes_includes_service_fees() {
        let rules = vat_and_fee();
        let applicable = get_applicable_taxes(&rules, TaxScope::Facility, None);
        assert_eq!(names(&applicable), vec!["VAT", "Service Fee"]);
    }

    #[test]
    fn test_get_vat_tax() {
        let rules = vec![
            platform_rule("Service Fee", 5, TaxScope::Both),
            platform_rule("VAT", 7, TaxScope::Facility),
            platform_rule(" V A T ", 15, TaxScope::InventoryItem),
            platform_rule("VAT", 10, TaxScope::Both),
        ];
        // Facility-only VAT is skipped; the first qualifying rule wins
        let vat = get_vat_tax(&rules, None).unwrap();
        assert_eq!(vat.rate, TaxRate::from_bps(1500));
    }

    #[test]
    fn test_get_vat_tax_respects_ownership_and_activity() {
        let mut rules = vec![
            tenant_rule("VAT", 15, TaxScope::Both, "tenant-a"),
            platform_rule("VAT", 10, TaxScope::Both),
        ];
        assert_eq!(get_vat_tax(&rules, Some("tenant-a")).unwrap().rate, TaxRate::from_bps(1500));
        assert_eq!(get_vat_tax(&rules, Some("tenant-b")).unwrap().rate, TaxRate::from_bps(1000));

        rules[1].is_active = false;
        assert!(get_vat_tax(&rules, Some("tenant-b")).is_none());
        assert!(get_vat_tax(&[], None).is_none());
    }

    #[test]
    fn test_format_tax_breakdown() {
        let rules = vec![
            platform_rule("VAT", 15, TaxScope::Both),
            platform_rule("Service Fee", 5, TaxScope::Both),
            platform_rule("Stamp Duty", 1, TaxScope::Both),
        ];
        let result = calculate_booking_taxes(Money::from_minor(1_000_000), &rules, None, TaxPolicy::default());
        let lines = format_tax_breakdown(&result, "₦");

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].name, "Service Fee");
        assert_eq!(lines[0].kind, BreakdownKind::ServiceFee);
        assert_eq!(lines[0].amount, "₦500.00");
        assert_eq!(lines[1].name, "VAT");
        assert_eq!(lines[1].amount, "₦1,500.00");
        assert_eq!(lines[1].kind, BreakdownKind::Tax);
        assert_eq!(lines[2].name, "Stamp Duty");
        assert_eq!(lines[2].rate, TaxRate::from_bps(100));

        let json = serde_json::to_value(&lines[0]).unwrap();
        assert_eq!(json["type"], "service_fee");
    }

    #[test]
    fn test_format_tax_breakdown_omits_zero_service_fee() {
        let rules = vec![platform_rule("VAT", 15, TaxScope::Both)];
        let result = calculate_booking_taxes(Money::from_minor(10_000), &rules, None, TaxPolicy::default());
        let lines = format_tax_breakdown(&result, "$");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, BreakdownKind::Tax);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = calculate_booking_taxes(
            Money::from_minor(10_000),
            &vat_and_fee(),
            None,
            TaxPolicy::default(),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["serviceFee"], 500);
        assert_eq!(json["totalTaxRate"], serde_json::json!(15.0));
        assert!(json["taxBreakdown"].is_array());
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn arb_scope() -> impl Strategy<Value = TaxScope> {
        prop_oneof![
            Just(TaxScope::Facility),
            Just(TaxScope::InventoryItem),
            Just(TaxScope::Both),
        ]
    }

    fn arb_rule() -> impl Strategy<Value = TaxRule> {
        (
            prop_oneof![
                Just("VAT".to_string()),
                Just("Service Fee".to_string()),
                "[A-Za-z ]{1,12}",
            ],
            0u32..=100 * TaxRate::UNITS_PER_PERCENT,
            arb_scope(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(name, units, scope, active, platform)| TaxRule {
                id: name.clone(),
                name,
                rate: TaxRate::from_micro_percent(units),
                applies_to: scope,
                is_active: active,
                is_platform_tax: platform,
                tenant_id: (!platform).then(|| "tenant-a".to_string()),
                tax_type: String::new(),
            })
    }

    fn arb_policy() -> impl Strategy<Value = TaxPolicy> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(taxable, inclusive, on_tax)| {
            TaxPolicy {
                is_taxable: taxable,
                is_tax_inclusive: inclusive,
                is_tax_on_tax: on_tax,
            }
        })
    }

    proptest! {
        #[test]
        fn prop_calculation_never_panics(
            rules in prop::collection::vec(arb_rule(), 0..12),
            subtotal in any::<i64>(),
            scope in arb_scope(),
            policy in arb_policy(),
        ) {
            let result = calculate_taxes(
                &TaxCalculationRequest::new(Money::from_minor(subtotal), &rules, scope)
                    .tenant(Some("tenant-a"))
                    .policy(policy),
            );
            prop_assert_eq!(result.subtotal.minor(), subtotal);
        }

        #[test]
        fn prop_decimal_rate_line_matches_exact_rounding(
            thousandths in 0i64..=100_000,
            subtotal in 1i64..10_000_000_000,
        ) {
            let json = format!(
                r#"[{{"id":"t","name":"Levy","rate":{},"appliesTo":"both","isPlatformTax":true}}]"#,
                thousandths as f64 / 1000.0
            );
            let rules: Vec<TaxRule> = serde_json::from_str(&json).unwrap();
            let result = calculate_booking_taxes(
                Money::from_minor(subtotal), &rules, None, TaxPolicy::default(),
            );

            // subtotal × (thousandths / 1000) / 100, half up
            let expected = (2 * subtotal as i128 * thousandths as i128 + 100_000).div_euclid(200_000);
            prop_assert_eq!(result.tax.minor() as i128, expected);
        }

        #[test]
        fn prop_applicable_taxes_idempotent(
            rules in prop::collection::vec(arb_rule(), 0..12),
            scope in arb_scope(),
        ) {
            let first = get_applicable_taxes(&rules, scope, Some("tenant-a"));
            let second = get_applicable_taxes(&rules, scope, Some("tenant-a"));
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_vat_sorts_first(
            rules in prop::collection::vec(arb_rule(), 0..12),
            scope in arb_scope(),
        ) {
            let applicable = get_applicable_taxes(&rules, scope, Some("tenant-a"));
            if applicable.iter().any(|r| r.is_vat()) {
                prop_assert!(applicable[0].is_vat());
            }
        }

        #[test]
        fn prop_tax_on_tax_never_lowers_tax(
            rules in prop::collection::vec(arb_rule(), 0..12),
            subtotal in 0i64..100_000_000,
            scope in arb_scope(),
        ) {
            let subtotal = Money::from_minor(subtotal);
            let plain = calculate_taxes(
                &TaxCalculationRequest::new(subtotal, &rules, scope).tenant(Some("tenant-a")),
            );
            let compounding = calculate_taxes(
                &TaxCalculationRequest::new(subtotal, &rules, scope)
                    .tenant(Some("tenant-a"))
                    .policy(TaxPolicy { is_tax_on_tax: true, ..TaxPolicy::default() }),
            );
            prop_assert!(compounding.tax >= plain.tax);
        }

        #[test]
        fn prop_exclusive_total_is_sum_of_parts(
            rules in prop::collection::vec(arb_rule(), 0..12),
            subtotal in 1i64..100_000_000,
        ) {
            let result = calculate_booking_taxes(
                Money::from_minor(subtotal), &rules, Some("tenant-a"), TaxPolicy::default(),
            );
            prop_assert_eq!(result.total, result.subtotal + result.service_fee + result.tax);
            let line_sum: Money = result.tax_breakdown.iter().map(|l| l.amount).sum();
            prop_assert_eq!(result.tax, line_sum);
        }
    }
}
