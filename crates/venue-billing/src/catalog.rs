//! # Tax Catalog
//!
//! Where tax rules come from.
//!
//! The storefront backend keeps one catalog holding platform-wide rules
//! (VAT, service fees) next to rules owned by individual tenants. The
//! calculator filters by tenant itself, so a catalog hands back every rule
//! that could matter for a tenant and leaves resolution to `venue-core`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Lookup                                       │
//! │                                                                         │
//! │  rules_for("tenant-a")                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ VAT           7.5%   platform           │ ← returned                │
//! │  │ Service Fee   5%     platform           │ ← returned                │
//! │  │ City Levy     2%     tenant-a           │ ← returned                │
//! │  │ Hall Tax      3%     tenant-b           │                           │
//! │  └─────────────────────────────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use tracing::debug;
use venue_core::validation::validate_tax_catalog;
use venue_core::TaxRule;

use crate::error::BillingResult;

/// Source of tax rules for a tenant.
pub trait TaxCatalog: Send + Sync {
    /// Returns the platform rules plus the rules owned by `tenant_id`.
    fn rules_for(&self, tenant_id: &str) -> BillingResult<Vec<TaxRule>>;
}

/// Catalog held in memory, loaded once from JSON.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    platform: Vec<TaxRule>,
    by_tenant: HashMap<String, Vec<TaxRule>>,
}

impl StaticCatalog {
    /// Builds a catalog from already-decoded rules after validating them.
    pub fn new(rules: Vec<TaxRule>) -> BillingResult<Self> {
        validate_tax_catalog(&rules)?;

        let mut catalog = StaticCatalog::default();
        for rule in rules {
            match rule.tenant_id.clone() {
                Some(tenant) if !rule.is_platform_tax => {
                    catalog.by_tenant.entry(tenant).or_default().push(rule);
                }
                _ => catalog.platform.push(rule),
            }
        }

        debug!(
            platform = catalog.platform.len(),
            tenants = catalog.by_tenant.len(),
            "Tax catalog loaded"
        );
        Ok(catalog)
    }

    /// Decodes a JSON array of rules in the storefront wire format.
    ///
    /// ```rust
    /// use venue_billing::catalog::{StaticCatalog, TaxCatalog};
    ///
    /// let json = r#"[{"id":"vat","name":"VAT","rate":7.5,"appliesTo":"both",
    ///                 "isPlatformTax":true,"type":"federal"}]"#;
    /// let catalog = StaticCatalog::from_json_str(json).unwrap();
    /// assert_eq!(catalog.rules_for("any-tenant").unwrap().len(), 1);
    /// ```
    pub fn from_json_str(json: &str) -> BillingResult<Self> {
        let rules: Vec<TaxRule> = serde_json::from_str(json)?;
        Self::new(rules)
    }

    /// Number of rules across all owners.
    pub fn len(&self) -> usize {
        self.platform.len() + self.by_tenant.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TaxCatalog for StaticCatalog {
    fn rules_for(&self, tenant_id: &str) -> BillingResult<Vec<TaxRule>> {
        let mut rules = self.platform.clone();
        if let Some(own) = self.by_tenant.get(tenant_id) {
            rules.extend(own.iter().cloned());
        }
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BillingError;

    const CATALOG: &str = r#"[
        {"id":"vat","name":"VAT","rate":7.5,"appliesTo":"both","isPlatformTax":true,"type":"federal"},
        {"id":"fee","name":"Service Fee","rate":5,"appliesTo":"both","isPlatformTax":true,"type":"platform"},
        {"id":"levy","name":"City Levy","rate":2,"appliesTo":"facility","isPlatformTax":false,
         "tenantId":"tenant-a","type":"local"},
        {"id":"hall","name":"Hall Tax","rate":3,"appliesTo":"facility","isPlatformTax":false,
         "tenantId":"tenant-b","type":"local","isActive":false}
    ]"#;

    #[test]
    fn test_rules_for_tenant() {
        let catalog = StaticCatalog::from_json_str(CATALOG).unwrap();
        assert_eq!(catalog.len(), 4);

        let ids: Vec<String> = catalog
            .rules_for("tenant-a")
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["vat", "fee", "levy"]);

        let other = catalog.rules_for("tenant-b").unwrap();
        assert_eq!(other.len(), 3);
        assert!(!other[2].is_active);

        assert_eq!(catalog.rules_for("tenant-z").unwrap().len(), 2);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let json = r#"[{"id":"x","name":"X","rate":-1,"appliesTo":"both","isPlatformTax":true,"type":"t"}]"#;
        assert!(matches!(StaticCatalog::from_json_str(json), Err(BillingError::Json(_))));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id":"vat","name":"VAT","rate":7.5,"appliesTo":"both","isPlatformTax":true,"type":"federal"},
            {"id":"vat","name":"VAT 2","rate":5,"appliesTo":"both","isPlatformTax":true,"type":"federal"}
        ]"#;
        assert!(matches!(
            StaticCatalog::from_json_str(json),
            Err(BillingError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = StaticCatalog::from_json_str("[]").unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.rules_for("tenant-a").unwrap().is_empty());
    }
}
