//! # Invoice Issuer
//!
//! Hands out invoice numbers and keeps each tenant's counter moving.
//!
//! `venue-core` only computes numbers; it never stores anything. The issuer
//! owns the read-compute-persist cycle and serializes it per tenant, so two
//! checkouts finishing at the same instant can never receive the same
//! number.
//!
//! ## Issuance Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    issue("tenant-a")                                    │
//! │                                                                         │
//! │  1. Acquire tenant-a lock        (tenant-b issues in parallel)         │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  2. store.load ──► { config, last: "TIL-2025-03-0007" }                │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  3. update_company_invoice_format_at ──► next_number = 8               │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  4. generate_invoice_number_at ──► "TIL-2025-03-0008"                  │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  5. store.save ──► { next_number: 9, last: "TIL-2025-03-0008" }        │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  6. Release lock                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use venue_core::{
    generate_invoice_number_at, parse_invoice_number, update_company_invoice_format_at,
    BillingPeriod, InvoiceNumberingConfig, ParsedInvoiceNumber,
};

use crate::error::{BillingError, BillingResult};

// =============================================================================
// Persistence
// =============================================================================

/// What the issuer keeps per tenant between issuances.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantInvoiceState {
    pub config: InvoiceNumberingConfig,
    pub last_invoice_number: Option<String>,
}

impl TenantInvoiceState {
    /// State for a tenant that has never issued an invoice.
    pub fn new(config: InvoiceNumberingConfig) -> Self {
        TenantInvoiceState {
            config,
            last_invoice_number: None,
        }
    }
}

/// Storage for per-tenant numbering state.
pub trait InvoiceStore: Send + Sync {
    /// Returns `None` for tenants without numbering state.
    fn load(&self, tenant_id: &str) -> BillingResult<Option<TenantInvoiceState>>;

    fn save(&self, tenant_id: &str, state: &TenantInvoiceState) -> BillingResult<()>;
}

/// Store backed by a map. Used in tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    states: RwLock<HashMap<String, TenantInvoiceState>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tenant with its numbering config.
    pub fn register(&self, tenant_id: impl Into<String>, config: InvoiceNumberingConfig) -> BillingResult<()> {
        self.save(&tenant_id.into(), &TenantInvoiceState::new(config))
    }
}

impl InvoiceStore for InMemoryInvoiceStore {
    fn load(&self, tenant_id: &str) -> BillingResult<Option<TenantInvoiceState>> {
        let states = self
            .states
            .read()
            .map_err(|e| BillingError::Store(e.to_string()))?;
        Ok(states.get(tenant_id).cloned())
    }

    fn save(&self, tenant_id: &str, state: &TenantInvoiceState) -> BillingResult<()> {
        let mut states = self
            .states
            .write()
            .map_err(|e| BillingError::Store(e.to_string()))?;
        states.insert(tenant_id.to_string(), state.clone());
        Ok(())
    }
}

// =============================================================================
// Issuer
// =============================================================================

/// A freshly issued invoice number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedInvoice {
    pub number: String,
    pub period: BillingPeriod,
    pub sequence: u32,
}

/// Issues invoice numbers with one lock per tenant.
///
/// ## Usage
/// ```rust
/// use venue_billing::issuer::{InMemoryInvoiceStore, InvoiceIssuer};
/// use venue_core::{BillingPeriod, InvoiceNumberingConfig};
///
/// let store = InMemoryInvoiceStore::new();
/// store.register("tenant-a", InvoiceNumberingConfig::with_prefix("TIL", 1)).unwrap();
///
/// let issuer = InvoiceIssuer::new(store);
/// let first = issuer.issue_at("tenant-a", BillingPeriod::new(2025, 3)).unwrap();
/// assert_eq!(first.number, "TIL-2025-03-0001");
/// ```
pub struct InvoiceIssuer<S: InvoiceStore> {
    store: S,

    /// Lazily created lock per tenant.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: InvoiceStore> InvoiceIssuer<S> {
    pub fn new(store: S) -> Self {
        InvoiceIssuer {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Issues the next number for the current UTC month.
    pub fn issue(&self, tenant_id: &str) -> BillingResult<IssuedInvoice> {
        self.issue_at(tenant_id, BillingPeriod::current())
    }

    /// Issues the next number for `period`.
    ///
    /// The tenant lock is held from load to save. Nothing is persisted if
    /// any step fails.
    pub fn issue_at(&self, tenant_id: &str, period: BillingPeriod) -> BillingResult<IssuedInvoice> {
        let lock = self.tenant_lock(tenant_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| BillingError::LockPoisoned(tenant_id.to_string()))?;

        let state = self.load_state(tenant_id)?;
        let config = update_company_invoice_format_at(
            &state.config,
            state.last_invoice_number.as_deref(),
            period,
        );
        let sequence = config.starting_number();

        // The last sequence of a period is never handed out, so a saturated
        // next number cannot repeat an issued one.
        let next_number = sequence.checked_add(1).ok_or_else(|| {
            warn!(tenant_id, year = period.year, month = period.month, "Invoice sequence exhausted");
            BillingError::SequenceExhausted {
                tenant_id: tenant_id.to_string(),
                year: period.year,
                month: period.month,
            }
        })?;
        let number = generate_invoice_number_at(&config, period);

        let advanced = TenantInvoiceState {
            config: InvoiceNumberingConfig {
                next_number,
                ..config
            },
            last_invoice_number: Some(number.clone()),
        };
        self.store.save(tenant_id, &advanced)?;

        info!(tenant_id, invoice_number = %number, "Invoice number issued");
        Ok(IssuedInvoice {
            number,
            period,
            sequence,
        })
    }

    /// The number the next `issue_at(period)` would return. Persists nothing.
    pub fn peek_next(&self, tenant_id: &str, period: BillingPeriod) -> BillingResult<String> {
        let state = self.load_state(tenant_id)?;
        let config = update_company_invoice_format_at(
            &state.config,
            state.last_invoice_number.as_deref(),
            period,
        );
        Ok(generate_invoice_number_at(&config, period))
    }

    /// The last number issued to a tenant, parsed.
    pub fn last_issued(&self, tenant_id: &str) -> BillingResult<Option<ParsedInvoiceNumber>> {
        let state = self.load_state(tenant_id)?;
        Ok(state.last_invoice_number.as_deref().map(parse_invoice_number))
    }

    fn load_state(&self, tenant_id: &str) -> BillingResult<TenantInvoiceState> {
        self.store
            .load(tenant_id)?
            .ok_or_else(|| BillingError::UnknownTenant(tenant_id.to_string()))
    }

    fn tenant_lock(&self, tenant_id: &str) -> BillingResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| BillingError::LockPoisoned(tenant_id.to_string()))?;

        let lock = locks.entry(tenant_id.to_string()).or_insert_with(|| {
            debug!(tenant_id, "Creating issuance lock");
            Arc::new(Mutex::new(()))
        });
        Ok(Arc::clone(lock))
    }
}
