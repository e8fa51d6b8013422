//! # Invoice Numbering
//!
//! Generates, parses and validates per-tenant invoice numbers.
//!
//! ## Format
//! ```text
//!   PREFIX - YYYY - MM - SEQUENCE
//!   ──┬───   ─┬──   ┬─   ───┬────
//!     │       │     │       └── zero-padded counter (padding, default 4)
//!     │       │     └────────── month of issue (01-12)
//!     │       └──────────────── year of issue
//!     └──────────────────────── INV (auto) | custom (prefix) | PS (paystack)
//!
//!   TIL-2025-03-0007
//! ```
//!
//! ## Who Owns the Counter?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Caller (tenant store)              venue-core (this module)           │
//! │   ─────────────────────              ────────────────────────           │
//! │   lock tenant                                                           │
//! │   read config + last number ───────► get_next_invoice_config()          │
//! │                                      same month? seq + 1 : 1            │
//! │                             ◄─────── NextInvoiceConfig                  │
//! │   generate + persist        ───────► generate_invoice_number()          │
//! │   unlock tenant                                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here holds state. Two callers that read the same last number
//! concurrently will compute the same next number; issuance must be
//! serialized per tenant by the caller (see `venue-billing`'s issuer).
//!
//! ## Clock
//! Functions without an `_at` suffix read the current UTC date. The `_at`
//! variants take an explicit [`BillingPeriod`] and are fully deterministic.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{InvoiceFormatType, InvoiceNumberingConfig};
use crate::{MAX_INVOICE_PADDING, MAX_INVOICE_YEAR, MIN_INVOICE_YEAR};

// =============================================================================
// Billing Period
// =============================================================================

/// Calendar year and month an invoice is issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillingPeriod {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl BillingPeriod {
    #[inline]
    pub const fn new(year: i32, month: u32) -> Self {
        BillingPeriod { year, month }
    }

    /// The current UTC year and month.
    pub fn current() -> Self {
        Self::from_date(&Utc::now())
    }

    /// Period of any chrono date or datetime.
    pub fn from_date<D: Datelike>(date: &D) -> Self {
        BillingPeriod {
            year: date.year(),
            month: date.month(),
        }
    }

    /// True if the parsed number was issued in this period.
    ///
    /// Compared numerically, so `"3"` and `"03"` are the same month. A
    /// number without year or month never matches.
    pub fn contains(&self, parsed: &ParsedInvoiceNumber) -> bool {
        match (parsed.year_value(), parsed.month_value()) {
            (Some(year), Some(month)) => year == self.year && month == self.month,
            _ => false,
        }
    }
}

// =============================================================================
// Parsed Invoice Number
// =============================================================================

/// Structural components recovered from an invoice number string.
///
/// `year` and `month` keep the text as written (`"03"`), matching what the
/// storefront displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ParsedInvoiceNumber {
    pub prefix: String,
    pub year: Option<String>,
    pub month: Option<String>,
    /// 0 when the input could not be parsed.
    pub sequence: u32,
    pub raw: String,
}

impl ParsedInvoiceNumber {
    /// Result for input that has no usable structure.
    pub fn zeroed(raw: &str) -> Self {
        ParsedInvoiceNumber {
            prefix: String::new(),
            year: None,
            month: None,
            sequence: 0,
            raw: raw.to_string(),
        }
    }

    /// Year as a number, if present and numeric.
    pub fn year_value(&self) -> Option<i32> {
        self.year.as_deref().and_then(|y| y.parse().ok())
    }

    /// Month as a number, if present and numeric.
    pub fn month_value(&self) -> Option<u32> {
        self.month.as_deref().and_then(|m| m.parse().ok())
    }
}

// =============================================================================
// Next Invoice Config
// =============================================================================

/// Everything needed to format the next invoice number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NextInvoiceConfig {
    pub prefix: String,
    pub next_number: u32,
    pub padding: usize,
    pub year: i32,
    pub month: u32,
}

impl NextInvoiceConfig {
    /// Formats the invoice number this config describes.
    pub fn invoice_number(&self) -> String {
        format_invoice_number(&self.prefix, self.year, self.month, self.next_number, self.padding)
    }
}

// =============================================================================
// Generation
// =============================================================================

/// Padding is clamped to [`MAX_INVOICE_PADDING`] so an unvalidated config
/// still formats.
fn format_invoice_number(prefix: &str, year: i32, month: u32, sequence: u32, padding: usize) -> String {
    let padding = padding.min(MAX_INVOICE_PADDING);
    format!(
        "{}-{:04}-{:02}-{:0width$}",
        prefix,
        year,
        month,
        sequence,
        width = padding
    )
}

/// Formats `config.next_number` as an invoice number for the current month.
///
/// ## Example
/// ```rust
/// use venue_core::invoice::{generate_invoice_number_at, BillingPeriod};
/// use venue_core::types::InvoiceNumberingConfig;
///
/// let config = InvoiceNumberingConfig::with_prefix("TIL", 7);
/// let number = generate_invoice_number_at(&config, BillingPeriod::new(2025, 3));
/// assert_eq!(number, "TIL-2025-03-0007");
/// ```
pub fn generate_invoice_number(config: &InvoiceNumberingConfig) -> String {
    generate_invoice_number_at(config, BillingPeriod::current())
}

/// [`generate_invoice_number`] for an explicit period.
pub fn generate_invoice_number_at(config: &InvoiceNumberingConfig, period: BillingPeriod) -> String {
    format_invoice_number(
        config.effective_prefix(),
        period.year,
        period.month,
        config.starting_number(),
        config.padding,
    )
}

// =============================================================================
// Parsing
// =============================================================================

/// Splits an invoice number into its components. Never fails.
///
/// ```text
/// "TIL-2025-03-0007"      → prefix "TIL", year "2025", month "03", seq 7
/// "MY-CO-2025-03-0007"    → prefix "MY-CO", year "2025", month "03", seq 7
/// "INV-0042"              → prefix "INV", seq 42 (no year/month)
/// "INV-2025-0042"         → prefix "INV", seq 42 (middle segment dropped)
/// "INV"  / "INV-abc"      → zeroed (prefix "", seq 0)
/// ```
pub fn parse_invoice_number(raw: &str) -> ParsedInvoiceNumber {
    let segments: Vec<&str> = raw.trim().split('-').collect();
    let count = segments.len();
    if count < 2 {
        return ParsedInvoiceNumber::zeroed(raw);
    }

    // With four or more segments the last three are structural and the
    // prefix may itself contain hyphens. Shorter forms carry only a prefix
    // and a sequence.
    let (prefix, tail) = if count >= 4 {
        let (head, tail) = segments.split_at(count - 3);
        (head.join("-"), tail)
    } else {
        (segments[0].to_string(), &segments[count - 1..])
    };

    let sequence = match tail[tail.len() - 1].parse::<u32>() {
        Ok(sequence) => sequence,
        Err(_) => return ParsedInvoiceNumber::zeroed(raw),
    };

    let (year, month) = if tail.len() == 3 {
        (Some(tail[0].to_string()), Some(tail[1].to_string()))
    } else {
        (None, None)
    };

    ParsedInvoiceNumber {
        prefix,
        year,
        month,
        sequence,
        raw: raw.to_string(),
    }
}

// =============================================================================
// Sequencing
// =============================================================================

/// Computes the sequence for the next invoice.
///
/// ## Rules
/// - No previous number: `config.next_number` (0 means 1)
/// - Previous number from this month: its sequence + 1
/// - Previous number from another month, or unparseable: 1
///
/// A sequence of `u32::MAX` in the current month saturates, so the result
/// repeats the last number. Issuers must treat that as an exhausted
/// sequence.
pub fn get_next_invoice_config(config: &InvoiceNumberingConfig, last_invoice_number: Option<&str>) -> NextInvoiceConfig {
    get_next_invoice_config_at(config, last_invoice_number, BillingPeriod::current())
}

/// [`get_next_invoice_config`] for an explicit period.
pub fn get_next_invoice_config_at(
    config: &InvoiceNumberingConfig,
    last_invoice_number: Option<&str>,
    period: BillingPeriod,
) -> NextInvoiceConfig {
    let last = last_invoice_number.map(str::trim).filter(|s| !s.is_empty());

    let next_number = match last {
        None => config.starting_number(),
        Some(last) => {
            let parsed = parse_invoice_number(last);
            if period.contains(&parsed) {
                parsed.sequence.saturating_add(1)
            } else {
                1
            }
        }
    };

    NextInvoiceConfig {
        prefix: config.effective_prefix().to_string(),
        next_number,
        padding: config.padding,
        year: period.year,
        month: period.month,
    }
}

/// Returns a copy of `config` with `next_number` advanced for the next
/// invoice. The caller persists the returned config.
pub fn update_company_invoice_format(
    config: &InvoiceNumberingConfig,
    last_invoice_number: Option<&str>,
) -> InvoiceNumberingConfig {
    update_company_invoice_format_at(config, last_invoice_number, BillingPeriod::current())
}

/// [`update_company_invoice_format`] for an explicit period.
pub fn update_company_invoice_format_at(
    config: &InvoiceNumberingConfig,
    last_invoice_number: Option<&str>,
    period: BillingPeriod,
) -> InvoiceNumberingConfig {
    let next = get_next_invoice_config_at(config, last_invoice_number, period);
    InvoiceNumberingConfig {
        next_number: next.next_number,
        ..config.clone()
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Checks an invoice number against structural rules and the tenant's
/// configuration.
///
/// ## Rejected
/// - sequence of 0 (which includes anything unparseable)
/// - a year outside 2000-2100, or not a number
/// - a month outside 1-12, or not a number
/// - for `prefix` configs, a prefix other than the configured one
pub fn validate_invoice_number(raw: &str, config: &InvoiceNumberingConfig) -> bool {
    let parsed = parse_invoice_number(raw);

    if parsed.sequence == 0 {
        return false;
    }

    if parsed.year.is_some() {
        match parsed.year_value() {
            Some(year) if (MIN_INVOICE_YEAR..=MAX_INVOICE_YEAR).contains(&year) => {}
            _ => return false,
        }
    }

    if parsed.month.is_some() {
        match parsed.month_value() {
            Some(month) if (1..=12).contains(&month) => {}
            _ => return false,
        }
    }

    if config.format_type == InvoiceFormatType::Prefix && parsed.prefix != config.effective_prefix() {
        return false;
    }

    true
}

// =============================================================================
// Unit Tests
// =============================================================================
