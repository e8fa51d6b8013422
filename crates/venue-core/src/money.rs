//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    180 * 0.175 = 31.499999999999996  → Math.round → 31   (wrong)       │
//! │    exact:        31.5                → half up    → 32                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units × integer rate units (1e-6 %)        │
//! │    180 × 17_500_000 = 3_150_000_000                                     │
//! │    (3_150_000_000 + 50_000_000) / 100_000_000 = 32                      │
//! │    The rounding decision is exact and reproducible on every platform   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use venue_core::money::Money;
//!
//! // Create from minor units (kobo, cents)
//! let price = Money::from_minor(1099);
//!
//! // Arithmetic saturates instead of overflowing
//! let total = price + Money::from_minor(500);
//! assert_eq!(total.minor(), 1599);
//! assert_eq!(Money::from_minor(i64::MAX) + price, Money::from_minor(i64::MAX));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// The engine is agnostic to the currency: a subtotal in kobo produces a
/// service fee and tax in kobo. Callers must keep the unit consistent.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Booking/Rental subtotal ──► calculate_taxes ──► service_fee           │
/// │                                              ├─► tax (per line)        │
/// │                                              └─► total                 │
/// │                                                                         │
/// │  total ──► format_with_symbol("₦") ──► "₦12,000.00" in the storefront │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use venue_core::money::Money;
    ///
    /// let fee = Money::from_minor(1099);
    /// assert_eq!(fee.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a percentage rate and rounds to the nearest whole minor unit.
    ///
    /// ## Rounding
    /// Halves round toward positive infinity, so `0.5 → 1` and `-0.5 → 0`.
    /// This is the rounding every historical invoice was issued with and it
    /// must not change. It is NOT bankers rounding.
    ///
    /// ```text
    /// amount × units / 10^8, rounded:
    ///     floor((amount × units + 5 × 10^7) / 10^8)
    /// ```
    ///
    /// Results beyond the `i64` range saturate.
    ///
    /// ## Example
    /// ```rust
    /// use venue_core::money::Money;
    /// use venue_core::types::TaxRate;
    ///
    /// let base = Money::from_minor(10500);
    /// let vat = TaxRate::from_bps(1500); // 15%
    ///
    /// // 10500 × 15% = 1575
    /// assert_eq!(base.percentage_of(vat).minor(), 1575);
    /// ```
    pub fn percentage_of(&self, rate: TaxRate) -> Money {
        const DIVISOR: i128 = 100 * TaxRate::UNITS_PER_PERCENT as i128;

        // i64 × u32 always fits in i128
        let scaled = self.0 as i128 * rate.micro_percent() as i128;
        let rounded = (scaled + DIVISOR / 2).div_euclid(DIVISOR);
        let minor = i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX });
        Money::from_minor(minor)
    }

    /// Formats the amount with a currency symbol and thousands grouping.
    ///
    /// ## Example
    /// ```rust
    /// use venue_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(150000).format_with_symbol("₦"), "₦1,500.00");
    /// assert_eq!(Money::from_minor(-550).format_with_symbol("$"), "-$5.50");
    /// ```
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let major = (self.0 / 100).unsigned_abs().to_string();

        let mut grouped = String::with_capacity(major.len() + major.len() / 3);
        for (i, ch) in major.chars().enumerate() {
            if i > 0 && (major.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!("{}{}{}.{:02}", sign, symbol, grouped, self.minor_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display is for logs and debugging. Use `format_with_symbol` for the
/// storefront so the tenant's currency symbol is shown.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
