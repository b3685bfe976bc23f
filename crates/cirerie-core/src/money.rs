//! # Money Module
//!
//! Percentages and the handful of money helpers the cost engine shares.
//!
//! ## Why Floating Point Here?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UNIT ECONOMICS, NOT LEDGER ENTRIES                                     │
//! │                                                                         │
//! │  Inputs are per-gram prices (0.0123 €/g), densities (0.86 g/ml) and    │
//! │  margin multipliers (3.5×). None of them live on a cent grid.          │
//! │                                                                         │
//! │  The engine keeps full f64 precision end to end and only rounds        │
//! │  when a value is shown to a person:                                    │
//! │                                                                         │
//! │    cost 4.2371 ──► price HT 14.8299 ──► shown "14,83 €"                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shown amounts are [`Money`]: a `rust_decimal::Decimal` rounded to the
//! cent.
//!
//! ## Usage
//! ```rust
//! use cirerie_core::money::{format_eur, Percentage};
//!
//! let vat = Percentage::new(20.0);
//! let ttc = vat.add_to(10.0);               // 12.00
//! assert!((vat.remove_from(ttc) - 10.0).abs() < 1e-9);
//! assert_eq!(format_eur(ttc), "12,00 €");
//! ```

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::parse::lenient_f64;

// =============================================================================
// Percentage
// =============================================================================

/// A rate expressed in percent: `20.0` means 20 %.
///
/// ## Where Percentages Appear
/// ```text
/// VAT rate ─────────────── productPriceTTC = HT × (1 + vat/100)
/// Transaction fee rate ─── fees = finalClientPrice × fee/100
/// Depot commission ─────── commission = TTC × commission/100
/// Business charges ─────── charges = turnover × 13.4/100
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, TS)]
#[ts(export)]
pub struct Percentage(f64);

impl Percentage {
    /// Creates a percentage from a percent value (`13.4` = 13.4 %).
    #[inline]
    pub const fn new(percent: f64) -> Self {
        Percentage(percent)
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(0.0)
    }

    /// Returns the raw percent value.
    #[inline]
    pub const fn percent(&self) -> f64 {
        self.0
    }

    /// Returns the rate as a fraction (`20 %` → `0.2`).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 / 100.0
    }

    /// Checks if the rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Returns `amount × rate`.
    ///
    /// ## Example
    /// ```rust
    /// use cirerie_core::money::Percentage;
    ///
    /// let charges = Percentage::new(13.4);
    /// assert!((charges.of(20.0) - 2.68).abs() < 1e-9);
    /// ```
    #[inline]
    pub fn of(&self, amount: f64) -> f64 {
        amount * self.fraction()
    }

    /// Grosses an amount up by the rate: `amount × (1 + rate)`.
    ///
    /// Used to go from a pre-tax (HT) to a tax-inclusive (TTC) price.
    #[inline]
    pub fn add_to(&self, amount: f64) -> f64 {
        amount * (1.0 + self.fraction())
    }

    /// Extracts the rate from a grossed-up amount: `amount / (1 + rate)`.
    ///
    /// Used to go from TTC back to HT. A rate of exactly -100 % would divide
    /// by zero; the result is then reported as zero.
    pub fn remove_from(&self, amount: f64) -> f64 {
        let divisor = 1.0 + self.fraction();
        if divisor == 0.0 {
            return 0.0;
        }
        amount / divisor
    }
}

impl From<f64> for Percentage {
    fn from(percent: f64) -> Self {
        Percentage(percent)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Rates follow the zero policy: `"5,5"` reads as 5.5 %, garbage as 0 %.
impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_f64(deserializer).map(Percentage)
    }
}

// =============================================================================
// Money
// =============================================================================

/// An amount in euros, rounded to the cent.
///
/// The engine computes in `f64`; `Money` is what leaves it for a person to
/// read (logs, printed reports).
///
/// ## Example
/// ```rust
/// use cirerie_core::money::Money;
///
/// let price = Money::from_amount(14.8299);
/// assert_eq!(price.to_f64(), 14.83);
/// assert_eq!(price.to_string(), "14,83 €");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Zero euros.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Rounds an engine amount to the cent, half away from zero.
    ///
    /// NaN and infinite amounts become zero.
    pub fn from_amount(amount: f64) -> Self {
        let Some(exact) = Decimal::from_f64(amount) else {
            return Money::ZERO;
        };
        let rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        // -0.001 rounds to a signed zero
        if rounded.is_zero() {
            return Money::ZERO;
        }
        Money(rounded)
    }

    /// Returns the amount as the engine's `f64`.
    pub fn to_f64(&self) -> f64 {
        // cents over a power of ten: one correctly rounded division
        self.0.mantissa() as f64 / 10f64.powi(self.0.scale() as i32)
    }
}

/// Formats the amount the way French invoices print it: `"14,83 €"`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut amount = self.0;
        amount.rescale(2);
        write!(f, "{} €", amount.to_string().replace('.', ","))
    }
}

// =============================================================================
// Presentation Helpers
// =============================================================================

/// Rounds an amount to the nearest cent, half away from zero.
///
/// ## Example
/// ```rust
/// use cirerie_core::money::round_cents;
///
/// assert_eq!(round_cents(14.8299), 14.83);
/// assert_eq!(round_cents(-0.125), -0.13);
/// ```
#[inline]
pub fn round_cents(amount: f64) -> f64 {
    Money::from_amount(amount).to_f64()
}

/// Formats an amount in euros the way French invoices print it.
///
/// ## Example
/// ```rust
/// use cirerie_core::money::format_eur;
///
/// assert_eq!(format_eur(5.32), "5,32 €");
/// assert_eq!(format_eur(-1.5), "-1,50 €");
/// ```
pub fn format_eur(amount: f64) -> String {
    Money::from_amount(amount).to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_of() {
        let rate = Percentage::new(30.0);
        assert!((rate.of(20.0) - 6.0).abs() < 1e-9);
        assert_eq!(Percentage::zero().of(20.0), 0.0);
    }

    #[test]
    fn test_vat_round_trip() {
        let vat = Percentage::new(20.0);
        let ttc = vat.add_to(35.0);
        assert!((ttc - 42.0).abs() < 1e-9);
        assert!((vat.remove_from(ttc) - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_remove_from_degenerate_rate() {
        assert_eq!(Percentage::new(-100.0).remove_from(12.0), 0.0);
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(2.675_000_1), 2.68);
        assert_eq!(round_cents(5.32), 5.32);
        assert_eq!(round_cents(0.004), 0.0);
    }

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(0.0), "0,00 €");
        assert_eq!(format_eur(-0.001), "0,00 €");
        assert_eq!(format_eur(1234.5), "1234,50 €");
    }

    #[test]
    fn test_percentage_serializes_as_number() {
        let json = serde_json::to_string(&Percentage::new(13.4)).unwrap();
        assert_eq!(json, "13.4");
    }

    #[test]
    fn test_percentage_deserializes_leniently() {
        let rate: Percentage = serde_json::from_str("5.5").unwrap();
        assert_eq!(rate.percent(), 5.5);
        let rate: Percentage = serde_json::from_str(r#""5,5""#).unwrap();
        assert_eq!(rate.percent(), 5.5);
        let rate: Percentage = serde_json::from_str(r#""vingt""#).unwrap();
        assert!(rate.is_zero());
    }

    #[test]
    fn test_money_rounding() {
        assert_eq!(Money::from_amount(2.675_000_1).to_f64(), 2.68);
        assert_eq!(Money::from_amount(-0.125).to_f64(), -0.13);
        assert_eq!(Money::from_amount(f64::NAN), Money::ZERO);
        assert_eq!(Money::from_amount(f64::INFINITY), Money::ZERO);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_amount(5.0).to_string(), "5,00 €");
        assert_eq!(Money::from_amount(-1.5).to_string(), "-1,50 €");
        assert_eq!(Money::ZERO.to_string(), "0,00 €");
    }
}
