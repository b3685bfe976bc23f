//! # Reverse Margin Solver
//!
//! Lets the user type the retail price they want (TTC) and recovers the
//! margin multiplier that produces it. Only the multiplier is ever stored.
//!
//! ```text
//! desired TTC 42 ──► ÷ (1 + 20 %) ──► HT 35 ──► ÷ product cost 10 ──► 3.5×
//! ```
//!
//! ## Guards
//! - product cost must be > 0 (nothing to divide by otherwise)
//! - the desired price must parse to a non-negative number
//!
//! When a guard fails the current multiplier is kept as is; no error is
//! raised, the keystroke is simply ignored.

use crate::money::Percentage;
use crate::parse::parse_number;

/// Back-solves the multiplier for a desired TTC price.
///
/// Returns `None` when a guard fails.
///
/// ## Example
/// ```rust
/// use cirerie_core::money::Percentage;
/// use cirerie_core::solver::solve_margin_multiplier;
///
/// let multiplier = solve_margin_multiplier(42.0, 10.0, Percentage::new(20.0)).unwrap();
/// assert!((multiplier - 3.5).abs() < 1e-9);
/// ```
pub fn solve_margin_multiplier(
    desired_price_ttc: f64,
    product_cost: f64,
    vat_rate: Percentage,
) -> Option<f64> {
    if !(product_cost.is_finite() && product_cost > 0.0) {
        return None;
    }
    if !desired_price_ttc.is_finite() || desired_price_ttc < 0.0 {
        return None;
    }

    let price_ht = vat_rate.remove_from(desired_price_ttc);
    let multiplier = price_ht / product_cost;
    multiplier.is_finite().then_some(multiplier)
}

/// Applies a target price typed as text to the current multiplier.
///
/// Returns the new multiplier, or `current` unchanged when the text is not a
/// number or a guard fails.
///
/// ## User Workflow
/// ```text
/// Price box: "42"   cost 10, VAT 20 %   ──► multiplier 3.5
/// Price box: "4"    cost 0              ──► multiplier unchanged
/// Price box: "abc"  cost 10             ──► multiplier unchanged
/// ```
pub fn apply_target_price(
    current: f64,
    desired_price_ttc: &str,
    product_cost: f64,
    vat_rate: Percentage,
) -> f64 {
    parse_number(desired_price_ttc)
        .and_then(|price| solve_margin_multiplier(price, product_cost, vat_rate))
        .unwrap_or(current)
}

// =============================================================================
// Unit Tests
// =============================================================================
