//! # Weight & Base Cost Aggregation
//!
//! Reduces a list of [`MaterialLine`]s (a recipe, the packaging, a shipping
//! box, a set of consumables) to a total cost and a total mass.
//!
//! ## Per-Line Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cost   = standardized_price × quantity                                 │
//! │                                                                         │
//! │  weight = quantity × weight_per_piece      if purchase_unit == piece   │
//! │         = quantity × density               otherwise (density → 1)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `density` is really a grams-per-standardized-unit multiplier: wax bought
//! by the kilo is standardized to grams, so its density stays 1; fragrance
//! oil bought by the liter is standardized to milliliters and carries its
//! real density (≈ 0.9).

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

use crate::types::MaterialLine;

/// Total cost and weight of a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    /// Sum of line costs.
    pub cost: f64,
    /// Sum of line weights, in grams.
    pub weight: f64,
}

impl Aggregate {
    /// The empty aggregate.
    #[inline]
    pub const fn zero() -> Self {
        Aggregate {
            cost: 0.0,
            weight: 0.0,
        }
    }
}

impl Add for Aggregate {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Aggregate {
            cost: self.cost + other.cost,
            weight: self.weight + other.weight,
        }
    }
}

impl Sum for Aggregate {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Aggregate::zero(), Add::add)
    }
}

impl MaterialLine {
    /// Money spent on this line for one unit of product.
    #[inline]
    pub fn cost(&self) -> f64 {
        finite_or_zero(self.standardized_price) * finite_or_zero(self.quantity)
    }

    /// Mass this line adds to one unit of product, in grams.
    ///
    /// Never negative: a negative quantity or density contributes nothing.
    pub fn weight(&self) -> f64 {
        let quantity = finite_or_zero(self.quantity);
        let per_unit = if self.purchase_unit.is_piece() {
            self.weight_per_piece.map(finite_or_zero).unwrap_or(0.0)
        } else {
            match self.density.map(finite_or_zero) {
                Some(density) if density != 0.0 => density,
                _ => 1.0,
            }
        };
        (quantity * per_unit).max(0.0)
    }

    /// Cost and weight of this line.
    #[inline]
    pub fn aggregate(&self) -> Aggregate {
        Aggregate {
            cost: self.cost(),
            weight: self.weight(),
        }
    }
}

/// Sums cost and weight over a list of lines.
///
/// ## Example
/// ```rust
/// use cirerie_core::materials::aggregate;
/// use cirerie_core::types::{MaterialLine, PurchaseUnit};
///
/// let recipe = vec![
///     MaterialLine::new("Cire de soja", 0.012, 170.0, PurchaseUnit::Kilogram),
///     MaterialLine::new("Parfum vanille", 0.08, 12.0, PurchaseUnit::Liter).with_density(0.9),
///     MaterialLine::piece("Mèche", 0.15, 1.0, 0.5),
/// ];
/// let totals = aggregate(&recipe);
/// assert!((totals.cost - (2.04 + 0.96 + 0.15)).abs() < 1e-9);
/// assert!((totals.weight - (170.0 + 10.8 + 0.5)).abs() < 1e-9);
/// ```
pub fn aggregate<'a, I>(lines: I) -> Aggregate
where
    I: IntoIterator<Item = &'a MaterialLine>,
{
    lines.into_iter().map(MaterialLine::aggregate).sum()
}

#[inline]
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
