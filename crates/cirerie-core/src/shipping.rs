//! # Shipping Tariff Resolution
//!
//! Finds what a parcel of a given weight costs the workshop and what the
//! customer pays for it, for one carrier service.
//!
//! ## Band Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Locker rate card (sorted by max weight)                                │
//! │                                                                         │
//! │     ≤ 250 g    cost 3.10  price 4.50                                    │
//! │     ≤ 500 g    cost 3.60  price 5.20   ◄── 251..=500 g lands here       │
//! │     ≤ 1000 g   cost 4.40  price 6.30                                    │
//! │                                                                         │
//! │  500 g   → the ≤ 500 band (upper bound is inclusive)                   │
//! │  1200 g  → no band: cost 0, price 0, band None                         │
//! │  0 g     → no band: nothing is being shipped                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A quote of zero with `band_max_weight == None` means "no shipping model
//! applies". It is not free shipping, and callers should say so.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::types::{ShippingService, ShippingTariff};

/// Carrier cost and customer price for one parcel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingQuote {
    /// Charged by the carrier.
    pub cost: f64,
    /// Charged to the customer.
    pub price: f64,
    /// Upper bound of the band that matched, if any.
    pub band_max_weight: Option<f64>,
}

impl ShippingQuote {
    /// The "no band applies" quote.
    pub const fn none() -> Self {
        ShippingQuote {
            cost: 0.0,
            price: 0.0,
            band_max_weight: None,
        }
    }

    /// True when a tariff band matched.
    pub fn is_resolved(&self) -> bool {
        self.band_max_weight.is_some()
    }

    fn from_tariff(tariff: &ShippingTariff) -> Self {
        ShippingQuote {
            cost: tariff.cost,
            price: tariff.price,
            band_max_weight: Some(tariff.max_weight),
        }
    }
}

/// Resolves the quote for `weight` grams with `service`.
///
/// Filters the rows of the service, sorts them by `max_weight` and takes the
/// first band with `weight <= max_weight`.
///
/// ## Example
/// ```rust
/// use cirerie_core::shipping::resolve_tariff;
/// use cirerie_core::types::{ShippingService, ShippingTariff};
///
/// let tariffs = vec![
///     ShippingTariff::new(ShippingService::Locker, 500.0, 3.6, 5.2),
///     ShippingTariff::new(ShippingService::Locker, 250.0, 3.1, 4.5),
/// ];
/// let quote = resolve_tariff(&tariffs, ShippingService::Locker, 250.0);
/// assert_eq!(quote.price, 4.5);
/// ```
pub fn resolve_tariff(
    tariffs: &[ShippingTariff],
    service: ShippingService,
    weight: f64,
) -> ShippingQuote {
    if weight.is_nan() || weight <= 0.0 {
        return ShippingQuote::none();
    }

    let mut bands: Vec<&ShippingTariff> = tariffs.iter().filter(|t| t.service == service).collect();
    bands.sort_by(|a, b| a.max_weight.total_cmp(&b.max_weight));

    bands
        .into_iter()
        .find(|band| weight <= band.max_weight)
        .map(ShippingQuote::from_tariff)
        .unwrap_or_else(ShippingQuote::none)
}

// =============================================================================
// Tariff Table
// =============================================================================

/// Rate cards grouped by service and sorted once.
///
/// Batch computations resolve the same table many times; this keeps the
/// filter/sort out of the loop and looks bands up by binary search.
/// Resolution is identical to [`resolve_tariff`].
#[derive(Debug, Clone, Default)]
pub struct TariffTable {
    bands: BTreeMap<ShippingService, Vec<ShippingTariff>>,
}

impl TariffTable {
    /// Groups and sorts the given rows.
    pub fn new(tariffs: &[ShippingTariff]) -> Self {
        let mut bands: BTreeMap<ShippingService, Vec<ShippingTariff>> = BTreeMap::new();
        // a NaN bound can never match
        for tariff in tariffs.iter().filter(|t| !t.max_weight.is_nan()) {
            bands.entry(tariff.service).or_default().push(*tariff);
        }
        for rows in bands.values_mut() {
            rows.sort_by(|a, b| a.max_weight.total_cmp(&b.max_weight));
        }
        TariffTable { bands }
    }

    /// Resolves the quote for `weight` grams with `service`.
    pub fn resolve(&self, service: ShippingService, weight: f64) -> ShippingQuote {
        if weight.is_nan() || weight <= 0.0 {
            return ShippingQuote::none();
        }

        let Some(rows) = self.bands.get(&service) else {
            return ShippingQuote::none();
        };

        let index = rows.partition_point(|band| band.max_weight < weight);
        rows.get(index)
            .map(ShippingQuote::from_tariff)
            .unwrap_or_else(ShippingQuote::none)
    }

    /// Heaviest parcel the service accepts, if it has any band.
    pub fn max_weight(&self, service: ShippingService) -> Option<f64> {
        self.bands
            .get(&service)
            .and_then(|rows| rows.last())
            .map(|band| band.max_weight)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rate_card() -> Vec<ShippingTariff> {
        vec![
            ShippingTariff::new(ShippingService::Locker, 1000.0, 4.4, 6.3),
            ShippingTariff::new(ShippingService::Locker, 250.0, 3.1, 4.5),
            ShippingTariff::new(ShippingService::PointRelais, 500.0, 3.9, 5.0),
            ShippingTariff::new(ShippingService::Locker, 500.0, 3.6, 5.2),
            ShippingTariff::new(ShippingService::Domicile, 25000.0, 12.0, 15.0),
        ]
    }

    #[test]
    fn test_smallest_qualifying_band_is_selected() {
        let quote = resolve_tariff(&rate_card(), ShippingService::Locker, 300.0);
        assert_eq!(quote.cost, 3.6);
        assert_eq!(quote.price, 5.2);
        assert_eq!(quote.band_max_weight, Some(500.0));
    }

    #[test]
    fn test_upper_bound_is_inclusive() {
        let quote = resolve_tariff(&rate_card(), ShippingService::Locker, 250.0);
        assert_eq!(quote.band_max_weight, Some(250.0));
        assert_eq!(quote.cost, 3.1);

        let quote = resolve_tariff(&rate_card(), ShippingService::Locker, 250.01);
        assert_eq!(quote.band_max_weight, Some(500.0));
    }

    #[test]
    fn test_overflow_yields_no_band() {
        let quote = resolve_tariff(&rate_card(), ShippingService::Domicile, 30000.0);
        assert_eq!(quote, ShippingQuote::none());
        assert!(!quote.is_resolved());
    }

    #[test]
    fn test_zero_weight_yields_no_band() {
        let quote = resolve_tariff(&rate_card(), ShippingService::Locker, 0.0);
        assert_eq!(quote, ShippingQuote::none());
    }

    #[test]
    fn test_services_do_not_mix() {
        let quote = resolve_tariff(&rate_card(), ShippingService::PointRelais, 800.0);
        assert!(!quote.is_resolved());
    }

    #[test]
    fn test_table_matches_linear_resolution() {
        let rows = rate_card();
        let table = TariffTable::new(&rows);

        for service in ShippingService::ALL {
            for weight in [0.0, 1.0, 249.9, 250.0, 250.5, 500.0, 999.0, 1000.0, 1000.1, 25000.0, 30000.0] {
                assert_eq!(
                    table.resolve(service, weight),
                    resolve_tariff(&rows, service, weight),
                    "{service} at {weight} g"
                );
            }
        }
    }

    #[test]
    fn test_heaviest_band() {
        let table = TariffTable::new(&rate_card());
        assert_eq!(table.max_weight(ShippingService::Locker), Some(1000.0));
        assert_eq!(table.max_weight(ShippingService::PointRelais), Some(500.0));
        assert_eq!(TariffTable::default().max_weight(ShippingService::Locker), None);
    }
}
