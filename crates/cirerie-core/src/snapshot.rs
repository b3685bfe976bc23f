//! # Product Snapshot
//!
//! A saved product: the bill of materials as it was priced, the parameters,
//! and the five channel results computed from them.
//!
//! ```text
//! catalog (live prices) ──► CostInputs ──► compute_all_channels
//!                                │                 │
//!                                ▼                 ▼
//!                     ProductSnapshot { recipe, ..., resultsByMode, savedAt }
//! ```
//!
//! Lines are frozen copies. When a material price changes later the snapshot
//! keeps the old figures until it is explicitly recomputed; nothing here
//! detects staleness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::batch::{compute_all_channels, ResultsByMode};
use crate::parse::PricingParameters;
use crate::pricing::CostInputs;
use crate::types::{MaterialLine, ShippingTariff};

/// A product as stored after a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: String,
    pub product_id: String,
    pub product_name: String,

    pub recipe: Vec<MaterialLine>,
    pub packaging: Vec<MaterialLine>,
    pub shipping_box: Option<MaterialLine>,
    pub shipping_consumables: Vec<MaterialLine>,
    pub parameters: PricingParameters,

    pub results_by_mode: ResultsByMode,

    #[ts(as = "String")]
    pub saved_at: DateTime<Utc>,
}

impl ProductSnapshot {
    /// Computes every channel and freezes the result.
    ///
    /// The caller supplies the identifier and the timestamp.
    pub fn capture(
        id: impl Into<String>,
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        inputs: &CostInputs,
        saved_at: DateTime<Utc>,
    ) -> Self {
        ProductSnapshot {
            id: id.into(),
            product_id: product_id.into(),
            product_name: product_name.into(),
            recipe: inputs.recipe.clone(),
            packaging: inputs.packaging.clone(),
            shipping_box: inputs.shipping_box.clone(),
            shipping_consumables: inputs.shipping_consumables.clone(),
            parameters: inputs.parameters,
            results_by_mode: compute_all_channels(inputs),
            saved_at,
        }
    }

    /// Inputs equivalent to the ones this snapshot was captured from,
    /// given the rate card to price parcels with.
    pub fn cost_inputs(&self, shipping_tariffs: Vec<ShippingTariff>) -> CostInputs {
        CostInputs {
            recipe: self.recipe.clone(),
            packaging: self.packaging.clone(),
            shipping_tariffs,
            shipping_box: self.shipping_box.clone(),
            shipping_consumables: self.shipping_consumables.clone(),
            parameters: self.parameters,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PurchaseUnit, ShippingService};
    use chrono::TimeZone;

    fn inputs() -> CostInputs {
        CostInputs {
            recipe: vec![MaterialLine::new("Cire", 0.012, 180.0, PurchaseUnit::Kilogram)],
            packaging: vec![MaterialLine::piece("Pot", 1.2, 1.0, 160.0)],
            shipping_tariffs: vec![ShippingTariff::new(ShippingService::Locker, 500.0, 3.6, 5.2)],
            ..CostInputs::default()
        }
    }

    #[test]
    fn test_capture_freezes_lines_and_results() {
        let saved_at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let mut inputs = inputs();
        let snapshot = ProductSnapshot::capture("snap-1", "vanille", "Bougie vanille", &inputs, saved_at);

        assert_eq!(snapshot.results_by_mode, compute_all_channels(&inputs));
        assert_eq!(snapshot.saved_at, saved_at);

        // later price change does not reach the snapshot
        inputs.recipe[0].standardized_price = 0.02;
        assert_eq!(snapshot.recipe[0].standardized_price, 0.012);
        assert_ne!(snapshot.results_by_mode, compute_all_channels(&inputs));
    }

    #[test]
    fn test_recompute_from_snapshot() {
        let inputs = inputs();
        let saved_at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let snapshot = ProductSnapshot::capture("snap-1", "vanille", "Bougie vanille", &inputs, saved_at);

        let rebuilt = snapshot.cost_inputs(inputs.shipping_tariffs.clone());
        assert_eq!(rebuilt, inputs);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let saved_at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let snapshot = ProductSnapshot::capture("snap-1", "vanille", "Bougie vanille", &inputs(), saved_at);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["productId"], "vanille");
        assert!(json["resultsByMode"]["PointRelais"].is_object());
        assert!(json["savedAt"].as_str().unwrap().starts_with("2024-03-01T10:00:00"));
    }
}
