//! # All-Channel Batch
//!
//! Computes every channel variant of one product from a single input set,
//! the shape stored as `resultsByMode` when a product is saved.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ resultsByMode                                                │
//! │   depot       ── consignment depot                           │
//! │   domicile    ── hand delivered (home channel)               │
//! │   Locker      ── internet, parcel locker                     │
//! │   PointRelais ── internet, relay point                       │
//! │   Domicile    ── internet, carrier home delivery             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internet variants are keyed by service name, never by the generic
//! `internet` tag. Note `domicile` (home channel) and `Domicile` (carrier
//! service) are two different entries.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::pricing::{
    depot_result, home_result, internet_result, BaseCosts, CostInputs, CostResult, ParcelExtras,
};
use crate::shipping::TariffTable;
use crate::types::ShippingService;

/// Every channel variant of one product.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResultsByMode {
    #[serde(rename = "depot")]
    pub depot: CostResult,
    #[serde(rename = "domicile")]
    pub home: CostResult,
    #[serde(rename = "Locker")]
    pub locker: CostResult,
    #[serde(rename = "PointRelais")]
    pub point_relais: CostResult,
    #[serde(rename = "Domicile")]
    pub carrier_domicile: CostResult,
}

impl ResultsByMode {
    /// The internet variant for a service.
    pub fn internet(&self, service: ShippingService) -> &CostResult {
        match service {
            ShippingService::Locker => &self.locker,
            ShippingService::PointRelais => &self.point_relais,
            ShippingService::Domicile => &self.carrier_domicile,
        }
    }

    /// Every variant with its storage key, in storage order.
    pub fn entries(&self) -> [(&'static str, &CostResult); 5] {
        [
            ("depot", &self.depot),
            ("domicile", &self.home),
            ("Locker", &self.locker),
            ("PointRelais", &self.point_relais),
            ("Domicile", &self.carrier_domicile),
        ]
    }

    /// Services whose parcel fits no tariff band.
    pub fn services_missing_band(&self) -> Vec<ShippingService> {
        ShippingService::ALL
            .into_iter()
            .filter(|service| self.internet(*service).is_missing_shipping_band())
            .collect()
    }
}

/// Computes all five variants.
///
/// The channel and service named in `inputs.parameters` are ignored; every
/// variant is produced. Results are identical to calling the per-channel
/// functions of [`crate::pricing`] one by one.
pub fn compute_all_channels(inputs: &CostInputs) -> ResultsByMode {
    let base = BaseCosts::new(inputs);
    let extras = ParcelExtras::new(inputs);
    let table = TariffTable::new(&inputs.shipping_tariffs);
    let parcel_weight = base.product.weight + base.packaging.weight + extras.weight();

    let internet = |service: ShippingService| {
        let quote = table.resolve(service, parcel_weight);
        internet_result(inputs, &base, &extras, service, quote)
    };

    ResultsByMode {
        depot: depot_result(inputs, &base),
        home: home_result(inputs, &base),
        locker: internet(ShippingService::Locker),
        point_relais: internet(ShippingService::PointRelais),
        carrier_domicile: internet(ShippingService::Domicile),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
