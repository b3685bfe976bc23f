//! # Domain Types
//!
//! Core domain types used throughout Cirerie.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌──────────────────┐   ┌────────────────┐  │
//! │  │    MaterialLine      │   │  ShippingTariff  │   │  SaleChannel   │  │
//! │  │  ──────────────────  │   │  ──────────────  │   │  ────────────  │  │
//! │  │  standardized_price  │   │  service         │   │  Internet      │  │
//! │  │  quantity            │   │  max_weight (g)  │   │  Home          │  │
//! │  │  purchase_unit       │   │  cost / price    │   │  Depot         │  │
//! │  │  density             │   └──────────────────┘   └────────────────┘  │
//! │  │  weight_per_piece    │                                               │
//! │  └──────────────────────┘   ┌──────────────────┐   ┌────────────────┐  │
//! │                             │ ShippingService  │   │  PurchaseUnit  │  │
//! │                             │  Locker          │   │  kg g L ml     │  │
//! │                             │  PointRelais     │   │  piece         │  │
//! │                             │  Domicile        │   └────────────────┘  │
//! │                             └──────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored Tags
//! Every enum serializes to the exact tag stored in product documents
//! (`internet`, `PointRelais`, `ml`, ...), so snapshots written by older
//! tools still load.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::parse::{lenient_f64, lenient_opt_f64};

// =============================================================================
// Purchase Unit
// =============================================================================

/// The unit a material was bought in.
///
/// Decides how a line's weight is derived: pieces use `weight_per_piece`,
/// every other unit uses `density`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PurchaseUnit {
    #[serde(rename = "kg")]
    Kilogram,
    #[default]
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "L")]
    Liter,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "piece")]
    Piece,
}

impl PurchaseUnit {
    /// Returns the stored tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PurchaseUnit::Kilogram => "kg",
            PurchaseUnit::Gram => "g",
            PurchaseUnit::Liter => "L",
            PurchaseUnit::Milliliter => "ml",
            PurchaseUnit::Piece => "piece",
        }
    }

    /// True for `L` and `ml`.
    pub const fn is_volumetric(&self) -> bool {
        matches!(self, PurchaseUnit::Liter | PurchaseUnit::Milliliter)
    }

    /// True for `piece`.
    pub const fn is_piece(&self) -> bool {
        matches!(self, PurchaseUnit::Piece)
    }
}

impl fmt::Display for PurchaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PurchaseUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "kg" | "KG" | "Kg" => Ok(PurchaseUnit::Kilogram),
            "g" | "G" => Ok(PurchaseUnit::Gram),
            "L" | "l" => Ok(PurchaseUnit::Liter),
            "ml" | "mL" | "ML" => Ok(PurchaseUnit::Milliliter),
            "piece" | "pièce" | "pc" => Ok(PurchaseUnit::Piece),
            other => Err(CoreError::UnknownPurchaseUnit(other.to_string())),
        }
    }
}

// =============================================================================
// Material Line
// =============================================================================

/// One ingredient or packaging element consumed by one unit of product.
///
/// ## Units
/// - `standardized_price`: currency per gram, per milliliter or per piece
/// - `quantity`: amount of that standardized unit used per product
///
/// Numeric fields deserialize leniently: a stored `"0,012"` becomes `0.012`
/// and garbage becomes `0`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLine {
    /// Display name (frozen into snapshots).
    #[serde(default)]
    pub name: String,

    /// Cost per standardized unit.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub standardized_price: f64,

    /// Amount consumed by one unit of product.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantity: f64,

    /// Original purchase unit.
    #[serde(default)]
    pub purchase_unit: PurchaseUnit,

    /// Mass per standardized unit. Missing (or zero) means 1.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub density: Option<f64>,

    /// Mass of one piece, for `piece` lines.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub weight_per_piece: Option<f64>,
}

impl MaterialLine {
    /// Creates a line bought by weight or volume.
    pub fn new(
        name: impl Into<String>,
        standardized_price: f64,
        quantity: f64,
        purchase_unit: PurchaseUnit,
    ) -> Self {
        MaterialLine {
            name: name.into(),
            standardized_price,
            quantity,
            purchase_unit,
            density: None,
            weight_per_piece: None,
        }
    }

    /// Creates a line bought by the piece.
    pub fn piece(
        name: impl Into<String>,
        price_per_piece: f64,
        quantity: f64,
        weight_per_piece: f64,
    ) -> Self {
        MaterialLine {
            name: name.into(),
            standardized_price: price_per_piece,
            quantity,
            purchase_unit: PurchaseUnit::Piece,
            density: None,
            weight_per_piece: Some(weight_per_piece),
        }
    }

    /// Sets the density (builder style).
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = Some(density);
        self
    }
}

// =============================================================================
// Shipping Service
// =============================================================================

/// Carrier service for internet orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ShippingService {
    /// Parcel locker pickup.
    #[default]
    Locker,
    /// Relay point pickup.
    PointRelais,
    /// Delivered to the customer's door by the carrier.
    Domicile,
}

impl ShippingService {
    /// Every service, in the order batch results list them.
    pub const ALL: [ShippingService; 3] = [
        ShippingService::Locker,
        ShippingService::PointRelais,
        ShippingService::Domicile,
    ];

    /// Returns the stored tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ShippingService::Locker => "Locker",
            ShippingService::PointRelais => "PointRelais",
            ShippingService::Domicile => "Domicile",
        }
    }
}

impl fmt::Display for ShippingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingService {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "locker" => Ok(ShippingService::Locker),
            "pointrelais" | "point_relais" | "point-relais" | "relais" => {
                Ok(ShippingService::PointRelais)
            }
            "domicile" => Ok(ShippingService::Domicile),
            _ => Err(CoreError::UnknownShippingService(s.trim().to_string())),
        }
    }
}

// =============================================================================
// Shipping Tariff
// =============================================================================

/// One weight band of a carrier's rate card.
///
/// `max_weight` is an inclusive upper bound in grams: a 250 g parcel falls
/// in the `≤ 250` band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingTariff {
    pub service: ShippingService,

    /// Inclusive upper bound, in grams.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub max_weight: f64,

    /// What the carrier charges the workshop.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost: f64,

    /// What the customer is charged.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
}

impl ShippingTariff {
    /// Creates a tariff band.
    pub const fn new(service: ShippingService, max_weight: f64, cost: f64, price: f64) -> Self {
        ShippingTariff {
            service,
            max_weight,
            cost,
            price,
        }
    }
}

// =============================================================================
// Sale Channel
// =============================================================================

/// Where a product is sold. Each channel has its own profit model.
///
/// ```text
/// Internet ── carrier shipping, card fees, charges on VAT-extracted turnover
/// Home     ── hand delivered, card fees, charges on VAT-extracted turnover
/// Depot    ── consignment, commission, charges on the pre-tax price
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SaleChannel {
    #[default]
    #[serde(rename = "internet")]
    Internet,
    #[serde(rename = "domicile")]
    Home,
    #[serde(rename = "depot")]
    Depot,
}

impl SaleChannel {
    /// Returns the stored tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleChannel::Internet => "internet",
            SaleChannel::Home => "domicile",
            SaleChannel::Depot => "depot",
        }
    }

    /// Only internet orders go through a carrier.
    pub const fn uses_carrier(&self) -> bool {
        matches!(self, SaleChannel::Internet)
    }
}

impl fmt::Display for SaleChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaleChannel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internet" | "web" | "online" => Ok(SaleChannel::Internet),
            "domicile" | "home" => Ok(SaleChannel::Home),
            "depot" | "dépôt" | "consignment" => Ok(SaleChannel::Depot),
            _ => Err(CoreError::UnknownSaleChannel(s.trim().to_string())),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
