//! # Shipment Simulator & Promotions
//!
//! Prices a whole internet order (several products, several units each) and
//! applies the two promotions the shop runs. The per-product calculator in
//! [`crate::pricing`] never applies promotions.
//!
//! ## Promotions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FREE SHIPPING                                                          │
//! │    customer shipping price forced to 0                                  │
//! │    carrier cost unchanged → the margin absorbs it                       │
//! │                                                                         │
//! │  BUY N GET M FREE (per line)                                            │
//! │    bundle     = N + M                                                   │
//! │    free units = floor(quantity / bundle) × M                            │
//! │    discount   = free units × unit TTC price                             │
//! │                                                                         │
//! │    buy 3 get 1, 8 candles at 10 € → 2 free → 20 € off                   │
//! │    buy 0 → promotion disabled                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Order Arithmetic
//! Fees and charges are computed on the discounted total, the same way the
//! internet model computes them for a single product. Free units still
//! consume materials, so their cost stays in the expenses.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::materials::aggregate;
use crate::money::Percentage;
use crate::parse::lenient_count;
use crate::pricing::CostResult;
use crate::shipping::resolve_tariff;
use crate::types::{MaterialLine, ShippingService, ShippingTariff};

// =============================================================================
// Bundle Offer
// =============================================================================

/// A "buy `buy`, get `get` free" offer.
///
/// Counts are read leniently: `buy = -1` or `buy = "x"` reads as 0, which
/// switches the offer off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BundleOffer {
    #[serde(default, deserialize_with = "lenient_count")]
    pub buy: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub get: u32,
}

impl BundleOffer {
    pub const fn new(buy: u32, get: u32) -> Self {
        BundleOffer { buy, get }
    }

    /// An offer with nothing to buy is switched off.
    pub const fn is_active(&self) -> bool {
        self.buy > 0
    }

    /// Units per bundle (`buy + get`).
    pub const fn bundle_size(&self) -> u32 {
        self.buy.saturating_add(self.get)
    }
}

/// Free units earned on a line of `quantity` units.
///
/// ## Example
/// ```rust
/// use cirerie_core::promotion::{bundle_free_units, BundleOffer};
///
/// assert_eq!(bundle_free_units(8, BundleOffer::new(3, 1)), 2);
/// assert_eq!(bundle_free_units(8, BundleOffer::new(0, 1)), 0);
/// ```
pub fn bundle_free_units(quantity: u32, offer: BundleOffer) -> u32 {
    if !offer.is_active() {
        return 0;
    }
    (quantity / offer.bundle_size()).saturating_mul(offer.get)
}

/// Money taken off a line of `quantity` units sold at `unit_price_ttc`.
pub fn bundle_discount(quantity: u32, unit_price_ttc: f64, offer: BundleOffer) -> f64 {
    f64::from(bundle_free_units(quantity, offer)) * unit_price_ttc
}

/// Promotions applied to a simulated shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Customer pays no shipping.
    #[serde(default)]
    pub free_shipping: bool,
    /// Buy-N-get-M offer applied to every line.
    #[serde(default)]
    pub bundle: Option<BundleOffer>,
}

// =============================================================================
// Shipment Inputs
// =============================================================================

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipmentLine {
    pub label: String,
    #[serde(deserialize_with = "lenient_count")]
    pub quantity: u32,
    #[serde(rename = "unitPriceTTC")]
    pub unit_price_ttc: f64,
    pub unit_product_cost: f64,
    pub unit_packaging_cost: f64,
    /// Recipe + packaging weight of one unit, in grams.
    pub unit_weight: f64,
}

impl ShipmentLine {
    /// Builds a line from a product's computed economics.
    ///
    /// Uses the product's TTC price, not its final client price: shipping is
    /// quoted once for the whole parcel.
    pub fn from_result(label: impl Into<String>, result: &CostResult, quantity: u32) -> Self {
        ShipmentLine {
            label: label.into(),
            quantity,
            unit_price_ttc: result.product_price_ttc,
            unit_product_cost: result.product_cost,
            unit_packaging_cost: result.packaging_cost,
            unit_weight: result.product_weight,
        }
    }
}

/// A whole order to simulate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipmentInputs {
    pub lines: Vec<ShipmentLine>,
    pub shipping_service: ShippingService,
    pub shipping_tariffs: Vec<ShippingTariff>,
    pub shipping_box: Option<MaterialLine>,
    pub shipping_consumables: Vec<MaterialLine>,
    pub vat_rate: Percentage,
    pub transaction_fee_rate: Percentage,
    pub business_charges_rate: Percentage,
    pub promotion: Promotion,
}

// =============================================================================
// Shipment Result
// =============================================================================

/// What happened to one line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineOutcome {
    pub label: String,
    pub quantity: u32,
    pub free_units: u32,
    pub gross_revenue: f64,
    pub discount: f64,
    pub net_revenue: f64,
    /// Product + packaging cost of every unit, free ones included.
    pub material_cost: f64,
    pub weight: f64,
}

/// Economics of the whole order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentResult {
    pub lines: Vec<LineOutcome>,

    pub gross_product_revenue: f64,
    pub bundle_discount: f64,
    pub net_product_revenue: f64,
    pub material_cost: f64,

    pub package_weight: f64,
    pub shipping_box_cost: f64,
    pub shipping_consumables_cost: f64,
    pub shipping_provider_cost: f64,
    /// Price the tariff would charge, before any free-shipping promotion.
    pub shipping_tariff_price: f64,
    pub shipping_customer_price: f64,
    pub shipping_band_max_weight: Option<f64>,

    pub final_client_price: f64,
    #[serde(rename = "turnoverExVAT")]
    pub turnover_ex_vat: f64,
    pub transaction_fees: f64,
    pub business_charges: f64,
    pub total_expenses: f64,
    pub final_profit: f64,
}

impl ShipmentResult {
    /// True when the parcel fits no tariff band of the chosen service.
    pub fn is_missing_shipping_band(&self) -> bool {
        self.shipping_band_max_weight.is_none()
    }
}

/// Prices a whole internet order.
///
/// ## Steps
/// ```text
/// 1. per line: gross = q × unit TTC, discount from the bundle offer
/// 2. parcel weight = Σ q × unit weight + box + consumables
/// 3. tariff lookup; free shipping zeroes the customer price only
/// 4. client price = net product revenue + customer shipping price
/// 5. fees on client price, charges on VAT-extracted client price
/// 6. expenses = materials + box + consumables + carrier + fees + charges
/// ```
pub fn simulate_shipment(inputs: &ShipmentInputs) -> ShipmentResult {
    let offer = inputs.promotion.bundle.unwrap_or_default();

    let lines: Vec<LineOutcome> = inputs
        .lines
        .iter()
        .map(|line| {
            let quantity = f64::from(line.quantity);
            let gross_revenue = quantity * line.unit_price_ttc;
            let discount = bundle_discount(line.quantity, line.unit_price_ttc, offer);
            LineOutcome {
                label: line.label.clone(),
                quantity: line.quantity,
                free_units: bundle_free_units(line.quantity, offer),
                gross_revenue,
                discount,
                net_revenue: gross_revenue - discount,
                material_cost: quantity * (line.unit_product_cost + line.unit_packaging_cost),
                weight: (quantity * line.unit_weight).max(0.0),
            }
        })
        .collect();

    let shipping_box = aggregate(inputs.shipping_box.iter());
    let consumables = aggregate(&inputs.shipping_consumables);

    let gross_product_revenue: f64 = lines.iter().map(|l| l.gross_revenue).sum();
    let bundle_discount: f64 = lines.iter().map(|l| l.discount).sum();
    let net_product_revenue = gross_product_revenue - bundle_discount;
    let material_cost: f64 = lines.iter().map(|l| l.material_cost).sum();
    let products_weight: f64 = lines.iter().map(|l| l.weight).sum();
    let package_weight = products_weight + shipping_box.weight + consumables.weight;

    let quote = resolve_tariff(&inputs.shipping_tariffs, inputs.shipping_service, package_weight);
    let shipping_customer_price = if inputs.promotion.free_shipping {
        0.0
    } else {
        quote.price
    };

    let final_client_price = net_product_revenue + shipping_customer_price;
    let transaction_fees = inputs.transaction_fee_rate.of(final_client_price);
    let turnover_ex_vat = inputs.vat_rate.remove_from(final_client_price);
    let business_charges = inputs.business_charges_rate.of(turnover_ex_vat);

    let total_expenses = material_cost
        + shipping_box.cost
        + consumables.cost
        + quote.cost
        + transaction_fees
        + business_charges;

    ShipmentResult {
        lines,
        gross_product_revenue,
        bundle_discount,
        net_product_revenue,
        material_cost,
        package_weight,
        shipping_box_cost: shipping_box.cost,
        shipping_consumables_cost: consumables.cost,
        shipping_provider_cost: quote.cost,
        shipping_tariff_price: quote.price,
        shipping_customer_price,
        shipping_band_max_weight: quote.band_max_weight,
        final_client_price,
        turnover_ex_vat,
        transaction_fees,
        business_charges,
        total_expenses,
        final_profit: final_client_price - total_expenses,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
