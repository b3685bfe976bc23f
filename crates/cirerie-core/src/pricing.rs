//! # Channel Profit Models
//!
//! Turns a bill of materials plus pricing parameters into unit economics for
//! one sale channel.
//!
//! ## Shared Pipeline, Three Endings
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  recipe ──► aggregate ──► productCost, product weight                   │
//! │  packaging ► aggregate ──► packagingCost, packaging weight              │
//! │                                                                         │
//! │  priceHT  = productCost × marginMultiplier                              │
//! │  priceTTC = priceHT × (1 + vat)                                         │
//! │                                                                         │
//! │        ┌──────────────────┬──────────────────┬──────────────────┐       │
//! │        │ INTERNET         │ HOME (domicile)  │ DEPOT            │       │
//! │        ├──────────────────┼──────────────────┼──────────────────┤       │
//! │ client │ TTC + shipping   │ TTC              │ TTC              │       │
//! │ fees   │ client × fee     │ client × fee     │ none             │       │
//! │ comm.  │ none             │ none             │ TTC × commission │       │
//! │ charges│ client/(1+vat)×c │ client/(1+vat)×c │ HT × c           │       │
//! │ extra  │ box, consumables,│                  │                  │       │
//! │        │ carrier cost     │                  │                  │       │
//! │        └──────────────────┴──────────────────┴──────────────────┘       │
//! │                                                                         │
//! │  profit = client price − (costs + fees + commission + charges + extra)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Depot charges are computed from the pre-tax price while the other two
//! channels compute them from a VAT-extracted client price. The workshop's
//! accounting has always done it this way; the asymmetry is kept on purpose
//! and pinned by `test_depot_charges_use_pre_tax_price`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::materials::{aggregate, Aggregate};
use crate::parse::PricingParameters;
use crate::shipping::{resolve_tariff, ShippingQuote};
use crate::types::{MaterialLine, SaleChannel, ShippingService, ShippingTariff};

// =============================================================================
// Inputs
// =============================================================================

/// Everything one calculation needs. Assembled fresh for every recalculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CostInputs {
    /// Raw components of one product.
    #[serde(default)]
    pub recipe: Vec<MaterialLine>,

    /// Product packaging (jar, lid, label, ...).
    #[serde(default)]
    pub packaging: Vec<MaterialLine>,

    /// Carrier rate cards, all services mixed.
    #[serde(default)]
    pub shipping_tariffs: Vec<ShippingTariff>,

    /// Cardboard box used for internet parcels.
    #[serde(default)]
    pub shipping_box: Option<MaterialLine>,

    /// Filling, tape, bubble wrap, ... used for internet parcels.
    #[serde(default)]
    pub shipping_consumables: Vec<MaterialLine>,

    /// Scalar knobs: channel, service, margin and rates.
    #[serde(default)]
    pub parameters: PricingParameters,
}

impl CostInputs {
    /// Returns a copy of these inputs targeting another channel.
    pub fn with_channel(&self, channel: SaleChannel) -> Self {
        let mut inputs = self.clone();
        inputs.parameters.channel = channel;
        inputs
    }
}

// =============================================================================
// Result
// =============================================================================

/// Unit economics of one product on one channel.
///
/// Channel-specific fields are zero where they do not apply: a depot result
/// never has transaction fees or shipping, internet and home results never
/// have a commission.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CostResult {
    pub channel: SaleChannel,
    /// Carrier service, internet results only.
    pub shipping_service: Option<ShippingService>,

    pub product_cost: f64,
    pub packaging_cost: f64,
    /// Recipe + packaging weight of one product, in grams.
    pub product_weight: f64,

    #[serde(rename = "productPriceHT")]
    pub product_price_ht: f64,
    #[serde(rename = "productPriceTTC")]
    pub product_price_ttc: f64,
    /// Total invoiced to the customer, shipping included.
    pub final_client_price: f64,
    /// Turnover the business charges are based on.
    #[serde(rename = "turnoverExVAT")]
    pub turnover_ex_vat: f64,

    pub transaction_fees: f64,
    pub business_charges: f64,
    pub commission_amount: f64,

    pub shipping_provider_cost: f64,
    pub shipping_customer_price: f64,
    /// Upper bound of the tariff band used; `None` when no band applied.
    pub shipping_band_max_weight: Option<f64>,
    /// Parcel weight (internet) or product weight (other channels), in grams.
    pub final_package_weight: f64,
    pub shipping_box_cost: f64,
    pub shipping_consumables_cost: f64,

    pub total_expenses: f64,
    pub final_profit: f64,
    /// `final_profit / final_client_price`, zero when nothing is invoiced.
    pub margin_rate: f64,
}

impl CostResult {
    /// True when an internet result found no tariff band for its parcel.
    ///
    /// Such a result shows zero shipping because no shipping model applies,
    /// not because shipping is free.
    pub fn is_missing_shipping_band(&self) -> bool {
        self.channel.uses_carrier() && self.shipping_band_max_weight.is_none()
    }

    fn finish(mut self) -> Self {
        self.final_profit = self.final_client_price - self.total_expenses;
        self.margin_rate = if self.final_client_price != 0.0 {
            self.final_profit / self.final_client_price
        } else {
            0.0
        };
        self
    }
}

// =============================================================================
// Shared Base
// =============================================================================

/// The part every channel computes identically.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BaseCosts {
    pub product: Aggregate,
    pub packaging: Aggregate,
    pub price_ht: f64,
    pub price_ttc: f64,
}

impl BaseCosts {
    pub(crate) fn new(inputs: &CostInputs) -> Self {
        let product = aggregate(&inputs.recipe);
        let packaging = aggregate(&inputs.packaging);
        let params = &inputs.parameters;

        let price_ht = product.cost * params.margin_multiplier;
        let price_ttc = params.vat_rate.add_to(price_ht);

        BaseCosts {
            product,
            packaging,
            price_ht,
            price_ttc,
        }
    }

    fn product_weight(&self) -> f64 {
        self.product.weight + self.packaging.weight
    }

    fn seed(&self, channel: SaleChannel) -> CostResult {
        CostResult {
            channel,
            product_cost: self.product.cost,
            packaging_cost: self.packaging.cost,
            product_weight: self.product_weight(),
            product_price_ht: self.price_ht,
            product_price_ttc: self.price_ttc,
            final_package_weight: self.product_weight(),
            ..CostResult::default()
        }
    }
}

/// Box and consumables of an internet parcel.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParcelExtras {
    pub shipping_box: Aggregate,
    pub consumables: Aggregate,
}

impl ParcelExtras {
    pub(crate) fn new(inputs: &CostInputs) -> Self {
        ParcelExtras {
            shipping_box: aggregate(inputs.shipping_box.iter()),
            consumables: aggregate(&inputs.shipping_consumables),
        }
    }

    pub(crate) fn weight(&self) -> f64 {
        self.shipping_box.weight + self.consumables.weight
    }
}

// =============================================================================
// Channel Models
// =============================================================================

/// Computes the result for the channel named in `inputs.parameters`.
///
/// Internet results use `inputs.parameters.shipping_service`.
///
/// ## Example
/// ```rust
/// use cirerie_core::money::Percentage;
/// use cirerie_core::pricing::{compute_cost, CostInputs};
/// use cirerie_core::types::{MaterialLine, SaleChannel};
///
/// let mut inputs = CostInputs::default();
/// inputs.recipe.push(MaterialLine::piece("Bougie nue", 5.0, 1.0, 200.0));
/// inputs.packaging.push(MaterialLine::piece("Pot", 1.0, 1.0, 150.0));
/// inputs.parameters.channel = SaleChannel::Depot;
/// inputs.parameters.margin_multiplier = 4.0;
/// inputs.parameters.depot_commission_rate = Percentage::new(30.0);
///
/// let result = compute_cost(&inputs);
/// assert!((result.final_profit - 5.32).abs() < 1e-9);
/// ```
pub fn compute_cost(inputs: &CostInputs) -> CostResult {
    match inputs.parameters.channel {
        SaleChannel::Internet => compute_internet(inputs, inputs.parameters.shipping_service),
        SaleChannel::Home => compute_home(inputs),
        SaleChannel::Depot => compute_depot(inputs),
    }
}

/// Internet sale shipped with `service`.
pub fn compute_internet(inputs: &CostInputs, service: ShippingService) -> CostResult {
    let base = BaseCosts::new(inputs);
    let extras = ParcelExtras::new(inputs);
    let parcel_weight = base.product_weight() + extras.weight();
    let quote = resolve_tariff(&inputs.shipping_tariffs, service, parcel_weight);

    internet_result(inputs, &base, &extras, service, quote)
}

/// Internet model once the parcel has been quoted.
pub(crate) fn internet_result(
    inputs: &CostInputs,
    base: &BaseCosts,
    extras: &ParcelExtras,
    service: ShippingService,
    quote: ShippingQuote,
) -> CostResult {
    let params = &inputs.parameters;
    let mut result = base.seed(SaleChannel::Internet);

    result.shipping_service = Some(service);
    result.final_package_weight = base.product_weight() + extras.weight();
    result.shipping_box_cost = extras.shipping_box.cost;
    result.shipping_consumables_cost = extras.consumables.cost;
    result.shipping_provider_cost = quote.cost;
    result.shipping_customer_price = quote.price;
    result.shipping_band_max_weight = quote.band_max_weight;

    result.final_client_price = base.price_ttc + quote.price;
    result.transaction_fees = params.transaction_fee_rate.of(result.final_client_price);
    result.turnover_ex_vat = params.vat_rate.remove_from(result.final_client_price);
    result.business_charges = params.business_charges_rate.of(result.turnover_ex_vat);

    result.total_expenses = base.product.cost
        + base.packaging.cost
        + result.shipping_box_cost
        + result.shipping_consumables_cost
        + result.shipping_provider_cost
        + result.transaction_fees
        + result.business_charges;

    result.finish()
}

/// Home delivery: hand delivered, no carrier involved.
pub fn compute_home(inputs: &CostInputs) -> CostResult {
    home_result(inputs, &BaseCosts::new(inputs))
}

pub(crate) fn home_result(inputs: &CostInputs, base: &BaseCosts) -> CostResult {
    let params = &inputs.parameters;
    let mut result = base.seed(SaleChannel::Home);

    result.final_client_price = base.price_ttc;
    result.transaction_fees = params.transaction_fee_rate.of(result.final_client_price);
    result.turnover_ex_vat = params.vat_rate.remove_from(result.final_client_price);
    result.business_charges = params.business_charges_rate.of(result.turnover_ex_vat);

    result.total_expenses = base.product.cost
        + base.packaging.cost
        + result.transaction_fees
        + result.business_charges;

    result.finish()
}

/// Consignment depot: the host keeps a commission, no card fees.
pub fn compute_depot(inputs: &CostInputs) -> CostResult {
    depot_result(inputs, &BaseCosts::new(inputs))
}

pub(crate) fn depot_result(inputs: &CostInputs, base: &BaseCosts) -> CostResult {
    let params = &inputs.parameters;
    let mut result = base.seed(SaleChannel::Depot);

    result.final_client_price = base.price_ttc;
    result.commission_amount = params.depot_commission_rate.of(base.price_ttc);
    result.turnover_ex_vat = base.price_ht;
    result.business_charges = params.business_charges_rate.of(base.price_ht);

    result.total_expenses = base.product.cost
        + base.packaging.cost
        + result.commission_amount
        + result.business_charges;

    result.finish()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Percentage;
    use crate::types::PurchaseUnit;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    /// Product cost 4 (200 g), packaging 1 (100 g), box 0.5 (50 g),
    /// consumables 0.2 (10 g): a 360 g parcel.
    fn internet_inputs() -> CostInputs {
        CostInputs {
            recipe: vec![
                MaterialLine::new("Cire", 0.015, 200.0, PurchaseUnit::Kilogram),
                MaterialLine::piece("Mèche", 1.0, 1.0, 0.0),
            ],
            packaging: vec![MaterialLine::piece("Pot", 1.0, 1.0, 100.0)],
            shipping_tariffs: vec![
                ShippingTariff::new(ShippingService::Locker, 250.0, 3.1, 4.5),
                ShippingTariff::new(ShippingService::Locker, 500.0, 3.6, 5.2),
                ShippingTariff::new(ShippingService::Domicile, 25000.0, 12.0, 15.0),
            ],
            shipping_box: Some(MaterialLine::piece("Carton", 0.5, 1.0, 50.0)),
            shipping_consumables: vec![MaterialLine::new("Papier", 0.02, 10.0, PurchaseUnit::Gram)],
            parameters: PricingParameters {
                channel: SaleChannel::Internet,
                shipping_service: ShippingService::Locker,
                margin_multiplier: 3.0,
                vat_rate: Percentage::new(20.0),
                transaction_fee_rate: Percentage::new(2.0),
                depot_commission_rate: Percentage::new(30.0),
                business_charges_rate: Percentage::new(13.4),
            },
        }
    }

    /// productCost 5, packagingCost 1, margin 4, vat 0, commission 30 %.
    fn depot_inputs() -> CostInputs {
        CostInputs {
            recipe: vec![MaterialLine::piece("Bougie nue", 5.0, 1.0, 200.0)],
            packaging: vec![MaterialLine::piece("Pot", 1.0, 1.0, 150.0)],
            parameters: PricingParameters {
                channel: SaleChannel::Depot,
                margin_multiplier: 4.0,
                vat_rate: Percentage::zero(),
                transaction_fee_rate: Percentage::new(2.0),
                depot_commission_rate: Percentage::new(30.0),
                business_charges_rate: Percentage::new(13.4),
                ..PricingParameters::default()
            },
            ..CostInputs::default()
        }
    }

    #[test]
    fn test_internet_model() {
        let result = compute_cost(&internet_inputs());

        assert_eq!(result.channel, SaleChannel::Internet);
        assert_eq!(result.shipping_service, Some(ShippingService::Locker));
        assert_close(result.product_cost, 4.0);
        assert_close(result.packaging_cost, 1.0);
        assert_close(result.product_weight, 300.0);
        assert_close(result.final_package_weight, 360.0);
        assert_close(result.product_price_ht, 12.0);
        assert_close(result.product_price_ttc, 14.4);
        assert_eq!(result.shipping_band_max_weight, Some(500.0));
        assert_close(result.shipping_provider_cost, 3.6);
        assert_close(result.shipping_customer_price, 5.2);
        assert_close(result.final_client_price, 19.6);
        assert_close(result.transaction_fees, 0.392);
        assert_close(result.turnover_ex_vat, 19.6 / 1.2);
        assert_close(result.business_charges, 19.6 / 1.2 * 0.134);

        let expenses = 4.0 + 1.0 + 0.5 + 0.2 + 3.6 + 0.392 + 19.6 / 1.2 * 0.134;
        assert_close(result.total_expenses, expenses);
        assert_close(result.final_profit, 19.6 - expenses);
        assert_close(result.margin_rate, (19.6 - expenses) / 19.6);
        assert_eq!(result.commission_amount, 0.0);
    }

    #[test]
    fn test_internet_without_qualifying_band() {
        let mut inputs = internet_inputs();
        // 30 kg of wax: heavier than the largest Domicile band (25 kg)
        inputs.recipe = vec![MaterialLine::new("Cire", 0.0002, 30000.0, PurchaseUnit::Gram)];
        inputs.packaging.clear();
        inputs.shipping_box = None;
        inputs.shipping_consumables.clear();

        let result = compute_internet(&inputs, ShippingService::Domicile);

        assert_close(result.final_package_weight, 30000.0);
        assert_eq!(result.shipping_provider_cost, 0.0);
        assert_eq!(result.shipping_customer_price, 0.0);
        assert_eq!(result.final_client_price, result.product_price_ttc);
        assert!(result.is_missing_shipping_band());
    }

    #[test]
    fn test_home_model() {
        let result = compute_cost(&internet_inputs().with_channel(SaleChannel::Home));

        assert_eq!(result.channel, SaleChannel::Home);
        assert_eq!(result.shipping_service, None);
        assert_close(result.final_client_price, 14.4);
        assert_close(result.transaction_fees, 0.288);
        assert_close(result.turnover_ex_vat, 12.0);
        assert_close(result.business_charges, 12.0 * 0.134);
        assert_close(result.total_expenses, 4.0 + 1.0 + 0.288 + 1.608);
        assert_close(result.final_profit, 14.4 - (4.0 + 1.0 + 0.288 + 1.608));
        assert_close(result.final_package_weight, 300.0);

        assert_eq!(result.shipping_provider_cost, 0.0);
        assert_eq!(result.shipping_box_cost, 0.0);
        assert_eq!(result.shipping_consumables_cost, 0.0);
        assert_eq!(result.commission_amount, 0.0);
        assert!(!result.is_missing_shipping_band());
    }

    #[test]
    fn test_depot_model() {
        let result = compute_cost(&depot_inputs());

        assert_close(result.product_price_ht, 20.0);
        assert_close(result.product_price_ttc, 20.0);
        assert_close(result.commission_amount, 6.0);
        assert_close(result.business_charges, 2.68);
        assert_close(result.total_expenses, 14.68);
        assert_close(result.final_profit, 5.32);
        assert_eq!(result.transaction_fees, 0.0);
        assert_eq!(result.shipping_provider_cost, 0.0);
    }

    #[test]
    fn test_depot_charges_use_pre_tax_price() {
        let mut inputs = depot_inputs();
        inputs.parameters.vat_rate = Percentage::new(20.0);

        let result = compute_cost(&inputs);

        // Charges on HT (20), commission on TTC (24)
        assert_close(result.product_price_ttc, 24.0);
        assert_close(result.business_charges, 20.0 * 0.134);
        assert_close(result.commission_amount, 24.0 * 0.3);
        assert_close(result.final_profit, 24.0 - (5.0 + 1.0 + 7.2 + 2.68));
    }

    #[test]
    fn test_channel_exclusivity() {
        for channel in [SaleChannel::Internet, SaleChannel::Home, SaleChannel::Depot] {
            let result = compute_cost(&internet_inputs().with_channel(channel));
            match channel {
                SaleChannel::Depot => assert_eq!(result.transaction_fees, 0.0),
                _ => assert_eq!(result.commission_amount, 0.0),
            }
        }
    }

    #[test]
    fn test_idempotence() {
        let inputs = internet_inputs();
        assert_eq!(compute_cost(&inputs), compute_cost(&inputs));

        let inputs = depot_inputs();
        assert_eq!(compute_cost(&inputs), compute_cost(&inputs));
    }

    #[test]
    fn test_empty_inputs_are_all_zero() {
        let result = compute_cost(&CostInputs::default());
        assert_eq!(result.final_client_price, 0.0);
        assert_eq!(result.final_profit, 0.0);
        assert_eq!(result.margin_rate, 0.0);
        assert!(result.is_missing_shipping_band());
    }

    #[test]
    fn test_inputs_with_text_and_missing_parameters() {
        let inputs: CostInputs = serde_json::from_str(
            r#"{
                "recipe": [{ "name": "Bougie nue", "standardizedPrice": "5", "quantity": 1,
                             "purchaseUnit": "piece", "weightPerPiece": 200 }],
                "parameters": { "channel": "depot", "marginMultiplier": "3,2",
                                "vatRate": "0", "depotCommissionRate": "30" }
            }"#,
        )
        .unwrap();
        assert_eq!(inputs.parameters.margin_multiplier, 3.2);
        assert_eq!(inputs.parameters.business_charges_rate.percent(), 13.4);

        let result = compute_cost(&inputs);
        assert_close(result.product_price_ht, 16.0);
        assert_close(result.commission_amount, 4.8);

        let inputs: CostInputs = serde_json::from_str(r#"{ "parameters": { "marginMultiplier": 3 } }"#).unwrap();
        assert_eq!(inputs.parameters.channel, SaleChannel::Internet);
        assert_eq!(inputs.parameters.margin_multiplier, 3.0);
    }

    #[test]
    fn test_result_uses_stored_field_names() {
        let json = serde_json::to_value(compute_cost(&depot_inputs())).unwrap();
        assert_eq!(json["channel"], "depot");
        assert!(json.get("productPriceTTC").is_some());
        assert!(json.get("productPriceHT").is_some());
        assert!(json.get("productPriceTtc").is_none());
        assert!(json.get("finalProfit").is_some());
    }
}
