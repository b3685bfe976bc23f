//! # Shipment Simulation
//!
//! Prices a whole internet order built from catalog products.
//!
//! ## Request Format
//! ```toml
//! shipping_service = "Domicile"   # optional, configured default otherwise
//! shipping_box = "carton-m"       # optional, first product's box otherwise
//! free_shipping = true
//! bundle = { buy = 3, get = 1 }
//!
//! [[items]]
//! product = "vanille"
//! quantity = 8
//! ```
//!
//! Consumables default to the first product's when the request lists none.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use cirerie_core::parse::lenient_count;
use cirerie_core::promotion::{BundleOffer, Promotion, ShipmentLine};
use cirerie_core::shipping::TariffTable;
use cirerie_core::{
    compute_cost, simulate_shipment, MaterialLine, Money, Percentage, SaleChannel, ShipmentInputs,
    ShipmentResult, ShippingService, ValidationError,
};

use crate::catalog::{Catalog, ComponentRef, MaterialKind};
use crate::config::PricingConfig;
use crate::error::{CatalogError, CatalogResult};

/// One product line of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    pub product: String,

    /// Read like any count: `"8"` is 8, a negative or unreadable value is 0.
    #[serde(default, deserialize_with = "lenient_count")]
    pub quantity: u32,
}

/// An order to simulate, referencing catalog ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    #[serde(default)]
    pub items: Vec<RequestItem>,

    #[serde(default)]
    pub shipping_service: Option<ShippingService>,

    #[serde(default)]
    pub shipping_box: Option<String>,

    #[serde(default)]
    pub consumables: Vec<ComponentRef>,

    #[serde(default)]
    pub free_shipping: bool,

    #[serde(default)]
    pub bundle: Option<BundleOffer>,
}

impl ShipmentRequest {
    /// Loads a request file. The extension picks the format.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&contents)?),
            Some("json") => Ok(serde_json::from_str(&contents)?),
            _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// The promotions requested.
    pub fn promotion(&self) -> Promotion {
        Promotion {
            free_shipping: self.free_shipping,
            bundle: self.bundle,
        }
    }
}

/// Resolves a request against the catalog and simulates it.
pub fn simulate(
    catalog: &Catalog,
    config: &PricingConfig,
    request: &ShipmentRequest,
) -> CatalogResult<ShipmentResult> {
    let inputs = shipment_inputs(catalog, config, request)?;
    let result = simulate_shipment(&inputs);

    if result.is_missing_shipping_band() {
        let table = TariffTable::new(&inputs.shipping_tariffs);
        warn!(
            service = %inputs.shipping_service,
            weight = result.package_weight,
            heaviest_band = ?table.max_weight(inputs.shipping_service),
            "No shipping tariff band applies; shipping priced at zero"
        );
    }

    info!(
        lines = result.lines.len(),
        client_price = %Money::from_amount(result.final_client_price),
        profit = %Money::from_amount(result.final_profit),
        "Shipment simulated"
    );
    Ok(result)
}

/// Builds the engine inputs of a request.
pub fn shipment_inputs(
    catalog: &Catalog,
    config: &PricingConfig,
    request: &ShipmentRequest,
) -> CatalogResult<ShipmentInputs> {
    let Some(first) = request.items.first() else {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        }
        .into());
    };
    let first_product = catalog.product(&first.product)?;

    let mut lines = Vec::with_capacity(request.items.len());
    for item in &request.items {
        if item.quantity == 0 {
            return Err(ValidationError::MustBePositive {
                field: format!("quantity of {}", item.product),
            }
            .into());
        }
        let product = catalog.product(&item.product)?;
        let inputs = catalog.cost_inputs(&item.product, config, SaleChannel::Internet)?;
        let result = compute_cost(&inputs);
        lines.push(ShipmentLine::from_result(&product.name, &result, item.quantity));
    }

    let box_id = request
        .shipping_box
        .as_deref()
        .or(first_product.shipping_box.as_deref());
    let shipping_box: Option<MaterialLine> = box_id
        .map(|id| {
            catalog
                .material(&first_product.id, id, MaterialKind::ShippingBox)
                .map(|material| material.line(1.0))
        })
        .transpose()?;

    let consumables = if request.consumables.is_empty() {
        &first_product.consumables
    } else {
        &request.consumables
    };
    let shipping_consumables =
        catalog.lines(&first_product.id, consumables, MaterialKind::ShippingConsumable)?;

    Ok(ShipmentInputs {
        lines,
        shipping_service: request
            .shipping_service
            .unwrap_or(config.defaults.shipping_service),
        shipping_tariffs: catalog.tariffs(),
        shipping_box,
        shipping_consumables,
        vat_rate: config.vat_rate(),
        transaction_fee_rate: Percentage::new(config.rates.transaction_fee),
        business_charges_rate: Percentage::new(config.rates.business_charges),
        promotion: request.promotion(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::CATALOG;

    fn catalog() -> Catalog {
        Catalog::from_toml_str(CATALOG).unwrap()
    }

    fn request(quantity: u32) -> ShipmentRequest {
        toml::from_str(&format!(
            r#"
            [[items]]
            product = "vanille"
            quantity = {quantity}
            "#
        ))
        .unwrap()
    }

    #[test]
    fn test_inputs_use_first_product_box() {
        let inputs = shipment_inputs(&catalog(), &PricingConfig::default(), &request(1)).unwrap();
        assert_eq!(inputs.lines[0].label, "Bougie vanille");
        assert_eq!(inputs.shipping_box.as_ref().map(|b| b.name.as_str()), Some("Carton S"));
        assert_eq!(inputs.shipping_consumables.len(), 1);
        assert_eq!(inputs.shipping_service, ShippingService::Locker);
    }

    #[test]
    fn test_single_candle_matches_internet_model() {
        let catalog = catalog();
        let config = PricingConfig::default();
        let simulated = simulate(&catalog, &config, &request(1)).unwrap();

        let inputs = catalog.cost_inputs("vanille", &config, SaleChannel::Internet).unwrap();
        let single = compute_cost(&inputs);

        assert!((simulated.final_client_price - single.final_client_price).abs() < 1e-9);
        assert!((simulated.final_profit - single.final_profit).abs() < 1e-9);
    }

    #[test]
    fn test_promotions_from_request() {
        let mut request = request(2);
        request.free_shipping = true;
        request.bundle = Some(BundleOffer::new(1, 1));

        let result = simulate(&catalog(), &PricingConfig::default(), &request).unwrap();
        assert_eq!(result.lines[0].free_units, 1);
        assert_eq!(result.shipping_customer_price, 0.0);
        assert!(result.shipping_provider_cost > 0.0);
    }

    #[test]
    fn test_empty_and_zero_quantity_requests_are_rejected() {
        let catalog = catalog();
        let config = PricingConfig::default();
        assert!(simulate(&catalog, &config, &ShipmentRequest::default()).is_err());
        assert!(matches!(
            simulate(&catalog, &config, &request(0)),
            Err(CatalogError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }

    #[test]
    fn test_counts_in_request_are_lenient() {
        let request: ShipmentRequest = toml::from_str(
            r#"
            bundle = { buy = -1, get = 1 }

            [[items]]
            product = "vanille"
            quantity = "2"
            "#,
        )
        .unwrap();
        assert_eq!(request.items[0].quantity, 2);
        assert_eq!(request.bundle, Some(BundleOffer::new(0, 1)));

        let result = simulate(&catalog(), &PricingConfig::default(), &request).unwrap();
        assert_eq!(result.lines[0].quantity, 2);
        assert_eq!(result.lines[0].free_units, 0);
        assert_eq!(result.bundle_discount, 0.0);
    }

    #[test]
    fn test_json_request_quantity_as_text() {
        let request: ShipmentRequest =
            serde_json::from_str(r#"{ "items": [{ "product": "vanille", "quantity": "8" }] }"#).unwrap();
        assert_eq!(request.items[0].quantity, 8);
    }

    #[test]
    fn test_unknown_product_in_request() {
        let mut request = request(1);
        request.items[0].product = "lavande".to_string();
        assert!(matches!(
            simulate(&catalog(), &PricingConfig::default(), &request),
            Err(CatalogError::UnknownProduct(_))
        ));
    }
}
