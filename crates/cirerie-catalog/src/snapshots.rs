//! # Snapshots
//!
//! Saves products: resolves catalog references, computes every channel and
//! stamps the result with a fresh id and the current time.
//!
//! ## Missing Tariff Bands
//! A parcel heavier than every band of a service gets a zero shipping
//! quote. That is easy to mistake for free shipping, so each such variant
//! is logged at WARN with the parcel weight and the heaviest band on file.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use cirerie_core::shipping::TariffTable;
use cirerie_core::{Money, ProductSnapshot, SaleChannel};

use crate::catalog::Catalog;
use crate::config::PricingConfig;
use crate::error::CatalogResult;

/// Captures one product.
pub fn snapshot_product(
    catalog: &Catalog,
    config: &PricingConfig,
    product_id: &str,
) -> CatalogResult<ProductSnapshot> {
    capture(catalog, config, product_id, Uuid::new_v4().to_string())
}

/// Captures every product of the catalog, in catalog order.
pub fn snapshot_all(catalog: &Catalog, config: &PricingConfig) -> CatalogResult<Vec<ProductSnapshot>> {
    let snapshots = catalog
        .products
        .iter()
        .map(|product| snapshot_product(catalog, config, &product.id))
        .collect::<CatalogResult<Vec<_>>>()?;

    info!(count = snapshots.len(), "Snapshots captured");
    Ok(snapshots)
}

/// Recomputes a saved snapshot with today's catalog prices.
///
/// The snapshot keeps its id; lines, results and timestamp are refreshed.
pub fn recompute_snapshot(
    catalog: &Catalog,
    config: &PricingConfig,
    snapshot: &ProductSnapshot,
) -> CatalogResult<ProductSnapshot> {
    capture(catalog, config, &snapshot.product_id, snapshot.id.clone())
}

fn capture(
    catalog: &Catalog,
    config: &PricingConfig,
    product_id: &str,
    id: String,
) -> CatalogResult<ProductSnapshot> {
    let product = catalog.product(product_id)?;
    let inputs = catalog.cost_inputs(product_id, config, SaleChannel::default())?;
    let snapshot = ProductSnapshot::capture(id, &product.id, &product.name, &inputs, Utc::now());

    let missing = snapshot.results_by_mode.services_missing_band();
    if !missing.is_empty() {
        let table = TariffTable::new(&inputs.shipping_tariffs);
        for service in missing {
            let result = snapshot.results_by_mode.internet(service);
            warn!(
                product = %product.id,
                %service,
                weight = result.final_package_weight,
                heaviest_band = ?table.max_weight(service),
                "No shipping tariff band applies; shipping priced at zero"
            );
        }
    }

    info!(
        product = %product.id,
        snapshot = %snapshot.id,
        margin_multiplier = inputs.parameters.margin_multiplier,
        depot_price = %Money::from_amount(snapshot.results_by_mode.depot.product_price_ttc),
        "Product snapshot captured"
    );
    Ok(snapshot)
}
