//! # Catalog
//!
//! Materials, products and carrier rate cards, as kept by the workshop.
//!
//! ## File Layout
//! ```toml
//! [[materials]]
//! id = "cire-soja"
//! name = "Cire de soja"
//! kind = "ingredient"
//! standardized_price = "0,012"   # per gram
//! purchase_unit = "kg"
//!
//! [[materials]]
//! id = "pot-verre"
//! name = "Pot verre 180 ml"
//! kind = "packaging"
//! standardized_price = 1.2
//! purchase_unit = "piece"
//! weight_per_piece = 160
//!
//! [[products]]
//! id = "vanille"
//! name = "Bougie vanille"
//! margin_multiplier = 3.2         # or target_price_ttc = 24.9
//! shipping_box = "carton-s"
//! recipe = [{ material = "cire-soja", quantity = 180 }]
//! packaging = [{ material = "pot-verre", quantity = 1 }]
//!
//! [[shipping_rates]]
//! service = "Locker"
//! max_weight = 500
//! cost = 3.6
//! price = 5.2
//! ```
//!
//! The same structure, with the same snake_case keys, is accepted as JSON.
//!
//! ## Reference Resolution
//! ```text
//! Product ──► ComponentRef { material, quantity }
//!                 │
//!                 ▼ lookup by id, kind checked
//!             Material ──► MaterialLine (price frozen at resolution time)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use cirerie_core::materials::aggregate;
use cirerie_core::parse::{lenient_f64, lenient_opt_f64};
use cirerie_core::solver::solve_margin_multiplier;
use cirerie_core::validation::{validate_margin_multiplier, validate_material_line, validate_tariffs};
use cirerie_core::{
    CostInputs, MaterialLine, PurchaseUnit, SaleChannel, ShippingService, ShippingTariff,
    ValidationError,
};

use crate::config::PricingConfig;
use crate::error::{CatalogError, CatalogResult};

// =============================================================================
// Materials
// =============================================================================

/// What a material is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Wax, fragrance, wick, dye.
    Ingredient,
    /// Jar, lid, label.
    Packaging,
    /// Cardboard box for internet parcels.
    ShippingBox,
    /// Filling, tape, bubble wrap.
    ShippingConsumable,
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialKind::Ingredient => write!(f, "ingredient"),
            MaterialKind::Packaging => write!(f, "packaging"),
            MaterialKind::ShippingBox => write!(f, "shipping_box"),
            MaterialKind::ShippingConsumable => write!(f, "shipping_consumable"),
        }
    }
}

/// A purchasable material with its standardized price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub kind: MaterialKind,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub standardized_price: f64,

    #[serde(default)]
    pub purchase_unit: PurchaseUnit,

    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub density: Option<f64>,

    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub weight_per_piece: Option<f64>,
}

impl Material {
    /// Freezes this material into a line consuming `quantity` units.
    pub fn line(&self, quantity: f64) -> MaterialLine {
        MaterialLine {
            name: self.name.clone(),
            standardized_price: self.standardized_price,
            quantity,
            purchase_unit: self.purchase_unit,
            density: self.density,
            weight_per_piece: self.weight_per_piece,
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// A material used by a product, by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRef {
    pub material: String,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantity: f64,
}

/// A product recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub recipe: Vec<ComponentRef>,

    #[serde(default)]
    pub packaging: Vec<ComponentRef>,

    /// Overrides the configured default multiplier.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub margin_multiplier: Option<f64>,

    /// Desired retail price; wins over `margin_multiplier` when solvable.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub target_price_ttc: Option<f64>,

    #[serde(default)]
    pub shipping_box: Option<String>,

    #[serde(default)]
    pub consumables: Vec<ComponentRef>,
}

/// One band of a carrier rate card, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShippingRate {
    pub service: ShippingService,

    #[serde(deserialize_with = "lenient_f64")]
    pub max_weight: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
}

impl From<&ShippingRate> for ShippingTariff {
    fn from(rate: &ShippingRate) -> Self {
        ShippingTariff::new(rate.service, rate.max_weight, rate.cost, rate.price)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Everything the workshop prices its products from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub materials: Vec<Material>,

    #[serde(default)]
    pub products: Vec<Product>,

    #[serde(default)]
    pub shipping_rates: Vec<ShippingRate>,
}

impl Catalog {
    /// Loads a catalog file. The extension picks the format.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents)?,
            Some("json") => Self::from_json_str(&contents)?,
            _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        };

        info!(
            ?path,
            materials = catalog.materials.len(),
            products = catalog.products.len(),
            shipping_rates = catalog.shipping_rates.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Parses a TOML catalog.
    pub fn from_toml_str(contents: &str) -> CatalogResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Parses a JSON catalog.
    pub fn from_json_str(contents: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Finds a product by id.
    pub fn product(&self, id: &str) -> CatalogResult<&Product> {
        self.products
            .iter()
            .find(|product| product.id == id)
            .ok_or_else(|| CatalogError::UnknownProduct(id.to_string()))
    }

    /// Finds a material by id, checking it is of the expected kind.
    pub fn material(
        &self,
        product_id: &str,
        material_id: &str,
        expected: MaterialKind,
    ) -> CatalogResult<&Material> {
        let material = self
            .materials
            .iter()
            .find(|material| material.id == material_id)
            .ok_or_else(|| CatalogError::UnknownMaterial {
                product: product_id.to_string(),
                material: material_id.to_string(),
            })?;

        if material.kind != expected {
            return Err(CatalogError::WrongMaterialKind {
                material: material_id.to_string(),
                expected,
                actual: material.kind,
            });
        }
        Ok(material)
    }

    /// Resolves a list of references into material lines.
    pub fn lines(
        &self,
        product_id: &str,
        components: &[ComponentRef],
        expected: MaterialKind,
    ) -> CatalogResult<Vec<MaterialLine>> {
        components
            .iter()
            .map(|component| {
                self.material(product_id, &component.material, expected)
                    .map(|material| material.line(component.quantity))
            })
            .collect()
    }

    /// The rate card in engine form.
    pub fn tariffs(&self) -> Vec<ShippingTariff> {
        self.shipping_rates.iter().map(ShippingTariff::from).collect()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Checks every material, product and rate.
    ///
    /// ## Rules
    /// - Material and product ids are non-empty and unique
    /// - Material prices, densities and piece weights pass line validation
    /// - Product references exist and point at the right kind of material
    /// - Quantities are not negative, multipliers are not negative
    /// - Rate cards have no duplicate band per service
    pub fn validate(&self) -> CatalogResult<()> {
        let mut material_ids = HashSet::new();
        for material in &self.materials {
            if material.id.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "material id".to_string(),
                }
                .into());
            }
            if !material_ids.insert(material.id.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "material id".to_string(),
                    value: material.id.clone(),
                }
                .into());
            }
            validate_material_line(&material.line(1.0))?;
        }

        let mut product_ids = HashSet::new();
        for product in &self.products {
            if product.id.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "product id".to_string(),
                }
                .into());
            }
            if !product_ids.insert(product.id.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "product id".to_string(),
                    value: product.id.clone(),
                }
                .into());
            }
            self.validate_product(product)?;
        }

        validate_tariffs(&self.tariffs())?;

        debug!(
            materials = self.materials.len(),
            products = self.products.len(),
            "Catalog validated"
        );
        Ok(())
    }

    fn validate_product(&self, product: &Product) -> CatalogResult<()> {
        let groups = [
            (&product.recipe, MaterialKind::Ingredient),
            (&product.packaging, MaterialKind::Packaging),
            (&product.consumables, MaterialKind::ShippingConsumable),
        ];
        for (components, kind) in groups {
            for line in self.lines(&product.id, components, kind)? {
                if line.quantity < 0.0 {
                    return Err(ValidationError::MustNotBeNegative {
                        field: format!("quantity of {} in {}", line.name, product.id),
                    }
                    .into());
                }
            }
        }

        if let Some(box_id) = &product.shipping_box {
            self.material(&product.id, box_id, MaterialKind::ShippingBox)?;
        }
        if let Some(multiplier) = product.margin_multiplier {
            validate_margin_multiplier(multiplier)?;
        }
        Ok(())
    }

    // =========================================================================
    // Engine Inputs
    // =========================================================================

    /// Resolves a product into engine inputs, with today's catalog prices.
    ///
    /// ## Multiplier Resolution
    /// ```text
    /// target_price_ttc set and solvable ──► solved multiplier
    /// else margin_multiplier set        ──► product multiplier
    /// else                              ──► configured default
    /// ```
    pub fn cost_inputs(
        &self,
        product_id: &str,
        config: &PricingConfig,
        channel: SaleChannel,
    ) -> CatalogResult<CostInputs> {
        let product = self.product(product_id)?;

        let recipe = self.lines(&product.id, &product.recipe, MaterialKind::Ingredient)?;
        let packaging = self.lines(&product.id, &product.packaging, MaterialKind::Packaging)?;
        let shipping_consumables = self.lines(
            &product.id,
            &product.consumables,
            MaterialKind::ShippingConsumable,
        )?;
        let shipping_box = product
            .shipping_box
            .as_deref()
            .map(|box_id| {
                self.material(&product.id, box_id, MaterialKind::ShippingBox)
                    .map(|material| material.line(1.0))
            })
            .transpose()?;

        let mut parameters = config.parameters(channel);
        parameters.margin_multiplier = product
            .margin_multiplier
            .unwrap_or(config.defaults.margin_multiplier);

        if let Some(target) = product.target_price_ttc {
            let product_cost = aggregate(&recipe).cost;
            match solve_margin_multiplier(target, product_cost, parameters.vat_rate) {
                Some(multiplier) => {
                    debug!(product = %product.id, target, multiplier, "Multiplier solved from target price");
                    parameters.margin_multiplier = multiplier;
                }
                None => debug!(product = %product.id, target, "Target price not solvable, keeping multiplier"),
            }
        }

        Ok(CostInputs {
            recipe,
            packaging,
            shipping_tariffs: self.tariffs(),
            shipping_box,
            shipping_consumables,
            parameters,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
