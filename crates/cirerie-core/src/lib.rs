//! # cirerie-core: Cost Engine for a Candle Workshop
//!
//! Works out what a handmade candle costs, what it sells for and what the
//! workshop keeps, on every channel it is sold through. Pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cirerie Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Web front end (product sheet)                   │   │
//! │  │   recipe editor ──► channel tabs ──► target price ──► save      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON (camelCase)                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               cirerie-catalog (files, config, CLI)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cirerie-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌───────────┐       │   │
//! │  │  │ materials │ │ shipping  │ │  pricing  │ │  solver   │       │   │
//! │  │  │ cost and  │ │ weight    │ │ internet  │ │ TTC → ×   │       │   │
//! │  │  │ weight    │ │ bands     │ │ home/depot│ │           │       │   │
//! │  │  └───────────┘ └───────────┘ └───────────┘ └───────────┘       │   │
//! │  │  ┌───────────┐ ┌───────────┐ ┌───────────┐                     │   │
//! │  │  │   batch   │ │ promotion │ │ snapshot  │                     │   │
//! │  │  │ 5 variants│ │ shipments │ │ saved     │                     │   │
//! │  │  └───────────┘ └───────────┘ └───────────┘                     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO LOGGING • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Material lines, tariffs, channels and services
//! - [`money`] - Percentages and cent-rounded display amounts
//! - [`parse`] - Lenient number parsing and pricing parameters
//! - [`validation`] - Strict checks for stored catalog data
//! - [`materials`] - Cost and weight aggregation
//! - [`shipping`] - Weight-banded tariff resolution
//! - [`pricing`] - Internet, home and depot profit models
//! - [`solver`] - Margin multiplier from a target price
//! - [`batch`] - Every channel variant at once
//! - [`promotion`] - Whole-order simulation with promotions
//! - [`snapshot`] - Saved products
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Never Fails**: cost computations always return a result; bad numbers
//!    become zero at the parsing boundary
//! 2. **No I/O**: file system, network and clock access are FORBIDDEN here
//! 3. **Full Precision**: `f64` throughout, rounding only when displaying
//! 4. **Fresh Inputs**: every calculation is a function of its inputs only
//!
//! ## Example Usage
//!
//! ```rust
//! use cirerie_core::{compute_cost, CostInputs, MaterialLine, PurchaseUnit};
//! use cirerie_core::money::Percentage;
//! use cirerie_core::SaleChannel;
//!
//! let mut inputs = CostInputs::default();
//! inputs.recipe.push(MaterialLine::new("Cire de soja", 0.02, 200.0, PurchaseUnit::Kilogram));
//! inputs.parameters.channel = SaleChannel::Depot;
//! inputs.parameters.margin_multiplier = 3.0;
//! inputs.parameters.vat_rate = Percentage::new(20.0);
//!
//! let result = compute_cost(&inputs);
//! assert!((result.product_price_ttc - 14.4).abs() < 1e-9);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod batch;
pub mod error;
pub mod materials;
pub mod money;
pub mod parse;
pub mod pricing;
pub mod promotion;
pub mod shipping;
pub mod snapshot;
pub mod solver;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use batch::{compute_all_channels, ResultsByMode};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Percentage};
pub use parse::{PricingParameters, RawPricingParameters};
pub use pricing::{compute_cost, CostInputs, CostResult};
pub use promotion::{simulate_shipment, ShipmentInputs, ShipmentResult};
pub use snapshot::ProductSnapshot;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Turnover-based social contributions of a French micro-enterprise selling
/// goods, in percent.
///
/// Applied when a form leaves the rate empty.
pub const DEFAULT_BUSINESS_CHARGES_RATE: f64 = 13.4;
