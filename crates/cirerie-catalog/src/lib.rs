//! # cirerie-catalog: Catalog Files, Configuration and Snapshots
//!
//! The outer layer around [`cirerie_core`]. It reads the workshop's catalog,
//! layers pricing configuration, and turns both into engine inputs.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        cirerie-catalog                                  │
//! │                                                                         │
//! │  catalog.toml ──► Catalog ──┐                                           │
//! │                             ├──► CostInputs ──► cirerie-core            │
//! │  pricing.toml ──► PricingConfig ┘        │                              │
//! │  CIRERIE_* env ──┘                       ▼                              │
//! │                               ProductSnapshot (uuid, now)               │
//! │                               ShipmentResult                            │
//! │                                                                         │
//! │  Logging: tracing (the core crate never logs)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Materials, products, rate cards and reference resolution
//! - [`config`] - Pricing configuration (file + environment)
//! - [`snapshots`] - Product snapshots and recomputation
//! - [`simulate`] - Whole-order simulation from catalog ids
//! - [`error`] - Catalog error types

pub mod catalog;
pub mod config;
pub mod error;
pub mod simulate;
pub mod snapshots;

#[cfg(test)]
mod fixtures;

pub use catalog::{Catalog, Material, MaterialKind, Product};
pub use config::PricingConfig;
pub use error::{CatalogError, CatalogResult};
pub use simulate::{simulate, ShipmentRequest};
pub use snapshots::{recompute_snapshot, snapshot_all, snapshot_product};
