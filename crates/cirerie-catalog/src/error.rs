//! # Catalog Error Types
//!
//! Error types for everything that touches files and stored references.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │     Files       │  │   References    │  │     Data rules          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Io             │  │  UnknownProduct │  │  Validation             │ │
//! │  │  Toml / Json    │  │  UnknownMaterial│  │  Core (tariff overlap)  │ │
//! │  │  Unsupported    │  │  WrongKind      │  │  InvalidConfig          │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use cirerie_core::{CoreError, ValidationError};
use thiserror::Error;

use crate::catalog::MaterialKind;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog error type.
#[derive(Debug, Error)]
pub enum CatalogError {
    // =========================================================================
    // File Errors
    // =========================================================================
    /// File could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML document is malformed.
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration could not be written as TOML.
    #[error("Failed to write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// JSON document is malformed.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither `.toml` nor `.json`.
    #[error("Unsupported file format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    // =========================================================================
    // Reference Errors
    // =========================================================================
    /// Product id not found in the catalog.
    #[error("Unknown product: '{0}'")]
    UnknownProduct(String),

    /// A product references a material that does not exist.
    #[error("Product '{product}' references unknown material '{material}'")]
    UnknownMaterial { product: String, material: String },

    /// A material is used where another kind is expected
    /// (e.g., a jar listed in a recipe).
    #[error("Material '{material}' is {actual}, expected {expected}")]
    WrongMaterialKind {
        material: String,
        expected: MaterialKind,
        actual: MaterialKind,
    },

    // =========================================================================
    // Data Errors
    // =========================================================================
    /// Pricing configuration is out of range.
    #[error("Invalid pricing configuration: {0}")]
    InvalidConfig(String),

    /// Engine-level error (tags, tariff table).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Catalog data rule violation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CatalogError {
    /// Returns true if the error points at a broken reference between
    /// products and materials.
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            CatalogError::UnknownProduct(_)
                | CatalogError::UnknownMaterial { .. }
                | CatalogError::WrongMaterialKind { .. }
        )
    }
}
