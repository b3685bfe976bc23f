//! # Error Types
//!
//! Domain-specific error types for cirerie-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cirerie-core errors (this file)                                       │
//! │  ├── CoreError        - Boundary errors (tags, tariff tables)          │
//! │  └── ValidationError  - Catalog data rule violations                   │
//! │                                                                         │
//! │  cirerie-catalog errors (separate crate)                               │
//! │  └── CatalogError     - File, format and reference failures            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CatalogError → CLI exit message   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Never Errors
//! The cost computations themselves ([`crate::pricing`], [`crate::shipping`],
//! [`crate::solver`], [`crate::promotion`]) never return an error. Malformed
//! numbers degrade to zero at the parsing boundary, see [`crate::parse`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised at the edges of the engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Sale channel tag is not one of `internet`, `domicile`, `depot`.
    #[error("Unknown sale channel: '{0}'. Valid options: internet, domicile, depot")]
    UnknownSaleChannel(String),

    /// Shipping service tag is not one of `Locker`, `PointRelais`, `Domicile`.
    #[error("Unknown shipping service: '{0}'. Valid options: Locker, PointRelais, Domicile")]
    UnknownShippingService(String),

    /// Purchase unit is not one of `kg`, `g`, `L`, `ml`, `piece`.
    #[error("Unknown purchase unit: '{0}'. Valid options: kg, g, L, ml, piece")]
    UnknownPurchaseUnit(String),

    /// Two bands of the same service share an upper bound.
    ///
    /// ## When This Occurs
    /// ```text
    /// Locker  ≤ 250 g  → 3.10
    /// Locker  ≤ 250 g  → 3.40   ← which one applies? Rejected.
    /// ```
    #[error("Overlapping tariff bands for {service}: max weight {max_weight} g appears twice")]
    OverlappingTariffBand { service: String, max_weight: f64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Catalog data validation errors.
///
/// Raised only by [`crate::validation`], which the catalog runs when loading
/// stored data. The engine itself tolerates every value.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., NaN, infinite).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate material id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OverlappingTariffBand {
            service: "Locker".to_string(),
            max_weight: 250.0,
        };
        assert_eq!(
            err.to_string(),
            "Overlapping tariff bands for Locker: max weight 250 g appears twice"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "material id".to_string(),
        };
        assert_eq!(err.to_string(), "material id is required");

        let err = ValidationError::OutOfRange {
            field: "vat rate".to_string(),
            min: 0.0,
            max: 100.0,
        };
        assert_eq!(err.to_string(), "vat rate must be between 0 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "max weight".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
