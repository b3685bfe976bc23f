//! # Validation Module
//!
//! Strict checks for catalog data.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Form input  ──► parse (lenient, invalid → 0) ──► engine                │
//! │                                                                         │
//! │  Catalog file ──► THIS MODULE (strict) ──► engine                       │
//! │                   rejects negative prices, pieces without weight,       │
//! │                   duplicate tariff bands                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine never calls these functions. It accepts any number and
//! produces a result; validation only guards what gets stored.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{MaterialLine, ShippingTariff};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

fn require_finite(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        })
    }
}

fn require_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn require_positive(field: &str, value: f64) -> ValidationResult<()> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a rate expressed in percent.
///
/// ## Rules
/// - Must be finite
/// - Must be between 0 and 100
///
/// ## Example
/// ```rust
/// use cirerie_core::validation::validate_percentage;
///
/// assert!(validate_percentage("vat rate", 20.0).is_ok());
/// assert!(validate_percentage("vat rate", 120.0).is_err());
/// ```
pub fn validate_percentage(field: &str, value: f64) -> ValidationResult<()> {
    require_finite(field, value)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(())
}

/// Validates a margin multiplier.
///
/// Zero is accepted: the product is then sold for nothing, which the
/// engine handles.
pub fn validate_margin_multiplier(value: f64) -> ValidationResult<()> {
    require_non_negative("margin multiplier", value)
}

// =============================================================================
// Material Validators
// =============================================================================

/// Validates one material line.
///
/// ## Rules
/// - Name must not be empty
/// - Price and quantity must not be negative
/// - A `piece` line needs a positive `weight_per_piece`
/// - A density, when given, must not be negative
pub fn validate_material_line(line: &MaterialLine) -> ValidationResult<()> {
    if line.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "material name".to_string(),
        });
    }

    require_non_negative("standardized price", line.standardized_price)?;
    require_non_negative("quantity", line.quantity)?;

    if line.purchase_unit.is_piece() {
        match line.weight_per_piece {
            Some(weight) => require_positive("weight per piece", weight)?,
            None => {
                return Err(ValidationError::Required {
                    field: "weight per piece".to_string(),
                })
            }
        }
    } else if let Some(density) = line.density {
        require_non_negative("density", density)?;
    }

    Ok(())
}

// =============================================================================
// Tariff Validators
// =============================================================================

/// Validates a shipping rate card.
///
/// ## Rules
/// - `max_weight` must be positive
/// - `cost` and `price` must not be negative
/// - Two bands of the same service cannot share a `max_weight`
///
/// ## Example
/// ```rust
/// use cirerie_core::types::{ShippingService, ShippingTariff};
/// use cirerie_core::validation::validate_tariffs;
///
/// let card = vec![
///     ShippingTariff::new(ShippingService::Locker, 250.0, 3.1, 4.5),
///     ShippingTariff::new(ShippingService::Locker, 250.0, 3.4, 4.9),
/// ];
/// assert!(validate_tariffs(&card).is_err());
/// ```
pub fn validate_tariffs(tariffs: &[ShippingTariff]) -> CoreResult<()> {
    for tariff in tariffs {
        require_positive("max weight", tariff.max_weight)?;
        require_non_negative("shipping cost", tariff.cost)?;
        require_non_negative("shipping price", tariff.price)?;
    }

    let mut bounds: Vec<(_, f64)> = tariffs.iter().map(|t| (t.service, t.max_weight)).collect();
    bounds.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    if let Some(pair) = bounds.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(CoreError::OverlappingTariffBand {
            service: pair[0].0.to_string(),
            max_weight: pair[0].1,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PurchaseUnit, ShippingService};

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage("vat rate", 0.0).is_ok());
        assert!(validate_percentage("vat rate", 20.0).is_ok());
        assert!(validate_percentage("vat rate", 100.0).is_ok());

        assert!(validate_percentage("vat rate", -0.1).is_err());
        assert!(validate_percentage("vat rate", 100.1).is_err());
        assert!(matches!(
            validate_percentage("vat rate", f64::NAN),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_margin_multiplier() {
        assert!(validate_margin_multiplier(0.0).is_ok());
        assert!(validate_margin_multiplier(3.2).is_ok());
        assert!(matches!(
            validate_margin_multiplier(-1.0),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
        assert!(validate_margin_multiplier(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_material_line() {
        assert!(validate_material_line(&MaterialLine::new("Cire", 0.012, 180.0, PurchaseUnit::Kilogram)).is_ok());
        assert!(validate_material_line(&MaterialLine::piece("Pot", 1.2, 1.0, 160.0)).is_ok());

        assert!(validate_material_line(&MaterialLine::new("", 0.012, 180.0, PurchaseUnit::Gram)).is_err());
        assert!(validate_material_line(&MaterialLine::new("Cire", -0.1, 180.0, PurchaseUnit::Gram)).is_err());
        assert!(validate_material_line(&MaterialLine::new("Cire", 0.1, -1.0, PurchaseUnit::Gram)).is_err());
        assert!(validate_material_line(
            &MaterialLine::new("Parfum", 0.08, 12.0, PurchaseUnit::Liter).with_density(-0.9)
        )
        .is_err());
    }

    #[test]
    fn test_piece_requires_weight() {
        let mut line = MaterialLine::piece("Mèche", 0.15, 1.0, 0.5);
        line.weight_per_piece = None;
        assert!(matches!(
            validate_material_line(&line),
            Err(ValidationError::Required { .. })
        ));

        line.weight_per_piece = Some(0.0);
        assert!(matches!(
            validate_material_line(&line),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_validate_tariffs() {
        let card = vec![
            ShippingTariff::new(ShippingService::Locker, 250.0, 3.1, 4.5),
            ShippingTariff::new(ShippingService::Locker, 500.0, 3.6, 5.2),
            // same bound, different service: fine
            ShippingTariff::new(ShippingService::PointRelais, 250.0, 3.9, 5.0),
        ];
        assert!(validate_tariffs(&card).is_ok());
        assert!(validate_tariffs(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_band_is_rejected() {
        let card = vec![
            ShippingTariff::new(ShippingService::Locker, 500.0, 3.6, 5.2),
            ShippingTariff::new(ShippingService::PointRelais, 250.0, 3.9, 5.0),
            ShippingTariff::new(ShippingService::Locker, 500.0, 3.8, 5.5),
        ];
        match validate_tariffs(&card) {
            Err(CoreError::OverlappingTariffBand { service, max_weight }) => {
                assert_eq!(service, "Locker");
                assert_eq!(max_weight, 500.0);
            }
            other => panic!("expected overlapping band, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_band_values() {
        let zero_bound = [ShippingTariff::new(ShippingService::Locker, 0.0, 3.1, 4.5)];
        assert!(matches!(
            validate_tariffs(&zero_bound),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        let negative_price = [ShippingTariff::new(ShippingService::Locker, 250.0, 3.1, -1.0)];
        assert!(validate_tariffs(&negative_price).is_err());
    }
}
