//! # Parsing Policy
//!
//! Numbers reach the engine as text: typed into forms, or stored as strings
//! in catalog documents. This module is the single place where that text
//! becomes `f64`, and it owns the fallback rule.
//!
//! ## The Zero Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input text        parse_number      parse_or_zero                      │
//! │  ──────────        ────────────      ─────────────                      │
//! │  "12.5"            Some(12.5)        12.5                               │
//! │  " 12,5 "          Some(12.5)        12.5     (comma decimal accepted)  │
//! │  ""                None              0.0                                │
//! │  "abc"             None              0.0                                │
//! │  "NaN" / "inf"     None              0.0                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A malformed value never fails a calculation; it becomes a zero term in
//! whatever sum it feeds. Callers that must tell "invalid" apart from "zero"
//! (the target price box, see [`crate::solver`]) use [`parse_number`].

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::money::Percentage;
use crate::types::{SaleChannel, ShippingService};

// =============================================================================
// Scalar Parsers
// =============================================================================

/// Parses a decimal number, accepting `.` or `,` as the decimal separator.
///
/// Returns `None` for empty, non-numeric, NaN or infinite input.
///
/// ## Example
/// ```rust
/// use cirerie_core::parse::parse_number;
///
/// assert_eq!(parse_number("3,5"), Some(3.5));
/// assert_eq!(parse_number("trois"), None);
/// ```
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = trimmed.replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses a decimal number, falling back to `0.0` on any failure.
#[inline]
pub fn parse_or_zero(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}

/// Parses a whole count (quantities, bundle sizes), falling back to `0`.
///
/// Negative values also become `0`. A decimal count is truncated
/// (`"2.9"` → `2`).
pub fn parse_count_or_zero(raw: &str) -> u32 {
    parse_number(raw).map_or(0, whole_count)
}

fn whole_count(value: f64) -> u32 {
    if value > 0.0 {
        value.trunc().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

// =============================================================================
// Serde Adapters
// =============================================================================

/// A stored number that may arrive as a JSON/TOML number, a string, or
/// something else entirely (null, bool) which counts as absent.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LenientNumber {
    fn into_f64(self) -> Option<f64> {
        match self {
            LenientNumber::Number(value) if value.is_finite() => Some(value),
            LenientNumber::Number(_) => None,
            LenientNumber::Text(text) => parse_number(&text),
            LenientNumber::Other(_) => None,
        }
    }
}

/// Deserializes a number or numeric string, applying the zero policy.
///
/// ## Usage
/// ```rust
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Row {
///     #[serde(default, deserialize_with = "cirerie_core::parse::lenient_f64")]
///     price: f64,
/// }
///
/// let row: Row = serde_json::from_str(r#"{ "price": "0,012" }"#).unwrap();
/// assert_eq!(row.price, 0.012);
/// let row: Row = serde_json::from_str(r#"{ "price": "n/a" }"#).unwrap();
/// assert_eq!(row.price, 0.0);
/// ```
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LenientNumber::deserialize(deserializer)?
        .into_f64()
        .unwrap_or(0.0))
}

/// Like [`lenient_f64`] but keeps "absent or invalid" as `None`.
///
/// Used for fields whose absence selects a default other than zero
/// (a missing density means 1, not 0).
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LenientNumber::deserialize(deserializer)?.into_f64())
}

/// Deserializes a whole count with the same rules as [`parse_count_or_zero`].
///
/// A negative, fractional-below-one or unreadable count becomes `0`, which
/// for a bundle offer means "disabled" and for an order line means "empty".
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LenientNumber::deserialize(deserializer)?
        .into_f64()
        .map_or(0, whole_count))
}

// =============================================================================
// Pricing Parameters
// =============================================================================

/// The scalar knobs of one calculation, already parsed.
///
/// Missing fields take their [`Default`]; numbers may arrive as strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingParameters {
    /// Sale channel the result is computed for.
    pub channel: SaleChannel,
    /// Carrier service used for internet orders.
    pub shipping_service: ShippingService,
    /// Multiplier applied to product cost to get the pre-tax price.
    #[serde(deserialize_with = "lenient_f64")]
    pub margin_multiplier: f64,
    /// VAT rate.
    pub vat_rate: Percentage,
    /// Card/payment processor fee rate.
    pub transaction_fee_rate: Percentage,
    /// Share of the TTC price kept by a consignment depot.
    pub depot_commission_rate: Percentage,
    /// Turnover-based social contributions.
    pub business_charges_rate: Percentage,
}

impl Default for PricingParameters {
    fn default() -> Self {
        PricingParameters {
            channel: SaleChannel::default(),
            shipping_service: ShippingService::default(),
            margin_multiplier: 1.0,
            vat_rate: Percentage::zero(),
            transaction_fee_rate: Percentage::zero(),
            depot_commission_rate: Percentage::zero(),
            business_charges_rate: Percentage::new(crate::DEFAULT_BUSINESS_CHARGES_RATE),
        }
    }
}

/// The same knobs as they come out of a form: every field is text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPricingParameters {
    pub channel: String,
    pub shipping_service: String,
    pub margin_multiplier: String,
    pub vat_rate: String,
    pub transaction_fee_rate: String,
    pub depot_commission_rate: String,
    pub business_charges_rate: String,
}

impl RawPricingParameters {
    /// Parses every field once, at the boundary.
    ///
    /// ## Rules
    /// - Numeric fields follow the zero policy.
    /// - An empty business-charges field keeps the 13.4 % default, since that
    ///   rate is fixed in practice and forms usually omit it.
    /// - An unknown channel or service tag falls back to the default variant.
    pub fn parse(&self) -> PricingParameters {
        let defaults = PricingParameters::default();

        let business_charges_rate = if self.business_charges_rate.trim().is_empty() {
            defaults.business_charges_rate
        } else {
            Percentage::new(parse_or_zero(&self.business_charges_rate))
        };

        PricingParameters {
            channel: self.channel.parse().unwrap_or(defaults.channel),
            shipping_service: self
                .shipping_service
                .parse()
                .unwrap_or(defaults.shipping_service),
            margin_multiplier: parse_or_zero(&self.margin_multiplier),
            vat_rate: Percentage::new(parse_or_zero(&self.vat_rate)),
            transaction_fee_rate: Percentage::new(parse_or_zero(&self.transaction_fee_rate)),
            depot_commission_rate: Percentage::new(parse_or_zero(&self.depot_commission_rate)),
            business_charges_rate,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number(" 12,5 "), Some(12.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_parse_or_zero() {
        assert_eq!(parse_or_zero("4"), 4.0);
        assert_eq!(parse_or_zero("quatre"), 0.0);
        assert_eq!(parse_or_zero(""), 0.0);
    }

    #[test]
    fn test_parse_count_or_zero() {
        assert_eq!(parse_count_or_zero("8"), 8);
        assert_eq!(parse_count_or_zero("2.9"), 2);
        assert_eq!(parse_count_or_zero("-1"), 0);
        assert_eq!(parse_count_or_zero("x"), 0);
    }

    #[derive(Deserialize)]
    struct Offer {
        #[serde(default, deserialize_with = "lenient_count")]
        buy: u32,
    }

    #[test]
    fn test_lenient_count() {
        let offer: Offer = serde_json::from_str(r#"{ "buy": -1 }"#).unwrap();
        assert_eq!(offer.buy, 0);
        let offer: Offer = serde_json::from_str(r#"{ "buy": "8" }"#).unwrap();
        assert_eq!(offer.buy, 8);
        let offer: Offer = serde_json::from_str(r#"{ "buy": 2.9 }"#).unwrap();
        assert_eq!(offer.buy, 2);
        let offer: Offer = serde_json::from_str(r#"{ "buy": "trois" }"#).unwrap();
        assert_eq!(offer.buy, 0);
    }

    #[test]
    fn test_parameters_deserialize_leniently() {
        let params: PricingParameters =
            serde_json::from_str(r#"{ "marginMultiplier": "3,2", "vatRate": "20" }"#).unwrap();
        assert_eq!(params.margin_multiplier, 3.2);
        assert_eq!(params.vat_rate.percent(), 20.0);
        assert_eq!(params.channel, SaleChannel::Internet);
        assert_eq!(params.business_charges_rate.percent(), 13.4);

        let params: PricingParameters = serde_json::from_str(r#"{ "marginMultiplier": 3 }"#).unwrap();
        assert_eq!(params.margin_multiplier, 3.0);
        assert_eq!(params.shipping_service, ShippingService::Locker);
    }

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_f64")]
        value: f64,
        #[serde(default, deserialize_with = "lenient_opt_f64")]
        density: Option<f64>,
    }

    #[test]
    fn test_lenient_deserialization() {
        let row: Row = serde_json::from_str(r#"{ "value": 3.25, "density": "0,86" }"#).unwrap();
        assert_eq!(row.value, 3.25);
        assert_eq!(row.density, Some(0.86));

        let row: Row = serde_json::from_str(r#"{ "value": "oops", "density": "" }"#).unwrap();
        assert_eq!(row.value, 0.0);
        assert_eq!(row.density, None);

        let row: Row = serde_json::from_str(r#"{ "value": null, "density": true }"#).unwrap();
        assert_eq!(row.value, 0.0);
        assert_eq!(row.density, None);

        let row: Row = serde_json::from_str("{}").unwrap();
        assert_eq!(row.value, 0.0);
        assert_eq!(row.density, None);
    }

    #[test]
    fn test_raw_parameters_parse() {
        let raw = RawPricingParameters {
            channel: "depot".to_string(),
            shipping_service: "PointRelais".to_string(),
            margin_multiplier: "4".to_string(),
            vat_rate: "".to_string(),
            transaction_fee_rate: "1,5".to_string(),
            depot_commission_rate: "trente".to_string(),
            business_charges_rate: "".to_string(),
        };
        let params = raw.parse();

        assert_eq!(params.channel, SaleChannel::Depot);
        assert_eq!(params.shipping_service, ShippingService::PointRelais);
        assert_eq!(params.margin_multiplier, 4.0);
        assert!(params.vat_rate.is_zero());
        assert_eq!(params.transaction_fee_rate.percent(), 1.5);
        assert!(params.depot_commission_rate.is_zero());
        assert_eq!(params.business_charges_rate.percent(), 13.4);
    }

    #[test]
    fn test_raw_parameters_unknown_tags_fall_back() {
        let raw = RawPricingParameters {
            channel: "marketplace".to_string(),
            shipping_service: "drone".to_string(),
            ..Default::default()
        };
        let params = raw.parse();
        assert_eq!(params.channel, SaleChannel::Internet);
        assert_eq!(params.shipping_service, ShippingService::Locker);
        assert_eq!(params.margin_multiplier, 0.0);
    }
}
