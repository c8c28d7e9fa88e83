//! Asset amounts, display conversion and object ids
//!
//! Amounts are always integers in the asset's smallest unit. Display values
//! (`"1.5"` DCT) are converted with a fixed power-of-ten precision.

use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Object id of the network's base asset.
pub const BASE_ASSET_ID: &str = "1.3.0";

/// Decimal places of the base asset (1 DCT = 10^8 units).
pub const BASE_ASSET_PRECISION: u8 = 8;

/// Region code meaning "every region" for regional prices.
pub const DEFAULT_REGION: u32 = 1;

const MAX_PRECISION: u8 = 18;

/// A quantity of one fungible asset, in its smallest unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub amount: u64,
    pub asset_id: String,
}

impl Asset {
    pub fn new(amount: u64, asset_id: impl Into<String>) -> Self {
        Asset {
            amount,
            asset_id: asset_id.into(),
        }
    }

    /// An amount of the base asset.
    pub fn base(amount: u64) -> Self {
        Self::new(amount, BASE_ASSET_ID)
    }

    /// Converts a display string such as `"12.345"` using `precision` decimals.
    pub fn from_display(value: &str, precision: u8, asset_id: impl Into<String>) -> Result<Self> {
        Ok(Self::new(parse_display_amount(value, precision)?, asset_id))
    }

    /// Formats the amount with `precision` decimals, trimming trailing zeros.
    pub fn to_display(&self, precision: u8) -> String {
        format_amount(self.amount, precision)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl Default for Asset {
    /// Zero of the base asset; the placeholder fee before fees are computed.
    fn default() -> Self {
        Self::base(0)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.asset_id)
    }
}

/// A price valid in one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalPrice {
    pub region: u32,
    pub price: Asset,
}

impl RegionalPrice {
    /// A price valid in every region.
    pub fn everywhere(price: Asset) -> Self {
        RegionalPrice {
            region: DEFAULT_REGION,
            price,
        }
    }
}

fn scale(precision: u8) -> Result<u64> {
    if precision > MAX_PRECISION {
        return Err(SdkError::InvalidAmount(format!(
            "Precision {} exceeds maximum {}",
            precision, MAX_PRECISION
        )));
    }
    Ok(10u64.pow(precision as u32))
}

/// Parses a non-negative decimal string into smallest units without going
/// through floating point.
pub fn parse_display_amount(value: &str, precision: u8) -> Result<u64> {
    let scale = scale(precision)?;
    let value = value.trim();
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (value, ""),
    };

    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(SdkError::InvalidAmount(format!("Not a decimal amount: {:?}", value)));
    }
    if fraction.len() > precision as usize {
        return Err(SdkError::InvalidAmount(format!(
            "{:?} has more than {} decimal places",
            value, precision
        )));
    }

    let whole_units: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|e| SdkError::InvalidAmount(format!("{:?}: {}", value, e)))?
    };
    let fraction_units: u64 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = precision as usize);
        padded
            .parse()
            .map_err(|e| SdkError::InvalidAmount(format!("{:?}: {}", value, e)))?
    };

    whole_units
        .checked_mul(scale)
        .and_then(|units| units.checked_add(fraction_units))
        .ok_or_else(|| SdkError::InvalidAmount(format!("{:?} overflows", value)))
}

/// Converts a floating display value, rounding to the nearest unit.
pub fn amount_from_f64(value: f64, precision: u8) -> Result<u64> {
    let scale = scale(precision)?;
    if !value.is_finite() || value < 0.0 {
        return Err(SdkError::InvalidAmount(format!(
            "{} is not a non-negative finite amount",
            value
        )));
    }
    let units = (value * scale as f64).round();
    if units > u64::MAX as f64 {
        return Err(SdkError::InvalidAmount(format!("{} overflows", value)));
    }
    Ok(units as u64)
}

/// Formats smallest units as a decimal string with trailing zeros trimmed.
pub fn format_amount(amount: u64, precision: u8) -> String {
    if precision == 0 || precision > MAX_PRECISION {
        return amount.to_string();
    }
    let scale = 10u64.pow(precision as u32);
    let whole = amount / scale;
    let fraction = amount % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:0>width$}", fraction, width = precision as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// True for `space.type.instance` ids such as `1.2.27`.
pub fn is_object_id(id: &str) -> bool {
    let parts: Vec<&str> = id.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

/// True for account ids (`1.2.N`).
pub fn is_account_id(id: &str) -> bool {
    is_object_id(id) && id.starts_with("1.2.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_amount() {
        assert_eq!(parse_display_amount("1", 8).unwrap(), 100_000_000);
        assert_eq!(parse_display_amount("0.5", 8).unwrap(), 50_000_000);
        assert_eq!(parse_display_amount("12.345", 8).unwrap(), 1_234_500_000);
        assert_eq!(parse_display_amount(".00000001", 8).unwrap(), 1);
        assert_eq!(parse_display_amount("7.", 8).unwrap(), 700_000_000);
    }

    #[test]
    fn test_parse_display_amount_rejects_bad_input() {
        assert!(parse_display_amount("-1", 8).is_err());
        assert!(parse_display_amount("1.000000001", 8).is_err());
        assert!(parse_display_amount("abc", 8).is_err());
        assert!(parse_display_amount(".", 8).is_err());
        assert!(parse_display_amount("", 8).is_err());
        assert!(parse_display_amount("999999999999999", 8).is_err());
    }

    #[test]
    fn test_amount_from_f64() {
        assert_eq!(amount_from_f64(0.1, 8).unwrap(), 10_000_000);
        assert_eq!(amount_from_f64(1.23456789, 8).unwrap(), 123_456_789);
        assert!(amount_from_f64(-0.1, 8).is_err());
        assert!(amount_from_f64(f64::NAN, 8).is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(100_000_000, 8), "1");
        assert_eq!(format_amount(150_000_000, 8), "1.5");
        assert_eq!(format_amount(1, 8), "0.00000001");
        assert_eq!(format_amount(42, 0), "42");
        assert_eq!(Asset::base(1_234_500_000).to_display(8), "12.345");
    }

    #[test]
    fn test_asset_defaults_to_zero_base() {
        let fee = Asset::default();
        assert!(fee.is_zero());
        assert_eq!(fee.asset_id, BASE_ASSET_ID);
    }

    #[test]
    fn test_object_ids() {
        assert!(is_object_id("1.2.27"));
        assert!(is_object_id("1.3.0"));
        assert!(is_account_id("1.2.24"));
        assert!(!is_account_id("1.3.0"));
        assert!(!is_object_id("1.2"));
        assert!(!is_object_id("1.2.x"));
        assert!(!is_object_id("1..2"));
    }
}
