use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while converting human amounts to raw units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Not a decimal number.
    #[error("invalid amount: {0}")]
    Parse(String),
    /// Negative amounts are never valid token quantities.
    #[error("amount must not be negative: {0}")]
    Negative(String),
    /// More fractional digits than the token supports.
    #[error("fractional component exceeds {decimals} decimals: {value}")]
    TooPrecise {
        /// The offending input.
        value: String,
        /// Token decimals.
        decimals: u8,
    },
    /// The raw quantity does not fit in 256 bits.
    #[error("{value} with {decimals} decimals overflows 256 bits")]
    Overflow {
        /// The offending input.
        value: String,
        /// Token decimals.
        decimals: u8,
    },
    /// Basis points above 100%.
    #[error("slippage of {0} bps exceeds 10000")]
    SlippageOutOfRange(u32),
}

/// A raw token quantity together with the token's decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Parses a human-readable amount such as `"136.84"` into raw units.
    ///
    /// # Errors
    /// Returns an error if the string is not a non-negative decimal with at
    /// most `decimals` fractional digits.
    pub fn parse_units(value: &str, decimals: u8) -> Result<Self, AmountError> {
        let d = Decimal::from_str(value.trim()).map_err(|_| AmountError::Parse(value.to_string()))?;
        Self::from_decimal(d, decimals).map_err(|e| match e {
            AmountError::TooPrecise { decimals, .. } => AmountError::TooPrecise {
                value: value.to_string(),
                decimals,
            },
            AmountError::Overflow { decimals, .. } => AmountError::Overflow {
                value: value.to_string(),
                decimals,
            },
            other => other,
        })
    }

    /// Converts a decimal quantity into raw units.
    ///
    /// # Errors
    /// Returns an error for negative values, excess precision, or a raw
    /// quantity beyond `U256::MAX`.
    pub fn from_decimal(d: Decimal, decimals: u8) -> Result<Self, AmountError> {
        if d.is_sign_negative() && !d.is_zero() {
            return Err(AmountError::Negative(d.to_string()));
        }
        let d = d.normalize();
        let scale = d.scale();
        if scale > u32::from(decimals) {
            return Err(AmountError::TooPrecise {
                value: d.to_string(),
                decimals,
            });
        }
        let mantissa = d.mantissa().unsigned_abs();
        let shift = u32::from(decimals) - scale;
        let raw = U256::from(10u8)
            .checked_pow(U256::from(shift))
            .and_then(|unit| U256::from(mantissa).checked_mul(unit))
            .ok_or_else(|| AmountError::Overflow {
                value: d.to_string(),
                decimals,
            })?;
        Ok(Self { raw, decimals })
    }

    /// Converts back to a decimal, if the value fits.
    pub fn to_decimal(&self) -> Option<Decimal> {
        if self.raw > U256::from(u128::MAX) {
            return None;
        }
        let raw = i128::try_from(self.raw.as_u128()).ok()?;
        Decimal::try_from_i128_with_scale(raw, u32::from(self.decimals))
            .ok()
            .map(|d| d.normalize())
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Some(d) => write!(f, "{d}"),
            None => write!(f, "{} (raw, {} decimals)", self.raw, self.decimals),
        }
    }
}
