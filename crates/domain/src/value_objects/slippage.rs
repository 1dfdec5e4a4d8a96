use super::amount::AmountError;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const BPS_DENOMINATOR: u32 = 10_000;

/// Slippage tolerance in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slippage(u32);

impl Slippage {
    /// No tolerance: the floor equals the requested amount.
    pub const ZERO: Slippage = Slippage(0);

    /// # Errors
    /// Returns an error above 10000 bps.
    pub fn from_bps(bps: u32) -> Result<Self, AmountError> {
        if bps > BPS_DENOMINATOR {
            return Err(AmountError::SlippageOutOfRange(bps));
        }
        Ok(Self(bps))
    }

    pub fn bps(&self) -> u32 {
        self.0
    }

    pub fn as_fraction(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(BPS_DENOMINATOR)
    }

    /// Minimum accepted amount for a requested `amount`, rounded down.
    pub fn floor(&self, amount: U256) -> U256 {
        let keep = U256::from(BPS_DENOMINATOR - self.0);
        let denom = U256::from(BPS_DENOMINATOR);
        // split to stay clear of overflow near U256::MAX
        (amount / denom) * keep + (amount % denom) * keep / denom
    }
}

impl Default for Slippage {
    fn default() -> Self {
        Self(50)
    }
}
