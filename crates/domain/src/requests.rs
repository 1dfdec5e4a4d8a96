//! Parameter bundles and results for entering and exiting positions.
//!
//! Requests carry the pair and staking version explicitly. The orchestrator
//! acts on exactly what the caller resolved and never looks it up again.

use crate::address::{PairId, TokenId};
use crate::config::WalletConfig;
use crate::entities::PoolResolution;
use crate::enums::{ExitMode, StakingGeneration, StakingVersion};
use crate::value_objects::Slippage;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Deposit two tokens into a pool and stake the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterRequest {
    /// Caller whose tokens are pulled and who owns the position.
    pub owner: TokenId,
    pub token_a: TokenId,
    pub token_b: TokenId,
    pub amount_a: U256,
    pub amount_b: U256,
    /// Smallest amount of `token_a` the pool may take.
    pub min_amount_a: U256,
    /// Smallest amount of `token_b` the pool may take.
    pub min_amount_b: U256,
    /// Unix timestamp after which the pool deposit must fail.
    pub deadline: u64,
    pub pool_index: u64,
    pub pair_id: PairId,
    /// Must name a single generation.
    pub version: StakingVersion,
}

impl EnterRequest {
    /// Builds a request against `generation` of a resolved pool.
    ///
    /// Returns `None` if the pair is not registered in that generation. Floors
    /// start equal to the amounts; see [`EnterRequest::with_slippage`].
    #[allow(clippy::too_many_arguments)]
    pub fn for_pool(
        resolution: &PoolResolution,
        generation: StakingGeneration,
        owner: TokenId,
        token_a: TokenId,
        token_b: TokenId,
        amount_a: U256,
        amount_b: U256,
        deadline: u64,
    ) -> Option<Self> {
        let pool_index = resolution.pool_index(generation)?;
        Some(Self {
            owner,
            token_a,
            token_b,
            amount_a,
            amount_b,
            min_amount_a: amount_a,
            min_amount_b: amount_b,
            deadline,
            pool_index,
            pair_id: resolution.pair_id(),
            version: generation.into(),
        })
    }

    /// Sets both floors from a slippage tolerance.
    #[must_use]
    pub fn with_slippage(mut self, slippage: Slippage) -> Self {
        self.min_amount_a = slippage.floor(self.amount_a);
        self.min_amount_b = slippage.floor(self.amount_b);
        self
    }

    /// Applies the wallet defaults: slippage floors and a deadline counted
    /// from unix time `now`.
    #[must_use]
    pub fn with_config(self, config: &WalletConfig, now: u64) -> Self {
        let mut request = self.with_slippage(config.slippage);
        request.deadline = config.deadline_from(now);
        request
    }
}

/// Unstake receipt tokens and hand value back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitRequest {
    pub owner: TokenId,
    pub token_a: TokenId,
    pub token_b: TokenId,
    /// Receipt tokens to unstake.
    pub amount: U256,
    pub min_amount_a: U256,
    pub min_amount_b: U256,
    pub deadline: u64,
    pub pool_index: u64,
    pub pair_id: PairId,
    pub version: StakingVersion,
    #[serde(default)]
    pub mode: ExitMode,
}

impl ExitRequest {
    #[must_use]
    pub fn with_mode(mut self, mode: ExitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the deadline from the wallet's window, counted from unix time `now`.
    #[must_use]
    pub fn with_config(mut self, config: &WalletConfig, now: u64) -> Self {
        self.deadline = config.deadline_from(now);
        self
    }
}

/// Outcome of a completed enter flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionDelta {
    pub owner: TokenId,
    pub pair_id: PairId,
    pub generation: StakingGeneration,
    pub pool_index: u64,
    /// Amount of `token_a` the pool actually took.
    pub deposited_a: U256,
    /// Amount of `token_b` the pool actually took.
    pub deposited_b: U256,
    /// Receipt tokens minted and staked by this call.
    pub receipt_staked: U256,
    /// Position total after this call.
    pub staked_total: U256,
}

/// Outcome of a completed exit flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalResult {
    pub owner: TokenId,
    pub pair_id: PairId,
    pub generation: StakingGeneration,
    pub pool_index: u64,
    pub mode: ExitMode,
    /// Receipt tokens taken out of the staking program.
    pub receipt_unstaked: U256,
    /// Underlying `token_a` returned; zero when the receipt is returned as is.
    pub amount_a: U256,
    /// Underlying `token_b` returned; zero when the receipt is returned as is.
    pub amount_b: U256,
    /// Position total after this call.
    pub staked_remaining: U256,
}
