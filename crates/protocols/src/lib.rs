//! External capabilities consumed by the pool finder and the wallet.
//!
//! Each trait is one independent state owner: the AMM factory, the AMM pool
//! (through its router), a staking-program generation, and the token ledger.
//! Read-only adapters over an alloy provider live in [`sushiswap`] and [`masterchef`];
//! signing adapters for the write side are supplied by the embedding
//! application.

pub mod contracts;
pub mod error;
pub mod masterchef;
pub mod prelude;
pub mod rpc;
pub mod sushiswap;

#[cfg(test)]
mod testing;

use async_trait::async_trait;
use farm_lp_domain::{PairId, StakingGeneration, TokenId};
use primitive_types::U256;

pub use error::ProtocolError;

/// Pair lookup on the AMM factory.
#[async_trait]
pub trait AmmFactory: Send + Sync {
    /// Pool address for the two tokens, or the zero address if none exists.
    async fn get_pair(&self, token_a: TokenId, token_b: TokenId) -> Result<TokenId, ProtocolError>;
}

/// Parameters for depositing two tokens into a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLiquidityParams {
    pub token_a: TokenId,
    pub token_b: TokenId,
    pub amount_a_desired: U256,
    pub amount_b_desired: U256,
    pub amount_a_min: U256,
    pub amount_b_min: U256,
    /// Recipient of the receipt tokens.
    pub to: TokenId,
    pub deadline: u64,
}

/// Settled deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityAdded {
    pub amount_a: U256,
    pub amount_b: U256,
    /// Receipt tokens minted.
    pub liquidity: U256,
}

/// Parameters for redeeming receipt tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLiquidityParams {
    pub token_a: TokenId,
    pub token_b: TokenId,
    pub liquidity: U256,
    pub amount_a_min: U256,
    pub amount_b_min: U256,
    /// Recipient of the underlying tokens.
    pub to: TokenId,
    pub deadline: u64,
}

/// Settled redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityRemoved {
    pub amount_a: U256,
    pub amount_b: U256,
}

/// Deposits into and redemptions from an AMM pool.
#[async_trait]
pub trait AmmPool: Send + Sync {
    async fn add_liquidity(
        &self,
        params: &AddLiquidityParams,
    ) -> Result<LiquidityAdded, ProtocolError>;

    async fn remove_liquidity(
        &self,
        params: &RemoveLiquidityParams,
    ) -> Result<LiquidityRemoved, ProtocolError>;
}

/// Read side of a staking-program generation.
#[async_trait]
pub trait StakingReader: Send + Sync {
    /// Which generation this program is.
    fn generation(&self) -> StakingGeneration;

    /// Pool index registered for the pair, if any.
    async fn pool_index_for(&self, pair: PairId) -> Result<Option<u64>, ProtocolError>;

    /// Receipt tokens staked by `owner` in `pool_index`.
    async fn user_info(&self, pool_index: u64, owner: TokenId) -> Result<U256, ProtocolError>;
}

/// Write side of a staking-program generation, acting for the wallet.
#[async_trait]
pub trait StakingProgram: StakingReader {
    async fn deposit(&self, pool_index: u64, amount: U256) -> Result<(), ProtocolError>;

    async fn withdraw(&self, pool_index: u64, amount: U256) -> Result<(), ProtocolError>;
}

/// Token movements into and out of the wallet's custody.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Pulls `amount` from `from` into `to`, spending an allowance `from` granted.
    async fn transfer_from(
        &self,
        token: TokenId,
        from: TokenId,
        to: TokenId,
        amount: U256,
    ) -> Result<(), ProtocolError>;

    /// Sends `amount` from the wallet's own balance to `to`.
    async fn transfer(&self, token: TokenId, to: TokenId, amount: U256)
    -> Result<(), ProtocolError>;
}
