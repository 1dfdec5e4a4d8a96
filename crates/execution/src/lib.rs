//! Pool resolution and position orchestration.
//!
//! This crate ties the capability adapters together:
//! - Pair lookup with on-chain precedence and an indexed fallback
//! - Staking-generation classification of a pair
//! - Enter/exit flows that deposit, stake, unstake and redeem for an owner
//! - An in-memory book of staked positions

/// Prelude module for convenient imports.
pub mod prelude;

/// Failure taxonomy and flow states.
pub mod error;
/// Pair and staking-pool resolution.
pub mod resolver;
/// Position orchestration.
pub mod wallet;

#[cfg(test)]
mod testing;

pub use error::{ExecutionError, FlowState, FlowStep, Residue};
