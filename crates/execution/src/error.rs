//! Failure taxonomy for resolution and orchestration.

use farm_lp_domain::{AddressError, AmountError, TokenId};
use farm_lp_protocols::ProtocolError;
use primitive_types::U256;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Named states of the enter and exit flows.
///
/// Enter: `Idle -> Deposited -> Staked -> Done`.
/// Exit: `Idle -> Unstaked -> WithdrawnFromPool -> Done`, or
/// `Idle -> Unstaked -> Done` when the receipt tokens are handed back as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowState {
    Idle,
    Deposited,
    Staked,
    Unstaked,
    WithdrawnFromPool,
    Done,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowState::Idle => "idle",
            FlowState::Deposited => "deposited",
            FlowState::Staked => "staked",
            FlowState::Unstaked => "unstaked",
            FlowState::WithdrawnFromPool => "withdrawn-from-pool",
            FlowState::Done => "done",
        };
        f.write_str(name)
    }
}

/// The external call a flow was making when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowStep {
    /// Factory pair lookup.
    FindPair,
    /// Staking-program pool scan.
    FindPool,
    /// Pull token A from the owner.
    PullTokenA,
    /// Pull token B from the owner.
    PullTokenB,
    AddLiquidity,
    Stake,
    /// Hand back the part of the deposit the pool did not take.
    RefundUnused,
    Unstake,
    RemoveLiquidity,
    /// Send redeemed underlying tokens to the owner.
    TransferUnderlying,
    /// Send unstaked receipt tokens to the owner.
    ReturnReceipt,
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowStep::FindPair => "find-pair",
            FlowStep::FindPool => "find-pool",
            FlowStep::PullTokenA => "pull-token-a",
            FlowStep::PullTokenB => "pull-token-b",
            FlowStep::AddLiquidity => "add-liquidity",
            FlowStep::Stake => "stake",
            FlowStep::RefundUnused => "refund-unused",
            FlowStep::Unstake => "unstake",
            FlowStep::RemoveLiquidity => "remove-liquidity",
            FlowStep::TransferUnderlying => "transfer-underlying",
            FlowStep::ReturnReceipt => "return-receipt",
        };
        f.write_str(name)
    }
}

/// Tokens left in the wallet's custody by a flow that stopped midway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Residue {
    pub token: TokenId,
    pub amount: U256,
}

/// Errors raised by the resolver and the smart wallet.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Rejected before any external call. Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Nothing to act on: no pair, or no staking pool. Never retried.
    #[error("unresolved: {0}")]
    Unresolved(String),

    /// An external call failed. Completed steps are not rolled back.
    #[error("{step} failed in state {reached}: {source}")]
    ExternalCall {
        step: FlowStep,
        reached: FlowState,
        /// Tokens the wallet still holds because of the earlier steps.
        residue: Vec<Residue>,
        #[source]
        source: ProtocolError,
    },
}

impl ExecutionError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    pub(crate) fn unresolved(reason: impl Into<String>) -> Self {
        Self::Unresolved(reason.into())
    }

    pub(crate) fn lookup(step: FlowStep, source: ProtocolError) -> Self {
        Self::ExternalCall {
            step,
            reached: FlowState::Idle,
            residue: Vec::new(),
            source,
        }
    }

    /// State the flow had reached when it stopped, if it got that far.
    #[must_use]
    pub fn reached(&self) -> Option<FlowState> {
        match self {
            Self::ExternalCall { reached, .. } => Some(*reached),
            _ => None,
        }
    }

    /// Tokens left in custody, empty unless an external call failed midway.
    #[must_use]
    pub fn residue(&self) -> &[Residue] {
        match self {
            Self::ExternalCall { residue, .. } => residue,
            _ => &[],
        }
    }
}

impl From<AddressError> for ExecutionError {
    fn from(err: AddressError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<AmountError> for ExecutionError {
    fn from(err: AmountError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
