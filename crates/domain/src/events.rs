//! Observable position events.

use crate::address::{PairId, TokenId};
use crate::enums::StakingGeneration;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Kind of position change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionEventKind {
    /// Receipt tokens were minted and staked.
    Entered,
    /// Receipt tokens were unstaked and returned or redeemed.
    Exited,
}

/// A position change emitted by the wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionEvent {
    /// Event ID.
    pub id: String,
    pub kind: PositionEventKind,
    pub owner: TokenId,
    pub pair_id: PairId,
    pub generation: StakingGeneration,
    pub pool_index: u64,
    /// Receipt tokens staked (entered) or withdrawn (exited).
    pub receipt_amount: U256,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl PositionEvent {
    fn new(
        kind: PositionEventKind,
        owner: TokenId,
        pair_id: PairId,
        generation: StakingGeneration,
        pool_index: u64,
        receipt_amount: U256,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            owner,
            pair_id,
            generation,
            pool_index,
            receipt_amount,
            timestamp: chrono::Utc::now(),
        }
    }

    /// `PositionEntered { owner, pairId, receivedReceiptAmount }`.
    pub fn entered(
        owner: TokenId,
        pair_id: PairId,
        generation: StakingGeneration,
        pool_index: u64,
        received: U256,
    ) -> Self {
        Self::new(
            PositionEventKind::Entered,
            owner,
            pair_id,
            generation,
            pool_index,
            received,
        )
    }

    /// `PositionExited { owner, pairId, withdrawnReceiptAmount }`.
    pub fn exited(
        owner: TokenId,
        pair_id: PairId,
        generation: StakingGeneration,
        pool_index: u64,
        withdrawn: U256,
    ) -> Self {
        Self::new(
            PositionEventKind::Exited,
            owner,
            pair_id,
            generation,
            pool_index,
            withdrawn,
        )
    }
}
