use crate::address::{PairId, TokenId};
use crate::enums::StakingGeneration;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Identity of a staked position: one owner, one pair, one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    pub owner: TokenId,
    pub pair_id: PairId,
    pub generation: StakingGeneration,
}

/// Receipt tokens staked on behalf of a single owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub owner: TokenId,
    pub pair_id: PairId,
    pub generation: StakingGeneration,
    pub staked_amount: U256,
}

impl Position {
    /// An empty position for `key`.
    pub fn open(key: PositionKey) -> Self {
        Self {
            owner: key.owner,
            pair_id: key.pair_id,
            generation: key.generation,
            staked_amount: U256::zero(),
        }
    }

    pub fn key(&self) -> PositionKey {
        PositionKey {
            owner: self.owner,
            pair_id: self.pair_id,
            generation: self.generation,
        }
    }

    /// A position with nothing staked no longer exists.
    pub fn is_closed(&self) -> bool {
        self.staked_amount.is_zero()
    }
}
