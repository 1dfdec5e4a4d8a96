use crate::address::PairId;
use crate::enums::{StakingGeneration, StakingVersion};
use serde::Serialize;

/// Where a pair's stake lives across both staking generations.
///
/// Built only from the two optional indices, so `version` always agrees with
/// which indices are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolResolution {
    pair_id: PairId,
    pool_index_v1: Option<u64>,
    pool_index_v2: Option<u64>,
    version: StakingVersion,
}

impl PoolResolution {
    pub fn new(pair_id: PairId, pool_index_v1: Option<u64>, pool_index_v2: Option<u64>) -> Self {
        Self {
            pair_id,
            pool_index_v1,
            pool_index_v2,
            version: StakingVersion::from_presence(
                pool_index_v1.is_some(),
                pool_index_v2.is_some(),
            ),
        }
    }

    /// A pair registered in neither generation.
    pub fn unregistered(pair_id: PairId) -> Self {
        Self::new(pair_id, None, None)
    }

    pub fn pair_id(&self) -> PairId {
        self.pair_id
    }

    pub fn pool_index_v1(&self) -> Option<u64> {
        self.pool_index_v1
    }

    pub fn pool_index_v2(&self) -> Option<u64> {
        self.pool_index_v2
    }

    pub fn version(&self) -> StakingVersion {
        self.version
    }

    /// Pool index in the given generation.
    pub fn pool_index(&self, generation: StakingGeneration) -> Option<u64> {
        match generation {
            StakingGeneration::V1 => self.pool_index_v1,
            StakingGeneration::V2 => self.pool_index_v2,
        }
    }

    /// Whether any generation holds the pair.
    pub fn is_resolved(&self) -> bool {
        self.version != StakingVersion::None
    }
}
