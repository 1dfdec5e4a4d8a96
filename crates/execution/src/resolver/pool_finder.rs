//! Staking-generation classification of a pair.

use crate::error::{ExecutionError, FlowStep};
use farm_lp_domain::{PairId, PoolResolution};
use farm_lp_protocols::StakingReader;
use std::sync::Arc;
use tracing::info;

/// Finds the pool index of a pair in both staking generations.
pub struct PoolIdFinder {
    v1: Arc<dyn StakingReader>,
    v2: Arc<dyn StakingReader>,
}

impl PoolIdFinder {
    pub fn new(v1: Arc<dyn StakingReader>, v2: Arc<dyn StakingReader>) -> Self {
        Self { v1, v2 }
    }

    /// Queries both generations concurrently and combines the answers.
    ///
    /// Read-only and idempotent. A pair registered nowhere yields a
    /// resolution whose version is `None`.
    ///
    /// # Errors
    /// Returns `ExternalCall` if either generation cannot be queried.
    pub async fn classify(&self, pair: PairId) -> Result<PoolResolution, ExecutionError> {
        let (v1, v2) = tokio::join!(self.v1.pool_index_for(pair), self.v2.pool_index_for(pair));
        let v1 = v1.map_err(|e| ExecutionError::lookup(FlowStep::FindPool, e))?;
        let v2 = v2.map_err(|e| ExecutionError::lookup(FlowStep::FindPool, e))?;

        let resolution = PoolResolution::new(pair, v1, v2);
        info!(
            pair = %pair,
            pool_index_v1 = ?v1,
            pool_index_v2 = ?v2,
            version = ?resolution.version(),
            "Pair classified"
        );
        Ok(resolution)
    }
}
