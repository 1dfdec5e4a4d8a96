//! One-call pool resolution: pair lookup then generation classification.

use super::{PairResolver, PoolIdFinder};
use crate::error::ExecutionError;
use farm_lp_domain::{NetworkConfig, PoolResolution, StakingGeneration, TokenId};
use farm_lp_protocols::masterchef::MasterChefReader;
use farm_lp_protocols::rpc::EthCaller;
use farm_lp_protocols::sushiswap::FactoryReader;
use std::sync::Arc;
use tracing::info;

/// Resolves two tokens to a classified staking pool.
pub struct PoolLocator {
    pairs: PairResolver,
    finder: PoolIdFinder,
}

impl PoolLocator {
    pub fn new(pairs: PairResolver, finder: PoolIdFinder) -> Self {
        Self { pairs, finder }
    }

    /// Wires read-only chain adapters for a network, all sharing one caller.
    pub fn from_network(config: &NetworkConfig, caller: Arc<dyn EthCaller>) -> Self {
        let factory = Arc::new(FactoryReader::new(caller.clone(), config.factory));
        let v1 = Arc::new(MasterChefReader::new(
            caller.clone(),
            config.master_chef(StakingGeneration::V1),
            StakingGeneration::V1,
        ));
        let v2 = Arc::new(MasterChefReader::new(
            caller,
            config.master_chef(StakingGeneration::V2),
            StakingGeneration::V2,
        ));
        Self::new(PairResolver::new(factory), PoolIdFinder::new(v1, v2))
    }

    pub fn pairs(&self) -> &PairResolver {
        &self.pairs
    }

    pub fn finder(&self) -> &PoolIdFinder {
        &self.finder
    }

    /// `resolvePool`: on-chain pair lookup followed by classification.
    ///
    /// # Errors
    /// Returns `Unresolved` if no pair exists for the tokens, `InvalidInput`
    /// for equal or zero tokens, and `ExternalCall` if a read fails.
    pub async fn resolve_pool(
        &self,
        token_a: TokenId,
        token_b: TokenId,
    ) -> Result<PoolResolution, ExecutionError> {
        let Some(pair) = self.pairs.resolve_on_chain(token_a, token_b).await? else {
            return Err(ExecutionError::unresolved(format!(
                "no pair for {token_a} and {token_b}"
            )));
        };
        let resolution = self.finder.classify(pair).await?;
        info!(pair = %pair, version = ?resolution.version(), "Pool resolved");
        Ok(resolution)
    }
}
