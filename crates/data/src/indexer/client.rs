use crate::{GraphQlTransport, HttpGraphQl, IndexerError};
use farm_lp_domain::{NetworkConfig, PairId, StakingGeneration, TokenPair};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

const PAIR_QUERY: &str = r#"
query FindPair($token0: String!, $token1: String!) {
  pairs(where: { token0: $token0, token1: $token1 }) {
    id
  }
}
"#;

const STAKING_POOLS_QUERY: &str = r#"
query FindStakingPools($pool: String!) {
  masterChefStakingPools(where: { poolAddress: $pool }) {
    id
  }
}
"#;

/// A staking pool reported by the staking subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexedStakingPool {
    pub pair: PairId,
    pub generation: StakingGeneration,
    pub pool_index: u64,
}

#[derive(Deserialize)]
struct PairsData {
    pairs: Vec<IdRow>,
}

#[derive(Deserialize)]
struct StakingPoolsData {
    #[serde(rename = "masterChefStakingPools")]
    pools: Vec<IdRow>,
}

#[derive(Deserialize)]
struct IdRow {
    id: String,
}

/// Read-only client for indexed pair and staking-pool metadata.
///
/// Every lookup is best-effort: transport failures and malformed answers are
/// logged and reported as "not found".
pub struct IndexedLookupClient {
    exchange: Arc<dyn GraphQlTransport>,
    staking: Option<Arc<dyn GraphQlTransport>>,
}

impl IndexedLookupClient {
    pub fn new(
        exchange: Arc<dyn GraphQlTransport>,
        staking: Option<Arc<dyn GraphQlTransport>>,
    ) -> Self {
        Self { exchange, staking }
    }

    /// Builds HTTP transports from the network's subgraph endpoints.
    ///
    /// The staking subgraph is only reachable with an API key; without one,
    /// staking-pool lookups return nothing.
    ///
    /// # Errors
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &NetworkConfig) -> Result<Self, IndexerError> {
        let exchange: Arc<dyn GraphQlTransport> =
            Arc::new(HttpGraphQl::new(config.exchange_subgraph_url.clone())?);
        let staking = match config.staking_subgraph_url() {
            Some(url) => Some(Arc::new(HttpGraphQl::new(url)?) as Arc<dyn GraphQlTransport>),
            None => None,
        };
        Ok(Self::new(exchange, staking))
    }

    /// Pool address the exchange subgraph lists for the pair.
    pub async fn find_pair(&self, pair: TokenPair) -> Option<PairId> {
        match self.try_find_pair(pair).await {
            Ok(found) => found,
            Err(e) => {
                warn!(pair = %pair, error = %e, "Indexer pair lookup failed");
                None
            }
        }
    }

    /// Staking pools the staking subgraph lists for the pool address.
    pub async fn find_staking_pools(&self, pair: PairId) -> Vec<IndexedStakingPool> {
        let Some(staking) = &self.staking else {
            debug!(pair = %pair, "No staking subgraph configured");
            return Vec::new();
        };
        match self.try_find_staking_pools(staking.as_ref(), pair).await {
            Ok(pools) => pools,
            Err(e) => {
                warn!(pair = %pair, error = %e, "Indexer staking-pool lookup failed");
                Vec::new()
            }
        }
    }

    async fn try_find_pair(&self, pair: TokenPair) -> Result<Option<PairId>, IndexerError> {
        let (greater, lesser) = pair.ordered();
        let variables = json!({
            "token0": greater.to_lower_hex(),
            "token1": lesser.to_lower_hex(),
        });
        let data: PairsData = decode(self.exchange.query(PAIR_QUERY, variables).await?)?;

        let Some(row) = data.pairs.first() else {
            debug!(pair = %pair, "Indexer has no pair");
            return Ok(None);
        };
        let id = PairId::parse(&row.id)
            .map_err(|e| IndexerError::Shape(format!("pair id {}: {e}", row.id)))?;
        info!(pair = %pair, pair_id = %id, "Indexer pair found");
        Ok(Some(id))
    }

    async fn try_find_staking_pools(
        &self,
        staking: &dyn GraphQlTransport,
        pair: PairId,
    ) -> Result<Vec<IndexedStakingPool>, IndexerError> {
        let variables = json!({ "pool": pair.to_string() });
        let data: StakingPoolsData = decode(staking.query(STAKING_POOLS_QUERY, variables).await?)?;

        let pools: Vec<IndexedStakingPool> = data
            .pools
            .iter()
            .filter_map(|row| match parse_pool_id(&row.id) {
                Some((generation, pool_index)) => Some(IndexedStakingPool {
                    pair,
                    generation,
                    pool_index,
                }),
                None => {
                    warn!(pair = %pair, id = %row.id, "Skipping unparseable staking pool id");
                    None
                }
            })
            .collect();

        info!(pair = %pair, count = pools.len(), "Indexer staking pools found");
        Ok(pools)
    }
}

fn decode<T: for<'de> Deserialize<'de>>(data: Value) -> Result<T, IndexerError> {
    serde_json::from_value(data).map_err(|e| IndexerError::Shape(e.to_string()))
}

/// Parses `<version>-<pid>` ids such as `2-23` or `v1-35`.
fn parse_pool_id(id: &str) -> Option<(StakingGeneration, u64)> {
    let (version, pid) = id.split_once('-')?;
    let generation = match version.trim_start_matches(['v', 'V']) {
        "1" => StakingGeneration::V1,
        "2" => StakingGeneration::V2,
        _ => return None,
    };
    Some((generation, pid.parse().ok()?))
}
