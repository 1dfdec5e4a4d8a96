//! Pair lookup with on-chain precedence and an indexed fallback.

use crate::error::{ExecutionError, FlowStep};
use farm_lp_data::IndexedLookupClient;
use farm_lp_domain::{PairId, TokenId, TokenPair};
use farm_lp_protocols::AmmFactory;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where a discovered pair came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LookupSource {
    OnChain,
    Indexed,
}

/// A pair found by [`PairResolver::discover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairLookup {
    pub pair_id: PairId,
    pub source: LookupSource,
}

/// Resolves the pool address for two tokens.
pub struct PairResolver {
    factory: Arc<dyn AmmFactory>,
    indexer: Option<Arc<IndexedLookupClient>>,
}

impl PairResolver {
    /// Creates a resolver backed only by the factory.
    pub fn new(factory: Arc<dyn AmmFactory>) -> Self {
        Self {
            factory,
            indexer: None,
        }
    }

    /// Adds the indexed fallback used by [`PairResolver::discover`].
    #[must_use]
    pub fn with_indexer(mut self, indexer: Arc<IndexedLookupClient>) -> Self {
        self.indexer = Some(indexer);
        self
    }

    /// Asks the factory for the pair, always in canonical order.
    ///
    /// Returns `Ok(None)` when the factory answers with the zero address.
    ///
    /// # Errors
    /// Returns `InvalidInput` for equal or zero tokens and `ExternalCall` if
    /// the factory call fails.
    pub async fn resolve_on_chain(
        &self,
        token_a: TokenId,
        token_b: TokenId,
    ) -> Result<Option<PairId>, ExecutionError> {
        let pair = TokenPair::new(token_a, token_b)?;
        let (greater, lesser) = pair.ordered();

        let address = self
            .factory
            .get_pair(greater, lesser)
            .await
            .map_err(|e| ExecutionError::lookup(FlowStep::FindPair, e))?;

        if address.is_zero() {
            debug!(pair = %pair, "Factory has no pair");
            return Ok(None);
        }
        let pair_id = PairId::new(address)?;
        info!(pair = %pair, pair_id = %pair_id, "Pair resolved on chain");
        Ok(Some(pair_id))
    }

    /// Asks the indexer for the pair. Unavailability reads as `None`.
    ///
    /// # Errors
    /// Returns `InvalidInput` for equal or zero tokens.
    pub async fn resolve_indexed(
        &self,
        token_a: TokenId,
        token_b: TokenId,
    ) -> Result<Option<PairId>, ExecutionError> {
        let pair = TokenPair::new(token_a, token_b)?;
        match &self.indexer {
            Some(indexer) => Ok(indexer.find_pair(pair).await),
            None => Ok(None),
        }
    }

    /// Discovery lookup: the factory's answer wins whenever it answers; the
    /// indexer is consulted alongside and only used when the factory call
    /// fails. Disagreements are logged, never raised.
    ///
    /// # Errors
    /// Returns `InvalidInput` for equal or zero tokens.
    pub async fn discover(
        &self,
        token_a: TokenId,
        token_b: TokenId,
    ) -> Result<Option<PairLookup>, ExecutionError> {
        let pair = TokenPair::new(token_a, token_b)?;
        let (on_chain, indexed) = tokio::join!(
            self.resolve_on_chain(token_a, token_b),
            self.resolve_indexed(token_a, token_b)
        );
        let indexed = indexed?;

        match on_chain {
            Ok(found) => {
                if self.indexer.is_some() && found != indexed {
                    warn!(
                        pair = %pair,
                        on_chain = ?found.map(|p| p.to_string()),
                        indexed = ?indexed.map(|p| p.to_string()),
                        "Inconsistent pair sources, keeping on-chain answer"
                    );
                }
                Ok(found.map(|pair_id| PairLookup {
                    pair_id,
                    source: LookupSource::OnChain,
                }))
            }
            Err(ExecutionError::ExternalCall { source, .. }) => {
                warn!(pair = %pair, error = %source, "Factory unavailable, using indexer");
                Ok(indexed.map(|pair_id| PairLookup {
                    pair_id,
                    source: LookupSource::Indexed,
                }))
            }
            Err(e) => Err(e),
        }
    }
}
