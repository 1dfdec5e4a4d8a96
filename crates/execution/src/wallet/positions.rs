//! In-memory book of staked positions.

use farm_lp_domain::{Position, PositionKey, TokenId};
use primitive_types::U256;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Staked amounts per `(owner, pair, generation)`.
///
/// Entries disappear when their amount returns to zero. Nothing is persisted.
#[derive(Clone, Default)]
pub struct PositionBook {
    positions: Arc<RwLock<HashMap<PositionKey, Position>>>,
}

impl PositionBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the position, opening it if needed. Returns the new total.
    pub async fn record_stake(&self, key: PositionKey, amount: U256) -> U256 {
        let mut positions = self.positions.write().await;
        let position = positions.entry(key).or_insert_with(|| Position::open(key));
        position.staked_amount = position.staked_amount.saturating_add(amount);

        debug!(
            owner = %key.owner,
            pair = %key.pair_id,
            generation = %key.generation,
            staked = %position.staked_amount,
            "Stake recorded"
        );
        position.staked_amount
    }

    /// Removes `amount` from the position. Returns what is left.
    ///
    /// Returns `None` and leaves the book untouched when the owner has no
    /// position for `key` or holds less than `amount`.
    pub async fn record_unstake(&self, key: PositionKey, amount: U256) -> Option<U256> {
        let mut positions = self.positions.write().await;
        let position = positions.get_mut(&key)?;
        if position.staked_amount < amount {
            return None;
        }
        position.staked_amount -= amount;
        let remaining = position.staked_amount;

        if position.is_closed() {
            positions.remove(&key);
            debug!(owner = %key.owner, pair = %key.pair_id, "Position closed");
        }
        Some(remaining)
    }

    pub async fn get(&self, key: &PositionKey) -> Option<Position> {
        self.positions.read().await.get(key).cloned()
    }

    /// Open positions of one owner.
    pub async fn positions_of(&self, owner: TokenId) -> Vec<Position> {
        self.positions
            .read()
            .await
            .values()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.positions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.positions.read().await.is_empty()
    }
}
