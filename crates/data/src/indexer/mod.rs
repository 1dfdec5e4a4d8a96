//! Pair and staking-pool lookups against the exchange and staking subgraphs.

mod client;

pub use client::{IndexedLookupClient, IndexedStakingPool};
