//! Pair and staking-pool resolution.

mod locator;
mod pair;
mod pool_finder;

pub use locator::PoolLocator;
pub use pair::{LookupSource, PairLookup, PairResolver};
pub use pool_finder::PoolIdFinder;
