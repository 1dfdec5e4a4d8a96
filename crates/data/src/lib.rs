//! Off-chain indexed data sources.
//!
//! The indexer is a cold, best-effort source: every public lookup degrades to
//! "nothing found" when the service is unreachable or answers garbage.

pub mod error;
pub mod graphql;
pub mod indexer;

pub use error::IndexerError;
pub use graphql::{GraphQlTransport, HttpGraphQl};
pub use indexer::{IndexedLookupClient, IndexedStakingPool};
