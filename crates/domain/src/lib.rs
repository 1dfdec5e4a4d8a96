//! Domain model for liquidity-mining positions.
//!
//! This crate holds the pure parts of the system:
//! - Address validation and canonical pair ordering
//! - Staking generations and pool resolution
//! - Positions, requests and results
//! - Position events
//! - Network and wallet configuration

/// Address codec.
pub mod address;
/// Network and wallet configuration.
pub mod config;
/// Domain entities.
pub mod entities;
/// Domain enums.
pub mod enums;
/// Position events.
pub mod events;
/// Enter/exit requests and results.
pub mod requests;
/// Value objects.
pub mod value_objects;

pub use address::{AddressError, PairId, TokenId, TokenPair};
pub use config::{ConfigError, NetworkConfig, WalletConfig};
pub use entities::{PoolResolution, Position, PositionKey};
pub use enums::{ExitMode, StakingGeneration, StakingVersion};
pub use events::{PositionEvent, PositionEventKind};
pub use requests::{EnterRequest, ExitRequest, PositionDelta, WithdrawalResult};
pub use value_objects::{Amount, AmountError, Slippage};
