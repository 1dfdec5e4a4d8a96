//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use farm_lp_execution::prelude::*;
//! ```

// Errors
pub use crate::error::{ExecutionError, FlowState, FlowStep, Residue};

// Resolution
pub use crate::resolver::{LookupSource, PairLookup, PairResolver, PoolIdFinder, PoolLocator};

// Orchestration
pub use crate::wallet::{EVENT_CHANNEL_CAPACITY, PositionBook, SmartWallet, StakingPrograms};
