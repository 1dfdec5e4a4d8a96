//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use farm_lp_protocols::prelude::*;
//! ```

pub use crate::masterchef::MasterChefReader;
pub use crate::rpc::{EthCaller, ProviderCaller};
pub use crate::sushiswap::FactoryReader;
pub use crate::{
    AddLiquidityParams, AmmFactory, AmmPool, LiquidityAdded, LiquidityRemoved, ProtocolError,
    RemoveLiquidityParams, StakingProgram, StakingReader, TokenLedger,
};
