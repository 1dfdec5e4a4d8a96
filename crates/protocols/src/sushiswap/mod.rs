//! SushiSwap V2 adapters.
//!
//! Read-only access to the pair factory over JSON-RPC.

/// Factory pair lookup.
pub mod factory;

pub use factory::FactoryReader;
