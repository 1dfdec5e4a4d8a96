//! MasterChef staking-program adapters.
//!
//! Both generations expose the same read surface with one difference: V1
//! keeps the receipt token inside `poolInfo(pid)`, V2 exposes `lpToken(pid)`.

/// Read-only MasterChef access.
pub mod reader;

pub use reader::MasterChefReader;
