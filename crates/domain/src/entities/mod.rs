pub mod pool;
pub mod position;

// Re-export for easier access
pub use pool::PoolResolution;
pub use position::{Position, PositionKey};
