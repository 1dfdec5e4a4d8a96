//! Position orchestration on behalf of an owner.

mod positions;
mod smart_wallet;

pub use positions::PositionBook;
pub use smart_wallet::{EVENT_CHANNEL_CAPACITY, SmartWallet, StakingPrograms};
