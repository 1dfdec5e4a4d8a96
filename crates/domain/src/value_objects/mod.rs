pub mod amount;
pub mod slippage;

pub use amount::{Amount, AmountError};
pub use slippage::Slippage;
