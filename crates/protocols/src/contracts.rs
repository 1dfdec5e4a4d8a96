//! Solidity interfaces of the contracts the readers call.
//!
//! Only the view functions the pool finder needs are declared.

use crate::ProtocolError;
use crate::rpc::EthCaller;
use alloy_primitives::Address;
use alloy_sol_types::{SolCall, sol};
use farm_lp_domain::TokenId;
use primitive_types::U256;

sol! {
    /// SushiSwap V2 pair factory.
    interface IUniswapV2Factory {
        function getPair(address tokenA, address tokenB) external view returns (address);
    }

    /// First-generation staking program. The receipt token is the first
    /// field of `poolInfo`.
    interface IMasterChef {
        function poolLength() external view returns (uint256);
        function poolInfo(uint256 pid) external view returns (
            address lpToken,
            uint256 allocPoint,
            uint256 lastRewardBlock,
            uint256 accSushiPerShare
        );
        function userInfo(uint256 pid, address user) external view returns (
            uint256 amount,
            uint256 rewardDebt
        );
    }

    /// Second-generation staking program.
    interface IMasterChefV2 {
        function poolLength() external view returns (uint256);
        function lpToken(uint256 pid) external view returns (address);
        function userInfo(uint256 pid, address user) external view returns (
            uint256 amount,
            int256 rewardDebt
        );
    }
}

/// Runs a view call against `to` and decodes its return value.
///
/// # Errors
/// Returns an error if the call fails or the return data does not decode.
pub async fn view<C: SolCall>(
    caller: &dyn EthCaller,
    to: Address,
    call: C,
) -> Result<C::Return, ProtocolError> {
    let output = caller.call(to, call.abi_encode().into()).await?;
    C::abi_decode_returns(&output)
        .map_err(|e| ProtocolError::decode(format!("{}: {e}", C::SIGNATURE)))
}

pub fn to_address(token: TokenId) -> Address {
    Address::from_slice(token.as_bytes())
}

pub fn from_address(address: Address) -> TokenId {
    TokenId::from_bytes(address.0.0)
}

pub fn to_u256(value: alloy_primitives::U256) -> U256 {
    U256::from_big_endian(&value.to_be_bytes::<32>())
}

/// Narrows a pool count or index read from chain.
///
/// # Errors
/// Returns a decode error if `value` does not fit in a `u64`.
pub fn to_index(value: alloy_primitives::U256) -> Result<u64, ProtocolError> {
    u64::try_from(value).map_err(|_| ProtocolError::decode(format!("{value} does not fit in u64")))
}
