use crate::contracts::{IMasterChef, IMasterChefV2, from_address, to_address, to_index, to_u256, view};
use crate::rpc::EthCaller;
use crate::{ProtocolError, StakingReader};
use alloy_primitives::Address;
use async_trait::async_trait;
use farm_lp_domain::{PairId, StakingGeneration, TokenId};
use primitive_types::U256;
use std::sync::Arc;
use tracing::{debug, info};

/// Reads pool registrations and balances from one MasterChef generation.
pub struct MasterChefReader {
    caller: Arc<dyn EthCaller>,
    address: TokenId,
    target: Address,
    generation: StakingGeneration,
}

impl MasterChefReader {
    pub fn new(caller: Arc<dyn EthCaller>, address: TokenId, generation: StakingGeneration) -> Self {
        Self {
            caller,
            address,
            target: to_address(address),
            generation,
        }
    }

    pub fn address(&self) -> TokenId {
        self.address
    }

    /// Number of registered pool slots.
    ///
    /// # Errors
    /// Returns an error if the call fails or the answer does not decode.
    pub async fn pool_length(&self) -> Result<u64, ProtocolError> {
        let length = view(
            self.caller.as_ref(),
            self.target,
            IMasterChef::poolLengthCall {},
        )
        .await?;
        to_index(length)
    }

    /// Receipt token registered at `pool_index`.
    ///
    /// # Errors
    /// Returns an error if the call fails or the answer does not decode.
    pub async fn receipt_token_at(&self, pool_index: u64) -> Result<TokenId, ProtocolError> {
        let pid = alloy_primitives::U256::from(pool_index);
        let token = match self.generation {
            StakingGeneration::V1 => {
                view(self.caller.as_ref(), self.target, IMasterChef::poolInfoCall { pid })
                    .await?
                    .lpToken
            }
            StakingGeneration::V2 => {
                view(self.caller.as_ref(), self.target, IMasterChefV2::lpTokenCall { pid }).await?
            }
        };
        Ok(from_address(token))
    }
}

#[async_trait]
impl StakingReader for MasterChefReader {
    fn generation(&self) -> StakingGeneration {
        self.generation
    }

    async fn pool_index_for(&self, pair: PairId) -> Result<Option<u64>, ProtocolError> {
        let length = self.pool_length().await?;
        debug!(
            generation = %self.generation,
            pool_length = length,
            pair = %pair,
            "Scanning staking pools"
        );

        for index in 0..length {
            if self.receipt_token_at(index).await? == pair.receipt_token() {
                info!(generation = %self.generation, pair = %pair, pool_index = index, "Pool found");
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    async fn user_info(&self, pool_index: u64, owner: TokenId) -> Result<U256, ProtocolError> {
        let pid = alloy_primitives::U256::from(pool_index);
        let user = to_address(owner);
        let amount = match self.generation {
            StakingGeneration::V1 => {
                view(self.caller.as_ref(), self.target, IMasterChef::userInfoCall { pid, user })
                    .await?
                    .amount
            }
            StakingGeneration::V2 => {
                view(
                    self.caller.as_ref(),
                    self.target,
                    IMasterChefV2::userInfoCall { pid, user },
                )
                .await?
                .amount
            }
        };
        Ok(to_u256(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedCaller;
    use alloy_sol_types::{SolCall, SolValue};

    fn chef() -> TokenId {
        TokenId::from_bytes([0xc2; 20])
    }

    fn token(n: u8) -> TokenId {
        TokenId::from_bytes([n; 20])
    }

    fn script_pools(caller: &ScriptedCaller, generation: StakingGeneration, tokens: &[TokenId]) {
        caller.respond(
            chef(),
            IMasterChef::poolLengthCall {}.abi_encode(),
            alloy_primitives::U256::from(tokens.len()).abi_encode(),
        );
        for (i, t) in tokens.iter().enumerate() {
            let pid = alloy_primitives::U256::from(i);
            let (input, output) = match generation {
                StakingGeneration::V1 => (
                    IMasterChef::poolInfoCall { pid }.abi_encode(),
                    (
                        to_address(*t),
                        alloy_primitives::U256::from(100u64),
                        alloy_primitives::U256::ZERO,
                        alloy_primitives::U256::ZERO,
                    )
                        .abi_encode(),
                ),
                StakingGeneration::V2 => (
                    IMasterChefV2::lpTokenCall { pid }.abi_encode(),
                    to_address(*t).abi_encode(),
                ),
            };
            caller.respond(chef(), input, output);
        }
    }

    #[tokio::test]
    async fn test_v1_scan_finds_pool_index() {
        let caller = Arc::new(ScriptedCaller::new());
        let tokens: Vec<TokenId> = (1..=40u8).map(token).collect();
        script_pools(&caller, StakingGeneration::V1, &tokens);

        let reader = MasterChefReader::new(caller, chef(), StakingGeneration::V1);
        let pair = PairId::new(token(36)).unwrap();

        assert_eq!(reader.pool_index_for(pair).await.unwrap(), Some(35));
    }

    #[tokio::test]
    async fn test_v2_scan_reports_unregistered_pair() {
        let caller = Arc::new(ScriptedCaller::new());
        script_pools(&caller, StakingGeneration::V2, &[token(1), token(2)]);

        let reader = MasterChefReader::new(caller.clone(), chef(), StakingGeneration::V2);
        let pair = PairId::new(token(9)).unwrap();

        assert_eq!(reader.pool_index_for(pair).await.unwrap(), None);
        // poolLength plus one lpToken call per slot
        assert_eq!(caller.call_count(), 3);
    }

    #[tokio::test]
    async fn test_user_info_reads_staked_amount() {
        let caller = Arc::new(ScriptedCaller::new());
        let wallet = token(0x77);
        caller.respond(
            chef(),
            IMasterChefV2::userInfoCall {
                pid: alloy_primitives::U256::from(23u64),
                user: to_address(wallet),
            }
            .abi_encode(),
            (
                alloy_primitives::U256::from(10_000_000u64),
                alloy_primitives::U256::from(42u64),
            )
                .abi_encode(),
        );

        let reader = MasterChefReader::new(caller, chef(), StakingGeneration::V2);
        assert_eq!(
            reader.user_info(23, wallet).await.unwrap(),
            U256::from(10_000_000u64)
        );
    }
}
