use crate::contracts::{IUniswapV2Factory, from_address, to_address, view};
use crate::rpc::EthCaller;
use crate::{AmmFactory, ProtocolError};
use alloy_primitives::Address;
use async_trait::async_trait;
use farm_lp_domain::TokenId;
use std::sync::Arc;
use tracing::debug;

/// Pair lookup against a deployed V2 factory.
pub struct FactoryReader {
    caller: Arc<dyn EthCaller>,
    address: TokenId,
    target: Address,
}

impl FactoryReader {
    pub fn new(caller: Arc<dyn EthCaller>, address: TokenId) -> Self {
        Self {
            caller,
            address,
            target: to_address(address),
        }
    }

    pub fn address(&self) -> TokenId {
        self.address
    }
}

#[async_trait]
impl AmmFactory for FactoryReader {
    async fn get_pair(&self, token_a: TokenId, token_b: TokenId) -> Result<TokenId, ProtocolError> {
        let call = IUniswapV2Factory::getPairCall {
            tokenA: to_address(token_a),
            tokenB: to_address(token_b),
        };
        let pair = from_address(view(self.caller.as_ref(), self.target, call).await?);

        debug!(
            factory = %self.address,
            token_a = %token_a,
            token_b = %token_b,
            pair = %pair,
            "Factory pair lookup"
        );
        Ok(pair)
    }
}
