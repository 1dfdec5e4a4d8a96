//! Read-only contract calls over an alloy provider.

use crate::ProtocolError;
use alloy_primitives::{Address, Bytes};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use anyhow::Context;
use async_trait::async_trait;
use tracing::debug;

/// Executes a read-only contract call.
#[async_trait]
pub trait EthCaller: Send + Sync {
    /// Runs `input` against `to` at the latest block and returns the raw bytes.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ProtocolError>;
}

/// `eth_call` through any alloy provider.
#[derive(Clone)]
pub struct ProviderCaller {
    provider: DynProvider,
}

impl ProviderCaller {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }

    /// Connects to a node over HTTP.
    ///
    /// # Errors
    /// Returns an error if `rpc_url` is not a valid URL.
    pub fn connect_http(rpc_url: &str) -> Result<Self, ProtocolError> {
        let url: reqwest::Url = rpc_url
            .parse()
            .with_context(|| format!("invalid RPC url {rpc_url:?}"))?;
        debug!(url = %url, "Connecting RPC provider");
        Ok(Self::new(ProviderBuilder::new().connect_http(url).erased()))
    }
}

#[async_trait]
impl EthCaller for ProviderCaller {
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ProtocolError> {
        debug!(to = %to, bytes = input.len(), "eth_call");
        let tx = TransactionRequest::default().to(to).input(input.into());
        Ok(self.provider.call(tx).await?)
    }
}
