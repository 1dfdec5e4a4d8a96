//! Network and wallet configuration.

use crate::address::{TokenId, validate};
use crate::enums::StakingGeneration;
use crate::value_objects::Slippage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mainnet chain id.
pub const MAINNET_CHAIN_ID: u64 = 1;
/// Local fork chain id; uses mainnet deployments.
pub const LOCAL_FORK_CHAIN_ID: u64 = 31337;

const SUSHI_V2_FACTORY: &str = "0xC0AEe478e3658e2610c5F7A4A2E1777cE9e4f2Ac";
const SUSHI_ROUTER: &str = "0xd9e1cE17f2641f24aE83637ab66a2cca9C378B9F";
const MASTER_CHEF_V1: &str = "0xc2EdaD668740f1aA35E4D8f227fB8E17dcA888Cd";
const MASTER_CHEF_V2: &str = "0xef0881ec094552b2e128cf945ef17a6752b4ec5d";

const EXCHANGE_SUBGRAPH_URL: &str = "https://api.thegraph.com/subgraphs/name/sushiswap/exchange";
const STAKING_SUBGRAPH_ID: &str = "7h1x51fyT5KigAhXd8sdE3kzzxQDJxxz1y66LTFiC3mS";
const GRAPH_GATEWAY: &str = "https://gateway.thegraph.com/api";

/// Environment variable selecting the chain.
pub const ENV_CHAIN_ID: &str = "FARM_LP_CHAIN_ID";
/// Environment variable holding the JSON-RPC endpoint.
pub const ENV_RPC_URL: &str = "MAINNET_RPC_URL";
/// Environment variable holding the indexer gateway key.
pub const ENV_GRAPH_API_KEY: &str = "THEGRAPH_API_KEY";

/// Errors raised while assembling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    MissingVar(&'static str),
    #[error("{name} has an invalid value: {value}")]
    InvalidVar { name: &'static str, value: String },
    #[error("no deployment known for chain id {0}")]
    UnknownChain(u64),
}

/// Deployment addresses and endpoints for one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network_name: String,
    pub chain_id: u64,
    pub block_confirmations: u32,
    /// AMM factory answering pair lookups.
    pub factory: TokenId,
    /// AMM router used for deposits and redemptions.
    pub router: TokenId,
    pub master_chef_v1: TokenId,
    pub master_chef_v2: TokenId,
    pub rpc_url: Option<String>,
    pub exchange_subgraph_url: String,
    pub staking_subgraph_id: String,
    pub graph_api_key: Option<String>,
}

impl NetworkConfig {
    /// Ethereum mainnet deployments.
    ///
    /// # Panics
    /// Panics if a built-in address literal is malformed.
    #[must_use]
    pub fn mainnet() -> Self {
        Self {
            network_name: "mainnet".to_string(),
            chain_id: MAINNET_CHAIN_ID,
            block_confirmations: 1,
            factory: known(SUSHI_V2_FACTORY),
            router: known(SUSHI_ROUTER),
            master_chef_v1: known(MASTER_CHEF_V1),
            master_chef_v2: known(MASTER_CHEF_V2),
            rpc_url: None,
            exchange_subgraph_url: EXCHANGE_SUBGRAPH_URL.to_string(),
            staking_subgraph_id: STAKING_SUBGRAPH_ID.to_string(),
            graph_api_key: None,
        }
    }

    /// Known deployment for a chain id.
    #[must_use]
    pub fn for_chain(chain_id: u64) -> Option<Self> {
        match chain_id {
            MAINNET_CHAIN_ID => Some(Self::mainnet()),
            LOCAL_FORK_CHAIN_ID => Some(Self {
                network_name: "localhost".to_string(),
                chain_id,
                rpc_url: Some("http://127.0.0.1:8545".to_string()),
                ..Self::mainnet()
            }),
            _ => None,
        }
    }

    /// Reads overrides from the process environment.
    ///
    /// # Errors
    /// Returns an error if the chain is unknown, a variable is malformed, or no
    /// RPC endpoint is available.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`NetworkConfig::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    /// See [`NetworkConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chain_id = match lookup(ENV_CHAIN_ID) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
                name: ENV_CHAIN_ID,
                value: raw,
            })?,
            None => MAINNET_CHAIN_ID,
        };

        let mut config = Self::for_chain(chain_id).ok_or(ConfigError::UnknownChain(chain_id))?;

        if let Some(url) = lookup(ENV_RPC_URL).filter(|u| !u.trim().is_empty()) {
            config.rpc_url = Some(url);
        }
        if config.rpc_url.is_none() {
            return Err(ConfigError::MissingVar(ENV_RPC_URL));
        }
        config.graph_api_key = lookup(ENV_GRAPH_API_KEY).filter(|k| !k.trim().is_empty());

        Ok(config)
    }

    /// Staking subgraph endpoint; the gateway requires an API key.
    #[must_use]
    pub fn staking_subgraph_url(&self) -> Option<String> {
        self.graph_api_key.as_ref().map(|key| {
            format!(
                "{GRAPH_GATEWAY}/{key}/subgraphs/id/{}",
                self.staking_subgraph_id
            )
        })
    }

    /// Staking program address for a generation.
    #[must_use]
    pub fn master_chef(&self, generation: StakingGeneration) -> TokenId {
        match generation {
            StakingGeneration::V1 => self.master_chef_v1,
            StakingGeneration::V2 => self.master_chef_v2,
        }
    }
}

fn known(address: &'static str) -> TokenId {
    validate(address).expect("invalid built-in address")
}

/// Defaults the wallet applies when building requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Tolerance used to derive minimum amounts.
    pub slippage: Slippage,
    /// Seconds added to "now" to form a deadline.
    pub deadline_secs: u64,
}

impl WalletConfig {
    /// Deadline for a request built at unix time `now`.
    #[must_use]
    pub fn deadline_from(&self, now: u64) -> u64 {
        now.saturating_add(self.deadline_secs)
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            slippage: Slippage::default(),
            deadline_secs: 1_200,
        }
    }
}
