//! Scripted contract caller for adapter tests.

use crate::ProtocolError;
use crate::contracts::to_address;
use crate::rpc::EthCaller;
use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use farm_lp_domain::TokenId;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Answers calls from a fixed table; anything else reverts.
pub struct ScriptedCaller {
    responses: Mutex<HashMap<(Address, Vec<u8>), Vec<u8>>>,
    calls: AtomicUsize,
}

impl ScriptedCaller {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn respond(&self, to: TokenId, input: Vec<u8>, output: Vec<u8>) {
        self.responses
            .lock()
            .unwrap()
            .insert((to_address(to), input), output);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EthCaller for ScriptedCaller {
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ProtocolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .get(&(to, input.to_vec()))
            .cloned()
            .map(Bytes::from)
            .ok_or_else(|| ProtocolError::rejected("execution reverted"))
    }
}
