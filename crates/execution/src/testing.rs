//! In-memory chain used by resolver and wallet tests.
//!
//! One [`SimChain`] plays every external state owner: factory, router/pool,
//! token ledger and both staking generations. Write calls act as the wallet
//! account returned by [`SimChain::wallet`].

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use farm_lp_data::{GraphQlTransport, IndexedLookupClient, IndexerError};
use farm_lp_domain::address::{canonical_order, validate};
use farm_lp_domain::{PairId, StakingGeneration, TokenId};
use farm_lp_protocols::contracts::to_address;
use farm_lp_protocols::rpc::EthCaller;
use farm_lp_protocols::{
    AddLiquidityParams, AmmFactory, AmmPool, LiquidityAdded, LiquidityRemoved, ProtocolError,
    RemoveLiquidityParams, StakingProgram, StakingReader, TokenLedger,
};
use primitive_types::U256;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const WALLET: TokenId = TokenId::from_bytes([0x5a; 20]);

/// Capability calls that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimOp {
    GetPair,
    PoolIndexFor,
    UserInfo,
    TransferFrom,
    Transfer,
    AddLiquidity,
    RemoveLiquidity,
    Deposit,
    Withdraw,
}

#[derive(Default)]
struct SimPool {
    reserves: HashMap<TokenId, U256>,
    supply: U256,
}

#[derive(Default)]
struct ChainState {
    now: u64,
    balances: HashMap<(TokenId, TokenId), U256>,
    allowances: HashMap<(TokenId, TokenId), U256>,
    pairs: HashMap<(TokenId, TokenId), TokenId>,
    pools: HashMap<TokenId, SimPool>,
    registry: HashMap<StakingGeneration, Vec<TokenId>>,
    stakes: HashMap<(StakingGeneration, u64, TokenId), U256>,
    failing: HashSet<SimOp>,
}

impl ChainState {
    fn balance(&self, token: TokenId, account: TokenId) -> U256 {
        self.balances
            .get(&(token, account))
            .copied()
            .unwrap_or_default()
    }

    fn credit(&mut self, token: TokenId, account: TokenId, amount: U256) {
        *self.balances.entry((token, account)).or_default() += amount;
    }

    fn debit(&mut self, token: TokenId, account: TokenId, amount: U256) -> Result<(), ProtocolError> {
        let balance = self.balance(token, account);
        if balance < amount {
            return Err(ProtocolError::rejected("ERC20: transfer amount exceeds balance"));
        }
        self.balances.insert((token, account), balance - amount);
        Ok(())
    }

    fn check_deadline(&self, deadline: u64) -> Result<(), ProtocolError> {
        if deadline < self.now {
            return Err(ProtocolError::rejected("UniswapV2Router: EXPIRED"));
        }
        Ok(())
    }

    fn pair_for(&self, a: TokenId, b: TokenId) -> Result<TokenId, ProtocolError> {
        self.pairs
            .get(&canonical_order(a, b))
            .copied()
            .ok_or_else(|| ProtocolError::rejected("pair does not exist"))
    }
}

pub struct SimChain {
    state: Mutex<ChainState>,
    calls: AtomicUsize,
}

impl SimChain {
    pub fn new() -> Arc<Self> {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Arc::new(Self {
            state: Mutex::new(ChainState {
                now: 1_700_000_000,
                ..ChainState::default()
            }),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn wallet(&self) -> TokenId {
        WALLET
    }

    pub fn now(&self) -> u64 {
        self.state.lock().unwrap().now
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_on(&self, op: SimOp) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub fn heal(&self, op: SimOp) {
        self.state.lock().unwrap().failing.remove(&op);
    }

    /// Registers a pair. The factory only answers for the canonical
    /// `(greater, lesser)` argument order.
    pub fn create_pair(&self, a: TokenId, b: TokenId, pair: TokenId) {
        let mut state = self.state.lock().unwrap();
        state.pairs.insert(canonical_order(a, b), pair);
        let pool = state.pools.entry(pair).or_default();
        pool.reserves.entry(a).or_default();
        pool.reserves.entry(b).or_default();
    }

    pub fn seed_pool(&self, pair: TokenId, a: (TokenId, U256), b: (TokenId, U256), supply: U256) {
        let mut state = self.state.lock().unwrap();
        let pool = state.pools.entry(pair).or_default();
        pool.reserves.insert(a.0, a.1);
        pool.reserves.insert(b.0, b.1);
        pool.supply = supply;
    }

    pub fn register_pools(&self, generation: StakingGeneration, receipt_tokens: Vec<TokenId>) {
        self.state
            .lock()
            .unwrap()
            .registry
            .insert(generation, receipt_tokens);
    }

    pub fn mint(&self, token: TokenId, account: TokenId, amount: U256) {
        self.state.lock().unwrap().credit(token, account, amount);
    }

    /// `owner` lets the wallet spend `amount` of `token`.
    pub fn approve(&self, token: TokenId, owner: TokenId, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((token, owner), amount);
    }

    pub fn balance(&self, token: TokenId, account: TokenId) -> U256 {
        self.state.lock().unwrap().balance(token, account)
    }

    pub fn stake_of(&self, generation: StakingGeneration, pool_index: u64, account: TokenId) -> U256 {
        self.state
            .lock()
            .unwrap()
            .stakes
            .get(&(generation, pool_index, account))
            .copied()
            .unwrap_or_default()
    }

    pub fn staking(self: &Arc<Self>, generation: StakingGeneration) -> Arc<SimStaking> {
        Arc::new(SimStaking {
            chain: self.clone(),
            generation,
        })
    }

    fn enter(&self, op: SimOp) -> Result<(), ProtocolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.state.lock().unwrap().failing.contains(&op) {
            return Err(ProtocolError::rejected(format!("injected failure in {op:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl AmmFactory for SimChain {
    async fn get_pair(&self, token_a: TokenId, token_b: TokenId) -> Result<TokenId, ProtocolError> {
        self.enter(SimOp::GetPair)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .pairs
            .get(&(token_a, token_b))
            .copied()
            .unwrap_or(TokenId::ZERO))
    }
}

#[async_trait]
impl AmmPool for SimChain {
    async fn add_liquidity(
        &self,
        params: &AddLiquidityParams,
    ) -> Result<LiquidityAdded, ProtocolError> {
        self.enter(SimOp::AddLiquidity)?;
        let mut state = self.state.lock().unwrap();
        state.check_deadline(params.deadline)?;
        let pair = state.pair_for(params.token_a, params.token_b)?;

        let pool = state.pools.entry(pair).or_default();
        let reserve_a = pool.reserves.get(&params.token_a).copied().unwrap_or_default();
        let reserve_b = pool.reserves.get(&params.token_b).copied().unwrap_or_default();
        let supply = pool.supply;

        let (amount_a, amount_b) = if reserve_a.is_zero() && reserve_b.is_zero() {
            (params.amount_a_desired, params.amount_b_desired)
        } else {
            let b_optimal = params.amount_a_desired * reserve_b / reserve_a;
            if b_optimal <= params.amount_b_desired {
                if b_optimal < params.amount_b_min {
                    return Err(ProtocolError::rejected("INSUFFICIENT_B_AMOUNT"));
                }
                (params.amount_a_desired, b_optimal)
            } else {
                let a_optimal = params.amount_b_desired * reserve_a / reserve_b;
                if a_optimal < params.amount_a_min {
                    return Err(ProtocolError::rejected("INSUFFICIENT_A_AMOUNT"));
                }
                (a_optimal, params.amount_b_desired)
            }
        };

        let liquidity = if supply.is_zero() {
            (amount_a * amount_b).integer_sqrt()
        } else {
            (amount_a * supply / reserve_a).min(amount_b * supply / reserve_b)
        };
        if liquidity.is_zero() {
            return Err(ProtocolError::rejected("INSUFFICIENT_LIQUIDITY_MINTED"));
        }

        state.debit(params.token_a, WALLET, amount_a)?;
        state.debit(params.token_b, WALLET, amount_b)?;
        let pool = state.pools.entry(pair).or_default();
        *pool.reserves.entry(params.token_a).or_default() += amount_a;
        *pool.reserves.entry(params.token_b).or_default() += amount_b;
        pool.supply += liquidity;
        state.credit(pair, params.to, liquidity);

        Ok(LiquidityAdded {
            amount_a,
            amount_b,
            liquidity,
        })
    }

    async fn remove_liquidity(
        &self,
        params: &RemoveLiquidityParams,
    ) -> Result<LiquidityRemoved, ProtocolError> {
        self.enter(SimOp::RemoveLiquidity)?;
        let mut state = self.state.lock().unwrap();
        state.check_deadline(params.deadline)?;
        let pair = state.pair_for(params.token_a, params.token_b)?;

        let pool = state.pools.entry(pair).or_default();
        if pool.supply.is_zero() {
            return Err(ProtocolError::rejected("INSUFFICIENT_LIQUIDITY_BURNED"));
        }
        let reserve_a = pool.reserves.get(&params.token_a).copied().unwrap_or_default();
        let reserve_b = pool.reserves.get(&params.token_b).copied().unwrap_or_default();
        let amount_a = params.liquidity * reserve_a / pool.supply;
        let amount_b = params.liquidity * reserve_b / pool.supply;
        if amount_a < params.amount_a_min {
            return Err(ProtocolError::rejected("INSUFFICIENT_A_AMOUNT"));
        }
        if amount_b < params.amount_b_min {
            return Err(ProtocolError::rejected("INSUFFICIENT_B_AMOUNT"));
        }

        state.debit(pair, WALLET, params.liquidity)?;
        let pool = state.pools.entry(pair).or_default();
        pool.supply -= params.liquidity;
        *pool.reserves.entry(params.token_a).or_default() -= amount_a;
        *pool.reserves.entry(params.token_b).or_default() -= amount_b;
        state.credit(params.token_a, params.to, amount_a);
        state.credit(params.token_b, params.to, amount_b);

        Ok(LiquidityRemoved { amount_a, amount_b })
    }
}

#[async_trait]
impl TokenLedger for SimChain {
    async fn transfer_from(
        &self,
        token: TokenId,
        from: TokenId,
        to: TokenId,
        amount: U256,
    ) -> Result<(), ProtocolError> {
        self.enter(SimOp::TransferFrom)?;
        let mut state = self.state.lock().unwrap();
        let allowance = state
            .allowances
            .get(&(token, from))
            .copied()
            .unwrap_or_default();
        if allowance < amount {
            return Err(ProtocolError::rejected("ERC20: insufficient allowance"));
        }
        state.debit(token, from, amount)?;
        state.credit(token, to, amount);
        state.allowances.insert((token, from), allowance - amount);
        Ok(())
    }

    async fn transfer(&self, token: TokenId, to: TokenId, amount: U256) -> Result<(), ProtocolError> {
        self.enter(SimOp::Transfer)?;
        let mut state = self.state.lock().unwrap();
        state.debit(token, WALLET, amount)?;
        state.credit(token, to, amount);
        Ok(())
    }
}

/// One staking generation of a [`SimChain`].
pub struct SimStaking {
    chain: Arc<SimChain>,
    generation: StakingGeneration,
}

#[async_trait]
impl StakingReader for SimStaking {
    fn generation(&self) -> StakingGeneration {
        self.generation
    }

    async fn pool_index_for(&self, pair: PairId) -> Result<Option<u64>, ProtocolError> {
        self.chain.enter(SimOp::PoolIndexFor)?;
        let state = self.chain.state.lock().unwrap();
        Ok(state.registry.get(&self.generation).and_then(|slots| {
            slots
                .iter()
                .position(|t| *t == pair.receipt_token())
                .map(|i| i as u64)
        }))
    }

    async fn user_info(&self, pool_index: u64, owner: TokenId) -> Result<U256, ProtocolError> {
        self.chain.enter(SimOp::UserInfo)?;
        Ok(self.chain.stake_of(self.generation, pool_index, owner))
    }
}

#[async_trait]
impl StakingProgram for SimStaking {
    async fn deposit(&self, pool_index: u64, amount: U256) -> Result<(), ProtocolError> {
        self.chain.enter(SimOp::Deposit)?;
        let mut state = self.chain.state.lock().unwrap();
        let receipt = state
            .registry
            .get(&self.generation)
            .and_then(|slots| slots.get(pool_index as usize).copied())
            .ok_or_else(|| ProtocolError::rejected("invalid pool"))?;
        state.debit(receipt, WALLET, amount)?;
        *state
            .stakes
            .entry((self.generation, pool_index, WALLET))
            .or_default() += amount;
        Ok(())
    }

    async fn withdraw(&self, pool_index: u64, amount: U256) -> Result<(), ProtocolError> {
        self.chain.enter(SimOp::Withdraw)?;
        let mut state = self.chain.state.lock().unwrap();
        let receipt = state
            .registry
            .get(&self.generation)
            .and_then(|slots| slots.get(pool_index as usize).copied())
            .ok_or_else(|| ProtocolError::rejected("invalid pool"))?;
        let staked = state
            .stakes
            .entry((self.generation, pool_index, WALLET))
            .or_default();
        if *staked < amount {
            return Err(ProtocolError::rejected("withdraw: not good"));
        }
        *staked -= amount;
        state.credit(receipt, WALLET, amount);
        Ok(())
    }
}

/// Exchange subgraph stub answering every pair query the same way.
pub struct CannedIndexer {
    answer: Option<Value>,
}

impl CannedIndexer {
    pub fn pair(found: Option<TokenId>) -> Self {
        let pairs = match found {
            Some(pair) => json!([{ "id": pair.to_string() }]),
            None => json!([]),
        };
        Self {
            answer: Some(json!({ "pairs": pairs })),
        }
    }

    pub fn down() -> Self {
        Self { answer: None }
    }

    pub fn client(self) -> Arc<IndexedLookupClient> {
        Arc::new(IndexedLookupClient::new(Arc::new(self), None))
    }
}

#[async_trait]
impl GraphQlTransport for CannedIndexer {
    async fn query(&self, _query: &str, _variables: Value) -> Result<Value, IndexerError> {
        self.answer.clone().ok_or(IndexerError::Status(503))
    }
}

/// Node stub answering `eth_call` from a fixed table; anything else reverts.
#[derive(Default)]
pub struct ScriptedRpc {
    responses: HashMap<(Address, Vec<u8>), Vec<u8>>,
}

impl ScriptedRpc {
    pub fn respond(mut self, to: TokenId, input: Vec<u8>, output: Vec<u8>) -> Self {
        self.responses.insert((to_address(to), input), output);
        self
    }
}

#[async_trait]
impl EthCaller for ScriptedRpc {
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ProtocolError> {
        self.responses
            .get(&(to, input.to_vec()))
            .cloned()
            .map(Bytes::from)
            .ok_or_else(|| ProtocolError::rejected("execution reverted"))
    }
}

/// Token A, token B and their pool on mainnet.
pub fn scenario_a() -> (TokenId, TokenId, TokenId) {
    (
        validate("0x0391d2021f89dc339f60fff84546ea23e337750f").unwrap(),
        validate("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap(),
        validate("0x613C836DF6695c10f0f4900528B6931441Ac5d5a").unwrap(),
    )
}

/// `count` distinct receipt tokens that match no real pair.
pub fn filler_pools(count: u8) -> Vec<TokenId> {
    (0..count)
        .map(|i| {
            let mut bytes = [0xf0u8; 20];
            bytes[19] = i;
            TokenId::from_bytes(bytes)
        })
        .collect()
}

/// USDC/QUARTZ pool registered at V2 index 23, with a funded and approved owner.
pub struct Farm {
    pub chain: Arc<SimChain>,
    pub usdc: TokenId,
    pub quartz: TokenId,
    pub pair: TokenId,
    pub owner: TokenId,
}

impl Farm {
    pub const POOL_INDEX: u64 = 23;

    pub fn new() -> Self {
        let chain = SimChain::new();
        let usdc = validate("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").unwrap();
        let quartz = validate("0xba8a621b4a54e61c442f5ec623687e2a942225ef").unwrap();
        let pair = validate("0x1E888882D0F291DD88C5605108c72d414f29D460").unwrap();
        let owner = validate("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").unwrap();

        chain.create_pair(usdc, quartz, pair);
        chain.seed_pool(
            pair,
            (usdc, U256::from(1_000_000u64) * U256::exp10(6)),
            (quartz, U256::from(1_368_400u64) * U256::exp10(18)),
            U256::exp10(18),
        );
        let mut v2 = filler_pools(Self::POOL_INDEX as u8);
        v2.push(pair);
        chain.register_pools(StakingGeneration::V2, v2);
        chain.register_pools(StakingGeneration::V1, filler_pools(4));

        let usdc_funds = U256::from(1_000u64) * U256::exp10(6);
        let quartz_funds = U256::from(2_000u64) * U256::exp10(18);
        chain.mint(usdc, owner, usdc_funds);
        chain.mint(quartz, owner, quartz_funds);
        chain.approve(usdc, owner, usdc_funds);
        chain.approve(quartz, owner, quartz_funds);

        Self {
            chain,
            usdc,
            quartz,
            pair,
            owner,
        }
    }

    pub fn pair_id(&self) -> PairId {
        PairId::new(self.pair).unwrap()
    }
}
