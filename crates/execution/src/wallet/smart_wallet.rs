//! Enter and exit flows for a liquidity-mining position.

use super::PositionBook;
use crate::error::{ExecutionError, FlowState, FlowStep, Residue};
use farm_lp_domain::{
    EnterRequest, ExitMode, ExitRequest, PositionDelta, PositionEvent, PositionKey,
    StakingGeneration, StakingVersion, TokenId, TokenPair, WithdrawalResult,
};
use farm_lp_protocols::{
    AddLiquidityParams, AmmPool, ProtocolError, RemoveLiquidityParams, StakingProgram, TokenLedger,
};
use primitive_types::U256;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Buffered position events per subscriber.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The two staking generations the wallet can stake into.
#[derive(Clone)]
pub struct StakingPrograms {
    v1: Arc<dyn StakingProgram>,
    v2: Arc<dyn StakingProgram>,
}

impl StakingPrograms {
    pub fn new(v1: Arc<dyn StakingProgram>, v2: Arc<dyn StakingProgram>) -> Self {
        Self { v1, v2 }
    }

    pub fn get(&self, generation: StakingGeneration) -> &Arc<dyn StakingProgram> {
        match generation {
            StakingGeneration::V1 => &self.v1,
            StakingGeneration::V2 => &self.v2,
        }
    }
}

/// Sequences deposit/stake and unstake/redeem for owners.
///
/// Steps run strictly in order, each feeding the next. A failed step stops the
/// flow; earlier steps are not undone and whatever the wallet still holds is
/// reported on the error. Calls for the same position are not serialized.
pub struct SmartWallet {
    /// Account that holds custody between steps and owns the stakes.
    address: TokenId,
    pool: Arc<dyn AmmPool>,
    ledger: Arc<dyn TokenLedger>,
    programs: StakingPrograms,
    positions: PositionBook,
    events: broadcast::Sender<PositionEvent>,
}

impl SmartWallet {
    pub fn new(
        address: TokenId,
        pool: Arc<dyn AmmPool>,
        ledger: Arc<dyn TokenLedger>,
        programs: StakingPrograms,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            address,
            pool,
            ledger,
            programs,
            positions: PositionBook::new(),
            events,
        }
    }

    pub fn address(&self) -> TokenId {
        self.address
    }

    pub fn positions(&self) -> &PositionBook {
        &self.positions
    }

    /// Receives every `PositionEntered` and `PositionExited` emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PositionEvent> {
        self.events.subscribe()
    }

    /// Deposits both tokens into the pool and stakes every receipt token received.
    ///
    /// The owner must have let the wallet spend both amounts beforehand. Any
    /// part of the deposit the pool does not take is sent back to the owner.
    ///
    /// # Errors
    /// - `Unresolved` if the request names no generation, before any call.
    /// - `InvalidInput` for `Both`, equal tokens, zero amounts or floors above
    ///   the amounts, before any call.
    /// - `ExternalCall` if a step fails, carrying the state reached and the
    ///   tokens left in the wallet.
    pub async fn enter(&self, req: &EnterRequest) -> Result<PositionDelta, ExecutionError> {
        let generation = select_generation(req.version)?;
        let pair = TokenPair::new(req.token_a, req.token_b)?;
        if req.amount_a.is_zero() || req.amount_b.is_zero() {
            return Err(ExecutionError::invalid("deposit amounts must be positive"));
        }
        if req.min_amount_a > req.amount_a || req.min_amount_b > req.amount_b {
            return Err(ExecutionError::invalid(
                "minimum accepted amount exceeds the deposit",
            ));
        }
        let program = self.programs.get(generation);
        let receipt = req.pair_id.receipt_token();

        info!(
            owner = %req.owner,
            pair = %req.pair_id,
            tokens = %pair,
            generation = %generation,
            pool_index = req.pool_index,
            "Entering position"
        );
        let mut state = FlowState::Idle;

        debug!(token = %req.token_a, amount = %req.amount_a, "Pulling token A");
        self.ledger
            .transfer_from(req.token_a, req.owner, self.address, req.amount_a)
            .await
            .map_err(|e| halt(FlowStep::PullTokenA, state, Vec::new(), e))?;

        debug!(token = %req.token_b, amount = %req.amount_b, "Pulling token B");
        self.ledger
            .transfer_from(req.token_b, req.owner, self.address, req.amount_b)
            .await
            .map_err(|e| {
                halt(
                    FlowStep::PullTokenB,
                    state,
                    residue(&[(req.token_a, req.amount_a)]),
                    e,
                )
            })?;

        debug!(pair = %req.pair_id, deadline = req.deadline, "Adding liquidity");
        let added = self
            .pool
            .add_liquidity(&AddLiquidityParams {
                token_a: req.token_a,
                token_b: req.token_b,
                amount_a_desired: req.amount_a,
                amount_b_desired: req.amount_b,
                amount_a_min: req.min_amount_a,
                amount_b_min: req.min_amount_b,
                to: self.address,
                deadline: req.deadline,
            })
            .await
            .map_err(|e| {
                halt(
                    FlowStep::AddLiquidity,
                    state,
                    residue(&[(req.token_a, req.amount_a), (req.token_b, req.amount_b)]),
                    e,
                )
            })?;
        state = advance(state, FlowState::Deposited);
        info!(
            pair = %req.pair_id,
            amount_a = %added.amount_a,
            amount_b = %added.amount_b,
            liquidity = %added.liquidity,
            "Liquidity added"
        );

        let unused = [
            (req.token_a, req.amount_a.saturating_sub(added.amount_a)),
            (req.token_b, req.amount_b.saturating_sub(added.amount_b)),
        ];

        debug!(generation = %generation, pool_index = req.pool_index, "Staking receipt tokens");
        program
            .deposit(req.pool_index, added.liquidity)
            .await
            .map_err(|e| {
                let mut held = residue(&[(receipt, added.liquidity)]);
                held.extend(residue(&unused));
                halt(FlowStep::Stake, state, held, e)
            })?;
        state = advance(state, FlowState::Staked);

        let key = PositionKey {
            owner: req.owner,
            pair_id: req.pair_id,
            generation,
        };
        let staked_total = self.positions.record_stake(key, added.liquidity).await;
        info!(
            generation = %generation,
            pool_index = req.pool_index,
            staked = %added.liquidity,
            staked_total = %staked_total,
            "Receipt tokens staked"
        );

        self.publish(PositionEvent::entered(
            req.owner,
            req.pair_id,
            generation,
            req.pool_index,
            added.liquidity,
        ));

        self.send_all(req.owner, &unused, FlowStep::RefundUnused, state)
            .await?;
        let state = advance(state, FlowState::Done);
        info!(
            owner = %req.owner,
            pair = %req.pair_id,
            received = %added.liquidity,
            state = %state,
            "Position entered"
        );

        Ok(PositionDelta {
            owner: req.owner,
            pair_id: req.pair_id,
            generation,
            pool_index: req.pool_index,
            deposited_a: added.amount_a,
            deposited_b: added.amount_b,
            receipt_staked: added.liquidity,
            staked_total,
        })
    }

    /// Unstakes receipt tokens and hands the value back to the owner.
    ///
    /// With [`ExitMode::RedeemUnderlying`] the receipt tokens are redeemed at
    /// the pool and both underlying tokens are sent to the owner. With
    /// [`ExitMode::ReturnReceipt`] the receipt tokens themselves are sent.
    ///
    /// Only receipt tokens this wallet staked for `req.owner` can be withdrawn.
    ///
    /// # Errors
    /// - `InvalidInput` if the owner's recorded stake is smaller than
    ///   `req.amount`, before any call.
    /// - Otherwise the same taxonomy as [`SmartWallet::enter`].
    pub async fn exit(&self, req: &ExitRequest) -> Result<WithdrawalResult, ExecutionError> {
        let generation = select_generation(req.version)?;
        TokenPair::new(req.token_a, req.token_b)?;
        if req.amount.is_zero() {
            return Err(ExecutionError::invalid("withdrawal amount must be positive"));
        }
        let program = self.programs.get(generation);
        let receipt = req.pair_id.receipt_token();
        let key = PositionKey {
            owner: req.owner,
            pair_id: req.pair_id,
            generation,
        };
        // The program holds one combined stake for the wallet, so only the
        // book knows how much of it belongs to this owner.
        let Some(staked_remaining) = self.positions.record_unstake(key, req.amount).await else {
            warn!(
                owner = %req.owner,
                pair = %req.pair_id,
                generation = %generation,
                amount = %req.amount,
                "Withdrawal exceeds the owner's recorded stake"
            );
            return Err(ExecutionError::invalid(format!(
                "{} has less than {} staked in {} {}",
                req.owner, req.amount, req.pair_id, generation
            )));
        };

        info!(
            owner = %req.owner,
            pair = %req.pair_id,
            generation = %generation,
            pool_index = req.pool_index,
            amount = %req.amount,
            mode = ?req.mode,
            "Exiting position"
        );
        let mut state = FlowState::Idle;

        debug!(generation = %generation, pool_index = req.pool_index, "Unstaking receipt tokens");
        if let Err(e) = program.withdraw(req.pool_index, req.amount).await {
            self.positions.record_stake(key, req.amount).await;
            return Err(halt(FlowStep::Unstake, state, Vec::new(), e));
        }
        state = advance(state, FlowState::Unstaked);
        info!(
            pool_index = req.pool_index,
            unstaked = %req.amount,
            staked_remaining = %staked_remaining,
            "Receipt tokens unstaked"
        );

        let (amount_a, amount_b) = match req.mode {
            ExitMode::ReturnReceipt => {
                self.send_all(req.owner, &[(receipt, req.amount)], FlowStep::ReturnReceipt, state)
                    .await?;
                (U256::zero(), U256::zero())
            }
            ExitMode::RedeemUnderlying => {
                debug!(pair = %req.pair_id, deadline = req.deadline, "Removing liquidity");
                let removed = self
                    .pool
                    .remove_liquidity(&RemoveLiquidityParams {
                        token_a: req.token_a,
                        token_b: req.token_b,
                        liquidity: req.amount,
                        amount_a_min: req.min_amount_a,
                        amount_b_min: req.min_amount_b,
                        to: self.address,
                        deadline: req.deadline,
                    })
                    .await
                    .map_err(|e| {
                        halt(
                            FlowStep::RemoveLiquidity,
                            state,
                            residue(&[(receipt, req.amount)]),
                            e,
                        )
                    })?;
                state = advance(state, FlowState::WithdrawnFromPool);
                info!(
                    pair = %req.pair_id,
                    amount_a = %removed.amount_a,
                    amount_b = %removed.amount_b,
                    "Liquidity removed"
                );

                self.send_all(
                    req.owner,
                    &[(req.token_a, removed.amount_a), (req.token_b, removed.amount_b)],
                    FlowStep::TransferUnderlying,
                    state,
                )
                .await?;
                (removed.amount_a, removed.amount_b)
            }
        };

        self.publish(PositionEvent::exited(
            req.owner,
            req.pair_id,
            generation,
            req.pool_index,
            req.amount,
        ));
        let state = advance(state, FlowState::Done);
        info!(
            owner = %req.owner,
            pair = %req.pair_id,
            withdrawn = %req.amount,
            state = %state,
            "Position exited"
        );

        Ok(WithdrawalResult {
            owner: req.owner,
            pair_id: req.pair_id,
            generation,
            pool_index: req.pool_index,
            mode: req.mode,
            receipt_unstaked: req.amount,
            amount_a,
            amount_b,
            staked_remaining,
        })
    }

    /// Sends each non-zero amount from custody to `to`, in order.
    async fn send_all(
        &self,
        to: TokenId,
        transfers: &[(TokenId, U256)],
        step: FlowStep,
        state: FlowState,
    ) -> Result<(), ExecutionError> {
        for (i, (token, amount)) in transfers.iter().enumerate() {
            if amount.is_zero() {
                continue;
            }
            debug!(step = %step, token = %token, amount = %amount, to = %to, "Transferring");
            self.ledger
                .transfer(*token, to, *amount)
                .await
                .map_err(|e| halt(step, state, residue(&transfers[i..]), e))?;
        }
        Ok(())
    }

    fn publish(&self, event: PositionEvent) {
        if self.events.send(event).is_err() {
            debug!("No position event subscribers");
        }
    }
}

/// Maps a request's version flag to the single generation to act on.
fn select_generation(version: StakingVersion) -> Result<StakingGeneration, ExecutionError> {
    match version {
        StakingVersion::V1 => Ok(StakingGeneration::V1),
        StakingVersion::V2 => Ok(StakingGeneration::V2),
        StakingVersion::Both => Err(ExecutionError::invalid(
            "version BOTH is ambiguous, name V1 or V2",
        )),
        StakingVersion::None => Err(ExecutionError::unresolved(
            "pair is not registered in any staking generation",
        )),
    }
}

fn advance(from: FlowState, to: FlowState) -> FlowState {
    debug!(from = %from, to = %to, "Flow state advanced");
    to
}

fn residue(held: &[(TokenId, U256)]) -> Vec<Residue> {
    held.iter()
        .filter(|(_, amount)| !amount.is_zero())
        .map(|&(token, amount)| Residue { token, amount })
        .collect()
}

fn halt(
    step: FlowStep,
    reached: FlowState,
    residue: Vec<Residue>,
    source: ProtocolError,
) -> ExecutionError {
    error!(step = %step, state = %reached, error = %source, "Flow step failed");
    if !residue.is_empty() {
        warn!(
            step = %step,
            state = %reached,
            residue = ?residue,
            "Tokens left in wallet custody"
        );
    }
    ExecutionError::ExternalCall {
        step,
        reached,
        residue,
        source,
    }
}
