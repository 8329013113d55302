//! Event types and topic constants for the pawn pool contract.
//! Stable event schemas for indexing and analytics.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

/// Event emitted when a provider adds liquidity. `net_amount` is the
/// principal credited after the deposit fee.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidityAddedEvent {
    pub provider: Address,
    pub net_amount: i128,
    pub fee_amount: i128,
}

/// Event emitted when a provider withdraws a deposit with its accrued reward.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidityWithdrawnEvent {
    pub provider: Address,
    pub principal: i128,
    pub reward: i128,
}

/// Event emitted when a loan is originated against pledged collateral.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanRequestedEvent {
    pub loan_id: u64,
    pub borrower: Address,
    pub collateral_id: u64,
    pub principal: i128,
    pub repay_amount: i128,
    pub due_timestamp: u64,
}

/// Event emitted when a loan is settled in full.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanRepaidEvent {
    pub loan_id: u64,
    pub fee_amount: i128,
}

/// Event emitted when the admin sweeps accumulated platform fees.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlatformFeeWithdrawnEvent {
    pub amount: i128,
}

/// Event emitted when the admin changes the pool APR for new deposits.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AprUpdatedEvent {
    pub apr_bps: u32,
}

pub fn publish_liquidity_added(env: &Env, event: LiquidityAddedEvent) {
    env.events()
        .publish((symbol_short!("pawn"), symbol_short!("deposit")), event);
}

pub fn publish_liquidity_withdrawn(env: &Env, event: LiquidityWithdrawnEvent) {
    env.events()
        .publish((symbol_short!("pawn"), symbol_short!("withdraw")), event);
}

pub fn publish_loan_requested(env: &Env, event: LoanRequestedEvent) {
    env.events()
        .publish((symbol_short!("pawn"), symbol_short!("loan")), event);
}

pub fn publish_loan_repaid(env: &Env, event: LoanRepaidEvent) {
    env.events()
        .publish((symbol_short!("pawn"), symbol_short!("repay")), event);
}

pub fn publish_platform_fee_withdrawn(env: &Env, event: PlatformFeeWithdrawnEvent) {
    env.events()
        .publish((symbol_short!("pawn"), symbol_short!("fee_swept")), event);
}

pub fn publish_apr_updated(env: &Env, event: AprUpdatedEvent) {
    env.events()
        .publish((symbol_short!("pawn"), symbol_short!("apr_upd")), event);
}
