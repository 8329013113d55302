//! Core data types for the pawn pool contract.

use soroban_sdk::{contracterror, contracttype, Address};

/// Storage keys. Pool configuration and aggregates live in instance storage;
/// deposit and loan records are persistent and append-only.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    /// Stable-asset token contract the pool lends and collects fees in.
    Token,
    /// RWA NFT contract holding loan collateral.
    Collateral,
    Ltv,
    AprBps,
    DepositFeeBps,
    NextDepositId,
    NextLoanId,
    TotalLiquidity,
    TotalBorrowed,
    PlatformFees,
    Deposit(u64),
    UserDeposits(Address),
    Loan(u64),
    UserLoans(Address),
    /// Open loan currently pledging this collateral token id, if any.
    CollateralLoan(u64),
}

#[contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PawnError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidAmount = 3,
    InvalidDuration = 4,
    InsufficientLiquidity = 5,
    InsufficientPoolBalance = 6,
    DepositNotFound = 7,
    LoanNotFound = 8,
    AlreadyWithdrawn = 9,
    AlreadyRepaid = 10,
    NotOwner = 11,
    CollateralEncumbered = 12,
    InvalidRate = 13,
    Overflow = 14,
}

/// A liquidity-provider deposit. `amount` is the net principal credited after
/// the deposit fee; `apr_bps` is the pool APR snapshotted at creation and is
/// never repriced. Records are never deleted; `withdrawn` is terminal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deposit {
    pub id: u64,
    pub owner: Address,
    pub amount: i128,
    pub fee_amount: i128,
    pub apr_bps: u32,
    pub deposit_timestamp: u64,
    pub last_reward_calculation: u64,
    pub withdrawn: bool,
}

/// A pawn loan. `repay_amount` is fixed at origination (principal plus the
/// duration-rate fee); there is no partial repayment and no late-fee
/// escalation. `repaid` is terminal. Collateral custody is held by the pool
/// from origination until repayment; an overdue unrepaid loan leaves custody
/// unchanged.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Loan {
    pub id: u64,
    pub borrower: Address,
    pub collateral_id: u64,
    pub principal: i128,
    pub fee_amount: i128,
    pub repay_amount: i128,
    pub start_timestamp: u64,
    pub due_timestamp: u64,
    pub repaid: bool,
}
