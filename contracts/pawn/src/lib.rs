#![no_std]

//! Pawn lending pool: liquidity deposits with time-weighted rewards,
//! fixed-term loans against RWA NFT collateral, platform fee accrual.
//!
//! # Atomicity
//! Every entry point runs inside a single Soroban invocation; a trapped call
//! rolls back all storage writes and token movements, so no operation is ever
//! partially applied. The ledger never samples a wall clock — `now` is the
//! ledger timestamp supplied by the host.

pub mod collateral;
pub mod events;
pub mod math;
pub mod types;

use soroban_sdk::{contract, contractimpl, panic_with_error, token, Address, Env, Vec};

use collateral::CollateralClient;
use events::{
    publish_apr_updated, publish_liquidity_added, publish_liquidity_withdrawn,
    publish_loan_repaid, publish_loan_requested, publish_platform_fee_withdrawn, AprUpdatedEvent,
    LiquidityAddedEvent, LiquidityWithdrawnEvent, LoanRepaidEvent, LoanRequestedEvent,
    PlatformFeeWithdrawnEvent,
};
use types::{DataKey, Deposit, Loan, PawnError};

/// Allowed loan durations and their interest rates in basis points:
/// 30 days at 6%, 90 days at 9%, 180 days at 12%. Exact match only.
const LOAN_DURATIONS: [(u64, u32); 3] = [
    (30 * 86_400, 600),
    (90 * 86_400, 900),
    (180 * 86_400, 1_200),
];

/// Maximum rate accepted for APR and fee parameters (100%).
const MAX_RATE_BPS: u32 = 10_000;
/// LTV is a whole percentage of the collateral valuation.
const MAX_LTV_PERCENT: u32 = 100;

fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

fn require_init(env: &Env) {
    if !is_initialized(env) {
        panic_with_error!(env, PawnError::NotInitialized);
    }
}

fn admin(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .unwrap_or_else(|| panic_with_error!(env, PawnError::NotInitialized))
}

fn require_admin_auth(env: &Env) -> Address {
    let admin = admin(env);
    admin.require_auth();
    admin
}

fn token_client(env: &Env) -> token::Client<'_> {
    let address: Address = env
        .storage()
        .instance()
        .get(&DataKey::Token)
        .unwrap_or_else(|| panic_with_error!(env, PawnError::NotInitialized));
    token::Client::new(env, &address)
}

fn collateral_client(env: &Env) -> CollateralClient<'_> {
    let address: Address = env
        .storage()
        .instance()
        .get(&DataKey::Collateral)
        .unwrap_or_else(|| panic_with_error!(env, PawnError::NotInitialized));
    CollateralClient::new(env, &address)
}

fn config_u32(env: &Env, key: DataKey) -> u32 {
    env.storage()
        .instance()
        .get(&key)
        .unwrap_or_else(|| panic_with_error!(env, PawnError::NotInitialized))
}

fn aggregate(env: &Env, key: DataKey) -> i128 {
    env.storage().instance().get(&key).unwrap_or(0)
}

fn set_aggregate(env: &Env, key: DataKey, value: i128) {
    env.storage().instance().set(&key, &value);
}

fn add_amounts(env: &Env, a: i128, b: i128) -> i128 {
    a.checked_add(b)
        .unwrap_or_else(|| panic_with_error!(env, PawnError::Overflow))
}

fn sub_amounts(env: &Env, a: i128, b: i128) -> i128 {
    a.checked_sub(b)
        .unwrap_or_else(|| panic_with_error!(env, PawnError::Overflow))
}

/// Liquidity not currently lent out. Withdrawals and new loans are both
/// bounded by this, never by `total_liquidity` alone.
fn available_liquidity(env: &Env) -> i128 {
    sub_amounts(
        env,
        aggregate(env, DataKey::TotalLiquidity),
        aggregate(env, DataKey::TotalBorrowed),
    )
}

fn next_deposit_id(env: &Env) -> u64 {
    let id: u64 = env
        .storage()
        .instance()
        .get(&DataKey::NextDepositId)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::NextDepositId, &(id + 1));
    id
}

fn next_loan_id(env: &Env) -> u64 {
    let id: u64 = env
        .storage()
        .instance()
        .get(&DataKey::NextLoanId)
        .unwrap_or(0);
    env.storage().instance().set(&DataKey::NextLoanId, &(id + 1));
    id
}

fn load_deposit(env: &Env, deposit_id: u64) -> Deposit {
    env.storage()
        .persistent()
        .get(&DataKey::Deposit(deposit_id))
        .unwrap_or_else(|| panic_with_error!(env, PawnError::DepositNotFound))
}

fn store_deposit(env: &Env, deposit: &Deposit) {
    env.storage()
        .persistent()
        .set(&DataKey::Deposit(deposit.id), deposit);
}

fn load_loan(env: &Env, loan_id: u64) -> Loan {
    env.storage()
        .persistent()
        .get(&DataKey::Loan(loan_id))
        .unwrap_or_else(|| panic_with_error!(env, PawnError::LoanNotFound))
}

fn store_loan(env: &Env, loan: &Loan) {
    env.storage().persistent().set(&DataKey::Loan(loan.id), loan);
}

fn push_user_deposit(env: &Env, owner: &Address, deposit_id: u64) {
    let key = DataKey::UserDeposits(owner.clone());
    let mut ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));
    ids.push_back(deposit_id);
    env.storage().persistent().set(&key, &ids);
}

fn push_user_loan(env: &Env, borrower: &Address, loan_id: u64) {
    let key = DataKey::UserLoans(borrower.clone());
    let mut ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));
    ids.push_back(loan_id);
    env.storage().persistent().set(&key, &ids);
}

/// Reward accrued on a deposit since its last reward checkpoint. Zero for a
/// withdrawn deposit.
fn deposit_reward(env: &Env, deposit: &Deposit, now: u64) -> i128 {
    if deposit.withdrawn {
        return 0;
    }
    let elapsed = now.saturating_sub(deposit.last_reward_calculation);
    math::accrued_reward(deposit.amount, deposit.apr_bps, elapsed)
        .unwrap_or_else(|| panic_with_error!(env, PawnError::Overflow))
}

fn duration_rate_bps(duration: u64) -> Option<u32> {
    LOAN_DURATIONS
        .iter()
        .find(|(d, _)| *d == duration)
        .map(|(_, rate)| *rate)
}

#[contract]
pub struct PawnPool;

#[contractimpl]
impl PawnPool {
    /// Initialize the pool with its admin, the stable-asset token contract,
    /// the RWA collateral contract, and the economic parameters. Callable
    /// exactly once.
    ///
    /// # Panics
    /// * `AlreadyInitialized` on a second call
    /// * `InvalidRate` if `ltv` > 100 or a rate exceeds 10_000 bp
    pub fn initialize(
        env: Env,
        admin: Address,
        token: Address,
        collateral: Address,
        ltv: u32,
        apr_bps: u32,
        deposit_fee_bps: u32,
    ) {
        if is_initialized(&env) {
            panic_with_error!(&env, PawnError::AlreadyInitialized);
        }
        if ltv > MAX_LTV_PERCENT {
            panic_with_error!(&env, PawnError::InvalidRate);
        }
        if apr_bps > MAX_RATE_BPS || deposit_fee_bps > MAX_RATE_BPS {
            panic_with_error!(&env, PawnError::InvalidRate);
        }

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::Collateral, &collateral);
        env.storage().instance().set(&DataKey::Ltv, &ltv);
        env.storage().instance().set(&DataKey::AprBps, &apr_bps);
        env.storage()
            .instance()
            .set(&DataKey::DepositFeeBps, &deposit_fee_bps);
    }

    /// Deposit liquidity. The deposit fee is withheld up front; the remainder
    /// is credited as principal and starts accruing rewards at the pool APR
    /// snapshotted now. Later APR changes never reprice an existing deposit.
    ///
    /// # Panics
    /// * `InvalidAmount` if `amount` <= 0
    pub fn add_liquidity(env: Env, provider: Address, amount: i128) {
        require_init(&env);
        provider.require_auth();
        if amount <= 0 {
            panic_with_error!(&env, PawnError::InvalidAmount);
        }

        let fee_amount = math::bps_share(amount, config_u32(&env, DataKey::DepositFeeBps))
            .unwrap_or_else(|| panic_with_error!(&env, PawnError::Overflow));
        let net_amount = amount - fee_amount;
        let now = env.ledger().timestamp();

        let deposit = Deposit {
            id: next_deposit_id(&env),
            owner: provider.clone(),
            amount: net_amount,
            fee_amount,
            apr_bps: config_u32(&env, DataKey::AprBps),
            deposit_timestamp: now,
            last_reward_calculation: now,
            withdrawn: false,
        };
        store_deposit(&env, &deposit);
        push_user_deposit(&env, &provider, deposit.id);

        set_aggregate(
            &env,
            DataKey::TotalLiquidity,
            add_amounts(&env, aggregate(&env, DataKey::TotalLiquidity), net_amount),
        );
        set_aggregate(
            &env,
            DataKey::PlatformFees,
            add_amounts(&env, aggregate(&env, DataKey::PlatformFees), fee_amount),
        );

        token_client(&env).transfer(&provider, &env.current_contract_address(), &amount);

        publish_liquidity_added(
            &env,
            LiquidityAddedEvent {
                provider,
                net_amount,
                fee_amount,
            },
        );
    }

    /// Withdraw a deposit: pays out principal plus the reward accrued through
    /// now, and retires the deposit. A deposit blocked by lent-out liquidity
    /// stays withdrawable and the call can be retried once loans are repaid.
    ///
    /// # Panics
    /// * `DepositNotFound` for an unknown id
    /// * `AlreadyWithdrawn` if the deposit was already paid out
    /// * `InsufficientPoolBalance` if available liquidity cannot cover the
    ///   principal
    pub fn withdraw_liquidity(env: Env, deposit_id: u64) -> (i128, i128) {
        require_init(&env);
        let mut deposit = load_deposit(&env, deposit_id);
        deposit.owner.require_auth();
        if deposit.withdrawn {
            panic_with_error!(&env, PawnError::AlreadyWithdrawn);
        }

        let now = env.ledger().timestamp();
        let reward = deposit_reward(&env, &deposit, now);
        if available_liquidity(&env) < deposit.amount {
            panic_with_error!(&env, PawnError::InsufficientPoolBalance);
        }

        deposit.withdrawn = true;
        deposit.last_reward_calculation = now;
        store_deposit(&env, &deposit);
        set_aggregate(
            &env,
            DataKey::TotalLiquidity,
            sub_amounts(
                &env,
                aggregate(&env, DataKey::TotalLiquidity),
                deposit.amount,
            ),
        );

        let payout = add_amounts(&env, deposit.amount, reward);
        token_client(&env).transfer(&env.current_contract_address(), &deposit.owner, &payout);

        publish_liquidity_withdrawn(
            &env,
            LiquidityWithdrawnEvent {
                provider: deposit.owner.clone(),
                principal: deposit.amount,
                reward,
            },
        );
        (deposit.amount, reward)
    }

    /// Reward accrued on a deposit through now. Zero once withdrawn.
    pub fn get_unclaimed_reward(env: Env, deposit_id: u64) -> i128 {
        require_init(&env);
        let deposit = load_deposit(&env, deposit_id);
        deposit_reward(&env, &deposit, env.ledger().timestamp())
    }

    /// Live (non-withdrawn) deposits of `owner`, insertion order.
    pub fn get_deposits_by_user(env: Env, owner: Address) -> Vec<Deposit> {
        require_init(&env);
        let ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&DataKey::UserDeposits(owner))
            .unwrap_or_else(|| Vec::new(&env));
        let mut deposits = Vec::new(&env);
        for id in ids.iter() {
            let deposit = load_deposit(&env, id);
            if !deposit.withdrawn {
                deposits.push_back(deposit);
            }
        }
        deposits
    }

    /// Single deposit record (including withdrawn ones).
    pub fn get_deposit(env: Env, deposit_id: u64) -> Deposit {
        require_init(&env);
        load_deposit(&env, deposit_id)
    }

    /// Borrow against an RWA NFT. Principal is bounded by the collateral
    /// valuation and the pool LTV; the origination fee is fixed by the
    /// duration's rate and the full repay amount never changes afterwards.
    /// The pool takes custody of the NFT until repayment.
    ///
    /// # Panics
    /// * `InvalidDuration` if `duration` is not an allowed term
    /// * `InvalidAmount` if `collateral_value` <= 0
    /// * `CollateralEncumbered` if the NFT already backs an open loan
    /// * `NotOwner` if `borrower` does not own the NFT
    /// * `InsufficientLiquidity` if free liquidity cannot fund the principal
    pub fn request_loan(
        env: Env,
        borrower: Address,
        collateral_id: u64,
        collateral_value: i128,
        duration: u64,
    ) -> u64 {
        require_init(&env);
        borrower.require_auth();

        let rate_bps = duration_rate_bps(duration)
            .unwrap_or_else(|| panic_with_error!(&env, PawnError::InvalidDuration));
        if collateral_value <= 0 {
            panic_with_error!(&env, PawnError::InvalidAmount);
        }
        if env
            .storage()
            .persistent()
            .has(&DataKey::CollateralLoan(collateral_id))
        {
            panic_with_error!(&env, PawnError::CollateralEncumbered);
        }
        let custody = collateral_client(&env);
        if custody.owner_of(&collateral_id) != borrower {
            panic_with_error!(&env, PawnError::NotOwner);
        }

        let principal = math::max_principal(collateral_value, config_u32(&env, DataKey::Ltv))
            .unwrap_or_else(|| panic_with_error!(&env, PawnError::Overflow));
        if available_liquidity(&env) < principal {
            panic_with_error!(&env, PawnError::InsufficientLiquidity);
        }
        let fee_amount = math::bps_share(principal, rate_bps)
            .unwrap_or_else(|| panic_with_error!(&env, PawnError::Overflow));
        let repay_amount = add_amounts(&env, principal, fee_amount);

        let now = env.ledger().timestamp();
        let loan = Loan {
            id: next_loan_id(&env),
            borrower: borrower.clone(),
            collateral_id,
            principal,
            fee_amount,
            repay_amount,
            start_timestamp: now,
            due_timestamp: now + duration,
            repaid: false,
        };
        store_loan(&env, &loan);
        push_user_loan(&env, &borrower, loan.id);
        env.storage()
            .persistent()
            .set(&DataKey::CollateralLoan(collateral_id), &loan.id);
        set_aggregate(
            &env,
            DataKey::TotalBorrowed,
            add_amounts(&env, aggregate(&env, DataKey::TotalBorrowed), principal),
        );

        custody.transfer(&borrower, &env.current_contract_address(), &collateral_id);
        token_client(&env).transfer(&env.current_contract_address(), &borrower, &principal);

        publish_loan_requested(
            &env,
            LoanRequestedEvent {
                loan_id: loan.id,
                borrower,
                collateral_id,
                principal,
                repay_amount,
                due_timestamp: loan.due_timestamp,
            },
        );
        loan.id
    }

    /// Settle a loan in full. Permissionless: any payer may settle any open
    /// loan; the collateral always returns to the borrower. The original
    /// repay amount is accepted even past the due date — expiry carries no
    /// penalty and triggers no custody change.
    ///
    /// # Panics
    /// * `LoanNotFound` for an unknown id
    /// * `AlreadyRepaid` if the loan is settled
    pub fn repay_loan(env: Env, payer: Address, loan_id: u64) -> i128 {
        require_init(&env);
        payer.require_auth();
        let mut loan = load_loan(&env, loan_id);
        if loan.repaid {
            panic_with_error!(&env, PawnError::AlreadyRepaid);
        }

        loan.repaid = true;
        store_loan(&env, &loan);
        env.storage()
            .persistent()
            .remove(&DataKey::CollateralLoan(loan.collateral_id));
        set_aggregate(
            &env,
            DataKey::TotalBorrowed,
            sub_amounts(&env, aggregate(&env, DataKey::TotalBorrowed), loan.principal),
        );
        set_aggregate(
            &env,
            DataKey::PlatformFees,
            add_amounts(&env, aggregate(&env, DataKey::PlatformFees), loan.fee_amount),
        );

        token_client(&env).transfer(&payer, &env.current_contract_address(), &loan.repay_amount);
        collateral_client(&env).transfer(
            &env.current_contract_address(),
            &loan.borrower,
            &loan.collateral_id,
        );

        publish_loan_repaid(
            &env,
            LoanRepaidEvent {
                loan_id,
                fee_amount: loan.fee_amount,
            },
        );
        loan.fee_amount
    }

    /// All loans of `borrower`, open and settled, insertion order.
    pub fn get_loans_by_user(env: Env, borrower: Address) -> Vec<Loan> {
        require_init(&env);
        let ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&DataKey::UserLoans(borrower))
            .unwrap_or_else(|| Vec::new(&env));
        let mut loans = Vec::new(&env);
        for id in ids.iter() {
            loans.push_back(load_loan(&env, id));
        }
        loans
    }

    /// Single loan record.
    pub fn get_loan(env: Env, loan_id: u64) -> Loan {
        require_init(&env);
        load_loan(&env, loan_id)
    }

    /// Derived status: past due and not repaid. Not a stored state — the
    /// ledger performs no transition and no custody change on expiry.
    pub fn is_overdue(env: Env, loan_id: u64) -> bool {
        require_init(&env);
        let loan = load_loan(&env, loan_id);
        !loan.repaid && env.ledger().timestamp() > loan.due_timestamp
    }

    /// Sweep accumulated platform fees to the admin. The transfer and the
    /// counter reset commit together or not at all. Returns the swept amount
    /// (zero when nothing has accrued since the last sweep).
    pub fn withdraw_platform_fees(env: Env) -> i128 {
        require_init(&env);
        let admin = require_admin_auth(&env);
        let amount = aggregate(&env, DataKey::PlatformFees);
        set_aggregate(&env, DataKey::PlatformFees, 0);

        token_client(&env).transfer(&env.current_contract_address(), &admin, &amount);

        publish_platform_fee_withdrawn(&env, PlatformFeeWithdrawnEvent { amount });
        amount
    }

    /// Change the pool APR applied to new deposits (admin only). Existing
    /// deposits keep the APR snapshotted at their creation.
    pub fn set_apr(env: Env, apr_bps: u32) {
        require_init(&env);
        require_admin_auth(&env);
        if apr_bps > MAX_RATE_BPS {
            panic_with_error!(&env, PawnError::InvalidRate);
        }
        env.storage().instance().set(&DataKey::AprBps, &apr_bps);
        publish_apr_updated(&env, AprUpdatedEvent { apr_bps });
    }

    /// Allowed loan durations in seconds.
    pub fn get_all_durations(env: Env) -> Vec<u64> {
        let mut durations = Vec::new(&env);
        for (duration, _) in LOAN_DURATIONS.iter() {
            durations.push_back(*duration);
        }
        durations
    }

    /// Interest rate in basis points for an allowed duration.
    ///
    /// # Panics
    /// * `InvalidDuration` if `duration` is not an allowed term
    pub fn get_interest_rate(env: Env, duration: u64) -> u32 {
        duration_rate_bps(duration)
            .unwrap_or_else(|| panic_with_error!(&env, PawnError::InvalidDuration))
    }

    /// Sum of live deposit principal.
    pub fn total_liquidity(env: Env) -> i128 {
        aggregate(&env, DataKey::TotalLiquidity)
    }

    /// Outstanding (unrepaid) loan principal.
    pub fn total_borrowed(env: Env) -> i128 {
        aggregate(&env, DataKey::TotalBorrowed)
    }

    /// Fees accumulated from deposits and repayments, not yet swept.
    pub fn total_platform_fees(env: Env) -> i128 {
        aggregate(&env, DataKey::PlatformFees)
    }

    /// Loan-to-value bound as a whole percentage.
    pub fn ltv(env: Env) -> u32 {
        config_u32(&env, DataKey::Ltv)
    }

    /// Pool APR in basis points applied to new deposits.
    pub fn apr(env: Env) -> u32 {
        config_u32(&env, DataKey::AprBps)
    }
}
