//! Client interface for the RWA NFT contract holding loan collateral.
//!
//! The pool takes custody by transferring the token to its own address at
//! origination and releases it by transferring back to the borrower on
//! repayment. Any contract exposing these two functions can serve as the
//! collateral contract.

use soroban_sdk::{contractclient, Address, Env};

#[contractclient(name = "CollateralClient")]
pub trait CollateralCustody {
    /// Current owner of `token_id`. Traps if the token does not exist.
    fn owner_of(env: Env, token_id: u64) -> Address;

    /// Transfer `token_id` from `from` to `to`. Requires `from`
    /// authorization and traps unless `from` is the current owner.
    fn transfer(env: Env, from: Address, to: Address, token_id: u64);
}
