use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, Address, Env, String, Symbol,
};

use crate::storage;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum BankError {
    NegativeAmount = 1,
    InsufficientBalance = 2,
}

/// ### Mock Bank
///
/// A multi-denomination ledger keyed by (account, denom).
///
/// ### Dev
/// For testing purposes only!
#[contract]
pub struct MockBank;

pub trait MockBankTrait {
    /// Fetch the balance of `denom` held by `account`
    fn balance(e: Env, account: Address, denom: String) -> i128;

    /// Fetch the total supply of `denom`
    fn total_supply(e: Env, denom: String) -> i128;

    /// Send coins between accounts
    ///
    /// ### Arguments
    /// * `from` - The account sending the coins
    /// * `to` - The account receiving the coins
    /// * `denom` - The denom of the coins
    /// * `amount` - The amount to send
    ///
    /// ### Panics
    /// If `from` does not authorize the transfer or lacks the balance
    fn send(e: Env, from: Address, to: Address, denom: String, amount: i128);

    /// Mint coins to an account
    fn mint(e: Env, to: Address, denom: String, amount: i128);

    /// Burn coins held by an account
    ///
    /// ### Panics
    /// If `from` does not authorize the burn or lacks the balance
    fn burn(e: Env, from: Address, denom: String, amount: i128);
}

fn require_nonnegative(e: &Env, amount: i128) {
    if amount < 0 {
        panic_with_error!(e, BankError::NegativeAmount);
    }
}

fn spend(e: &Env, from: &Address, denom: &String, amount: i128) {
    let balance = storage::get_balance(e, from, denom);
    if balance < amount {
        panic_with_error!(e, BankError::InsufficientBalance);
    }
    storage::set_balance(e, from, denom, balance - amount);
}

#[contractimpl]
impl MockBankTrait for MockBank {
    fn balance(e: Env, account: Address, denom: String) -> i128 {
        storage::get_balance(&e, &account, &denom)
    }

    fn total_supply(e: Env, denom: String) -> i128 {
        storage::get_supply(&e, &denom)
    }

    fn send(e: Env, from: Address, to: Address, denom: String, amount: i128) {
        from.require_auth();
        require_nonnegative(&e, amount);
        storage::extend_instance(&e);

        spend(&e, &from, &denom, amount);
        let to_balance = storage::get_balance(&e, &to, &denom);
        storage::set_balance(&e, &to, &denom, to_balance + amount);

        e.events()
            .publish((Symbol::new(&e, "send"), from, to), (denom, amount));
    }

    fn mint(e: Env, to: Address, denom: String, amount: i128) {
        to.require_auth();
        require_nonnegative(&e, amount);
        storage::extend_instance(&e);

        let balance = storage::get_balance(&e, &to, &denom);
        storage::set_balance(&e, &to, &denom, balance + amount);
        let supply = storage::get_supply(&e, &denom);
        storage::set_supply(&e, &denom, supply + amount);

        e.events()
            .publish((Symbol::new(&e, "mint"), to), (denom, amount));
    }

    fn burn(e: Env, from: Address, denom: String, amount: i128) {
        from.require_auth();
        require_nonnegative(&e, amount);
        storage::extend_instance(&e);

        spend(&e, &from, &denom, amount);
        let supply = storage::get_supply(&e, &denom);
        storage::set_supply(&e, &denom, supply - amount);

        e.events()
            .publish((Symbol::new(&e, "burn"), from), (denom, amount));
    }
}
