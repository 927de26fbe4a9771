use soroban_sdk::{
    contract, contractclient, contracterror, contractimpl, panic_with_error, vec, Address, Env,
    Error, String, Symbol, Vec,
};

use crate::storage::{self, Coin, TokenSettings};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LeverageError {
    TokenNotRegistered = 1,
    MaxSupplyReached = 2,
    InsufficientLiquidity = 3,
    NegativeAmount = 4,
    InsufficientPosition = 5,
    AlreadyInitialized = 6,
}

#[allow(dead_code)]
#[contractclient(name = "BankClient")]
trait Bank {
    fn balance(e: Env, account: Address, denom: String) -> i128;
    fn send(e: Env, from: Address, to: Address, denom: String, amount: i128);
    fn mint(e: Env, to: Address, denom: String, amount: i128);
}

/// ### Mock Leverage
///
/// A lending layer that holds supplied coins and credits suppliers with a position.
///
/// ### Dev
/// For testing purposes only!
#[contract]
pub struct MockLeverage;

pub trait MockLeverageTrait {
    /// Setup the leverage contract
    ///
    /// ### Arguments
    /// * `bank` - The bank contract holding every denom
    fn initialize(e: Env, bank: Address);

    /// Fetch the registry entry of a token
    ///
    /// ### Panics
    /// If the token is not registered
    fn token_settings(e: Env, denom: String) -> TokenSettings;

    /// Fetch the total amount of a token supplied
    fn total_supply(e: Env, denom: String) -> i128;

    /// Supply coins from `supplier`. Returns the amount supplied.
    ///
    /// ### Panics
    /// If the supply would exceed the token's max supply
    fn supply(e: Env, supplier: Address, denom: String, amount: i128) -> i128;

    /// Withdraw coins to `supplier`. Returns the amount withdrawn, which is reduced by the
    /// mocked withdraw ratio.
    ///
    /// ### Panics
    /// If the supplier's position or the contract's liquidity is too small
    fn withdraw(e: Env, supplier: Address, denom: String, amount: i128) -> i128;

    /// Fetch the most `supplier` can withdraw of a token right now
    fn max_withdraw(e: Env, supplier: Address, denom: String) -> i128;

    /// Fetch every non-zero position of `supplier`
    fn supplied(e: Env, supplier: Address) -> Vec<Coin>;

    /// Mock Only: Register a token
    fn register_token(e: Env, denom: String, settings: TokenSettings);

    /// Mock Only: Set the share of withdrawals paid out, in basis points
    fn set_withdraw_ratio(e: Env, ratio: u32);

    /// Mock Only: Force every supply, withdraw and supplied query to fail with a contract error
    /// code. Zero clears the error.
    fn set_error(e: Env, code: u32);

    /// Mock Only: Credit interest to a supplier's position, minting the backing coins
    fn accrue_interest(e: Env, supplier: Address, denom: String, amount: i128);
}

fn load_token(e: &Env, denom: &String) -> TokenSettings {
    match storage::get_token(e, denom) {
        Some(settings) => settings,
        None => panic_with_error!(e, LeverageError::TokenNotRegistered),
    }
}

fn check_request(e: &Env, amount: i128) {
    let code = storage::get_error(e);
    if code != 0 {
        panic_with_error!(e, Error::from_contract_error(code));
    }
    if amount < 0 {
        panic_with_error!(e, LeverageError::NegativeAmount);
    }
}

fn liquidity(e: &Env, denom: &String) -> i128 {
    BankClient::new(e, &storage::get_bank(e)).balance(&e.current_contract_address(), denom)
}

#[contractimpl]
impl MockLeverageTrait for MockLeverage {
    fn initialize(e: Env, bank: Address) {
        if storage::has_bank(&e) {
            panic_with_error!(&e, LeverageError::AlreadyInitialized);
        }
        storage::set_bank(&e, &bank);
    }

    fn token_settings(e: Env, denom: String) -> TokenSettings {
        load_token(&e, &denom)
    }

    fn total_supply(e: Env, denom: String) -> i128 {
        storage::get_total(&e, &denom)
    }

    fn supply(e: Env, supplier: Address, denom: String, amount: i128) -> i128 {
        supplier.require_auth();
        storage::extend_instance(&e);
        check_request(&e, amount);
        let settings = load_token(&e, &denom);

        let total = storage::get_total(&e, &denom);
        if settings.max_supply > 0 && total + amount > settings.max_supply {
            panic_with_error!(&e, LeverageError::MaxSupplyReached);
        }

        BankClient::new(&e, &storage::get_bank(&e)).send(
            &supplier,
            &e.current_contract_address(),
            &denom,
            &amount,
        );
        let position = storage::get_position(&e, &supplier, &denom);
        storage::set_position(&e, &supplier, &denom, position + amount);
        storage::set_total(&e, &denom, total + amount);

        e.events()
            .publish((Symbol::new(&e, "supply"), supplier), (denom, amount));
        amount
    }

    fn withdraw(e: Env, supplier: Address, denom: String, amount: i128) -> i128 {
        supplier.require_auth();
        storage::extend_instance(&e);
        check_request(&e, amount);
        load_token(&e, &denom);

        let position = storage::get_position(&e, &supplier, &denom);
        if amount > position {
            panic_with_error!(&e, LeverageError::InsufficientPosition);
        }
        let withdrawn = amount * storage::get_withdraw_ratio(&e) as i128 / 10_000;
        if withdrawn > liquidity(&e, &denom) {
            panic_with_error!(&e, LeverageError::InsufficientLiquidity);
        }

        BankClient::new(&e, &storage::get_bank(&e)).send(
            &e.current_contract_address(),
            &supplier,
            &denom,
            &withdrawn,
        );
        storage::set_position(&e, &supplier, &denom, position - withdrawn);
        let total = storage::get_total(&e, &denom);
        storage::set_total(&e, &denom, total - withdrawn);

        e.events()
            .publish((Symbol::new(&e, "withdraw"), supplier), (denom, withdrawn));
        withdrawn
    }

    fn max_withdraw(e: Env, supplier: Address, denom: String) -> i128 {
        let position = storage::get_position(&e, &supplier, &denom);
        position.min(liquidity(&e, &denom))
    }

    fn supplied(e: Env, supplier: Address) -> Vec<Coin> {
        check_request(&e, 0);
        let mut coins = vec![&e];
        for denom in storage::get_token_list(&e).iter() {
            let amount = storage::get_position(&e, &supplier, &denom);
            if amount > 0 {
                coins.push_back(Coin { denom, amount });
            }
        }
        coins
    }

    fn register_token(e: Env, denom: String, settings: TokenSettings) {
        if storage::get_token(&e, &denom).is_none() {
            let mut list = storage::get_token_list(&e);
            list.push_back(denom.clone());
            storage::set_token_list(&e, &list);
        }
        storage::set_token(&e, &denom, &settings);
    }

    fn set_withdraw_ratio(e: Env, ratio: u32) {
        storage::set_withdraw_ratio(&e, ratio);
    }

    fn set_error(e: Env, code: u32) {
        storage::set_error(&e, code);
    }

    fn accrue_interest(e: Env, supplier: Address, denom: String, amount: i128) {
        BankClient::new(&e, &storage::get_bank(&e)).mint(
            &e.current_contract_address(),
            &denom,
            &amount,
        );
        let position = storage::get_position(&e, &supplier, &denom);
        storage::set_position(&e, &supplier, &denom, position + amount);
        let total = storage::get_total(&e, &denom);
        storage::set_total(&e, &denom, total + amount);
    }
}
