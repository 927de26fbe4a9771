use soroban_sdk::{contractclient, contracttype, Address, Env, String, Symbol, Vec};

use crate::storage::Coin;

/// Error code reported by the leverage contract when a token reached its max supply
pub const MAX_SUPPLY_REACHED: u32 = 2;

/// Error code reported by the leverage contract when it cannot cover a withdrawal
pub const INSUFFICIENT_LIQUIDITY: u32 = 3;

/// The registry entry of a token in the leverage contract
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct TokenSettings {
    pub symbol: Symbol,   // the oracle symbol of the token
    pub exponent: u32,    // the decimal places of the token
    pub max_supply: i128, // the max amount that can be supplied, 0 for unlimited
}

/// The lending layer the engine supplies idle assets to
#[allow(dead_code)]
#[contractclient(name = "Client")]
pub trait Leverage {
    /// Fetch the registry entry of a token
    fn token_settings(e: Env, denom: String) -> TokenSettings;

    /// Fetch the total amount of a token supplied by every supplier
    fn total_supply(e: Env, denom: String) -> i128;

    /// Supply `amount` of `denom` from `supplier`, pulling the coins through the bank.
    /// Returns the amount supplied.
    fn supply(e: Env, supplier: Address, denom: String, amount: i128) -> i128;

    /// Withdraw up to `amount` of `denom` supplied by `supplier`. Returns the amount withdrawn.
    fn withdraw(e: Env, supplier: Address, denom: String, amount: i128) -> i128;

    /// Fetch the most `supplier` can currently withdraw of `denom`
    fn max_withdraw(e: Env, supplier: Address, denom: String) -> i128;

    /// Fetch everything `supplier` has supplied, including accrued interest
    fn supplied(e: Env, supplier: Address) -> Vec<Coin>;
}
