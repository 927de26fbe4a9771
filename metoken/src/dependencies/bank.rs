use soroban_sdk::{contractclient, Address, Env, String};

/// The multi-denomination ledger that holds every coin the engine touches
#[allow(dead_code)]
#[contractclient(name = "Client")]
pub trait Bank {
    /// Fetch the balance of `denom` held by `account`
    fn balance(e: Env, account: Address, denom: String) -> i128;

    /// Send `amount` of `denom` from `from` to `to`. Requires auth from `from`.
    fn send(e: Env, from: Address, to: Address, denom: String, amount: i128);

    /// Mint `amount` of `denom` to `to`. Requires auth from `to`.
    fn mint(e: Env, to: Address, denom: String, amount: i128);

    /// Burn `amount` of `denom` held by `from`. Requires auth from `from`.
    fn burn(e: Env, from: Address, denom: String, amount: i128);
}
