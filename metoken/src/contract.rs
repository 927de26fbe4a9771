use crate::{
    errors::MeTokenError,
    exchange::{self, RedeemResponse, SwapResponse},
    genesis::{self, GenesisState},
    pricing::{self, IndexPrices},
    query,
    registry, reserves,
    storage::{self, Coin, Index, IndexBalances, Params},
};
use soroban_sdk::{
    contract, contractclient, contractimpl, panic_with_error, Address, Env, String, Symbol, Vec,
};

/// ### MeToken
///
/// An index engine that mints meTokens against a basket of accepted assets and redeems them back
/// into any single accepted asset.
#[contract]
pub struct MeTokenContract;

#[contractclient(name = "MeTokenClient")]
pub trait MeToken {
    /// Initialize the engine
    ///
    /// ### Arguments
    /// * `admin` - The Address for the admin, which governs the registry and params
    /// * `emergency_admin` - The Address allowed to make emergency changes to the registry
    /// * `params` - The engine params
    /// * `bank` - The contract address of the bank holding every denom
    /// * `leverage` - The contract address of the leverage contract
    /// * `oracle` - The contract address of the price oracle
    /// * `auction` - The Address receiving the rewards auction share of fees
    ///
    /// ### Panics
    /// If the engine is already initialized or the params are invalid
    #[allow(clippy::too_many_arguments)]
    fn initialize(
        e: Env,
        admin: Address,
        emergency_admin: Address,
        params: Params,
        bank: Address,
        leverage: Address,
        oracle: Address,
        auction: Address,
    );

    /// (Admin only) Set a new address as the admin
    ///
    /// ### Arguments
    /// * `new_admin` - The new admin address
    ///
    /// ### Panics
    /// If the caller is not the admin
    fn set_admin(e: Env, new_admin: Address);

    /// (Admin only) Set a new address as the emergency admin
    ///
    /// ### Arguments
    /// * `new_emergency_admin` - The new emergency admin address
    ///
    /// ### Panics
    /// If the caller is not the admin
    fn set_emergency_admin(e: Env, new_emergency_admin: Address);

    /// Swap an accepted asset for meTokens
    ///
    /// Returns the fee charged and the meTokens minted
    ///
    /// ### Arguments
    /// * `user` - The address sending the asset and receiving the meTokens
    /// * `asset` - The asset to swap
    /// * `metoken_denom` - The meToken to receive
    ///
    /// ### Panics
    /// If the swap cannot be completed
    fn swap(e: Env, user: Address, asset: Coin, metoken_denom: String) -> SwapResponse;

    /// Redeem meTokens for one of the accepted assets of their index
    ///
    /// Returns the fee charged and the assets sent to the user
    ///
    /// ### Arguments
    /// * `user` - The address sending the meTokens and receiving the asset
    /// * `metoken` - The meTokens to redeem
    /// * `asset_denom` - The asset to receive
    ///
    /// ### Panics
    /// If the redeem cannot be completed
    fn redeem(e: Env, user: Address, metoken: Coin, asset_denom: String) -> RedeemResponse;

    /// (Admin only) Set the engine params
    ///
    /// ### Arguments
    /// * `params` - The new params
    ///
    /// ### Panics
    /// If the caller is not the admin or the params are invalid
    fn gov_set_params(e: Env, params: Params);

    /// (Admin or emergency admin only) Register new indexes and update existing ones
    ///
    /// The emergency admin cannot register indexes, and can only change the max supply and the
    /// target allocations of existing ones.
    ///
    /// ### Arguments
    /// * `authority` - The admin or emergency admin
    /// * `add_index` - The indexes to register
    /// * `update_index` - The new definitions of registered indexes
    ///
    /// ### Panics
    /// If the authority is neither admin, or any index breaks a registry rule
    fn gov_update_registry(
        e: Env,
        authority: Address,
        add_index: Vec<Index>,
        update_index: Vec<Index>,
    );

    /// Move assets between the reserves and the leverage contract to match the reserve portion
    /// of every accepted asset. Runs at most once per rebalancing period.
    ///
    /// Returns true if a rebalancing pass ran
    ///
    /// ### Panics
    /// If the leverage contract fails with a non-recoverable error
    fn rebalance(e: Env) -> bool;

    /// Withdraw the interest accrued by the leverage positions of the engine. Runs at most once
    /// per claiming period.
    ///
    /// Returns true if a claiming pass ran
    ///
    /// ### Panics
    /// If the leverage contract fails with a non-recoverable error
    fn claim_interest(e: Env) -> bool;

    /// Push the current price of every meToken to the oracle
    ///
    /// Returns the number of prices pushed
    fn update_prices(e: Env) -> u32;

    /// Fetch the engine params
    fn params(e: Env) -> Params;

    /// Fetch the admin
    fn admin(e: Env) -> Address;

    /// Fetch the emergency admin
    fn emergency_admin(e: Env) -> Address;

    /// Fetch registered indexes, all of them in registration order if `metoken_denom` is None
    ///
    /// ### Panics
    /// If the index does not exist
    fn indexes(e: Env, metoken_denom: Option<String>) -> Vec<Index>;

    /// Fetch the balances of registered indexes, all of them if `metoken_denom` is None
    ///
    /// ### Panics
    /// If the index does not exist
    fn index_balances(e: Env, metoken_denom: Option<String>) -> Vec<IndexBalances>;

    /// Fetch the current prices of registered indexes, all of them if `metoken_denom` is None
    ///
    /// ### Panics
    /// If the index does not exist or a price is unavailable
    fn index_prices(e: Env, metoken_denom: Option<String>) -> Vec<IndexPrices>;

    /// Preview the fee charged to swap an asset into an index
    ///
    /// ### Arguments
    /// * `asset` - The asset to swap
    /// * `metoken_denom` - The meToken to receive
    fn swap_fee(e: Env, asset: Coin, metoken_denom: String) -> Coin;

    /// Preview the fee charged to redeem meTokens for an asset
    ///
    /// ### Arguments
    /// * `metoken` - The meTokens to redeem
    /// * `asset_denom` - The asset to receive
    fn redeem_fee(e: Env, metoken: Coin, asset_denom: String) -> Coin;

    /// Export the full engine state
    fn genesis(e: Env) -> GenesisState;

    /// (Admin only) Load a full engine state exported by `genesis`
    ///
    /// Only the engine's own state is written. The coins backing the balances must already be
    /// held by the engine in the bank and the leverage contract.
    ///
    /// ### Arguments
    /// * `genesis` - The engine state to load
    ///
    /// ### Panics
    /// If the caller is not the admin, an index is already registered, or the state is invalid
    fn import_genesis(e: Env, genesis: GenesisState);
}

#[contractimpl]
impl MeToken for MeTokenContract {
    #[allow(clippy::too_many_arguments)]
    fn initialize(
        e: Env,
        admin: Address,
        emergency_admin: Address,
        params: Params,
        bank: Address,
        leverage: Address,
        oracle: Address,
        auction: Address,
    ) {
        storage::extend_instance(&e);
        if storage::has_admin(&e) {
            panic_with_error!(&e, MeTokenError::AlreadyInitializedError);
        }
        params
            .validate()
            .unwrap_or_else(|err| panic_with_error!(&e, err));

        storage::set_admin(&e, &admin);
        storage::set_emergency_admin(&e, &emergency_admin);
        storage::set_params(&e, &params);
        storage::set_bank(&e, &bank);
        storage::set_leverage(&e, &leverage);
        storage::set_oracle(&e, &oracle);
        storage::set_auction(&e, &auction);
    }

    fn set_admin(e: Env, new_admin: Address) {
        storage::extend_instance(&e);
        let admin = storage::get_admin(&e);
        admin.require_auth();

        storage::set_admin(&e, &new_admin);

        e.events()
            .publish((Symbol::new(&e, "set_admin"), admin), new_admin);
    }

    fn set_emergency_admin(e: Env, new_emergency_admin: Address) {
        storage::extend_instance(&e);
        let admin = storage::get_admin(&e);
        admin.require_auth();

        storage::set_emergency_admin(&e, &new_emergency_admin);

        e.events().publish(
            (Symbol::new(&e, "set_emergency_admin"), admin),
            new_emergency_admin,
        );
    }

    fn swap(e: Env, user: Address, asset: Coin, metoken_denom: String) -> SwapResponse {
        storage::extend_instance(&e);
        user.require_auth();

        let response = exchange::execute_swap(&e, &user, &asset, &metoken_denom)
            .unwrap_or_else(|err| panic_with_error!(&e, err));

        e.events().publish(
            (Symbol::new(&e, "swap"), user),
            (asset, response.returned.clone(), response.fee.clone()),
        );
        response
    }

    fn redeem(e: Env, user: Address, metoken: Coin, asset_denom: String) -> RedeemResponse {
        storage::extend_instance(&e);
        user.require_auth();

        let response = exchange::execute_redeem(&e, &user, &metoken, &asset_denom)
            .unwrap_or_else(|err| panic_with_error!(&e, err));

        e.events().publish(
            (Symbol::new(&e, "redeem"), user),
            (metoken, response.returned.clone(), response.fee.clone()),
        );
        response
    }

    fn gov_set_params(e: Env, params: Params) {
        storage::extend_instance(&e);
        let admin = storage::get_admin(&e);
        admin.require_auth();

        registry::execute_set_params(&e, &params).unwrap_or_else(|err| panic_with_error!(&e, err));

        e.events()
            .publish((Symbol::new(&e, "set_params"), admin), params);
    }

    fn gov_update_registry(
        e: Env,
        authority: Address,
        add_index: Vec<Index>,
        update_index: Vec<Index>,
    ) {
        storage::extend_instance(&e);
        authority.require_auth();
        let emergency = if authority == storage::get_admin(&e) {
            false
        } else if authority == storage::get_emergency_admin(&e) {
            true
        } else {
            panic_with_error!(&e, MeTokenError::UnauthorizedError)
        };

        registry::execute_update_registry(&e, &add_index, &update_index, emergency)
            .unwrap_or_else(|err| panic_with_error!(&e, err));

        for index in add_index.iter() {
            e.events()
                .publish((Symbol::new(&e, "index_registered"), index.denom.clone()), index);
        }
        for index in update_index.iter() {
            e.events()
                .publish((Symbol::new(&e, "index_updated"), index.denom.clone()), index);
        }
    }

    fn rebalance(e: Env) -> bool {
        storage::extend_instance(&e);
        let ran = reserves::execute_rebalance(&e).unwrap_or_else(|err| panic_with_error!(&e, err));
        if ran {
            e.events()
                .publish((Symbol::new(&e, "rebalance"),), e.ledger().timestamp());
        }
        ran
    }

    fn claim_interest(e: Env) -> bool {
        storage::extend_instance(&e);
        let ran =
            reserves::execute_claim_interest(&e).unwrap_or_else(|err| panic_with_error!(&e, err));
        if ran {
            e.events()
                .publish((Symbol::new(&e, "claim_interest"),), e.ledger().timestamp());
        }
        ran
    }

    fn update_prices(e: Env) -> u32 {
        storage::extend_instance(&e);
        pricing::execute_update_prices(&e)
    }

    fn params(e: Env) -> Params {
        storage::get_params(&e)
    }

    fn admin(e: Env) -> Address {
        storage::get_admin(&e)
    }

    fn emergency_admin(e: Env) -> Address {
        storage::get_emergency_admin(&e)
    }

    fn indexes(e: Env, metoken_denom: Option<String>) -> Vec<Index> {
        query::indexes(&e, metoken_denom).unwrap_or_else(|err| panic_with_error!(&e, err))
    }

    fn index_balances(e: Env, metoken_denom: Option<String>) -> Vec<IndexBalances> {
        query::index_balances(&e, metoken_denom).unwrap_or_else(|err| panic_with_error!(&e, err))
    }

    fn index_prices(e: Env, metoken_denom: Option<String>) -> Vec<IndexPrices> {
        query::index_prices(&e, metoken_denom).unwrap_or_else(|err| panic_with_error!(&e, err))
    }

    fn swap_fee(e: Env, asset: Coin, metoken_denom: String) -> Coin {
        query::swap_fee(&e, &asset, &metoken_denom).unwrap_or_else(|err| panic_with_error!(&e, err))
    }

    fn redeem_fee(e: Env, metoken: Coin, asset_denom: String) -> Coin {
        query::redeem_fee(&e, &metoken, &asset_denom)
            .unwrap_or_else(|err| panic_with_error!(&e, err))
    }

    fn genesis(e: Env) -> GenesisState {
        genesis::export_genesis(&e).unwrap_or_else(|err| panic_with_error!(&e, err))
    }

    fn import_genesis(e: Env, genesis: GenesisState) {
        storage::extend_instance(&e);
        let admin = storage::get_admin(&e);
        admin.require_auth();

        genesis::execute_import_genesis(&e, &genesis)
            .unwrap_or_else(|err| panic_with_error!(&e, err));

        e.events().publish(
            (Symbol::new(&e, "import_genesis"), admin),
            genesis.registry.len(),
        );
    }
}
