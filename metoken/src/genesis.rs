use soroban_sdk::{contracttype, Env, Map, String, Vec};

use crate::{
    errors::MeTokenError,
    query::{index_balances, indexes},
    storage::{self, Index, IndexBalances, Params},
};

/// A snapshot of the full engine state
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct GenesisState {
    pub params: Params,
    pub registry: Vec<Index>,
    pub balances: Vec<IndexBalances>,
    pub next_rebalancing_time: u64,
    pub next_interest_claim_time: u64,
}

impl GenesisState {
    /// Validate the snapshot as a whole
    ///
    /// ### Errors
    /// * If the params, an index or a balances record is invalid
    /// * If an index is listed twice or an asset is accepted by two indexes
    /// * If an index does not have exactly one balances record with a balance for each of its
    ///   accepted assets, and nothing else
    pub fn validate(&self, e: &Env) -> Result<(), MeTokenError> {
        self.params.validate()?;

        let mut registry: Map<String, Index> = Map::new(e);
        let mut registered: Map<String, String> = Map::new(e);
        for index in self.registry.iter() {
            index.validate(e)?;
            if registry.contains_key(index.denom.clone()) {
                return Err(MeTokenError::IndexAlreadyExists);
            }
            for asset in index.accepted_assets.iter() {
                if registered.contains_key(asset.denom.clone()) {
                    return Err(MeTokenError::AssetAlreadyRegistered);
                }
                registered.set(asset.denom, index.denom.clone());
            }
            registry.set(index.denom.clone(), index);
        }

        let mut balanced: Map<String, bool> = Map::new(e);
        for balances in self.balances.iter() {
            balances.validate()?;
            let index = registry
                .get(balances.denom.clone())
                .ok_or(MeTokenError::IndexNotFound)?;
            if balanced.contains_key(balances.denom.clone()) {
                return Err(MeTokenError::InvalidRequest);
            }
            for asset in index.accepted_assets.iter() {
                if balances.asset_balance(&asset.denom).is_none() {
                    return Err(MeTokenError::BalanceNotFound);
                }
            }
            // no duplicates, so any extra record is for an asset the index does not accept
            if balances.asset_balances.len() != index.accepted_assets.len() {
                return Err(MeTokenError::InvalidRequest);
            }
            balanced.set(balances.denom, true);
        }
        if balanced.len() != registry.len() {
            return Err(MeTokenError::BalanceNotFound);
        }
        Ok(())
    }
}

/// Export the full engine state
pub fn export_genesis(e: &Env) -> Result<GenesisState, MeTokenError> {
    Ok(GenesisState {
        params: storage::get_params(e),
        registry: indexes(e, None)?,
        balances: index_balances(e, None)?,
        next_rebalancing_time: storage::get_next_rebalancing_time(e),
        next_interest_claim_time: storage::get_next_interest_claim_time(e),
    })
}

/// Load a full engine state into an engine with no registered index
///
/// ### Errors
/// If an index is already registered or the state is invalid
pub fn execute_import_genesis(e: &Env, genesis: &GenesisState) -> Result<(), MeTokenError> {
    if !storage::get_index_list(e).is_empty() {
        return Err(MeTokenError::IndexAlreadyExists);
    }
    genesis.validate(e)?;

    storage::set_params(e, &genesis.params);
    for index in genesis.registry.iter() {
        storage::set_index(e, &index);
        storage::push_index_list(e, &index.denom);
    }
    for balances in genesis.balances.iter() {
        storage::set_balances(e, &balances);
    }
    storage::set_next_rebalancing_time(e, genesis.next_rebalancing_time);
    storage::set_next_interest_claim_time(e, genesis.next_interest_claim_time);
    Ok(())
}
