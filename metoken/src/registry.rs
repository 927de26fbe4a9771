use soroban_sdk::{Env, Map, String, Vec};

use crate::{
    errors::MeTokenError,
    index::{load_balances, load_index},
    reserves,
    storage::{self, AssetBalance, Index, IndexBalances, Params},
};

/// Set the engine params
///
/// ### Errors
/// If the params are invalid
pub fn execute_set_params(e: &Env, params: &Params) -> Result<(), MeTokenError> {
    params.validate()?;
    storage::set_params(e, params);
    Ok(())
}

/// Register new indexes and update existing ones
///
/// ### Arguments
/// * `add_index` - The indexes to register
/// * `update_index` - The new definitions of registered indexes
/// * `emergency` - If the change comes from the emergency admin, which can only adjust the max
///                 supply and target allocations of existing indexes
///
/// ### Errors
/// If the request is empty or lists a denom twice, or any index breaks a registry rule
pub fn execute_update_registry(
    e: &Env,
    add_index: &Vec<Index>,
    update_index: &Vec<Index>,
    emergency: bool,
) -> Result<(), MeTokenError> {
    if add_index.is_empty() && update_index.is_empty() {
        return Err(MeTokenError::InvalidRequest);
    }
    let mut requested: Map<String, bool> = Map::new(e);
    for index in add_index.iter().chain(update_index.iter()) {
        if requested.contains_key(index.denom.clone()) {
            return Err(MeTokenError::InvalidRequest);
        }
        requested.set(index.denom, true);
    }
    if emergency && !add_index.is_empty() {
        return Err(MeTokenError::EmergencyChangeForbidden);
    }

    let mut registered = registered_assets(e)?;
    for index in add_index.iter() {
        add(e, &mut registered, &index)?;
    }
    for index in update_index.iter() {
        if emergency {
            emergency_update(e, &index)?;
        } else {
            update(e, &mut registered, &index)?;
        }
    }
    Ok(())
}

/// Map every base denom in the registry to the meToken denom of its index
fn registered_assets(e: &Env) -> Result<Map<String, String>, MeTokenError> {
    let mut registered: Map<String, String> = Map::new(e);
    for denom in storage::get_index_list(e).iter() {
        let index = load_index(e, &denom)?;
        for asset in index.accepted_assets.iter() {
            registered.set(asset.denom, denom.clone());
        }
    }
    Ok(registered)
}

/// Register an asset for an index, making sure no other index holds it and the leverage
/// contract knows it
fn register_asset(
    e: &Env,
    registered: &mut Map<String, String>,
    metoken_denom: &String,
    asset_denom: &String,
) -> Result<(), MeTokenError> {
    if let Some(owner) = registered.get(asset_denom.clone()) {
        if owner != *metoken_denom {
            return Err(MeTokenError::AssetAlreadyRegistered);
        }
    }
    reserves::token_settings(e, asset_denom).map_err(|_| MeTokenError::UnknownAsset)?;
    registered.set(asset_denom.clone(), metoken_denom.clone());
    Ok(())
}

fn add(e: &Env, registered: &mut Map<String, String>, index: &Index) -> Result<(), MeTokenError> {
    index.validate(e)?;
    if storage::has_index(e, &index.denom) {
        return Err(MeTokenError::IndexAlreadyExists);
    }
    for asset in index.accepted_assets.iter() {
        register_asset(e, registered, &index.denom, &asset.denom)?;
    }

    storage::set_index(e, index);
    storage::set_balances(e, &IndexBalances::new(e, index));
    storage::push_index_list(e, &index.denom);
    Ok(())
}

fn update(
    e: &Env,
    registered: &mut Map<String, String>,
    index: &Index,
) -> Result<(), MeTokenError> {
    let existing = load_index(e, &index.denom)?;
    index.validate(e)?;
    let mut balances = load_balances(e, &index.denom)?;

    if index.exponent != existing.exponent && balances.metoken_supply > 0 {
        return Err(MeTokenError::ExponentFrozen);
    }
    for asset in existing.accepted_assets.iter() {
        if !index.has_accepted_asset(&asset.denom) {
            return Err(MeTokenError::AssetRemovalForbidden);
        }
    }
    for asset in index.accepted_assets.iter() {
        if !existing.has_accepted_asset(&asset.denom) {
            register_asset(e, registered, &index.denom, &asset.denom)?;
            balances.set_asset_balance(AssetBalance::zero(&asset.denom));
        }
    }

    storage::set_index(e, index);
    storage::set_balances(e, &balances);
    Ok(())
}

fn emergency_update(e: &Env, index: &Index) -> Result<(), MeTokenError> {
    let existing = load_index(e, &index.denom)?;
    index.validate(e)?;

    if index.exponent != existing.exponent
        || index.fee != existing.fee
        || index.accepted_assets.len() != existing.accepted_assets.len()
    {
        return Err(MeTokenError::EmergencyChangeForbidden);
    }
    for asset in index.accepted_assets.iter() {
        match existing.accepted_asset(&asset.denom) {
            Some(current) if current.reserve_portion == asset.reserve_portion => {}
            _ => return Err(MeTokenError::EmergencyChangeForbidden),
        }
    }

    storage::set_index(e, index);
    Ok(())
}
