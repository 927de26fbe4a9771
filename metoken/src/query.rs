use soroban_sdk::{vec, Env, String, Vec};

use crate::{
    errors::MeTokenError,
    exchange::load_index_asset,
    index::{load_balances, load_index},
    pricing::{fee_amount, IndexPrices},
    storage::{self, Coin, Index, IndexBalances},
    validator::{require_metoken_denom, require_nonnegative, require_valid_denom},
};

/// Resolve the denoms a query targets, every registered index in registration order if none
fn queried_denoms(e: &Env, denom: Option<String>) -> Result<Vec<String>, MeTokenError> {
    match denom {
        Some(denom) => {
            if !storage::has_index(e, &denom) {
                return Err(MeTokenError::IndexNotFound);
            }
            Ok(vec![e, denom])
        }
        None => Ok(storage::get_index_list(e)),
    }
}

pub fn indexes(e: &Env, denom: Option<String>) -> Result<Vec<Index>, MeTokenError> {
    let mut indexes = vec![e];
    for denom in queried_denoms(e, denom)?.iter() {
        indexes.push_back(load_index(e, &denom)?);
    }
    Ok(indexes)
}

pub fn index_balances(
    e: &Env,
    denom: Option<String>,
) -> Result<Vec<IndexBalances>, MeTokenError> {
    let mut balances = vec![e];
    for denom in queried_denoms(e, denom)?.iter() {
        balances.push_back(load_balances(e, &denom)?);
    }
    Ok(balances)
}

/// Load the current prices of indexes
///
/// ### Errors
/// If the index does not exist or a price of one of its assets is unavailable
pub fn index_prices(e: &Env, denom: Option<String>) -> Result<Vec<IndexPrices>, MeTokenError> {
    let mut prices = vec![e];
    for denom in queried_denoms(e, denom)?.iter() {
        let index = load_index(e, &denom)?;
        let balances = load_balances(e, &denom)?;
        prices.push_back(IndexPrices::load(e, &index, &balances)?);
    }
    Ok(prices)
}

/// Preview the fee charged to swap an asset into an index, in the asset's denom
pub fn swap_fee(e: &Env, asset: &Coin, metoken_denom: &String) -> Result<Coin, MeTokenError> {
    require_valid_denom(&asset.denom)?;
    require_nonnegative(asset.amount)?;
    let (index, _) = load_index_asset(e, metoken_denom, &asset.denom)?;
    let balances = load_balances(e, metoken_denom)?;
    let prices = IndexPrices::load(e, &index, &balances)?;

    let fee = fee_amount(asset.amount, prices.asset_price(&asset.denom)?.swap_fee)?;
    Ok(Coin {
        denom: asset.denom.clone(),
        amount: fee,
    })
}

/// Preview the fee charged to redeem meTokens for an asset, in the asset's denom
pub fn redeem_fee(e: &Env, metoken: &Coin, asset_denom: &String) -> Result<Coin, MeTokenError> {
    require_metoken_denom(&metoken.denom)?;
    require_valid_denom(asset_denom)?;
    require_nonnegative(metoken.amount)?;
    let (index, _) = load_index_asset(e, &metoken.denom, asset_denom)?;
    let balances = load_balances(e, &metoken.denom)?;
    let prices = IndexPrices::load(e, &index, &balances)?;

    let gross = prices.redeem_amount(e, asset_denom, metoken.amount)?;
    let fee = fee_amount(gross, prices.asset_price(asset_denom)?.redeem_fee)?;
    Ok(Coin {
        denom: asset_denom.clone(),
        amount: fee,
    })
}
