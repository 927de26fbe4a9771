use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{log, Env};

use crate::{
    constants::{REBALANCE_TOLERANCE, SCALAR_18},
    errors::MeTokenError,
    index::{load_balances, load_index},
    storage::{self, AcceptedAsset, AssetBalance},
};

use super::{supply, withdraw, LeverageFailure};

/// Move every asset of every index back toward its reserve portion. Does nothing before the
/// next rebalancing time.
///
/// Returns true if a rebalancing pass ran
///
/// ### Errors
/// If the leverage contract fails with a non-recoverable error
pub fn execute_rebalance(e: &Env) -> Result<bool, MeTokenError> {
    let now = e.ledger().timestamp();
    if now < storage::get_next_rebalancing_time(e) {
        return Ok(false);
    }

    for denom in storage::get_index_list(e).iter() {
        let index = load_index(e, &denom)?;
        let mut balances = load_balances(e, &denom)?;
        for asset in index.accepted_assets.iter() {
            let mut balance = balances
                .asset_balance(&asset.denom)
                .ok_or(MeTokenError::BalanceNotFound)?;
            rebalance_asset(e, &asset, &mut balance)?;
            balances.set_asset_balance(balance);
        }
        balances.validate()?;
        storage::set_balances(e, &balances);
    }

    let params = storage::get_params(e);
    storage::set_next_rebalancing_time(e, now + params.rebalancing_frequency);
    Ok(true)
}

fn rebalance_asset(
    e: &Env,
    asset: &AcceptedAsset,
    balance: &mut AssetBalance,
) -> Result<(), MeTokenError> {
    let available = balance.available_supply();
    if available <= 0 {
        return Ok(());
    }
    let desired_reserved = available
        .fixed_mul_floor(asset.reserve_portion, SCALAR_18)
        .ok_or(MeTokenError::OverflowError)?;

    if desired_reserved - balance.reserved > REBALANCE_TOLERANCE {
        match withdraw(e, &asset.denom, desired_reserved - balance.reserved) {
            Ok(withdrawn) => {
                balance.reserved += withdrawn;
                balance.leveraged -= withdrawn;
            }
            Err(LeverageFailure::Recoverable) => {
                log!(e, "rebalance: withdraw skipped", asset.denom);
            }
            Err(LeverageFailure::Fatal) => return Err(MeTokenError::LeverageFailure),
        }
    } else if balance.reserved - desired_reserved > REBALANCE_TOLERANCE {
        match supply(e, &asset.denom, balance.reserved - desired_reserved) {
            Ok(supplied) => {
                balance.reserved -= supplied;
                balance.leveraged += supplied;
            }
            Err(LeverageFailure::Recoverable) => {
                log!(e, "rebalance: supply skipped", asset.denom);
            }
            Err(LeverageFailure::Fatal) => return Err(MeTokenError::LeverageFailure),
        }
    }
    Ok(())
}
