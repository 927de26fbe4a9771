use soroban_sdk::{log, Env, Map, String};

use crate::{
    errors::MeTokenError,
    index::{load_balances, load_index},
    storage,
};

use super::{supplied, withdraw, LeverageFailure};

/// Claim the interest the leverage contract accrued on every leveraged asset. Does nothing
/// before the next interest claiming time.
///
/// Returns true if a claiming pass ran. A pass skipped because the leverage contract could
/// not report the engine's positions returns false.
///
/// ### Errors
/// If the leverage contract fails with a non-recoverable error
pub fn execute_claim_interest(e: &Env) -> Result<bool, MeTokenError> {
    let now = e.ledger().timestamp();
    if now < storage::get_next_interest_claim_time(e) {
        return Ok(false);
    }

    let positions = match supplied(e) {
        Ok(positions) => positions,
        // retried on the next call, the claim time is left as is
        Err(LeverageFailure::Recoverable) => {
            log!(e, "claim_interest: supplied positions unavailable");
            return Ok(false);
        }
        Err(LeverageFailure::Fatal) => return Err(MeTokenError::LeverageFailure),
    };
    let mut reported: Map<String, i128> = Map::new(e);
    for coin in positions.iter() {
        reported.set(coin.denom, coin.amount);
    }

    for denom in storage::get_index_list(e).iter() {
        let index = load_index(e, &denom)?;
        let mut balances = load_balances(e, &denom)?;
        for asset in index.accepted_assets.iter() {
            let mut balance = balances
                .asset_balance(&asset.denom)
                .ok_or(MeTokenError::BalanceNotFound)?;
            if balance.leveraged <= 0 {
                continue;
            }
            let accrued = reported.get(asset.denom.clone()).unwrap_or(0) - balance.leveraged;
            if accrued < 0 {
                log!(
                    e,
                    "claim_interest: leverage reports less than supplied",
                    asset.denom,
                    accrued
                );
                continue;
            }
            if accrued == 0 {
                continue;
            }
            match withdraw(e, &asset.denom, accrued) {
                Ok(withdrawn) => {
                    balance.interest += withdrawn;
                    balances.set_asset_balance(balance);
                }
                Err(LeverageFailure::Recoverable) => {
                    log!(e, "claim_interest: withdraw skipped", asset.denom);
                }
                Err(LeverageFailure::Fatal) => return Err(MeTokenError::LeverageFailure),
            }
        }
        balances.validate()?;
        storage::set_balances(e, &balances);
    }

    let params = storage::get_params(e);
    storage::set_next_interest_claim_time(e, now + params.claiming_frequency);
    Ok(true)
}
