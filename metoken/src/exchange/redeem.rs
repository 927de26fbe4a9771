use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{Address, Env, String};

use crate::{
    constants::SCALAR_18,
    errors::MeTokenError,
    index::load_balances,
    pricing::{fee_amount, IndexPrices},
    reserves::{self, LeverageFailure},
    storage::{self, Coin},
    validator::{require_metoken_denom, require_positive, require_valid_denom},
};

use super::{load_index_asset, settlement, RedeemResponse};

/// Redeem meTokens of an index for one of its accepted assets
///
/// ### Arguments
/// * `user` - The address redeeming, which sends the meTokens and receives the asset
/// * `metoken` - The meTokens to redeem
/// * `asset_denom` - The asset to receive
///
/// ### Errors
/// * If the request is malformed or the index does not accept the asset
/// * If the index has no supply, or less than the amount redeemed
/// * If the prices of the index are unavailable
/// * If the redeem would return nothing
/// * If the reserves cannot cover what the leverage contract does not return
/// * If a transfer fails or the leverage contract fails with a non-recoverable error
pub fn execute_redeem(
    e: &Env,
    user: &Address,
    metoken: &Coin,
    asset_denom: &String,
) -> Result<RedeemResponse, MeTokenError> {
    require_metoken_denom(&metoken.denom)?;
    require_valid_denom(asset_denom)?;
    require_positive(metoken.amount)?;
    let (index, accepted_asset) = load_index_asset(e, &metoken.denom, asset_denom)?;
    let mut balances = load_balances(e, &metoken.denom)?;
    if balances.metoken_supply == 0 {
        return Err(MeTokenError::EmptyIndex);
    }
    if metoken.amount > balances.metoken_supply {
        return Err(MeTokenError::BalanceError);
    }
    let prices = IndexPrices::load(e, &index, &balances)?;

    let gross_out = prices.redeem_amount(e, asset_denom, metoken.amount)?;
    if gross_out <= 0 {
        return Err(MeTokenError::InsufficientForRedeem);
    }
    let mut balance = balances
        .asset_balance(asset_denom)
        .ok_or(MeTokenError::BalanceNotFound)?;

    let mut from_reserves = gross_out
        .fixed_mul_floor(accepted_asset.reserve_portion, SCALAR_18)
        .ok_or(MeTokenError::OverflowError)?;
    let mut from_leverage = gross_out - from_reserves;
    if from_leverage > balance.leveraged {
        from_reserves += from_leverage - balance.leveraged;
        from_leverage = balance.leveraged;
    }
    let withdrawn = match reserves::withdraw(e, asset_denom, from_leverage) {
        Ok(withdrawn) => withdrawn,
        Err(LeverageFailure::Recoverable) => 0,
        Err(LeverageFailure::Fatal) => return Err(MeTokenError::LeverageFailure),
    };
    // the reserves cover whatever the leverage contract could not return
    from_reserves += from_leverage - withdrawn;
    from_leverage = withdrawn;
    if balance.reserved < from_reserves {
        return Err(MeTokenError::InsufficientLiquidity);
    }

    let fee = fee_amount(gross_out, prices.asset_price(asset_denom)?.redeem_fee)?;
    let net_out = gross_out - fee;

    settlement::receive(e, user, &metoken.denom, metoken.amount)?;
    settlement::burn(e, &metoken.denom, metoken.amount)?;
    settlement::pay(e, user, asset_denom, net_out)?;
    let retained_fee = settlement::fund_rewards_auction(e, asset_denom, fee)?;

    balance.reserved -= from_reserves;
    balance.leveraged -= from_leverage;
    balance.fees += retained_fee;
    balances.set_asset_balance(balance);
    balances.metoken_supply -= metoken.amount;
    balances.validate()?;
    storage::set_balances(e, &balances);

    Ok(RedeemResponse {
        fee: Coin {
            denom: asset_denom.clone(),
            amount: fee,
        },
        returned: Coin {
            denom: asset_denom.clone(),
            amount: net_out,
        },
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        dependencies::INSUFFICIENT_LIQUIDITY,
        storage::IndexBalances,
        testutils::{self, IST, ME_USD, USDT},
    };

    use super::*;
    use soroban_sdk::testutils::Address as _;

    fn coin(e: &Env, denom: &str, amount: i128) -> Coin {
        Coin {
            denom: String::from_str(e, denom),
            amount,
        }
    }

    #[test]
    fn test_redeem_with_leverage_shortfall() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let seeded = testutils::seeded_balances(&e);
        let holder = testutils::seed_index(&e, &engine, &collaborators, &index, &seeded);
        collaborators.leverage.set_withdraw_ratio(&4_000);
        let ist = String::from_str(&e, IST);

        e.as_contract(&engine, || {
            let response =
                execute_redeem(&e, &holder, &coin(&e, ME_USD, 100_000000), &ist).unwrap();
            assert_eq!(response.fee, coin(&e, IST, 3_014202));
            assert_eq!(response.returned, coin(&e, IST, 96_163533));

            let balances = load_balances(&e, &index.denom).unwrap();
            assert_eq!(balances.metoken_supply, 4860_000000);
            let balance = balances.asset_balance(&ist).unwrap();
            assert_eq!(balance.leveraged, 2400_000000 - 31_736875);
            assert_eq!(balance.reserved, 600_000000 - 67_440860);
            assert_eq!(balance.fees, 2_712782);
        });

        assert_eq!(collaborators.bank.balance(&holder, &ist), 96_163533);
        assert_eq!(
            collaborators.bank.balance(&holder, &index.denom),
            4860_000000
        );
        assert_eq!(collaborators.bank.total_supply(&index.denom), 4860_000000);
        assert_eq!(collaborators.bank.balance(&collaborators.auction, &ist), 301420);
        assert_eq!(
            collaborators.bank.balance(&engine, &ist),
            600_000000 - 67_440860 + 2_712782
        );
    }

    #[test]
    fn test_redeem_insufficient_liquidity() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let mut seeded = testutils::seeded_balances(&e);
        let ist = String::from_str(&e, IST);
        let mut balance = seeded.asset_balance(&ist).unwrap();
        balance.reserved = 10_000000;
        balance.leveraged = 2990_000000;
        seeded.set_asset_balance(balance);
        let holder = testutils::seed_index(&e, &engine, &collaborators, &index, &seeded);
        collaborators.leverage.set_withdraw_ratio(&4_000);

        e.as_contract(&engine, || {
            assert_eq!(
                execute_redeem(&e, &holder, &coin(&e, ME_USD, 100_000000), &ist),
                Err(MeTokenError::InsufficientLiquidity)
            );
        });
    }

    #[test]
    fn test_redeem_recoverable_leverage_error() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let seeded = testutils::seeded_balances(&e);
        let holder = testutils::seed_index(&e, &engine, &collaborators, &index, &seeded);
        collaborators.leverage.set_error(&INSUFFICIENT_LIQUIDITY);
        let ist = String::from_str(&e, IST);

        e.as_contract(&engine, || {
            execute_redeem(&e, &holder, &coin(&e, ME_USD, 100_000000), &ist).unwrap();

            let balance = load_balances(&e, &index.denom)
                .unwrap()
                .asset_balance(&ist)
                .unwrap();
            assert_eq!(balance.leveraged, 2400_000000);
            assert_eq!(balance.reserved, 600_000000 - 99_177735);
        });
    }

    #[test]
    fn test_redeem_empty_index() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let empty = IndexBalances::new(&e, &index);
        testutils::seed_index(&e, &engine, &collaborators, &index, &empty);
        let samwise = Address::generate(&e);

        e.as_contract(&engine, || {
            assert_eq!(
                execute_redeem(
                    &e,
                    &samwise,
                    &coin(&e, ME_USD, 100_000000),
                    &String::from_str(&e, USDT)
                ),
                Err(MeTokenError::EmptyIndex)
            );
        });
    }

    #[test]
    fn test_redeem_rejects_bad_requests() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let seeded = testutils::seeded_balances(&e);
        let holder = testutils::seed_index(&e, &engine, &collaborators, &index, &seeded);
        let usdt = String::from_str(&e, USDT);
        let ist = String::from_str(&e, IST);

        e.as_contract(&engine, || {
            assert_eq!(
                execute_redeem(&e, &holder, &coin(&e, USDT, 100), &usdt),
                Err(MeTokenError::InvalidRequest)
            );
            assert_eq!(
                execute_redeem(&e, &holder, &coin(&e, ME_USD, -5), &usdt),
                Err(MeTokenError::InvalidRequest)
            );
            assert_eq!(
                execute_redeem(
                    &e,
                    &holder,
                    &coin(&e, ME_USD, 100),
                    &String::from_str(&e, "DAI")
                ),
                Err(MeTokenError::DenomNotAccepted)
            );
            assert_eq!(
                execute_redeem(&e, &holder, &coin(&e, ME_USD, 4960_000001), &usdt),
                Err(MeTokenError::BalanceError)
            );
            assert_eq!(
                execute_redeem(&e, &holder, &coin(&e, ME_USD, 1), &ist),
                Err(MeTokenError::InsufficientForRedeem)
            );
            // the user does not hold the meTokens
            assert_eq!(
                execute_redeem(
                    &e,
                    &Address::generate(&e),
                    &coin(&e, ME_USD, 100_000000),
                    &usdt
                ),
                Err(MeTokenError::ExternalTransferFailed)
            );
        });
    }
}
