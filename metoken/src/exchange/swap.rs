use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{Address, Env, String};

use crate::{
    constants::SCALAR_18,
    errors::MeTokenError,
    index::load_balances,
    pricing::{fee_amount, IndexPrices},
    reserves::{self, LeverageFailure},
    storage::{self, Coin},
    validator::{require_positive, require_valid_denom},
};

use super::{load_index_asset, settlement, SwapResponse};

/// Swap an accepted asset for meTokens of an index
///
/// ### Arguments
/// * `user` - The address swapping, which sends the asset and receives the meTokens
/// * `asset` - The asset to swap
/// * `metoken_denom` - The meToken to receive
///
/// ### Errors
/// * If the request is malformed or the index does not accept the asset
/// * If the prices of the index are unavailable
/// * If the swap would mint nothing or exceed the max supply of the index
/// * If a transfer fails or the leverage contract fails with a non-recoverable error
pub fn execute_swap(
    e: &Env,
    user: &Address,
    asset: &Coin,
    metoken_denom: &String,
) -> Result<SwapResponse, MeTokenError> {
    require_valid_denom(&asset.denom)?;
    require_positive(asset.amount)?;
    let (index, accepted_asset) = load_index_asset(e, metoken_denom, &asset.denom)?;
    let mut balances = load_balances(e, metoken_denom)?;
    let prices = IndexPrices::load(e, &index, &balances)?;

    let fee = fee_amount(asset.amount, prices.asset_price(&asset.denom)?.swap_fee)?;
    let net = asset.amount - fee;
    let minted = prices.swap_amount(e, &asset.denom, net)?;
    if minted <= 0 {
        return Err(MeTokenError::InsufficientForSwap);
    }
    let metoken_supply = balances
        .metoken_supply
        .checked_add(minted)
        .ok_or(MeTokenError::OverflowError)?;
    if index.max_supply > 0 && metoken_supply > index.max_supply {
        return Err(MeTokenError::MaxSupplyExceeded);
    }

    let mut to_reserves = net
        .fixed_mul_floor(accepted_asset.reserve_portion, SCALAR_18)
        .ok_or(MeTokenError::OverflowError)?;
    let mut to_leverage = net - to_reserves;

    settlement::receive(e, user, &asset.denom, asset.amount)?;
    let supplied = match reserves::supply(e, &asset.denom, to_leverage) {
        Ok(supplied) => supplied,
        Err(LeverageFailure::Recoverable) => 0,
        Err(LeverageFailure::Fatal) => return Err(MeTokenError::LeverageFailure),
    };
    // whatever the leverage contract could not take stays in reserves
    to_reserves += to_leverage - supplied;
    to_leverage = supplied;

    settlement::mint(e, metoken_denom, minted)?;
    settlement::pay(e, user, metoken_denom, minted)?;
    let retained_fee = settlement::fund_rewards_auction(e, &asset.denom, fee)?;

    let mut balance = balances
        .asset_balance(&asset.denom)
        .ok_or(MeTokenError::BalanceNotFound)?;
    balance.reserved += to_reserves;
    balance.leveraged += to_leverage;
    balance.fees += retained_fee;
    balances.set_asset_balance(balance);
    balances.metoken_supply = metoken_supply;
    balances.validate()?;
    storage::set_balances(e, &balances);

    Ok(SwapResponse {
        fee: Coin {
            denom: asset.denom.clone(),
            amount: fee,
        },
        returned: Coin {
            denom: metoken_denom.clone(),
            amount: minted,
        },
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        dependencies::MAX_SUPPLY_REACHED,
        index::load_balances,
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
    fn test_swap_bootstrap() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let empty = IndexBalances::new(&e, &index);
        testutils::seed_index(&e, &engine, &collaborators, &index, &empty);
        let samwise = Address::generate(&e);
        let usdt = String::from_str(&e, USDT);
        collaborators.bank.mint(&samwise, &usdt, &100_000000);

        e.as_contract(&engine, || {
            let response =
                execute_swap(&e, &samwise, &coin(&e, USDT, 100_000000), &index.denom).unwrap();
            assert_eq!(response.fee, coin(&e, USDT, 1_000000));
            assert_eq!(response.returned, coin(&e, ME_USD, 98_212723));

            let balances = load_balances(&e, &index.denom).unwrap();
            assert_eq!(balances.metoken_supply, 98_212723);
            let balance = balances.asset_balance(&usdt).unwrap();
            assert_eq!(balance.reserved, 19_800000);
            assert_eq!(balance.leveraged, 79_200000);
            assert_eq!(balance.fees, 900000);
            assert_eq!(balance.interest, 0);
        });

        assert_eq!(collaborators.bank.balance(&samwise, &usdt), 0);
        assert_eq!(collaborators.bank.balance(&samwise, &index.denom), 98_212723);
        assert_eq!(collaborators.bank.balance(&engine, &usdt), 19_800000 + 900000);
        assert_eq!(collaborators.bank.balance(&collaborators.auction, &usdt), 100000);
        assert_eq!(collaborators.leverage.total_supply(&usdt), 79_200000);
    }

    #[test]
    fn test_swap_balanced() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let seeded = testutils::seeded_balances(&e);
        testutils::seed_index(&e, &engine, &collaborators, &index, &seeded);
        let samwise = Address::generate(&e);
        let usdt = String::from_str(&e, USDT);
        collaborators.bank.mint(&samwise, &usdt, &10_000000);

        e.as_contract(&engine, || {
            let response =
                execute_swap(&e, &samwise, &coin(&e, USDT, 10_000000), &index.denom).unwrap();
            assert_eq!(response.fee, coin(&e, USDT, 1_446544));
            assert_eq!(response.returned, coin(&e, ME_USD, 8_438355));

            let balances = load_balances(&e, &index.denom).unwrap();
            assert_eq!(balances.metoken_supply, 4960_000000 + 8_438355);
            let balance = balances.asset_balance(&usdt).unwrap();
            assert_eq!(balance.reserved, 240_000000 + 1_710691);
            assert_eq!(balance.leveraged, 960_000000 + 6_842765);
            assert_eq!(balance.fees, 1_301890);
        });
        assert_eq!(collaborators.bank.balance(&collaborators.auction, &usdt), 144654);
    }

    #[test]
    fn test_swap_max_supply_exceeded() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let seeded = testutils::seeded_balances(&e);
        testutils::seed_index(&e, &engine, &collaborators, &index, &seeded);
        let samwise = Address::generate(&e);
        let ist = String::from_str(&e, IST);
        collaborators.bank.mint(&samwise, &ist, &2_000_000_000000);

        e.as_contract(&engine, || {
            assert_eq!(
                execute_swap(&e, &samwise, &coin(&e, IST, 2_000_000_000000), &index.denom),
                Err(MeTokenError::MaxSupplyExceeded)
            );
            assert_eq!(load_balances(&e, &index.denom).unwrap(), seeded);
        });
        assert_eq!(collaborators.bank.balance(&samwise, &ist), 2_000_000_000000);
    }

    #[test]
    fn test_swap_leverage_capped() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let empty = IndexBalances::new(&e, &index);
        testutils::seed_index(&e, &engine, &collaborators, &index, &empty);
        testutils::set_leverage_max_supply(&e, &collaborators, USDT, 50_000000);
        let samwise = Address::generate(&e);
        let usdt = String::from_str(&e, USDT);
        collaborators.bank.mint(&samwise, &usdt, &100_000000);

        e.as_contract(&engine, || {
            execute_swap(&e, &samwise, &coin(&e, USDT, 100_000000), &index.denom).unwrap();

            let balances = load_balances(&e, &index.denom).unwrap();
            let balance = balances.asset_balance(&usdt).unwrap();
            assert_eq!(balance.leveraged, 50_000000);
            assert_eq!(balance.reserved, 49_000000);
            assert_eq!(balance.available_supply(), 99_000000);
        });
    }

    #[test]
    fn test_swap_recoverable_leverage_error() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let empty = IndexBalances::new(&e, &index);
        testutils::seed_index(&e, &engine, &collaborators, &index, &empty);
        collaborators.leverage.set_error(&MAX_SUPPLY_REACHED);
        let samwise = Address::generate(&e);
        let usdt = String::from_str(&e, USDT);
        collaborators.bank.mint(&samwise, &usdt, &100_000000);

        e.as_contract(&engine, || {
            execute_swap(&e, &samwise, &coin(&e, USDT, 100_000000), &index.denom).unwrap();

            let balances = load_balances(&e, &index.denom).unwrap();
            let balance = balances.asset_balance(&usdt).unwrap();
            assert_eq!(balance.leveraged, 0);
            assert_eq!(balance.reserved, 99_000000);
        });
        assert_eq!(collaborators.bank.balance(&engine, &usdt), 99_000000 + 900000);
    }

    #[test]
    fn test_swap_fatal_leverage_error() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let empty = IndexBalances::new(&e, &index);
        testutils::seed_index(&e, &engine, &collaborators, &index, &empty);
        collaborators.leverage.set_error(&7);
        let samwise = Address::generate(&e);
        collaborators
            .bank
            .mint(&samwise, &String::from_str(&e, USDT), &100_000000);

        e.as_contract(&engine, || {
            assert_eq!(
                execute_swap(&e, &samwise, &coin(&e, USDT, 100_000000), &index.denom),
                Err(MeTokenError::LeverageFailure)
            );
        });
    }

    #[test]
    fn test_swap_rejects_bad_requests() {
        let e = Env::default();
        e.mock_all_auths_allowing_non_root_auth();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let empty = IndexBalances::new(&e, &index);
        testutils::seed_index(&e, &engine, &collaborators, &index, &empty);
        let samwise = Address::generate(&e);
        collaborators
            .bank
            .mint(&samwise, &String::from_str(&e, USDT), &100_000000);

        e.as_contract(&engine, || {
            assert_eq!(
                execute_swap(&e, &samwise, &coin(&e, USDT, 0), &index.denom),
                Err(MeTokenError::InvalidRequest)
            );
            assert_eq!(
                execute_swap(&e, &samwise, &coin(&e, "1BAD", 10), &index.denom),
                Err(MeTokenError::InvalidRequest)
            );
            assert_eq!(
                execute_swap(&e, &samwise, &coin(&e, "DAI", 10), &index.denom),
                Err(MeTokenError::DenomNotAccepted)
            );
            assert_eq!(
                execute_swap(
                    &e,
                    &samwise,
                    &coin(&e, USDT, 10),
                    &String::from_str(&e, "me/EUR")
                ),
                Err(MeTokenError::IndexNotFound)
            );
            // truncates to no meTokens
            assert_eq!(
                execute_swap(&e, &samwise, &coin(&e, USDT, 1), &index.denom),
                Err(MeTokenError::InsufficientForSwap)
            );
        });
    }

    #[test]
    fn test_swap_user_without_funds() {
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
                execute_swap(&e, &samwise, &coin(&e, USDT, 100_000000), &index.denom),
                Err(MeTokenError::ExternalTransferFailed)
            );
        });
    }
}
