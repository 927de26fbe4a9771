use soroban_sdk::{contracttype, log, vec, Env, String, Symbol, Vec};

use crate::{
    constants::{DECIMALS, MAX_PRICE_AGE, PRICE_RECORDS, SCALAR_18},
    dependencies::{Asset, PriceData, PriceFeedClient},
    errors::MeTokenError,
    math::{exponent_factors, mul_div_many, mul_div_trunc, pow10, rescale},
    reserves,
    storage::{self, Index, IndexBalances},
};

use super::fee::{current_allocation, redeem_fee_fraction, swap_fee_fraction};

/// The price of an accepted asset along with previews of the exchange in both directions
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct AssetPrice {
    pub base_denom: String,
    pub symbol_denom: Symbol,
    pub price: i128, // USD per whole token, expressed in 18 decimals
    pub exponent: u32,
    pub swap_rate: i128,   // meToken units received per asset unit, expressed in 18 decimals
    pub swap_fee: i128,    // the fee fraction charged to swap the asset in, expressed in 18 decimals
    pub redeem_rate: i128, // asset units received per meToken unit, expressed in 18 decimals
    pub redeem_fee: i128,  // the fee fraction charged to redeem the asset out, expressed in 18 decimals
}

/// A snapshot of the prices of an index. Never persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct IndexPrices {
    pub denom: String,
    pub price: i128, // USD per whole meToken, expressed in 18 decimals
    pub exponent: u32,
    pub assets: Vec<AssetPrice>,
}

impl IndexPrices {
    /// Load the prices of an index and its accepted assets at the current ledger time
    ///
    /// ### Arguments
    /// * `index` - The index
    /// * `balances` - The current balances of the index
    ///
    /// ### Errors
    /// * If an asset is unknown to the leverage contract
    /// * If the oracle has no recent price for an asset
    pub fn load(
        e: &Env,
        index: &Index,
        balances: &IndexBalances,
    ) -> Result<IndexPrices, MeTokenError> {
        let oracle = PriceFeedClient::new(e, &storage::get_oracle(e));
        let oracle_decimals = match oracle.try_decimals() {
            Ok(Ok(decimals)) => decimals,
            _ => return Err(MeTokenError::PriceUnavailable),
        };

        let mut asset_prices: Vec<AssetPrice> = vec![e];
        let mut total_value: i128 = 0;
        let mut price_sum: i128 = 0;
        for asset in index.accepted_assets.iter() {
            let settings = reserves::token_settings(e, &asset.denom)
                .map_err(|_| MeTokenError::UnknownAsset)?;
            let price = load_price(e, &oracle, &settings.symbol, oracle_decimals)?;
            let balance = balances
                .asset_balance(&asset.denom)
                .ok_or(MeTokenError::BalanceNotFound)?;

            let value = asset_value(e, balance.available_supply(), price, settings.exponent)?;
            total_value = total_value
                .checked_add(value)
                .ok_or(MeTokenError::OverflowError)?;
            price_sum = price_sum
                .checked_add(price)
                .ok_or(MeTokenError::OverflowError)?;
            asset_prices.push_back(AssetPrice {
                base_denom: asset.denom.clone(),
                symbol_denom: settings.symbol,
                price,
                exponent: settings.exponent,
                swap_rate: 0,
                swap_fee: 0,
                redeem_rate: 0,
                redeem_fee: 0,
            });
        }

        let price = if balances.metoken_supply > 0 {
            mul_div_trunc(
                e,
                total_value,
                pow10(index.exponent)?,
                balances.metoken_supply,
            )?
        } else {
            // bootstrap from the definition of the index while nothing is minted
            price_sum / (index.accepted_assets.len() as i128)
        };
        if price <= 0 {
            log!(e, "index price is not positive", index.denom.clone(), price);
            return Err(MeTokenError::PriceUnavailable);
        }

        let mut prices = IndexPrices {
            denom: index.denom.clone(),
            price,
            exponent: index.exponent,
            assets: vec![e],
        };
        for mut asset_price in asset_prices.iter() {
            asset_price.swap_rate = exchange_rate(
                e,
                asset_price.price,
                price,
                asset_price.exponent,
                index.exponent,
            )?;
            asset_price.redeem_rate = exchange_rate(
                e,
                price,
                asset_price.price,
                index.exponent,
                asset_price.exponent,
            )?;
            prices.assets.push_back(asset_price);
        }

        let mut previewed: Vec<AssetPrice> = vec![e];
        for (asset, mut asset_price) in index.accepted_assets.iter().zip(prices.assets.iter()) {
            let allocation = current_allocation(e, balances, &prices, &asset.denom)?;
            asset_price.swap_fee =
                swap_fee_fraction(e, &index.fee, asset.target_allocation, allocation)?;
            asset_price.redeem_fee =
                redeem_fee_fraction(e, &index.fee, asset.target_allocation, allocation)?;
            previewed.push_back(asset_price);
        }
        prices.assets = previewed;
        Ok(prices)
    }

    /// Fetch the price of an accepted asset
    ///
    /// ### Errors
    /// If the asset is not part of the index
    pub fn asset_price(&self, denom: &String) -> Result<AssetPrice, MeTokenError> {
        self.assets
            .iter()
            .find(|asset| asset.base_denom == *denom)
            .ok_or(MeTokenError::DenomNotAccepted)
    }

    /// Convert an amount of an accepted asset into meToken units at the swap rate, truncating
    pub fn swap_amount(
        &self,
        e: &Env,
        denom: &String,
        amount: i128,
    ) -> Result<i128, MeTokenError> {
        let asset_price = self.asset_price(denom)?;
        mul_div_trunc(e, amount, asset_price.swap_rate, SCALAR_18)
    }

    /// Convert an amount of meTokens into units of an accepted asset at the redeem rate, truncating
    pub fn redeem_amount(
        &self,
        e: &Env,
        denom: &String,
        amount: i128,
    ) -> Result<i128, MeTokenError> {
        let asset_price = self.asset_price(denom)?;
        mul_div_trunc(e, amount, asset_price.redeem_rate, SCALAR_18)
    }
}

/// Compute the USD value, in 18 decimals, of `amount` units of a token with `exponent` decimals
pub fn asset_value(
    e: &Env,
    amount: i128,
    price: i128,
    exponent: u32,
) -> Result<i128, MeTokenError> {
    mul_div_trunc(e, amount, price, pow10(exponent)?)
}

/// Compute the rate that converts units of a token priced `from_price` with `from_exponent`
/// decimals into units of a token priced `to_price` with `to_exponent` decimals
///
/// `from_price / to_price * 10^(to_exponent - from_exponent)`, expressed in 18 decimals
pub fn exchange_rate(
    e: &Env,
    from_price: i128,
    to_price: i128,
    from_exponent: u32,
    to_exponent: u32,
) -> Result<i128, MeTokenError> {
    if to_price <= 0 {
        return Err(MeTokenError::PriceUnavailable);
    }
    let (multiplier, divisor) = exponent_factors(from_exponent, to_exponent)?;
    mul_div_many(
        e,
        &[from_price, SCALAR_18, multiplier],
        &[to_price, divisor],
    )
}

/// Load the most recent price of a symbol from the oracle, expressed in 18 decimals
///
/// ### Errors
/// If the oracle has no price for the symbol or the latest price is stale
pub fn load_price(
    e: &Env,
    oracle: &PriceFeedClient,
    symbol: &Symbol,
    oracle_decimals: u32,
) -> Result<i128, MeTokenError> {
    let records = match oracle.try_prices(&Asset::Other(symbol.clone()), &PRICE_RECORDS) {
        Ok(Ok(Some(records))) => records,
        _ => return Err(MeTokenError::PriceUnavailable),
    };

    let mut latest: Option<PriceData> = None;
    for record in records.iter() {
        let newer = match &latest {
            Some(current) => record.timestamp > current.timestamp,
            None => true,
        };
        if newer {
            latest = Some(record);
        }
    }

    let latest = latest.ok_or(MeTokenError::PriceUnavailable)?;
    let expiry = latest
        .timestamp
        .checked_add(MAX_PRICE_AGE)
        .ok_or(MeTokenError::PriceUnavailable)?;
    if latest.price <= 0 || expiry < e.ledger().timestamp() {
        return Err(MeTokenError::PriceUnavailable);
    }
    rescale(latest.price, oracle_decimals, DECIMALS)
}

#[cfg(test)]
mod tests {
    use crate::testutils::{self, ONE, IST, USDC, USDT};

    use super::*;
    use soroban_sdk::testutils::Ledger;

    #[test]
    fn test_exchange_rate() {
        let e = Env::default();

        let usdt = 998 * ONE / 1000;
        let me = 1006 * ONE / 1000;
        assert_eq!(exchange_rate(&e, usdt, me, 6, 6), Ok(992047713717693836));
        assert_eq!(exchange_rate(&e, me, usdt, 6, 6), Ok(1008016032064128256));

        // at equal prices one unit with 6 decimals converts into 100 units with 8 decimals
        assert_eq!(exchange_rate(&e, ONE, ONE, 6, 8), Ok(100 * ONE));
        assert_eq!(exchange_rate(&e, ONE, ONE, 8, 6), Ok(ONE / 100));
        assert_eq!(
            exchange_rate(&e, ONE, 0, 6, 6),
            Err(MeTokenError::PriceUnavailable)
        );
    }

    #[test]
    fn test_asset_value() {
        let e = Env::default();

        assert_eq!(
            asset_value(&e, 1200_000000, 998 * ONE / 1000, 6),
            Ok(1197_600000000000000000)
        );
    }

    #[test]
    fn test_load_bootstrap_prices() {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let (engine, _) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let balances = IndexBalances::new(&e, &index);

        e.as_contract(&engine, || {
            let prices = IndexPrices::load(&e, &index, &balances).unwrap();
            assert_eq!(prices.price, 1006 * ONE / 1000);
            assert_eq!(prices.exponent, 6);
            assert_eq!(prices.assets.len(), 3);

            let usdt = prices.asset_price(&String::from_str(&e, USDT)).unwrap();
            assert_eq!(usdt.symbol_denom, Symbol::new(&e, "USDT"));
            assert_eq!(usdt.price, 998 * ONE / 1000);
            assert_eq!(usdt.swap_rate, 992047713717693836);
            // nothing minted, every asset is charged the min fee to swap in
            assert_eq!(usdt.swap_fee, ONE / 100);
            assert_eq!(
                prices.swap_amount(&e, &String::from_str(&e, USDT), 99_000000),
                Ok(98_212723)
            );
        });
    }

    #[test]
    fn test_load_balanced_prices() {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let (engine, _) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let balances = testutils::seeded_balances(&e);

        e.as_contract(&engine, || {
            let prices = IndexPrices::load(&e, &index, &balances).unwrap();
            assert_eq!(prices.price, 1011612903225806451);

            let usdt = prices.asset_price(&String::from_str(&e, USDT)).unwrap();
            assert_eq!(usdt.swap_rate, 986543367346938776);
            assert_eq!(usdt.redeem_rate, 1013640183592992435);
            assert_eq!(usdt.swap_fee, 144654452690166975);
            assert_eq!(usdt.redeem_fee, 255345547309833024);

            let usdc = prices.asset_price(&String::from_str(&e, USDC)).unwrap();
            assert_eq!(usdc.swap_fee, 89098139255702280);
            assert_eq!(usdc.redeem_fee, 310901860744297719);

            let ist = prices.asset_price(&String::from_str(&e, IST)).unwrap();
            assert_eq!(ist.swap_fee, 369608070500927643);
            assert_eq!(ist.redeem_fee, 30391929499072356);
        });
    }

    #[test]
    fn test_load_prices_missing_price() {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let balances = IndexBalances::new(&e, &index);
        collaborators
            .oracle
            .set_prices(&Symbol::new(&e, "IST"), &vec![&e]);

        e.as_contract(&engine, || {
            assert_eq!(
                IndexPrices::load(&e, &index, &balances),
                Err(MeTokenError::PriceUnavailable)
            );
        });
    }

    #[test]
    fn test_load_prices_unknown_asset() {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let (engine, _) = testutils::setup_engine(&e);
        let mut index = testutils::usd_index(&e);
        let mut asset = index.accepted_assets.get_unchecked(2);
        asset.denom = String::from_str(&e, "DAI");
        index.accepted_assets.set(2, asset);
        let balances = IndexBalances::new(&e, &index);

        e.as_contract(&engine, || {
            assert_eq!(
                IndexPrices::load(&e, &index, &balances),
                Err(MeTokenError::UnknownAsset)
            );
        });
    }

    #[test]
    fn test_load_price_picks_latest_record() {
        let e = Env::default();
        e.mock_all_auths();
        testutils::set_ledger(&e, 1_000_000);

        let (_, collaborators) = testutils::setup_engine(&e);
        let symbol = Symbol::new(&e, "USDT");
        collaborators.oracle.set_prices(
            &symbol,
            &vec![
                &e,
                PriceData {
                    price: 9_900_000,
                    timestamp: 999_000,
                },
                PriceData {
                    price: 9_980_000,
                    timestamp: 999_900,
                },
                PriceData {
                    price: 9_950_000,
                    timestamp: 999_500,
                },
            ],
        );

        let oracle = PriceFeedClient::new(&e, &collaborators.oracle.address);
        assert_eq!(
            load_price(&e, &oracle, &symbol, 7),
            Ok(998 * ONE / 1000)
        );
    }

    #[test]
    fn test_load_price_stale() {
        let e = Env::default();
        e.mock_all_auths();
        testutils::set_ledger(&e, 1_000_000);

        let (_, collaborators) = testutils::setup_engine(&e);
        let symbol = Symbol::new(&e, "USDT");
        collaborators.oracle.set_prices(
            &symbol,
            &vec![
                &e,
                PriceData {
                    price: 9_980_000,
                    timestamp: 1_000_000 - MAX_PRICE_AGE - 1,
                },
            ],
        );
        let oracle = PriceFeedClient::new(&e, &collaborators.oracle.address);
        assert_eq!(
            load_price(&e, &oracle, &symbol, 7),
            Err(MeTokenError::PriceUnavailable)
        );

        // the same record is usable right at the edge of the window
        e.ledger().with_mut(|li| li.timestamp = 1_000_000 - 1);
        assert_eq!(
            load_price(&e, &oracle, &symbol, 7),
            Ok(998 * ONE / 1000)
        );
    }

    #[test]
    fn test_load_price_timestamp_out_of_range() {
        let e = Env::default();
        e.mock_all_auths();
        testutils::set_ledger(&e, 1_000_000);

        let (_, collaborators) = testutils::setup_engine(&e);
        let symbol = Symbol::new(&e, "USDT");
        collaborators.oracle.set_prices(
            &symbol,
            &vec![
                &e,
                PriceData {
                    price: 9_980_000,
                    timestamp: u64::MAX,
                },
            ],
        );
        let oracle = PriceFeedClient::new(&e, &collaborators.oracle.address);
        assert_eq!(
            load_price(&e, &oracle, &symbol, 7),
            Err(MeTokenError::PriceUnavailable)
        );
    }
}
