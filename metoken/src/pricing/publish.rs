use soroban_sdk::{log, Env};

use crate::{
    dependencies::ExchangeRateClient,
    index::{load_balances, load_index},
    storage,
};

use super::IndexPrices;

/// Push the price of every index to the oracle. An index whose price cannot be computed or
/// pushed is skipped.
///
/// Returns the number of prices pushed
pub fn execute_update_prices(e: &Env) -> u32 {
    let oracle = ExchangeRateClient::new(e, &storage::get_oracle(e));
    let engine = e.current_contract_address();

    let mut pushed: u32 = 0;
    for denom in storage::get_index_list(e).iter() {
        let prices = load_index(e, &denom).and_then(|index| {
            let balances = load_balances(e, &denom)?;
            IndexPrices::load(e, &index, &balances)
        });
        let prices = match prices {
            Ok(prices) => prices,
            Err(err) => {
                log!(e, "update_prices: price unavailable", denom, err as u32);
                continue;
            }
        };
        match oracle.try_set_exchange_rate(&engine, &denom, &prices.price) {
            Ok(Ok(())) => pushed += 1,
            _ => log!(e, "update_prices: oracle rejected price", denom),
        }
    }
    pushed
}

#[cfg(test)]
mod tests {
    use crate::{
        storage::{AcceptedAsset, IndexBalances},
        testutils::{self, ONE},
    };

    use super::*;
    use soroban_sdk::{vec, String, Symbol};

    #[test]
    fn test_update_prices() {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let seeded = testutils::seeded_balances(&e);
        testutils::seed_index(&e, &engine, &collaborators, &index, &seeded);

        e.as_contract(&engine, || {
            assert_eq!(execute_update_prices(&e), 1);
        });
        assert_eq!(
            collaborators.oracle.exchange_rate(&index.denom),
            Some(1011612903225806451)
        );
    }

    #[test]
    fn test_update_prices_skips_unpriced_index() {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let index = testutils::usd_index(&e);
        let empty = IndexBalances::new(&e, &index);
        testutils::seed_index(&e, &engine, &collaborators, &index, &empty);

        let mut eur_index = testutils::usd_index(&e);
        eur_index.denom = String::from_str(&e, "me/EUR");
        eur_index.accepted_assets = vec![
            &e,
            AcceptedAsset {
                denom: String::from_str(&e, "EURC"),
                reserve_portion: ONE / 5,
                target_allocation: ONE,
            },
        ];
        testutils::register_token(&e, &collaborators, "EURC", 6);
        testutils::seed_index(
            &e,
            &engine,
            &collaborators,
            &eur_index,
            &IndexBalances::new(&e, &eur_index),
        );
        // EURC has no oracle price
        collaborators
            .oracle
            .set_prices(&Symbol::new(&e, "EURC"), &vec![&e]);

        e.as_contract(&engine, || {
            assert_eq!(execute_update_prices(&e), 1);
        });
        assert_eq!(
            collaborators.oracle.exchange_rate(&index.denom),
            Some(1006 * ONE / 1000)
        );
        assert_eq!(collaborators.oracle.exchange_rate(&eur_index.denom), None);
    }
}
