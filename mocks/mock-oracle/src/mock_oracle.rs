use sep_40_oracle::{Asset, PriceData};
use soroban_sdk::{contract, contractimpl, contracttype, vec, Address, Env, String, Symbol, Vec};

pub(crate) const LEDGER_THRESHOLD_SHARED: u32 = 172800; // ~ 10 days
pub(crate) const LEDGER_BUMP_SHARED: u32 = 241920; // ~ 14 days

#[derive(Clone)]
#[contracttype]
pub enum MockOracleDataKey {
    // MOCK: The price records to return for a symbol
    Prices(Symbol),
    // The exchange rates pushed for a denom
    ExchangeRate(String),
}

/// ### Mock Oracle
///
/// Contract to fetch mocked symbol prices and store pushed exchange rates.
///
/// ### Dev
/// For testing purposes only!
#[contract]
pub struct MockOracle;

pub trait MockOracleTrait {
    /// Fetch the number of decimals of reported prices
    fn decimals(e: Env) -> u32;

    /// Fetch the latest price of an asset
    fn lastprice(e: Env, asset: Asset) -> Option<PriceData>;

    /// Fetch up to `records` of the most recent prices of an asset
    fn prices(e: Env, asset: Asset, records: u32) -> Option<Vec<PriceData>>;

    /// Store the exchange rate of a denom
    ///
    /// ### Arguments
    /// * `from` - The address pushing the rate
    /// * `denom` - The denom being priced
    /// * `rate` - The USD price of one whole token, expressed in 18 decimals
    fn set_exchange_rate(e: Env, from: Address, denom: String, rate: i128);

    /// Fetch the last exchange rate pushed for a denom
    fn exchange_rate(e: Env, denom: String) -> Option<i128>;

    /// Mock Only: Set a single price for a symbol, always reported at the current ledger time
    fn set_price(e: Env, symbol: Symbol, price: i128);

    /// Mock Only: Set the price records of a symbol. A record with a timestamp of 0 is
    /// reported at the current ledger time.
    fn set_prices(e: Env, symbol: Symbol, prices: Vec<PriceData>);
}

fn load_records(e: &Env, symbol: &Symbol) -> Vec<PriceData> {
    let key = MockOracleDataKey::Prices(symbol.clone());
    let records = e
        .storage()
        .persistent()
        .get::<MockOracleDataKey, Vec<PriceData>>(&key)
        .unwrap_or(vec![e]);
    let mut reported = vec![e];
    for mut record in records.iter() {
        if record.timestamp == 0 {
            record.timestamp = e.ledger().timestamp();
        }
        reported.push_back(record);
    }
    reported
}

#[contractimpl]
impl MockOracleTrait for MockOracle {
    fn decimals(_e: Env) -> u32 {
        7_u32
    }

    fn lastprice(e: Env, asset: Asset) -> Option<PriceData> {
        match asset {
            Asset::Other(symbol) => load_records(&e, &symbol).last(),
            Asset::Stellar(_) => None,
        }
    }

    fn prices(e: Env, asset: Asset, records: u32) -> Option<Vec<PriceData>> {
        let symbol = match asset {
            Asset::Other(symbol) => symbol,
            Asset::Stellar(_) => return None,
        };
        let all = load_records(&e, &symbol);
        if all.is_empty() {
            return None;
        }
        let start = all.len().saturating_sub(records);
        Some(all.slice(start..))
    }

    fn set_exchange_rate(e: Env, from: Address, denom: String, rate: i128) {
        from.require_auth();
        let key = MockOracleDataKey::ExchangeRate(denom.clone());
        e.storage()
            .persistent()
            .set::<MockOracleDataKey, i128>(&key, &rate);
        e.storage()
            .persistent()
            .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
        e.events()
            .publish((Symbol::new(&e, "exchange_rate"), from), (denom, rate));
    }

    fn exchange_rate(e: Env, denom: String) -> Option<i128> {
        let key = MockOracleDataKey::ExchangeRate(denom);
        e.storage().persistent().get::<MockOracleDataKey, i128>(&key)
    }

    fn set_price(e: Env, symbol: Symbol, price: i128) {
        Self::set_prices(
            e.clone(),
            symbol,
            vec![
                &e,
                PriceData {
                    price,
                    timestamp: 0,
                },
            ],
        );
    }

    fn set_prices(e: Env, symbol: Symbol, prices: Vec<PriceData>) {
        let key = MockOracleDataKey::Prices(symbol);
        e.storage()
            .persistent()
            .set::<MockOracleDataKey, Vec<PriceData>>(&key, &prices);
        e.storage()
            .persistent()
            .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    }
}
