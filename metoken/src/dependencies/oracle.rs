use soroban_sdk::{contractclient, Address, Env, String};

pub use sep_40_oracle::{Asset, PriceData, PriceFeedClient};

/// The oracle extension that receives meToken prices derived by the engine
#[allow(dead_code)]
#[contractclient(name = "Client")]
pub trait ExchangeRateReceiver {
    /// Publish the USD exchange rate of `denom`, expressed in 18 decimals
    fn set_exchange_rate(e: Env, from: Address, denom: String, rate: i128);
}
