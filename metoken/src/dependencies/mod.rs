mod bank;
pub use bank::Client as BankClient;

mod leverage;
pub use leverage::{
    Client as LeverageClient, TokenSettings, INSUFFICIENT_LIQUIDITY, MAX_SUPPLY_REACHED,
};

mod oracle;
pub use oracle::{Asset, Client as ExchangeRateClient, PriceData, PriceFeedClient};
