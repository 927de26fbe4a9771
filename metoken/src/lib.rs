#![no_std]

#[cfg(any(test, feature = "testutils"))]
extern crate std;

mod constants;
mod contract;
mod dependencies;
mod errors;
mod exchange;
mod genesis;
mod index;
mod math;
mod pricing;
mod query;
mod registry;
mod reserves;
mod storage;
mod testutils;
mod validator;

pub use constants::SCALAR_18;
pub use contract::*;
pub use dependencies::TokenSettings;
pub use errors::MeTokenError;
pub use exchange::{RedeemResponse, SwapResponse};
pub use pricing::{AssetPrice, IndexPrices};
pub use genesis::GenesisState;
pub use storage::{
    AcceptedAsset, AssetBalance, Coin, Fee, Index, IndexBalances, MeTokenDataKey, Params,
};
