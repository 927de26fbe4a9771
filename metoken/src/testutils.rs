#![cfg(test)]

use crate::{
    constants::SCALAR_18,
    storage::{self, AcceptedAsset, AssetBalance, Fee, Index, IndexBalances, Params},
    MeTokenContract,
};
use mock_bank::{MockBank, MockBankClient};
use mock_leverage::{MockLeverage, MockLeverageClient, TokenSettings};
use mock_oracle::{MockOracle, MockOracleClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger, LedgerInfo},
    vec, Address, Env, String, Symbol,
};

pub(crate) const USDT: &str = "USDT";
pub(crate) const USDC: &str = "USDC";
pub(crate) const IST: &str = "IST";
pub(crate) const ME_USD: &str = "me/USD";

pub(crate) const ONE: i128 = SCALAR_18;

/// The contracts the engine talks to, plus the rewards auction account
pub(crate) struct Collaborators<'a> {
    pub bank: MockBankClient<'a>,
    pub leverage: MockLeverageClient<'a>,
    pub oracle: MockOracleClient<'a>,
    pub auction: Address,
}

pub(crate) fn set_ledger(e: &Env, timestamp: u64) {
    e.ledger().set(LedgerInfo {
        timestamp,
        protocol_version: 20,
        sequence_number: 1234,
        network_id: Default::default(),
        base_reserve: 10,
        min_temp_entry_ttl: 10,
        min_persistent_entry_ttl: 10,
        max_entry_ttl: 3110400,
    });
}

//************************************************
//           External Contract Helpers
//************************************************

pub(crate) fn register_token(e: &Env, collaborators: &Collaborators, denom: &str, exponent: u32) {
    collaborators.leverage.register_token(
        &String::from_str(e, denom),
        &TokenSettings {
            symbol: Symbol::new(e, denom),
            exponent,
            max_supply: 0,
        },
    );
}

pub(crate) fn set_leverage_max_supply(
    e: &Env,
    collaborators: &Collaborators,
    denom: &str,
    max_supply: i128,
) {
    let denom = String::from_str(e, denom);
    let mut settings = collaborators.leverage.token_settings(&denom);
    settings.max_supply = max_supply;
    collaborators.leverage.register_token(&denom, &settings);
}

/// Deploy the collaborators of the engine. USDT, USDC and IST are registered with 6 decimals
/// and priced at $0.998, $1.00 and $1.02.
pub(crate) fn setup_collaborators<'a>(e: &Env) -> Collaborators<'a> {
    let bank = MockBankClient::new(e, &e.register_contract(None, MockBank {}));
    let leverage = MockLeverageClient::new(e, &e.register_contract(None, MockLeverage {}));
    let oracle = MockOracleClient::new(e, &e.register_contract(None, MockOracle {}));
    leverage.initialize(&bank.address);

    let collaborators = Collaborators {
        bank,
        leverage,
        oracle,
        auction: Address::generate(e),
    };
    for (denom, price) in [(USDT, 9_980_000), (USDC, 10_000_000), (IST, 10_200_000)] {
        register_token(e, &collaborators, denom, 6);
        collaborators.oracle.set_price(&Symbol::new(e, denom), &price);
    }
    collaborators
}

/// Deploy the engine with default params, wired to freshly deployed collaborators
pub(crate) fn setup_engine<'a>(e: &Env) -> (Address, Collaborators<'a>) {
    let engine = e.register_contract(None, MeTokenContract {});
    let collaborators = setup_collaborators(e);

    let admin = Address::generate(e);
    let emergency_admin = Address::generate(e);
    e.as_contract(&engine, || {
        storage::set_admin(e, &admin);
        storage::set_emergency_admin(e, &emergency_admin);
        storage::set_bank(e, &collaborators.bank.address);
        storage::set_leverage(e, &collaborators.leverage.address);
        storage::set_oracle(e, &collaborators.oracle.address);
        storage::set_auction(e, &collaborators.auction);
        storage::set_params(e, &Params::default());
    });
    (engine, collaborators)
}

//************************************************
//                 Index Helpers
//************************************************

/// The me/USD index, backed by USDT, USDC and IST
pub(crate) fn usd_index(e: &Env) -> Index {
    Index {
        denom: String::from_str(e, ME_USD),
        max_supply: 1_000_000_000000,
        exponent: 6,
        fee: Fee {
            min_fee: ONE / 100,
            balanced_fee: ONE / 5,
            max_fee: ONE / 2,
        },
        accepted_assets: vec![
            e,
            AcceptedAsset {
                denom: String::from_str(e, USDT),
                reserve_portion: ONE / 5,
                target_allocation: 33 * ONE / 100,
            },
            AcceptedAsset {
                denom: String::from_str(e, USDC),
                reserve_portion: ONE / 5,
                target_allocation: 34 * ONE / 100,
            },
            AcceptedAsset {
                denom: String::from_str(e, IST),
                reserve_portion: ONE / 5,
                target_allocation: 33 * ONE / 100,
            },
        ],
    }
}

fn asset_balance(e: &Env, denom: &str, leveraged: i128, reserved: i128) -> AssetBalance {
    AssetBalance {
        denom: String::from_str(e, denom),
        leveraged,
        reserved,
        fees: 0,
        interest: 0,
    }
}

/// me/USD balances holding 1200 USDT, 760 USDC and 3000 IST behind 4960 meTokens
pub(crate) fn seeded_balances(e: &Env) -> IndexBalances {
    IndexBalances {
        denom: String::from_str(e, ME_USD),
        metoken_supply: 4960_000000,
        asset_balances: vec![
            e,
            asset_balance(e, USDT, 960_000000, 240_000000),
            asset_balance(e, USDC, 608_000000, 152_000000),
            asset_balance(e, IST, 2400_000000, 600_000000),
        ],
    }
}

/// Register an index with the engine and back its balances with real coins in the bank and
/// positions in the leverage contract. Returns the account holding the meToken supply.
///
/// Requires auths to be mocked.
pub(crate) fn seed_index(
    e: &Env,
    engine: &Address,
    collaborators: &Collaborators,
    index: &Index,
    balances: &IndexBalances,
) -> Address {
    e.as_contract(engine, || {
        storage::set_index(e, index);
        storage::set_balances(e, balances);
        storage::push_index_list(e, &index.denom);
    });

    for balance in balances.asset_balances.iter() {
        let held = balance.reserved + balance.fees + balance.interest;
        if held > 0 {
            collaborators.bank.mint(engine, &balance.denom, &held);
        }
        if balance.leveraged > 0 {
            collaborators
                .bank
                .mint(engine, &balance.denom, &balance.leveraged);
            collaborators
                .leverage
                .supply(engine, &balance.denom, &balance.leveraged);
        }
    }

    let holder = Address::generate(e);
    if balances.metoken_supply > 0 {
        collaborators
            .bank
            .mint(&holder, &balances.denom, &balances.metoken_supply);
    }
    holder
}
