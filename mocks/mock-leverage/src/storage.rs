use soroban_sdk::{
    contracttype, unwrap::UnwrapOptimized, vec, Address, Env, String, Symbol, Vec,
};

pub(crate) const LEDGER_THRESHOLD_SHARED: u32 = 172800; // ~ 10 days
pub(crate) const LEDGER_BUMP_SHARED: u32 = 241920; // ~ 14 days

/// An amount of a denomination
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Coin {
    pub denom: String,
    pub amount: i128,
}

/// The registry entry of a token
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct TokenSettings {
    pub symbol: Symbol,   // the oracle symbol of the token
    pub exponent: u32,    // the decimal places of the token
    pub max_supply: i128, // the max amount that can be supplied, 0 for unlimited
}

#[derive(Clone)]
#[contracttype]
pub struct PositionKey {
    pub supplier: Address,
    pub denom: String,
}

#[derive(Clone)]
#[contracttype]
pub enum MockLeverageDataKey {
    // The registry entry of a token
    Token(String),
    // The total amount of a token supplied
    Total(String),
    // The amount of a token supplied by a supplier, including interest
    Position(PositionKey),
}

const BANK_KEY: &str = "Bank";
const TOKEN_LIST_KEY: &str = "TokenList";
const WITHDRAW_RATIO_KEY: &str = "WdRatio";
const ERROR_KEY: &str = "Error";

pub fn extend_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

pub fn has_bank(e: &Env) -> bool {
    e.storage().instance().has(&Symbol::new(e, BANK_KEY))
}

pub fn get_bank(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, BANK_KEY))
        .unwrap_optimized()
}

pub fn set_bank(e: &Env, bank: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, BANK_KEY), bank);
}

pub fn get_token(e: &Env, denom: &String) -> Option<TokenSettings> {
    let key = MockLeverageDataKey::Token(denom.clone());
    e.storage()
        .persistent()
        .get::<MockLeverageDataKey, TokenSettings>(&key)
}

pub fn set_token(e: &Env, denom: &String, settings: &TokenSettings) {
    let key = MockLeverageDataKey::Token(denom.clone());
    e.storage()
        .persistent()
        .set::<MockLeverageDataKey, TokenSettings>(&key, settings);
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

pub fn get_token_list(e: &Env) -> Vec<String> {
    e.storage()
        .instance()
        .get(&Symbol::new(e, TOKEN_LIST_KEY))
        .unwrap_or(vec![e])
}

pub fn set_token_list(e: &Env, list: &Vec<String>) {
    e.storage()
        .instance()
        .set::<Symbol, Vec<String>>(&Symbol::new(e, TOKEN_LIST_KEY), list);
}

pub fn get_total(e: &Env, denom: &String) -> i128 {
    let key = MockLeverageDataKey::Total(denom.clone());
    e.storage()
        .persistent()
        .get::<MockLeverageDataKey, i128>(&key)
        .unwrap_or(0)
}

pub fn set_total(e: &Env, denom: &String, amount: i128) {
    let key = MockLeverageDataKey::Total(denom.clone());
    e.storage()
        .persistent()
        .set::<MockLeverageDataKey, i128>(&key, &amount);
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

pub fn get_position(e: &Env, supplier: &Address, denom: &String) -> i128 {
    let key = MockLeverageDataKey::Position(PositionKey {
        supplier: supplier.clone(),
        denom: denom.clone(),
    });
    e.storage()
        .persistent()
        .get::<MockLeverageDataKey, i128>(&key)
        .unwrap_or(0)
}

pub fn set_position(e: &Env, supplier: &Address, denom: &String, amount: i128) {
    let key = MockLeverageDataKey::Position(PositionKey {
        supplier: supplier.clone(),
        denom: denom.clone(),
    });
    e.storage()
        .persistent()
        .set::<MockLeverageDataKey, i128>(&key, &amount);
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/// MOCK: the share of a withdrawal that is actually paid out, in basis points
pub fn get_withdraw_ratio(e: &Env) -> u32 {
    e.storage()
        .instance()
        .get(&Symbol::new(e, WITHDRAW_RATIO_KEY))
        .unwrap_or(10_000)
}

pub fn set_withdraw_ratio(e: &Env, ratio: u32) {
    e.storage()
        .instance()
        .set::<Symbol, u32>(&Symbol::new(e, WITHDRAW_RATIO_KEY), &ratio);
}

/// MOCK: the error code every supply, withdraw and supplied query fails with, 0 for none
pub fn get_error(e: &Env) -> u32 {
    e.storage()
        .instance()
        .get(&Symbol::new(e, ERROR_KEY))
        .unwrap_or(0)
}

pub fn set_error(e: &Env, code: u32) {
    e.storage()
        .instance()
        .set::<Symbol, u32>(&Symbol::new(e, ERROR_KEY), &code);
}
