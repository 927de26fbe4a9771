use soroban_sdk::{
    contracttype, unwrap::UnwrapOptimized, vec, Address, Env, String, Symbol, Vec,
};

pub(crate) const LEDGER_THRESHOLD_SHARED: u32 = 172800; // ~ 10 days
pub(crate) const LEDGER_BUMP_SHARED: u32 = 241920; // ~ 14 days

/********** Storage Types **********/

/// An amount of a denomination
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Coin {
    pub denom: String,
    pub amount: i128,
}

/// The engine-wide configuration
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Params {
    pub rebalancing_frequency: u64, // seconds between reserve rebalancing passes
    pub claiming_frequency: u64,    // seconds between interest claiming passes
    pub rewards_auction_factor: u32, // share of collected fees sent to the rewards auction, in basis points
}

/// Piecewise-linear fee parameters
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Fee {
    pub min_fee: i128,      // the lowest fee fraction, expressed in 18 decimals
    pub balanced_fee: i128, // the fee fraction charged at the target allocation, expressed in 18 decimals
    pub max_fee: i128,      // the highest fee fraction, expressed in 18 decimals
}

/// The settings of an underlying asset within one index
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct AcceptedAsset {
    pub denom: String,           // the base denom of the asset
    pub reserve_portion: i128, // the fraction of incoming assets held by the engine, expressed in 18 decimals
    pub target_allocation: i128, // the fraction of the index value this asset should represent, expressed in 18 decimals
}

/// A registered meToken and its backing configuration
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Index {
    pub denom: String,    // the meToken denom, prefixed with "me/"
    pub max_supply: i128, // the maximum meToken supply, 0 for unlimited
    pub exponent: u32,    // the decimal places of the meToken
    pub fee: Fee,
    pub accepted_assets: Vec<AcceptedAsset>,
}

/// The accounting of one accepted asset within an index
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct AssetBalance {
    pub denom: String,
    pub leveraged: i128, // the amount supplied to the leverage contract
    pub reserved: i128,  // the amount held by the engine
    pub fees: i128,      // the retained portion of collected fees
    pub interest: i128,  // the interest claimed from the leverage contract
}

/// The accounting of an index
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct IndexBalances {
    pub denom: String,
    pub metoken_supply: i128,
    pub asset_balances: Vec<AssetBalance>,
}

/********** Storage Key Types **********/

const ADMIN_KEY: &str = "Admin";
const EMERGENCY_ADMIN_KEY: &str = "EmergAdmin";
const BANK_KEY: &str = "Bank";
const LEVERAGE_KEY: &str = "Leverage";
const ORACLE_KEY: &str = "Oracle";
const AUCTION_KEY: &str = "Auction";
const PARAMS_KEY: &str = "Params";
const NEXT_REBALANCE_KEY: &str = "NextRebal";
const NEXT_CLAIM_KEY: &str = "NextClaim";
const INDEX_LIST_KEY: &str = "IndexList";

#[derive(Clone)]
#[contracttype]
pub enum MeTokenDataKey {
    // The index registered for a meToken denom
    Index(String),
    // The balances of the index registered for a meToken denom
    Balances(String),
}

/********** Storage **********/

/// Bump the instance rent for the contract
pub fn extend_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/********** Admin **********/

/// Fetch the current admin Address
///
/// ### Panics
/// If the admin does not exist
pub fn get_admin(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, ADMIN_KEY))
        .unwrap_optimized()
}

/// Set a new admin
///
/// ### Arguments
/// * `new_admin` - The Address for the admin
pub fn set_admin(e: &Env, new_admin: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, ADMIN_KEY), new_admin);
}

/// Checks if an admin is set
pub fn has_admin(e: &Env) -> bool {
    e.storage().instance().has(&Symbol::new(e, ADMIN_KEY))
}

/// Fetch the current emergency admin Address
///
/// ### Panics
/// If the emergency admin does not exist
pub fn get_emergency_admin(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, EMERGENCY_ADMIN_KEY))
        .unwrap_optimized()
}

/// Set a new emergency admin
///
/// ### Arguments
/// * `new_emergency_admin` - The Address for the emergency admin
pub fn set_emergency_admin(e: &Env, new_emergency_admin: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, EMERGENCY_ADMIN_KEY), new_emergency_admin);
}

/********** External Contracts **********/

/// Fetch the bank contract address
pub fn get_bank(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, BANK_KEY))
        .unwrap_optimized()
}

/// Set the bank contract address
///
/// ### Arguments
/// * `bank` - The address of the bank contract
pub fn set_bank(e: &Env, bank: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, BANK_KEY), bank);
}

/// Fetch the leverage contract address
pub fn get_leverage(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, LEVERAGE_KEY))
        .unwrap_optimized()
}

/// Set the leverage contract address
///
/// ### Arguments
/// * `leverage` - The address of the leverage contract
pub fn set_leverage(e: &Env, leverage: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, LEVERAGE_KEY), leverage);
}

/// Fetch the oracle contract address
pub fn get_oracle(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, ORACLE_KEY))
        .unwrap_optimized()
}

/// Set the oracle contract address
///
/// ### Arguments
/// * `oracle` - The address of the oracle contract
pub fn set_oracle(e: &Env, oracle: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, ORACLE_KEY), oracle);
}

/// Fetch the rewards auction address
pub fn get_auction(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&Symbol::new(e, AUCTION_KEY))
        .unwrap_optimized()
}

/// Set the rewards auction address
///
/// ### Arguments
/// * `auction` - The address receiving the auction share of fees
pub fn set_auction(e: &Env, auction: &Address) {
    e.storage()
        .instance()
        .set::<Symbol, Address>(&Symbol::new(e, AUCTION_KEY), auction);
}

/********** Params **********/

/// Fetch the engine params
///
/// ### Panics
/// If the params are not set
pub fn get_params(e: &Env) -> Params {
    e.storage()
        .instance()
        .get(&Symbol::new(e, PARAMS_KEY))
        .unwrap_optimized()
}

/// Set the engine params
///
/// ### Arguments
/// * `params` - The new params
pub fn set_params(e: &Env, params: &Params) {
    e.storage()
        .instance()
        .set::<Symbol, Params>(&Symbol::new(e, PARAMS_KEY), params);
}

/********** Hook Schedule **********/

/// Fetch the timestamp of the next reserve rebalancing pass, 0 if never set
pub fn get_next_rebalancing_time(e: &Env) -> u64 {
    e.storage()
        .instance()
        .get(&Symbol::new(e, NEXT_REBALANCE_KEY))
        .unwrap_or(0)
}

/// Set the timestamp of the next reserve rebalancing pass
pub fn set_next_rebalancing_time(e: &Env, timestamp: u64) {
    e.storage()
        .instance()
        .set::<Symbol, u64>(&Symbol::new(e, NEXT_REBALANCE_KEY), &timestamp);
}

/// Fetch the timestamp of the next interest claiming pass, 0 if never set
pub fn get_next_interest_claim_time(e: &Env) -> u64 {
    e.storage()
        .instance()
        .get(&Symbol::new(e, NEXT_CLAIM_KEY))
        .unwrap_or(0)
}

/// Set the timestamp of the next interest claiming pass
pub fn set_next_interest_claim_time(e: &Env, timestamp: u64) {
    e.storage()
        .instance()
        .set::<Symbol, u64>(&Symbol::new(e, NEXT_CLAIM_KEY), &timestamp);
}

/********** Index Registry (Index) **********/

/// Fetch the index registered for a meToken denom, if any
///
/// ### Arguments
/// * `denom` - The meToken denom
pub fn get_index(e: &Env, denom: &String) -> Option<Index> {
    let key = MeTokenDataKey::Index(denom.clone());
    let index = e
        .storage()
        .persistent()
        .get::<MeTokenDataKey, Index>(&key);
    if index.is_some() {
        e.storage()
            .persistent()
            .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    }
    index
}

/// Set the index for a meToken denom
///
/// ### Arguments
/// * `index` - The index to store
pub fn set_index(e: &Env, index: &Index) {
    let key = MeTokenDataKey::Index(index.denom.clone());
    e.storage()
        .persistent()
        .set::<MeTokenDataKey, Index>(&key, index);
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/// Checks if an index exists for a meToken denom
pub fn has_index(e: &Env, denom: &String) -> bool {
    let key = MeTokenDataKey::Index(denom.clone());
    e.storage().persistent().has(&key)
}

/********** Index Balances (Balances) **********/

/// Fetch the balances of the index registered for a meToken denom, if any
///
/// ### Arguments
/// * `denom` - The meToken denom
pub fn get_balances(e: &Env, denom: &String) -> Option<IndexBalances> {
    let key = MeTokenDataKey::Balances(denom.clone());
    let balances = e
        .storage()
        .persistent()
        .get::<MeTokenDataKey, IndexBalances>(&key);
    if balances.is_some() {
        e.storage()
            .persistent()
            .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    }
    balances
}

/// Set the balances of an index
///
/// ### Arguments
/// * `balances` - The balances to store
pub fn set_balances(e: &Env, balances: &IndexBalances) {
    let key = MeTokenDataKey::Balances(balances.denom.clone());
    e.storage()
        .persistent()
        .set::<MeTokenDataKey, IndexBalances>(&key, balances);
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/// Checks if balances exist for a meToken denom
pub fn has_balances(e: &Env, denom: &String) -> bool {
    let key = MeTokenDataKey::Balances(denom.clone());
    e.storage().persistent().has(&key)
}

/********** Index List (IndexList) **********/

/// Fetch the meToken denoms of every registered index, in registration order
pub fn get_index_list(e: &Env) -> Vec<String> {
    e.storage()
        .instance()
        .get(&Symbol::new(e, INDEX_LIST_KEY))
        .unwrap_or(vec![e])
}

/// Add a meToken denom to the end of the index list
///
/// ### Arguments
/// * `denom` - The meToken denom of the new index
pub fn push_index_list(e: &Env, denom: &String) {
    let mut list = get_index_list(e);
    list.push_back(denom.clone());
    e.storage()
        .instance()
        .set::<Symbol, Vec<String>>(&Symbol::new(e, INDEX_LIST_KEY), &list);
}
