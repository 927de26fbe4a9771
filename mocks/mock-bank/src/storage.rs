use soroban_sdk::{contracttype, Address, Env, String};

pub(crate) const LEDGER_THRESHOLD_SHARED: u32 = 172800; // ~ 10 days
pub(crate) const LEDGER_BUMP_SHARED: u32 = 241920; // ~ 14 days

#[derive(Clone)]
#[contracttype]
pub struct BalanceKey {
    pub account: Address,
    pub denom: String,
}

#[derive(Clone)]
#[contracttype]
pub enum MockBankDataKey {
    // The balance of a denom held by an account
    Balance(BalanceKey),
    // The total supply of a denom
    Supply(String),
}

pub fn extend_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

pub fn get_balance(e: &Env, account: &Address, denom: &String) -> i128 {
    let key = MockBankDataKey::Balance(BalanceKey {
        account: account.clone(),
        denom: denom.clone(),
    });
    e.storage()
        .persistent()
        .get::<MockBankDataKey, i128>(&key)
        .unwrap_or(0)
}

pub fn set_balance(e: &Env, account: &Address, denom: &String, amount: i128) {
    let key = MockBankDataKey::Balance(BalanceKey {
        account: account.clone(),
        denom: denom.clone(),
    });
    e.storage()
        .persistent()
        .set::<MockBankDataKey, i128>(&key, &amount);
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

pub fn get_supply(e: &Env, denom: &String) -> i128 {
    let key = MockBankDataKey::Supply(denom.clone());
    e.storage()
        .persistent()
        .get::<MockBankDataKey, i128>(&key)
        .unwrap_or(0)
}

pub fn set_supply(e: &Env, denom: &String, amount: i128) {
    let key = MockBankDataKey::Supply(denom.clone());
    e.storage()
        .persistent()
        .set::<MockBankDataKey, i128>(&key, &amount);
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}
