use cast::i128;
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{Address, ConversionError, Env, Error, InvokeError, String, Symbol};

use crate::{
    constants::MAX_BPS,
    dependencies::BankClient,
    errors::MeTokenError,
    storage,
};

fn transferred(
    result: Result<Result<(), ConversionError>, Result<Error, InvokeError>>,
) -> Result<(), MeTokenError> {
    match result {
        Ok(Ok(())) => Ok(()),
        _ => Err(MeTokenError::ExternalTransferFailed),
    }
}

/// Pull `amount` of `denom` from `from` into the engine
pub fn receive(e: &Env, from: &Address, denom: &String, amount: i128) -> Result<(), MeTokenError> {
    if amount == 0 {
        return Ok(());
    }
    let bank = BankClient::new(e, &storage::get_bank(e));
    transferred(bank.try_send(from, &e.current_contract_address(), denom, &amount))
}

/// Send `amount` of `denom` held by the engine to `to`
pub fn pay(e: &Env, to: &Address, denom: &String, amount: i128) -> Result<(), MeTokenError> {
    if amount == 0 {
        return Ok(());
    }
    let bank = BankClient::new(e, &storage::get_bank(e));
    transferred(bank.try_send(&e.current_contract_address(), to, denom, &amount))
}

/// Mint `amount` of `denom` to the engine
pub fn mint(e: &Env, denom: &String, amount: i128) -> Result<(), MeTokenError> {
    let bank = BankClient::new(e, &storage::get_bank(e));
    transferred(bank.try_mint(&e.current_contract_address(), denom, &amount))
}

/// Burn `amount` of `denom` held by the engine
pub fn burn(e: &Env, denom: &String, amount: i128) -> Result<(), MeTokenError> {
    let bank = BankClient::new(e, &storage::get_bank(e));
    transferred(bank.try_burn(&e.current_contract_address(), denom, &amount))
}

/// Send the rewards auction share of a collected fee to the auction
///
/// Returns the part of the fee retained by the engine
pub fn fund_rewards_auction(
    e: &Env,
    denom: &String,
    fee_amount: i128,
) -> Result<i128, MeTokenError> {
    let factor = storage::get_params(e).rewards_auction_factor;
    let auction_amount = fee_amount
        .fixed_mul_floor(i128(factor), i128(MAX_BPS))
        .ok_or(MeTokenError::OverflowError)?;
    if auction_amount > 0 {
        pay(e, &storage::get_auction(e), denom, auction_amount)?;
        e.events().publish(
            (Symbol::new(e, "fund_rewards_auction"), denom.clone()),
            auction_amount,
        );
    }
    Ok(fee_amount - auction_amount)
}
