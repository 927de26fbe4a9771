use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{Env, String};

use crate::{
    constants::SCALAR_18,
    errors::MeTokenError,
    math::{div_dec, mul_dec, mul_div_trunc, pow10},
    storage::{Fee, IndexBalances},
};

use super::{prices::asset_value, IndexPrices};

impl Fee {
    /// Compute the fee fraction for an allocation deviation, `balanced_fee * (1 + deviation)`
    /// clamped to `[min_fee, max_fee]`
    ///
    /// ### Arguments
    /// * `deviation` - The allocation deviation from target, expressed in 18 decimals
    pub fn calculate(&self, e: &Env, deviation: i128) -> Result<i128, MeTokenError> {
        let factor = SCALAR_18
            .checked_add(deviation)
            .ok_or(MeTokenError::OverflowError)?;
        let raw = mul_dec(e, self.balanced_fee, factor)?;
        Ok(raw.clamp(self.min_fee, self.max_fee))
    }
}

/// Compute the share of the index value currently represented by an asset, expressed in 18
/// decimals. An empty index or an asset with no available supply has a zero allocation.
pub fn current_allocation(
    e: &Env,
    balances: &IndexBalances,
    prices: &IndexPrices,
    denom: &String,
) -> Result<i128, MeTokenError> {
    let balance = balances
        .asset_balance(denom)
        .ok_or(MeTokenError::BalanceNotFound)?;
    let available = balance.available_supply();
    if balances.metoken_supply == 0 || available == 0 {
        return Ok(0);
    }

    let asset_price = prices.asset_price(denom)?;
    let value = asset_value(e, available, asset_price.price, asset_price.exponent)?;
    let index_value = mul_div_trunc(
        e,
        balances.metoken_supply,
        prices.price,
        pow10(prices.exponent)?,
    )?;
    if index_value == 0 {
        return Ok(0);
    }
    div_dec(e, value, index_value)
}

/// Compute the fee fraction to swap an asset into an index
///
/// ### Arguments
/// * `target` - The target allocation of the asset
/// * `current` - The current allocation of the asset
pub fn swap_fee_fraction(
    e: &Env,
    fee: &Fee,
    target: i128,
    current: i128,
) -> Result<i128, MeTokenError> {
    // the index does not want this asset at any balance
    if target == 0 {
        return Ok(fee.max_fee);
    }
    if current == 0 {
        return Ok(fee.min_fee);
    }
    let deviation = mul_div_trunc(e, current - target, SCALAR_18, target)?;
    fee.calculate(e, deviation)
}

/// Compute the fee fraction to redeem an asset out of an index
///
/// ### Arguments
/// * `target` - The target allocation of the asset
/// * `current` - The current allocation of the asset
pub fn redeem_fee_fraction(
    e: &Env,
    fee: &Fee,
    target: i128,
    current: i128,
) -> Result<i128, MeTokenError> {
    if target == 0 {
        return Ok(fee.min_fee);
    }
    let deviation = mul_div_trunc(e, target - current, SCALAR_18, target)?;
    fee.calculate(e, deviation)
}

/// Apply a fee fraction to an amount, truncating
pub fn fee_amount(amount: i128, fraction: i128) -> Result<i128, MeTokenError> {
    amount
        .fixed_mul_floor(fraction, SCALAR_18)
        .ok_or(MeTokenError::OverflowError)
}
