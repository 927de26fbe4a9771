use soroban_sdk::{Env, I256};

use crate::{constants::SCALAR_18, errors::MeTokenError};

/// Compute the product of `numerators` divided by the product of `denominators` with a 256 bit
/// intermediate, truncating toward zero
///
/// ### Errors
/// If a denominator is zero or the result does not fit in an i128
pub fn mul_div_many(
    e: &Env,
    numerators: &[i128],
    denominators: &[i128],
) -> Result<i128, MeTokenError> {
    let mut numerator = I256::from_i128(e, 1);
    for value in numerators {
        numerator = numerator.mul(&I256::from_i128(e, *value));
    }
    let mut denominator = I256::from_i128(e, 1);
    for value in denominators {
        if *value == 0 {
            return Err(MeTokenError::InternalError);
        }
        denominator = denominator.mul(&I256::from_i128(e, *value));
    }
    numerator
        .div(&denominator)
        .to_i128()
        .ok_or(MeTokenError::OverflowError)
}

/// Compute `x * y / z`, truncating toward zero
pub fn mul_div_trunc(e: &Env, x: i128, y: i128, z: i128) -> Result<i128, MeTokenError> {
    mul_div_many(e, &[x, y], &[z])
}

/// Multiply `x` by an 18 decimal fraction, truncating toward zero
pub fn mul_dec(e: &Env, x: i128, fraction: i128) -> Result<i128, MeTokenError> {
    mul_div_trunc(e, x, fraction, SCALAR_18)
}

/// Divide `x` by `y` into an 18 decimal fraction, truncating toward zero
pub fn div_dec(e: &Env, x: i128, y: i128) -> Result<i128, MeTokenError> {
    mul_div_trunc(e, x, SCALAR_18, y)
}

/// Compute 10^`exponent`
pub fn pow10(exponent: u32) -> Result<i128, MeTokenError> {
    10i128
        .checked_pow(exponent)
        .ok_or(MeTokenError::OverflowError)
}

/// Split the scaling between two exponents into a (multiplier, divisor) pair so that
/// `value * multiplier / divisor` converts a value expressed at `from` into `to`
pub fn exponent_factors(from: u32, to: u32) -> Result<(i128, i128), MeTokenError> {
    if to >= from {
        Ok((pow10(to - from)?, 1))
    } else {
        Ok((1, pow10(from - to)?))
    }
}

/// Convert a value expressed with `from` decimals into `to` decimals, truncating toward zero
pub fn rescale(value: i128, from: u32, to: u32) -> Result<i128, MeTokenError> {
    let (multiplier, divisor) = exponent_factors(from, to)?;
    value
        .checked_mul(multiplier)
        .map(|scaled| scaled / divisor)
        .ok_or(MeTokenError::OverflowError)
}
