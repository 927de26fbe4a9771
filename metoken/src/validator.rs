use soroban_sdk::String;

use crate::{
    constants::{MAX_DENOM_LEN, METOKEN_PREFIX, MIN_DENOM_LEN, SCALAR_18},
    errors::MeTokenError,
};

/// Require that an incoming amount is strictly positive
///
/// ### Errors
/// If the amount is zero or negative
pub fn require_positive(amount: i128) -> Result<(), MeTokenError> {
    if amount <= 0 {
        return Err(MeTokenError::InvalidRequest);
    }
    Ok(())
}

/// Require that an amount is not negative
///
/// ### Errors
/// If the amount is negative
pub fn require_nonnegative(amount: i128) -> Result<(), MeTokenError> {
    if amount.is_negative() {
        return Err(MeTokenError::NegativeAmountError);
    }
    Ok(())
}

/// Require that an 18 decimal fraction is within [0, 1]
pub fn require_fraction(value: i128) -> Result<(), MeTokenError> {
    if !(0..=SCALAR_18).contains(&value) {
        return Err(MeTokenError::InvalidRequest);
    }
    Ok(())
}

/// Copy a denom into `buf`, returning the used slice. Returns None if the denom does not
/// fit the allowed length.
fn denom_bytes<'a>(denom: &String, buf: &'a mut [u8; MAX_DENOM_LEN]) -> Option<&'a [u8]> {
    let len = denom.len() as usize;
    if !(MIN_DENOM_LEN..=MAX_DENOM_LEN).contains(&len) {
        return None;
    }
    denom.copy_into_slice(&mut buf[..len]);
    Some(&buf[..len])
}

/// Require that a denom is well formed: it starts with a letter and is followed by letters,
/// digits or one of `/:._-`
///
/// ### Errors
/// If the denom is malformed
pub fn require_valid_denom(denom: &String) -> Result<(), MeTokenError> {
    let mut buf = [0u8; MAX_DENOM_LEN];
    let bytes = denom_bytes(denom, &mut buf).ok_or(MeTokenError::InvalidRequest)?;
    if !bytes[0].is_ascii_alphabetic() {
        return Err(MeTokenError::InvalidRequest);
    }
    let valid = bytes[1..]
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-'));
    if !valid {
        return Err(MeTokenError::InvalidRequest);
    }
    Ok(())
}

/// Check if a denom names a meToken
pub fn is_metoken(denom: &String) -> bool {
    let mut buf = [0u8; MAX_DENOM_LEN];
    match denom_bytes(denom, &mut buf) {
        Some(bytes) => bytes.len() > METOKEN_PREFIX.len() && bytes.starts_with(METOKEN_PREFIX),
        None => false,
    }
}

/// Require that a denom is a well formed meToken denom
pub fn require_metoken_denom(denom: &String) -> Result<(), MeTokenError> {
    require_valid_denom(denom)?;
    if !is_metoken(denom) {
        return Err(MeTokenError::InvalidRequest);
    }
    Ok(())
}

/// Require that a denom is a well formed base (non meToken) denom
pub fn require_base_denom(denom: &String) -> Result<(), MeTokenError> {
    require_valid_denom(denom)?;
    if is_metoken(denom) {
        return Err(MeTokenError::InvalidRequest);
    }
    Ok(())
}
