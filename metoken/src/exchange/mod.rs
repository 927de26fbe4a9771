use soroban_sdk::{contracttype, Env, String};

use crate::{
    errors::MeTokenError,
    index::load_index,
    storage::{AcceptedAsset, Coin, Index},
};

mod redeem;
pub use redeem::execute_redeem;

mod settlement;

mod swap;
pub use swap::execute_swap;

/// The result of a swap
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct SwapResponse {
    pub fee: Coin,      // the fee charged, in the swapped asset
    pub returned: Coin, // the meTokens minted to the user
}

/// The result of a redeem
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct RedeemResponse {
    pub fee: Coin,      // the fee charged, in the redeemed asset
    pub returned: Coin, // the assets sent to the user
}

/// Load an index along with the settings of one of its accepted assets
///
/// ### Errors
/// If the index does not exist or does not accept the asset
pub(crate) fn load_index_asset(
    e: &Env,
    metoken_denom: &String,
    asset_denom: &String,
) -> Result<(Index, AcceptedAsset), MeTokenError> {
    let index = load_index(e, metoken_denom)?;
    let asset = index
        .accepted_asset(asset_denom)
        .ok_or(MeTokenError::DenomNotAccepted)?;
    Ok((index, asset))
}
