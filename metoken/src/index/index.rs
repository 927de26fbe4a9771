use soroban_sdk::{Env, Map, String};

use crate::{
    constants::{MAX_EXPONENT, SCALAR_18},
    errors::MeTokenError,
    storage::{self, AcceptedAsset, Fee, Index, IndexBalances},
    validator::{require_base_denom, require_fraction, require_metoken_denom, require_nonnegative},
};

/// Load the index registered for a meToken denom
///
/// ### Errors
/// If no index is registered for the denom
pub fn load_index(e: &Env, denom: &String) -> Result<Index, MeTokenError> {
    storage::get_index(e, denom).ok_or(MeTokenError::IndexNotFound)
}

/// Load the balances of the index registered for a meToken denom
///
/// ### Errors
/// If no balances exist for the denom
pub fn load_balances(e: &Env, denom: &String) -> Result<IndexBalances, MeTokenError> {
    storage::get_balances(e, denom).ok_or(MeTokenError::BalanceNotFound)
}

impl Index {
    /// Fetch the settings of an asset, if the index accepts it
    pub fn accepted_asset(&self, denom: &String) -> Option<AcceptedAsset> {
        self.accepted_assets
            .iter()
            .find(|asset| asset.denom == *denom)
    }

    /// Check if the index accepts an asset
    pub fn has_accepted_asset(&self, denom: &String) -> bool {
        self.accepted_asset(denom).is_some()
    }

    /// Validate the index definition
    ///
    /// ### Errors
    /// * If the denom is not a meToken denom
    /// * If the max supply is negative or the exponent is too large
    /// * If the fee or any accepted asset is invalid
    /// * If an asset is listed twice or the target allocations do not sum to 1
    pub fn validate(&self, e: &Env) -> Result<(), MeTokenError> {
        require_metoken_denom(&self.denom)?;
        require_nonnegative(self.max_supply)?;
        if self.exponent > MAX_EXPONENT {
            return Err(MeTokenError::InvalidRequest);
        }
        self.fee.validate()?;

        let mut listed: Map<String, bool> = Map::new(e);
        let mut total_allocation: i128 = 0;
        for asset in self.accepted_assets.iter() {
            asset.validate()?;
            if listed.contains_key(asset.denom.clone()) {
                return Err(MeTokenError::InvalidRequest);
            }
            listed.set(asset.denom.clone(), true);
            total_allocation += asset.target_allocation;
        }
        if total_allocation != SCALAR_18 {
            return Err(MeTokenError::InvalidRequest);
        }
        Ok(())
    }
}

impl Fee {
    /// Validate the fee ordering `0 <= min_fee < balanced_fee < max_fee <= 1`
    pub fn validate(&self) -> Result<(), MeTokenError> {
        require_fraction(self.min_fee)?;
        require_fraction(self.balanced_fee)?;
        require_fraction(self.max_fee)?;
        if self.balanced_fee <= self.min_fee || self.max_fee <= self.balanced_fee {
            return Err(MeTokenError::InvalidRequest);
        }
        Ok(())
    }
}

impl AcceptedAsset {
    /// Validate the asset settings
    pub fn validate(&self) -> Result<(), MeTokenError> {
        require_base_denom(&self.denom)?;
        require_fraction(self.reserve_portion)?;
        require_fraction(self.target_allocation)
    }
}
