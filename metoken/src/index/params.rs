use crate::{
    constants::{
        DEFAULT_CLAIMING_FREQUENCY, DEFAULT_REBALANCING_FREQUENCY, DEFAULT_REWARDS_AUCTION_FACTOR,
        MAX_BPS,
    },
    errors::MeTokenError,
    storage::Params,
};

impl Default for Params {
    fn default() -> Self {
        Params {
            rebalancing_frequency: DEFAULT_REBALANCING_FREQUENCY,
            claiming_frequency: DEFAULT_CLAIMING_FREQUENCY,
            rewards_auction_factor: DEFAULT_REWARDS_AUCTION_FACTOR,
        }
    }
}

impl Params {
    /// Validate the params
    ///
    /// ### Errors
    /// If either frequency is zero or the auction factor is above 100%
    pub fn validate(&self) -> Result<(), MeTokenError> {
        if self.rebalancing_frequency == 0
            || self.claiming_frequency == 0
            || self.rewards_auction_factor > MAX_BPS
        {
            return Err(MeTokenError::InvalidParams);
        }
        Ok(())
    }
}
