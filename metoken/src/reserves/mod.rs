mod leverage;
pub use leverage::{supplied, supply, token_settings, withdraw, LeverageFailure};

mod interest;
pub use interest::execute_claim_interest;

mod rebalance;
pub use rebalance::execute_rebalance;
