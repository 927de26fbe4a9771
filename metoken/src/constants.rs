/// Fixed-point scalar for 18 decimal numbers
pub const SCALAR_18: i128 = 1_000_000_000_000_000_000;

/// The number of decimals used by every fraction, price and rate
pub const DECIMALS: u32 = 18;

/// Basis points in a whole
pub const MAX_BPS: u32 = 10_000;

/// The largest exponent a denomination may declare
pub const MAX_EXPONENT: u32 = 18;

/// The prefix that marks a meToken denomination
pub const METOKEN_PREFIX: &[u8] = b"me/";

/// Denominations follow the bank naming rules, between 3 and 128 bytes long
pub const MIN_DENOM_LEN: usize = 3;
pub const MAX_DENOM_LEN: usize = 128;

/// The age in seconds after which an oracle price is no longer used (24 hours)
pub const MAX_PRICE_AGE: u64 = 24 * 60 * 60;

/// The number of oracle records scanned when looking for the latest price
pub const PRICE_RECORDS: u32 = 5;

/// Reserve deviations at or below this amount are left alone by the rebalancer
pub const REBALANCE_TOLERANCE: i128 = 1;

/// Default time between reserve rebalancing passes (12 hours)
pub const DEFAULT_REBALANCING_FREQUENCY: u64 = 12 * 60 * 60;

/// Default time between interest claiming passes (7 days)
pub const DEFAULT_CLAIMING_FREQUENCY: u64 = 7 * 24 * 60 * 60;

/// Default share of fees forwarded to the rewards auction (10%)
pub const DEFAULT_REWARDS_AUCTION_FACTOR: u32 = 1_000;
