mod fee;
pub use fee::fee_amount;

mod prices;
pub use prices::{AssetPrice, IndexPrices};

mod publish;
pub use publish::execute_update_prices;
