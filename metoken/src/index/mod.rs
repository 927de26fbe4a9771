mod balances;

#[allow(clippy::module_inception)]
mod index;
pub use index::{load_balances, load_index};

mod params;
