#![no_std]

#[cfg(any(test, feature = "testutils"))]
extern crate std;

mod leverage;
mod storage;

pub use leverage::*;
pub use storage::{Coin, TokenSettings};
