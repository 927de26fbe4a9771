#![no_std]

#[cfg(any(test, feature = "testutils"))]
extern crate std;

mod bank;
mod storage;

pub use bank::*;
