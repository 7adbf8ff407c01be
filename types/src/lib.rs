//! Fundamental types for the Agora governance chain.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, coin bags, block heights, and basis-point fractions.

pub mod address;
pub mod bps;
pub mod coin;
pub mod error;
pub mod height;

pub use address::Address;
pub use bps::{Bps, BPS_DENOMINATOR};
pub use coin::{Coin, CoinBag};
pub use error::TypesError;
pub use height::BlockHeight;
