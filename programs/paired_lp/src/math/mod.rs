//! # Pool and Position Math
//!
//! Pure arithmetic, free of accounts and CPIs, so every rule the program
//! enforces can be tested directly:
//!
//! - `constant_product` - the pool's `x · y = k` deposit, burn and swap rules
//! - `valuation` - spot value of an LP balance in one agent's asset
//! - `partner` - sizing joint deposits and rebalance payouts
//! - `accounting` - profit, loss and debt payment reported to the vault

pub mod accounting;
pub mod constant_product;
pub mod partner;
pub mod valuation;

pub use accounting::*;
pub use constant_product::*;
pub use partner::*;
pub use valuation::*;
