//! Account state for the paired liquidity protocol

pub mod agent;
pub mod pool;

pub use agent::*;
pub use pool::*;
