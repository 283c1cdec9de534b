//! The shared constant-product pool: creation, public swaps, and the adapter
//! the agents drive it through.

pub mod adapter;
pub mod initialize_pool;
pub mod swap;

pub use adapter::*;
pub use initialize_pool::*;
pub use swap::*;
