//! Instruction handlers for the paired liquidity program
//!
//! - `pool` - create the shared pool, public swaps, and the adapter the
//!   agents drive it through
//! - `agent` - create agents, owner-side administration
//! - `partner` - partner-only calls between the two agents of a pair
//! - `lifecycle` - what the vault drives: report, enter, exit, migrate

pub mod agent;
pub mod lifecycle;
pub mod partner;
pub mod pool;

pub use agent::*;
pub use lifecycle::*;
pub use partner::*;
pub use pool::*;
