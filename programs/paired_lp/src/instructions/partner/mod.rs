//! Partner-only operations: rebalance, provide-and-split, migrate-partner

pub mod calls;
pub mod migrate_partner;
pub mod pairing;

pub use calls::*;
pub use migrate_partner::*;
pub use pairing::*;
