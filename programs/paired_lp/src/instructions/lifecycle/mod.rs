//! Vault-facing lifecycle: report, enter, exit, withdraw, migrate, views

pub mod context;
pub mod enter;
pub mod exit;
pub mod migrate;
pub mod report;
pub mod views;

pub use context::*;
pub use enter::*;
pub use exit::*;
pub use migrate::*;
pub use report::*;
pub use views::*;
