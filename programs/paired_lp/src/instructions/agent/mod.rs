//! Agent creation and owner-side administration

pub mod admin;
pub mod initialize_agent;

pub use admin::*;
pub use initialize_agent::*;
