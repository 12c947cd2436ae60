// Contract integration module
// This module handles all KickBack contract interactions

pub mod abis;
pub mod accounts;
pub mod client;
pub mod config;
pub mod types;
pub mod utils;

// Re-export main components for easy access
pub use accounts::Accounts;
pub use client::{connect_http, KickBackClient, SignerClient};
pub use types::*;
