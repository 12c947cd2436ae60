pub mod kickback_service;

pub use kickback_service::*;
