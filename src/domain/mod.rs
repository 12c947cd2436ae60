pub mod errors;
pub mod models;

pub use errors::{ContractError, ErrorKind};
pub use models::*;
