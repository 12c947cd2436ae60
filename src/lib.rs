pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod tests;

// Main exports for external use
pub use application::services::KickBackService;
pub use domain::{CallReceipt, ContractError, DeploymentHandle, ErrorKind, EventStateCode, Role};
pub use infrastructure::contracts::{ClientConfig, KickBackClient};
