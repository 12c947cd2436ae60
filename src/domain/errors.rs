use ethers::abi::AbiDecode;
use ethers::providers::Middleware;
use ethers::types::Bytes;

/// Coarse error categories, used by entry points to pick an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Reverted,
    Deployment,
    Config,
    Abi,
}

/// Contract interaction errors
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Call to {method} reverted: {reason}")]
    CallReverted { method: String, reason: String },

    #[error("Deployment failed: {0}")]
    DeploymentError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ABI error: {0}")]
    AbiError(String),

    #[error("Signer error: {reason}")]
    Signer { reason: String },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to decode {method} result: {reason}")]
    Decoding { method: String, reason: String },
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::NetworkError(_) => ErrorKind::Network,
            ContractError::CallReverted { .. } => ErrorKind::Reverted,
            ContractError::DeploymentError(_) => ErrorKind::Deployment,
            ContractError::Config(_)
            | ContractError::Signer { .. }
            | ContractError::InvalidAddress(_) => ErrorKind::Config,
            ContractError::AbiError(_) | ContractError::Decoding { .. } => ErrorKind::Abi,
        }
    }

    pub fn is_revert(&self) -> bool {
        self.kind() == ErrorKind::Reverted
    }

    /// Classify an ethers contract error raised while calling `method`.
    pub fn from_call<M: Middleware>(method: &str, err: ethers::contract::ContractError<M>) -> Self {
        use ethers::contract::ContractError as EthersError;

        if let Some(data) = err.as_revert() {
            return ContractError::CallReverted {
                method: method.to_string(),
                reason: revert_reason(data),
            };
        }

        match err {
            EthersError::AbiError(e) => ContractError::AbiError(e.to_string()),
            EthersError::DecodingError(e) => ContractError::Decoding {
                method: method.to_string(),
                reason: e.to_string(),
            },
            EthersError::DetokenizationError(e) => ContractError::Decoding {
                method: method.to_string(),
                reason: e.to_string(),
            },
            other => {
                let message = other.to_string();
                if mentions_revert(&message) {
                    ContractError::CallReverted {
                        method: method.to_string(),
                        reason: message,
                    }
                } else {
                    ContractError::NetworkError(message)
                }
            }
        }
    }

    /// Classify a failure while waiting on a pending transaction.
    pub fn from_pending(method: &str, err: ethers::providers::ProviderError) -> Self {
        let message = err.to_string();
        if mentions_revert(&message) {
            ContractError::CallReverted {
                method: method.to_string(),
                reason: message,
            }
        } else {
            ContractError::NetworkError(message)
        }
    }
}

impl From<ethers::abi::Error> for ContractError {
    fn from(err: ethers::abi::Error) -> Self {
        ContractError::AbiError(err.to_string())
    }
}

impl From<ethers::contract::AbiError> for ContractError {
    fn from(err: ethers::contract::AbiError) -> Self {
        ContractError::AbiError(err.to_string())
    }
}

impl From<ethers::providers::ProviderError> for ContractError {
    fn from(err: ethers::providers::ProviderError) -> Self {
        ContractError::NetworkError(err.to_string())
    }
}

impl From<ethers::signers::WalletError> for ContractError {
    fn from(err: ethers::signers::WalletError) -> Self {
        ContractError::Signer { reason: err.to_string() }
    }
}

fn mentions_revert(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("revert") || lower.contains("invalid opcode")
}

/// Decode an `Error(string)` payload, falling back to the raw hex.
pub fn revert_reason(data: &Bytes) -> String {
    if data.is_empty() {
        return "execution reverted".to_string();
    }
    // Error(string) selector
    if data.len() >= 4 && data[..4] == [0x08, 0xc3, 0x79, 0xa0] {
        if let Ok(reason) = String::decode(&data[4..]) {
            return reason;
        }
    }
    format!("0x{}", hex::encode(data))
}
