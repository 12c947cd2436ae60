use std::fs;
use std::path::Path;

use ethers::abi::Abi;
use ethers::types::Bytes;
use serde::Deserialize;

use crate::domain::ContractError;

/// Methods every KickBack deployment must expose.
pub const KICKBACK_METHODS: [&str; 9] = [
    "deposit",
    "admin",
    "register",
    "startEvent",
    "markAttendance",
    "eventState",
    "payoutAmount",
    "finalizeEvent",
    "withdraw",
];

const KICKBACK_ABI_JSON: &str = include_str!("../../../../abis/kickback_abi.json");

/// ABI and creation bytecode of a compiled contract.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub abi: Abi,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
struct RawArtifact {
    abi: Abi,
    bytecode: RawBytecode,
}

// hardhat/buidler store a hex string, foundry an object
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(Bytes),
    Object { object: Bytes },
}

/// The fixed KickBack interface, enough to talk to an existing deployment.
pub fn load_kickback_abi() -> Result<Abi, ContractError> {
    serde_json::from_str(KICKBACK_ABI_JSON)
        .map_err(|e| ContractError::AbiError(format!("Failed to parse embedded KickBack ABI: {}", e)))
}

/// Read a compiled artifact from disk.
pub fn load_artifact(path: impl AsRef<Path>) -> Result<ContractArtifact, ContractError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        ContractError::AbiError(format!("Failed to read artifact {}: {}", path.display(), e))
    })?;
    parse_artifact(&content)
        .map_err(|e| ContractError::AbiError(format!("Invalid artifact {}: {}", path.display(), e)))
}

/// Parse artifact JSON in hardhat/buidler or foundry layout.
pub fn parse_artifact(content: &str) -> Result<ContractArtifact, ContractError> {
    let raw: RawArtifact = serde_json::from_str(content)
        .map_err(|e| ContractError::AbiError(format!("Failed to parse artifact: {}", e)))?;

    let bytecode = match raw.bytecode {
        RawBytecode::Hex(bytes) => bytes,
        RawBytecode::Object { object } => object,
    };
    if bytecode.is_empty() {
        return Err(ContractError::AbiError(
            "Artifact has no bytecode (abstract contract or interface)".to_string(),
        ));
    }

    ensure_interface(&raw.abi)?;

    Ok(ContractArtifact { abi: raw.abi, bytecode })
}

/// Check that `abi` declares the whole KickBack method set.
pub fn ensure_interface(abi: &Abi) -> Result<(), ContractError> {
    for method in KICKBACK_METHODS {
        if abi.function(method).is_err() {
            return Err(ContractError::AbiError(format!("ABI is missing method {}", method)));
        }
    }
    Ok(())
}
