use std::path::PathBuf;
use std::time::Duration;

use ethers::types::Address;

use crate::domain::ContractError;
use crate::infrastructure::contracts::types::{
    AccountsConfig, ChainConfig, ClientConfig, GasSettings, NativeCurrency,
};

pub const LOCAL_CHAIN_ID: u64 = 31337;

/// Mnemonic shared by anvil and hardhat development nodes.
pub const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

const DEFAULT_ACCOUNT_COUNT: usize = 3;
const DEFAULT_ARTIFACT: &str = "artifacts/KickBack.json";

impl ClientConfig {
    /// Build a configuration from process environment variables.
    pub fn from_env() -> Result<Self, ContractError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ContractError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let chain_id = match var("CHAIN_ID") {
            Some(raw) => parse_number::<u64>("CHAIN_ID", &raw)?,
            None => LOCAL_CHAIN_ID,
        };

        let mut chain = get_chain_config(chain_id, var("RPC_URL"))?;
        if let Some(raw) = var("LEGACY_TX") {
            chain.gas_settings.legacy = parse_bool("LEGACY_TX", &raw)?;
        }
        if let Some(raw) = var("GAS_LIMIT") {
            chain.gas_settings.gas_limit = Some(parse_number::<u64>("GAS_LIMIT", &raw)?);
        }

        let accounts = match (var("PRIVATE_KEYS"), var("MNEMONIC")) {
            (Some(keys), _) => {
                let keys: Vec<String> = keys
                    .split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect();
                if keys.is_empty() {
                    return Err(ContractError::Config("PRIVATE_KEYS is empty".to_string()));
                }
                AccountsConfig::PrivateKeys(keys)
            }
            (None, phrase) => {
                let phrase = match phrase {
                    Some(phrase) => phrase,
                    None if chain_id == LOCAL_CHAIN_ID => DEV_MNEMONIC.to_string(),
                    None => {
                        return Err(ContractError::Config(format!(
                            "MNEMONIC or PRIVATE_KEYS must be set for chain ID: {}",
                            chain_id
                        )))
                    }
                };
                let count = match var("ACCOUNT_COUNT") {
                    Some(raw) => parse_number::<usize>("ACCOUNT_COUNT", &raw)?,
                    None => DEFAULT_ACCOUNT_COUNT,
                };
                AccountsConfig::Mnemonic { phrase, count }
            }
        };

        let deployed_address = var("KICKBACK_ADDRESS")
            .map(|raw| {
                raw.parse::<Address>()
                    .map_err(|e| ContractError::InvalidAddress(format!("KICKBACK_ADDRESS {}: {}", raw, e)))
            })
            .transpose()?;

        let confirmations = match var("CONFIRMATIONS") {
            Some(raw) => parse_number::<usize>("CONFIRMATIONS", &raw)?,
            None => 1,
        };

        let tx_timeout = var("TX_TIMEOUT_SECS")
            .map(|raw| parse_number::<u64>("TX_TIMEOUT_SECS", &raw).map(Duration::from_secs))
            .transpose()?;

        Ok(ClientConfig {
            chain,
            accounts,
            artifact_path: PathBuf::from(var("KICKBACK_ARTIFACT").unwrap_or_else(|| DEFAULT_ARTIFACT.to_string())),
            deployed_address,
            confirmations,
            tx_timeout,
        })
    }
}

/// Chain configuration for a chain ID, with an optional RPC override.
pub fn get_chain_config(chain_id: u64, rpc_url: Option<String>) -> Result<ChainConfig, ContractError> {
    let mut config = match chain_id {
        LOCAL_CHAIN_ID => get_local_config(),
        11155111 => get_sepolia_config(),
        _ => {
            let rpc_url = rpc_url.clone().ok_or_else(|| {
                ContractError::Config(format!("RPC_URL must be set for chain ID: {}", chain_id))
            })?;
            ChainConfig {
                chain_id,
                name: format!("Chain {}", chain_id),
                rpc_url,
                explorer_url: String::new(),
                native_currency: ether(),
                gas_settings: GasSettings {
                    gas_limit: None,
                    legacy: false,
                },
            }
        }
    };

    if let Some(rpc_url) = rpc_url {
        config.rpc_url = rpc_url;
    }
    Ok(config)
}

/// Local development node (anvil, hardhat, buidler EVM)
fn get_local_config() -> ChainConfig {
    ChainConfig {
        chain_id: LOCAL_CHAIN_ID,
        name: "Local Development".to_string(),
        rpc_url: "http://localhost:8545".to_string(),
        explorer_url: String::new(),
        native_currency: ether(),
        gas_settings: GasSettings {
            gas_limit: None,
            legacy: false,
        },
    }
}

/// Sepolia testnet configuration
fn get_sepolia_config() -> ChainConfig {
    ChainConfig {
        chain_id: 11155111,
        name: "Sepolia".to_string(),
        rpc_url: "https://rpc.sepolia.org".to_string(),
        explorer_url: "https://sepolia.etherscan.io".to_string(),
        native_currency: ether(),
        gas_settings: GasSettings {
            gas_limit: None,
            legacy: false,
        },
    }
}

fn ether() -> NativeCurrency {
    NativeCurrency {
        name: "Ether".to_string(),
        symbol: "ETH".to_string(),
        decimals: 18,
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ContractError>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ContractError::Config(format!("invalid {} '{}': {}", key, raw, e)))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ContractError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ContractError::Config(format!("invalid {} '{}'", key, raw))),
    }
}
