use std::path::PathBuf;
use std::time::Duration;

use ethers::types::Address;

// ============ CONTRACT CONFIGURATION TYPES ============

/// Native currency information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Gas settings for a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasSettings {
    /// Fixed gas limit; estimated by the node when unset.
    pub gas_limit: Option<u64>,
    /// Send legacy (type 0) transactions instead of EIP-1559 ones.
    pub legacy: bool,
}

/// Chain-specific configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub native_currency: NativeCurrency,
    pub gas_settings: GasSettings,
}

/// Where the signing accounts come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountsConfig {
    Mnemonic { phrase: String, count: usize },
    PrivateKeys(Vec<String>),
}

/// Everything a client needs, passed explicitly at construction time.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub chain: ChainConfig,
    pub accounts: AccountsConfig,
    /// Compiled KickBack artifact holding ABI and bytecode.
    pub artifact_path: PathBuf,
    /// Existing deployment to attach to instead of deploying.
    pub deployed_address: Option<Address>,
    pub confirmations: usize,
    /// Upper bound on waiting for a transaction to be mined.
    pub tx_timeout: Option<Duration>,
}

/// Transaction handling derived from [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxSettings {
    pub chain_id: u64,
    pub gas_limit: Option<u64>,
    pub legacy: bool,
    pub confirmations: usize,
    pub timeout: Option<Duration>,
}

impl TxSettings {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            chain_id: config.chain.chain_id,
            gas_limit: config.chain.gas_settings.gas_limit,
            legacy: config.chain.gas_settings.legacy,
            confirmations: config.confirmations,
            timeout: config.tx_timeout,
        }
    }
}
