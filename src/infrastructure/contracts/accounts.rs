use ethers::signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer};
use ethers::types::Address;

use crate::domain::{ContractError, Role};
use crate::infrastructure::contracts::types::AccountsConfig;

/// Signing accounts indexed by role. Index 0 is the owner.
#[derive(Debug, Clone)]
pub struct Accounts {
    wallets: Vec<LocalWallet>,
}

impl Accounts {
    pub fn from_config(config: &AccountsConfig, chain_id: u64) -> Result<Self, ContractError> {
        let wallets = match config {
            AccountsConfig::Mnemonic { phrase, count } => (0..*count)
                .map(|index| {
                    MnemonicBuilder::<English>::default()
                        .phrase(phrase.as_str())
                        .index(index as u32)?
                        .build()
                })
                .collect::<Result<Vec<_>, _>>()?,
            AccountsConfig::PrivateKeys(keys) => keys
                .iter()
                .map(|key| {
                    key.parse::<LocalWallet>()
                        .map_err(|e| ContractError::Signer { reason: e.to_string() })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        let wallets: Vec<LocalWallet> = wallets
            .into_iter()
            .map(|wallet| wallet.with_chain_id(chain_id))
            .collect();

        for (i, wallet) in wallets.iter().enumerate() {
            if wallets[..i].iter().any(|other| other.address() == wallet.address()) {
                return Err(ContractError::Config(format!(
                    "duplicate account {:?} at index {}",
                    wallet.address(),
                    i
                )));
            }
        }

        Ok(Self { wallets })
    }

    pub fn get(&self, role: Role) -> Result<&LocalWallet, ContractError> {
        if role == Role::Attendee(0) {
            return Err(ContractError::Config("attendees are numbered from 1".to_string()));
        }
        self.wallets
            .get(role.index())
            .ok_or_else(|| ContractError::Config(format!("account {} ({}) not configured", role.index(), role)))
    }

    pub fn address(&self, role: Role) -> Result<Address, ContractError> {
        self.get(role).map(|wallet| wallet.address())
    }

    pub fn owner(&self) -> Result<&LocalWallet, ContractError> {
        self.get(Role::Owner)
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::contracts::config::DEV_MNEMONIC;

    #[test]
    fn test_dev_mnemonic_derives_well_known_accounts() {
        let config = AccountsConfig::Mnemonic { phrase: DEV_MNEMONIC.to_string(), count: 3 };
        let accounts = Accounts::from_config(&config, 31337).unwrap();

        assert_eq!(accounts.len(), 3);
        let owner: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        let attendee1: Address = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap();
        assert_eq!(accounts.address(Role::Owner).unwrap(), owner);
        assert_eq!(accounts.address(Role::Attendee(1)).unwrap(), attendee1);
        assert_eq!(accounts.owner().unwrap().chain_id(), 31337);
    }

    #[test]
    fn test_private_keys() {
        let config = AccountsConfig::PrivateKeys(vec![
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string(),
        ]);
        let accounts = Accounts::from_config(&config, 1).unwrap();

        let owner: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(accounts.address(Role::Owner).unwrap(), owner);

        let err = accounts.get(Role::Attendee(1)).unwrap_err();
        assert!(err.to_string().contains("account 1 (attendee1) not configured"));
    }

    #[test]
    fn test_attendee_zero_is_not_the_owner() {
        let config = AccountsConfig::Mnemonic { phrase: DEV_MNEMONIC.to_string(), count: 3 };
        let accounts = Accounts::from_config(&config, 31337).unwrap();

        let err = accounts.address(Role::Attendee(0)).unwrap_err();
        assert!(matches!(err, ContractError::Config(_)));
        assert!(accounts.address(Role::Owner).is_ok());
    }

    #[test]
    fn test_invalid_and_duplicate_keys() {
        let config = AccountsConfig::PrivateKeys(vec!["not-a-key".to_string()]);
        assert!(matches!(Accounts::from_config(&config, 1), Err(ContractError::Signer { .. })));

        let key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string();
        let config = AccountsConfig::PrivateKeys(vec![key.clone(), key]);
        assert!(matches!(Accounts::from_config(&config, 1), Err(ContractError::Config(_))));
    }
}
