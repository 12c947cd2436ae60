use std::fmt;

use ethers::types::{Address, TransactionReceipt, H256, U256};
use ethers::utils::to_checksum;
use serde::{Deserialize, Serialize};

/// Address of a deployed KickBack instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeploymentHandle(Address);

impl DeploymentHandle {
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    pub fn address(&self) -> Address {
        self.0
    }
}

impl fmt::Display for DeploymentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_checksum(&self.0, None))
    }
}

impl From<Address> for DeploymentHandle {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

/// Account roles used by the scripts. Index 0 is the owner, attendees are
/// numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Owner,
    Attendee(usize),
}

impl Role {
    pub fn index(&self) -> usize {
        match self {
            Role::Owner => 0,
            Role::Attendee(n) => *n,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Attendee(n) => write!(f, "attendee{}", n),
        }
    }
}

/// Raw `eventState()` code. Its meaning belongs to the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventStateCode(pub u8);

impl fmt::Display for EventStateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Success,
    Reverted,
}

/// Summary of a mined state-changing call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallReceipt {
    pub method: String,
    pub transaction_hash: H256,
    pub block_number: u64,
    pub from: Address,
    /// Wei attached to the transaction.
    pub value: U256,
    pub gas_used: U256,
    pub effective_gas_price: U256,
    pub status: TransactionStatus,
}

impl CallReceipt {
    pub fn from_receipt(method: &str, value: U256, receipt: &TransactionReceipt) -> Self {
        let status = match receipt.status {
            Some(status) if status.is_zero() => TransactionStatus::Reverted,
            _ => TransactionStatus::Success,
        };

        Self {
            method: method.to_string(),
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number.unwrap_or_default().as_u64(),
            from: receipt.from,
            value,
            gas_used: receipt.gas_used.unwrap_or_default(),
            effective_gas_price: receipt.effective_gas_price.unwrap_or_default(),
            status,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == TransactionStatus::Success
    }

    /// Total fee paid by the sender.
    pub fn fee(&self) -> U256 {
        self.gas_used.saturating_mul(self.effective_gas_price)
    }
}

/// Every value observed while running the demo flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub deployment: DeploymentHandle,
    pub deposit: U256,
    pub admin: Address,
    pub balance_before_register: U256,
    pub balance_after_register: U256,
    pub registrations: Vec<CallReceipt>,
    pub state_after_start: EventStateCode,
    pub payout_after_start: U256,
    pub state_after_finalize: EventStateCode,
    pub payout_after_finalize: U256,
    pub balance_before_withdraw: U256,
    pub withdrawal: CallReceipt,
    pub balance_after_withdraw: U256,
}

impl ScenarioReport {
    /// Wei actually paid out by `withdraw`: the balance change plus the fee.
    pub fn withdrawn_amount(&self) -> U256 {
        (self.balance_after_withdraw + self.withdrawal.fee()).saturating_sub(self.balance_before_withdraw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::U64;

    #[test]
    fn test_call_receipt_from_receipt() {
        let receipt = TransactionReceipt {
            transaction_hash: H256::repeat_byte(0xab),
            block_number: Some(U64::from(7)),
            from: Address::repeat_byte(0x11),
            gas_used: Some(U256::from(21_000)),
            effective_gas_price: Some(U256::from(2_000_000_000u64)),
            status: Some(U64::from(1)),
            ..Default::default()
        };

        let call = CallReceipt::from_receipt("register", U256::exp10(18), &receipt);
        assert!(call.succeeded());
        assert_eq!(call.block_number, 7);
        assert_eq!(call.value, U256::exp10(18));
        assert_eq!(call.fee(), U256::from(42_000_000_000_000u64));
    }

    #[test]
    fn test_call_receipt_reverted_status() {
        let receipt = TransactionReceipt {
            status: Some(U64::zero()),
            ..Default::default()
        };

        let call = CallReceipt::from_receipt("withdraw", U256::zero(), &receipt);
        assert_eq!(call.status, TransactionStatus::Reverted);
        assert_eq!(call.fee(), U256::zero());
    }

    #[test]
    fn test_role_index_and_display() {
        assert_eq!(Role::Owner.index(), 0);
        assert_eq!(Role::Attendee(2).index(), 2);
        assert_eq!(Role::Attendee(1).to_string(), "attendee1");
    }

    #[test]
    fn test_deployment_handle_displays_checksum() {
        let address: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap();
        let handle = DeploymentHandle::new(address);
        assert_eq!(handle.to_string(), "0x5FbDB2315678afecb367f032d93F642f64180aa3");
    }

    #[test]
    fn test_withdrawn_amount_adds_back_fee() {
        let withdrawal = CallReceipt::from_receipt(
            "withdraw",
            U256::zero(),
            &TransactionReceipt {
                gas_used: Some(U256::from(30_000)),
                effective_gas_price: Some(U256::from(1_000_000_000u64)),
                status: Some(U64::from(1)),
                ..Default::default()
            },
        );
        let fee = withdrawal.fee();
        let before = U256::exp10(19);
        let payout = U256::exp10(18) * 2;

        let report = ScenarioReport {
            deployment: DeploymentHandle::new(Address::repeat_byte(0x42)),
            deposit: U256::exp10(18),
            admin: Address::repeat_byte(0x11),
            balance_before_register: U256::zero(),
            balance_after_register: U256::zero(),
            registrations: Vec::new(),
            state_after_start: EventStateCode(1),
            payout_after_start: U256::zero(),
            state_after_finalize: EventStateCode(2),
            payout_after_finalize: payout,
            balance_before_withdraw: before,
            withdrawal,
            balance_after_withdraw: before + payout - fee,
        };

        assert_eq!(report.withdrawal.value, U256::zero());
        assert_eq!(report.withdrawn_amount(), payout);
    }
}
