use ethers::types::U256;
use ethers::utils::{format_units, parse_units, ParseUnits};

use crate::domain::ContractError;
use crate::infrastructure::contracts::types::NativeCurrency;

/// Parse a decimal amount of the native currency ("1", "0.5") into wei.
pub fn parse_amount(amount: &str, currency: &NativeCurrency) -> Result<U256, ContractError> {
    match parse_units(amount.trim(), currency.decimals as u32) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(ContractError::Config(format!(
            "amount must not be negative: {}",
            amount
        ))),
        Err(e) => Err(ContractError::Config(format!("invalid amount '{}': {}", amount, e))),
    }
}

/// Format wei as a decimal amount of the native currency.
pub fn format_amount(value: U256, currency: &NativeCurrency) -> String {
    format_units(value, currency.decimals as u32).unwrap_or_else(|_| value.to_string())
}

/// Same as [`format_amount`], with the currency symbol appended.
pub fn display_amount(value: U256, currency: &NativeCurrency) -> String {
    format!("{} {}", format_amount(value, currency), currency.symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth() -> NativeCurrency {
        NativeCurrency {
            name: "Ether".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1", &eth()).unwrap(), U256::exp10(18));
        assert_eq!(parse_amount(" 0.5 ", &eth()).unwrap(), U256::exp10(17) * 5);
        assert!(parse_amount("-1", &eth()).is_err());
        assert!(parse_amount("one", &eth()).is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(U256::exp10(18) * 2, &eth()), "2.000000000000000000");
        assert_eq!(display_amount(U256::exp10(17), &eth()), "0.100000000000000000 ETH");
    }
}
