//! Currency metadata and decimal amounts.

use std::fmt;

use alloy_primitives::utils::{format_units, parse_units, ParseUnits};
use alloy_primitives::{Address, U256};
use contractkit::{Result, SdkError};
use serde::{Deserialize, Serialize};

/// Name, symbol and decimals of an ERC20 token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// An amount in base units together with its human readable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyValue {
    #[serde(flatten)]
    pub currency: Currency,
    pub value: U256,
    pub display_value: String,
}

impl CurrencyValue {
    pub fn new(currency: Currency, value: U256) -> Self {
        let display_value = display_amount(value, currency.decimals);
        Self {
            currency,
            value,
            display_value,
        }
    }
}

/// A token amount as given by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amount {
    /// Decimal amount in whole tokens, e.g. `"1.5"`.
    Display(String),
    /// Amount already in base units.
    BaseUnits(U256),
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Self::Display(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Self::Display(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self::Display(value.to_string())
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self::BaseUnits(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Display(value) => f.write_str(value),
            Self::BaseUnits(value) => write!(f, "{value} base units"),
        }
    }
}

impl Amount {
    /// Base units of this amount for a token with `decimals` decimals.
    pub fn to_base_units(&self, decimals: u8) -> Result<U256> {
        let value = match self {
            Self::BaseUnits(value) => return Ok(*value),
            Self::Display(value) => value.trim(),
        };
        match parse_units(value, decimals) {
            Ok(ParseUnits::U256(units)) => Ok(units),
            Ok(ParseUnits::I256(_)) => Err(SdkError::InvalidInput(format!(
                "amount must not be negative: {value}"
            ))),
            Err(e) => Err(SdkError::InvalidInput(format!("invalid amount {value}: {e}"))),
        }
    }
}

/// Recipient and amount of a mint or transfer in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMintInput {
    pub to_address: Address,
    pub amount: Amount,
}

impl TokenMintInput {
    pub fn new(to_address: Address, amount: impl Into<Amount>) -> Self {
        Self {
            to_address,
            amount: amount.into(),
        }
    }
}

/// `value` in whole tokens, without trailing zeros beyond the first decimal.
pub fn display_amount(value: U256, decimals: u8) -> String {
    let Ok(mut formatted) = format_units(value, decimals) else {
        return value.to_string();
    };
    if formatted.contains('.') {
        let trimmed = formatted.trim_end_matches('0').len();
        formatted.truncate(trimmed);
        if formatted.ends_with('.') {
            formatted.push('0');
        }
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(whole: u64) -> U256 {
        U256::from(whole) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn test_display_amount() {
        assert_eq!(display_amount(ether(1), 18), "1.0");
        assert_eq!(display_amount(ether(3) / U256::from(2u64), 18), "1.5");
        assert_eq!(display_amount(U256::from(1_234_567u64), 6), "1.234567");
        assert_eq!(display_amount(U256::ZERO, 6), "0.0");
    }

    #[test]
    fn test_decimal_amounts_use_token_decimals() {
        assert_eq!(Amount::from("1.5").to_base_units(18).unwrap(), ether(3) / U256::from(2u64));
        assert_eq!(Amount::from(2u64).to_base_units(6).unwrap(), U256::from(2_000_000u64));
        assert_eq!(
            Amount::from(" 0.25 ").to_base_units(2).unwrap(),
            U256::from(25u64)
        );
    }

    #[test]
    fn test_base_units_pass_through() {
        let amount = Amount::from(U256::from(7u64));
        assert_eq!(amount.to_base_units(18).unwrap(), U256::from(7u64));
    }

    #[test]
    fn test_rejects_malformed_and_negative_amounts() {
        assert!(matches!(
            Amount::from("one").to_base_units(18),
            Err(SdkError::InvalidInput(_))
        ));
        assert!(matches!(
            Amount::from("-1").to_base_units(18),
            Err(SdkError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_currency_value_serializes_flat() {
        let value = CurrencyValue::new(
            Currency {
                name: "Token".to_string(),
                symbol: "TKN".to_string(),
                decimals: 2,
            },
            U256::from(150u64),
        );
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["symbol"], "TKN");
        assert_eq!(json["displayValue"], "1.5");
    }
}
