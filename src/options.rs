//! SDK configuration schema.
//!
//! [`SdkOptionsInput`] is what callers write (every field optional);
//! [`SdkOptions`] is the validated document with defaults applied. Validation
//! happens before any transport is built.

use std::path::Path;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::addresses::{AddressBook, ContractName};
use crate::error::{Result, SdkError};

pub const DEFAULT_MAX_PRICE_IN_GWEI: f64 = 300.0;
pub const DEFAULT_BICONOMY_DEADLINE_SECONDS: u64 = 3600;

const WEI_PER_GWEI: u128 = 1_000_000_000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkOptionsInput {
    pub readonly_settings: Option<ReadonlySettingsInput>,
    pub gas_settings: Option<GasSettingsInput>,
    pub gasless: Option<GaslessInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadonlySettingsInput {
    pub rpc_url: String,
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasSettingsInput {
    /// Fractional values such as `2.5` are accepted.
    pub max_price_in_gwei: Option<f64>,
    pub speed: Option<GasSpeed>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaslessInput {
    pub openzeppelin: Option<OpenZeppelinInput>,
    pub biconomy: Option<BiconomyInput>,
    pub experimental_chainless_support: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenZeppelinInput {
    pub relayer_url: String,
    pub relayer_forwarder_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiconomyInput {
    pub api_id: String,
    pub api_key: String,
    pub deadline_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasSpeed {
    Standard,
    Fast,
    #[default]
    Fastest,
}

impl GasSpeed {
    /// Percentage applied to the node's suggested gas price.
    pub const fn multiplier_percent(self) -> u128 {
        match self {
            Self::Standard => 100,
            Self::Fast => 110,
            Self::Fastest => 120,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly_settings: Option<ReadonlySettings>,
    pub gas_settings: GasSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gasless: Option<GaslessSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadonlySettings {
    pub rpc_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasSettings {
    /// Upper bound on the submitted gas price, in gwei. At least 1.
    pub max_price_in_gwei: f64,
    pub speed: GasSpeed,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            max_price_in_gwei: DEFAULT_MAX_PRICE_IN_GWEI,
            speed: GasSpeed::default(),
        }
    }
}

impl GasSettings {
    /// Gas price to submit with, given the node's suggestion in wei.
    pub fn price_for(&self, suggested_wei: u128) -> u128 {
        let boosted = suggested_wei.saturating_mul(self.speed.multiplier_percent()) / 100;
        let cap = (self.max_price_in_gwei * WEI_PER_GWEI as f64) as u128;
        boosted.min(cap)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GaslessSettings {
    OpenZeppelin {
        openzeppelin: OpenZeppelinSettings,
        #[serde(rename = "experimentalChainlessSupport")]
        experimental_chainless_support: bool,
    },
    Biconomy {
        biconomy: BiconomySettings,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenZeppelinSettings {
    pub relayer_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relayer_forwarder_address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiconomySettings {
    pub api_id: String,
    pub api_key: String,
    pub deadline_seconds: u64,
}

impl GaslessSettings {
    /// Trusted forwarder for this relayer on `chain_id`.
    ///
    /// A configured OpenZeppelin forwarder wins over the address book.
    pub fn forwarder_address(&self, book: &AddressBook, chain_id: u64) -> Result<Address> {
        match self {
            Self::OpenZeppelin { openzeppelin, .. } => match openzeppelin.relayer_forwarder_address {
                Some(address) => Ok(address),
                None => book.get(chain_id, ContractName::OpenZeppelinForwarder),
            },
            Self::Biconomy { .. } => book.get(chain_id, ContractName::BiconomyForwarder),
        }
    }
}

impl SdkOptions {
    pub fn parse(input: SdkOptionsInput) -> Result<Self> {
        let readonly_settings = input
            .readonly_settings
            .map(|settings| {
                validate_url("readonlySettings.rpcUrl", &settings.rpc_url)?;
                Ok::<_, SdkError>(ReadonlySettings {
                    rpc_url: settings.rpc_url,
                    chain_id: settings.chain_id,
                })
            })
            .transpose()?;

        let gas_input = input.gas_settings.unwrap_or_default();
        let max_price_in_gwei = gas_input
            .max_price_in_gwei
            .unwrap_or(DEFAULT_MAX_PRICE_IN_GWEI);
        if !max_price_in_gwei.is_finite() || max_price_in_gwei < 1.0 {
            return Err(invalid("gasSettings.maxPriceInGwei: gas price cannot be less than 1"));
        }
        let gas_settings = GasSettings {
            max_price_in_gwei,
            speed: gas_input.speed.unwrap_or_default(),
        };

        let gasless = input.gasless.map(parse_gasless).transpose()?;

        Ok(Self {
            readonly_settings,
            gas_settings,
            gasless,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let input: SdkOptionsInput =
            serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
        Self::parse(input)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}

fn parse_gasless(input: GaslessInput) -> Result<GaslessSettings> {
    match (input.openzeppelin, input.biconomy) {
        (Some(_), Some(_)) => Err(invalid(
            "gasless: configure either openzeppelin or biconomy, not both",
        )),
        (None, None) => Err(invalid("gasless: expected openzeppelin or biconomy settings")),
        (Some(oz), None) => {
            validate_url("gasless.openzeppelin.relayerUrl", &oz.relayer_url)?;
            let relayer_forwarder_address = oz
                .relayer_forwarder_address
                .map(|raw| {
                    raw.parse::<Address>().map_err(|e| {
                        invalid(format!(
                            "gasless.openzeppelin.relayerForwarderAddress: {e}"
                        ))
                    })
                })
                .transpose()?;
            Ok(GaslessSettings::OpenZeppelin {
                openzeppelin: OpenZeppelinSettings {
                    relayer_url: oz.relayer_url,
                    relayer_forwarder_address,
                },
                experimental_chainless_support: input
                    .experimental_chainless_support
                    .unwrap_or(false),
            })
        }
        (None, Some(biconomy)) => {
            let deadline_seconds = biconomy
                .deadline_seconds
                .unwrap_or(DEFAULT_BICONOMY_DEADLINE_SECONDS);
            if deadline_seconds < 1 {
                return Err(invalid(
                    "gasless.biconomy.deadlineSeconds: cannot be less than 1",
                ));
            }
            Ok(GaslessSettings::Biconomy {
                biconomy: BiconomySettings {
                    api_id: biconomy.api_id,
                    api_key: biconomy.api_key,
                    deadline_seconds,
                },
            })
        }
    }
}

fn validate_url(field: &str, raw: &str) -> Result<()> {
    url::Url::parse(raw)
        .map(|_| ())
        .map_err(|e| invalid(format!("{field}: invalid URL {raw:?}: {e}")))
}

fn invalid(reason: impl Into<String>) -> SdkError {
    SdkError::InvalidOptions(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_options_produce_defaults() {
        let options = SdkOptions::from_json_str("{}").unwrap();
        assert_eq!(options, SdkOptions::default());
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"gasSettings": {"maxPriceInGwei": 300.0, "speed": "fastest"}})
        );
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_partial_gas_settings_keep_defaults() {
        let options = SdkOptions::from_json_str(r#"{"gasSettings":{"speed":"fast"}}"#).unwrap();
        assert_eq!(options.gas_settings.max_price_in_gwei, 300.0);
        assert_eq!(options.gas_settings.speed, GasSpeed::Fast);
    }

    #[test]
    fn test_rejects_low_gas_price_and_unknown_speed() {
        let err = SdkOptions::from_json_str(r#"{"gasSettings":{"maxPriceInGwei":0}}"#).unwrap_err();
        assert!(matches!(err, SdkError::InvalidOptions(_)));

        let err = SdkOptions::from_json_str(r#"{"gasSettings":{"speed":"ludicrous"}}"#).unwrap_err();
        assert!(matches!(err, SdkError::InvalidOptions(_)));
    }

    #[test]
    fn test_readonly_settings_require_valid_url() {
        let ok = SdkOptions::from_json_str(
            r#"{"readonlySettings":{"rpcUrl":"https://rpc.example.org","chainId":137}}"#,
        )
        .unwrap();
        let readonly = ok.readonly_settings.unwrap();
        assert_eq!(readonly.chain_id, Some(137));

        let err =
            SdkOptions::from_json_str(r#"{"readonlySettings":{"rpcUrl":"not a url"}}"#).unwrap_err();
        assert!(matches!(err, SdkError::InvalidOptions(_)));
    }

    #[test]
    fn test_biconomy_deadline_defaults() {
        let options = SdkOptions::from_json_str(
            r#"{"gasless":{"biconomy":{"apiId":"id","apiKey":"key"}}}"#,
        )
        .unwrap();
        match options.gasless.unwrap() {
            GaslessSettings::Biconomy { biconomy } => assert_eq!(biconomy.deadline_seconds, 3600),
            other => panic!("unexpected gasless settings: {other:?}"),
        }
    }

    #[test]
    fn test_both_relayers_rejected() {
        let err = SdkOptions::from_json_str(
            r#"{"gasless":{
                "openzeppelin":{"relayerUrl":"https://relay.example.org"},
                "biconomy":{"apiId":"id","apiKey":"key"}
            }}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SdkError::InvalidOptions(_)));
    }

    #[test]
    fn test_openzeppelin_serialized_shape() {
        let options = SdkOptions::from_json_str(
            r#"{"gasless":{"openzeppelin":{"relayerUrl":"https://relay.example.org"}}}"#,
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&options).unwrap()["gasless"],
            json!({
                "openzeppelin": {"relayerUrl": "https://relay.example.org"},
                "experimentalChainlessSupport": false
            })
        );
    }

    #[test]
    fn test_forwarder_address_falls_back_to_address_book() {
        let book = AddressBook::builtin();
        let options = SdkOptions::from_json_str(
            r#"{"gasless":{"openzeppelin":{"relayerUrl":"https://relay.example.org"}}}"#,
        )
        .unwrap();
        let gasless = options.gasless.unwrap();
        assert_eq!(
            gasless.forwarder_address(&book, 137).unwrap(),
            crate::addresses::OZ_DEFENDER_FORWARDER_ADDRESS
        );
        assert!(matches!(
            gasless.forwarder_address(&book, 999_999),
            Err(SdkError::UnsupportedChain(999_999))
        ));
    }

    #[test]
    fn test_gas_price_speed_and_cap() {
        let gwei = WEI_PER_GWEI;
        let fastest = GasSettings::default();
        assert_eq!(fastest.price_for(100 * gwei), 120 * gwei);
        assert_eq!(fastest.price_for(1_000 * gwei), 300 * gwei);

        let standard = GasSettings {
            max_price_in_gwei: 50.0,
            speed: GasSpeed::Standard,
        };
        assert_eq!(standard.price_for(40 * gwei), 40 * gwei);
        assert_eq!(standard.price_for(60 * gwei), 50 * gwei);
    }

    #[test]
    fn test_fractional_gas_price_cap() {
        let options =
            SdkOptions::from_json_str(r#"{"gasSettings":{"maxPriceInGwei":2.5,"speed":"standard"}}"#)
                .unwrap();
        let gas = options.gas_settings;
        assert_eq!(gas.price_for(2 * WEI_PER_GWEI), 2 * WEI_PER_GWEI);
        assert_eq!(gas.price_for(3 * WEI_PER_GWEI), 2_500_000_000);

        let err = SdkOptions::from_json_str(r#"{"gasSettings":{"maxPriceInGwei":0.5}}"#).unwrap_err();
        assert!(matches!(err, SdkError::InvalidOptions(_)));
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"gasSettings":{"maxPriceInGwei":42}}"#).unwrap();
        let options = SdkOptions::from_file(&path).unwrap();
        assert_eq!(options.gas_settings.max_price_in_gwei, 42.0);

        let missing = SdkOptions::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, SdkError::Config(_)));
    }
}
