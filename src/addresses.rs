//! Per-network addresses of the auxiliary contracts (forwarders, factory,
//! registry).
//!
//! The book is an explicit value built once at startup and passed to whatever
//! needs it.

use std::collections::HashMap;
use std::fmt;

use alloy_primitives::{address, Address};
use serde::Serialize;

use crate::error::{Result, SdkError};

pub const OZ_DEFENDER_FORWARDER_ADDRESS: Address =
    address!("c82BbE41f2cF04e3a8efA18F7032BDD7f6d98a81");
pub const REGISTRY_ADDRESS: Address = address!("7c487845f98938Bb955B1D5AD069d9a30e4131fd");
pub const FACTORY_ADDRESS: Address = address!("5DBC7B840baa9daBcBe9D2492E45D7244B54A2A0");
/// Deployed on Polygon only.
pub const CONTRACT_PUBLISHER_ADDRESS: Address =
    address!("664244560eBa21Bf82d7150C791bE1AbcD5B4cd7");

/// Placeholder for the chain's native currency in price and currency fields.
pub const NATIVE_TOKEN_ADDRESS: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// Whether `currency` denotes the native currency.
pub fn is_native_token(currency: Address) -> bool {
    currency == NATIVE_TOKEN_ADDRESS || currency == Address::ZERO
}

const FORWARDER_V2: Address = address!("8cbc8B5d71702032904750A66AEfE8B603eBC538");
const FACTORY_V2: Address = address!("d24b3de085CFd8c54b94feAD08a7962D343E6DE0");
const BYOC_REGISTRY_TESTNET: Address = address!("3E6eE864f850F5e5A98bc950B68E181Cf4010F23");

/// Local network environment overrides.
pub const FACTORY_ADDRESS_ENV: &str = "factoryAddress";
pub const REGISTRY_ADDRESS_ENV: &str = "registryAddress";
pub const CONTRACT_PUBLISHER_ADDRESS_ENV: &str = "contractPublisherAddress";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum ChainId {
    Mainnet = 1,
    Rinkeby = 4,
    Goerli = 5,
    Polygon = 137,
    Mumbai = 80001,
    Avalanche = 43114,
    AvalancheFuji = 43113,
    Fantom = 250,
    FantomTestnet = 4002,
    Arbitrum = 42161,
    ArbitrumRinkeby = 421611,
    ArbitrumGoerli = 421613,
    Optimism = 10,
    OptimismKovan = 69,
    OptimismGoerli = 420,
    BinanceSmartChain = 56,
    BinanceSmartChainTestnet = 97,
    Hardhat = 31337,
}

impl ChainId {
    pub const ALL: [Self; 18] = [
        Self::Mainnet,
        Self::Rinkeby,
        Self::Goerli,
        Self::Polygon,
        Self::Mumbai,
        Self::Avalanche,
        Self::AvalancheFuji,
        Self::Fantom,
        Self::FantomTestnet,
        Self::Arbitrum,
        Self::ArbitrumRinkeby,
        Self::ArbitrumGoerli,
        Self::Optimism,
        Self::OptimismKovan,
        Self::OptimismGoerli,
        Self::BinanceSmartChain,
        Self::BinanceSmartChainTestnet,
        Self::Hardhat,
    ];

    pub const fn id(self) -> u64 {
        self as u64
    }
}

impl TryFrom<u64> for ChainId {
    type Error = SdkError;

    fn try_from(id: u64) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|chain| chain.id() == id)
            .ok_or(SdkError::UnsupportedChain(id))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?} ({})", self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractName {
    OpenZeppelinForwarder,
    BiconomyForwarder,
    Factory,
    Registry,
    ByocRegistry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAddresses {
    pub openzeppelin_forwarder: Address,
    pub biconomy_forwarder: Address,
    pub factory: Address,
    pub registry: Address,
    pub byoc_registry: Address,
}

impl ContractAddresses {
    pub const fn get(&self, name: ContractName) -> Address {
        match name {
            ContractName::OpenZeppelinForwarder => self.openzeppelin_forwarder,
            ContractName::BiconomyForwarder => self.biconomy_forwarder,
            ContractName::Factory => self.factory,
            ContractName::Registry => self.registry,
            ContractName::ByocRegistry => self.byoc_registry,
        }
    }

    const fn standard(biconomy_forwarder: Address, byoc_registry: Address) -> Self {
        Self {
            openzeppelin_forwarder: OZ_DEFENDER_FORWARDER_ADDRESS,
            biconomy_forwarder,
            factory: FACTORY_ADDRESS,
            registry: REGISTRY_ADDRESS,
            byoc_registry,
        }
    }

    const fn l2(openzeppelin_forwarder: Address, factory: Address, registry: Address) -> Self {
        Self {
            openzeppelin_forwarder,
            biconomy_forwarder: Address::ZERO,
            factory,
            registry,
            byoc_registry: Address::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddressBook {
    entries: HashMap<u64, ContractAddresses>,
    contract_publisher: Address,
}

impl AddressBook {
    /// Addresses of every public network. The local network is not included.
    pub fn builtin() -> Self {
        use ChainId::*;

        let entries = [
            (
                Mainnet,
                ContractAddresses::standard(
                    address!("84a0856b038eaAd1cC7E297cF34A7e72685A8693"),
                    Address::ZERO,
                ),
            ),
            (
                Rinkeby,
                ContractAddresses::standard(
                    address!("FD4973FeB2031D4409fB57afEE5dF2051b171104"),
                    BYOC_REGISTRY_TESTNET,
                ),
            ),
            (
                Goerli,
                ContractAddresses {
                    openzeppelin_forwarder: address!("5001A14CA6163143316a7C614e30e6041033Ac20"),
                    ..ContractAddresses::standard(
                        Address::ZERO,
                        address!("B1Bd9d7942A250BA2Dce27DD601F2ED4211A60C4"),
                    )
                },
            ),
            (
                Polygon,
                ContractAddresses::standard(
                    address!("86C80a8aa58e0A4fa09A69624c31Ab2a6CAD56b8"),
                    address!("308473Be900F4185A56587dE54bDFF5E8f7a6AE7"),
                ),
            ),
            (
                Mumbai,
                ContractAddresses::standard(
                    address!("9399BB24DBB5C4b782C70c2969F58716Ebbd6a3b"),
                    address!("3F17972CB27506eb4a6a3D59659e0B57a43fd16C"),
                ),
            ),
            (
                Avalanche,
                ContractAddresses::standard(
                    address!("64CD353384109423a966dCd3Aa30D884C9b2E057"),
                    Address::ZERO,
                ),
            ),
            (
                AvalancheFuji,
                ContractAddresses::standard(
                    address!("6271Ca63D30507f2Dcbf99B52787032506D75BBF"),
                    BYOC_REGISTRY_TESTNET,
                ),
            ),
            (
                Fantom,
                ContractAddresses {
                    factory: address!("97EA0Fcc552D5A8Fb5e9101316AAd0D62Ea0876B"),
                    ..ContractAddresses::standard(Address::ZERO, Address::ZERO)
                },
            ),
            (
                FantomTestnet,
                ContractAddresses::standard(Address::ZERO, BYOC_REGISTRY_TESTNET),
            ),
            (
                Arbitrum,
                ContractAddresses::l2(OZ_DEFENDER_FORWARDER_ADDRESS, FACTORY_V2, REGISTRY_ADDRESS),
            ),
            (
                ArbitrumRinkeby,
                ContractAddresses::l2(
                    OZ_DEFENDER_FORWARDER_ADDRESS,
                    address!("b0435b47ad26115A39c59735b814f3769F07C2c1"),
                    address!("cF4c511551aE4dab1F997866FC3900cd2aaeC40D"),
                ),
            ),
            (
                ArbitrumGoerli,
                ContractAddresses::l2(FORWARDER_V2, FACTORY_V2, REGISTRY_ADDRESS),
            ),
            (
                Optimism,
                ContractAddresses::l2(OZ_DEFENDER_FORWARDER_ADDRESS, FACTORY_V2, REGISTRY_ADDRESS),
            ),
            (
                OptimismKovan,
                ContractAddresses::l2(OZ_DEFENDER_FORWARDER_ADDRESS, FACTORY_V2, REGISTRY_ADDRESS),
            ),
            (
                OptimismGoerli,
                ContractAddresses::l2(FORWARDER_V2, FACTORY_V2, REGISTRY_ADDRESS),
            ),
            (
                BinanceSmartChain,
                ContractAddresses::l2(FORWARDER_V2, FACTORY_V2, REGISTRY_ADDRESS),
            ),
            (
                BinanceSmartChainTestnet,
                ContractAddresses::l2(FORWARDER_V2, FACTORY_V2, REGISTRY_ADDRESS),
            ),
        ]
        .into_iter()
        .map(|(chain, addresses)| (chain.id(), addresses))
        .collect();

        Self {
            entries,
            contract_publisher: CONTRACT_PUBLISHER_ADDRESS,
        }
    }

    /// Builtin addresses plus the local network read from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builtin addresses plus the local network read through `lookup`.
    ///
    /// Unset local factory/registry variables leave the zero address.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| -> Result<Option<Address>> {
            lookup(key)
                .filter(|value| !value.is_empty())
                .map(|value| {
                    value.parse::<Address>().map_err(|e| {
                        SdkError::Config(format!("environment variable {key}: {e}"))
                    })
                })
                .transpose()
        };

        let mut book = Self::builtin();
        book.insert(
            ChainId::Hardhat.id(),
            ContractAddresses {
                openzeppelin_forwarder: Address::ZERO,
                biconomy_forwarder: Address::ZERO,
                factory: read(FACTORY_ADDRESS_ENV)?.unwrap_or(Address::ZERO),
                registry: read(REGISTRY_ADDRESS_ENV)?.unwrap_or(Address::ZERO),
                byoc_registry: Address::ZERO,
            },
        );
        if let Some(publisher) = read(CONTRACT_PUBLISHER_ADDRESS_ENV)? {
            book.contract_publisher = publisher;
        }

        tracing::debug!(
            target: "contractkit::addresses",
            networks = book.entries.len(),
            contract_publisher = %book.contract_publisher,
            "Address book loaded"
        );
        Ok(book)
    }

    pub fn insert(&mut self, chain_id: u64, addresses: ContractAddresses) {
        self.entries.insert(chain_id, addresses);
    }

    pub fn addresses(&self, chain_id: u64) -> Result<&ContractAddresses> {
        self.entries
            .get(&chain_id)
            .ok_or(SdkError::UnsupportedChain(chain_id))
    }

    pub fn get(&self, chain_id: u64, name: ContractName) -> Result<Address> {
        self.addresses(chain_id).map(|entry| entry.get(name))
    }

    pub fn contract_publisher(&self) -> Address {
        self.contract_publisher
    }

    /// Known chain ids, ascending.
    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let book = AddressBook::builtin();
        assert_eq!(
            book.get(ChainId::Polygon.id(), ContractName::Factory).unwrap(),
            FACTORY_ADDRESS
        );
        assert_eq!(
            book.get(ChainId::Fantom.id(), ContractName::Factory).unwrap(),
            address!("97EA0Fcc552D5A8Fb5e9101316AAd0D62Ea0876B")
        );
        assert_eq!(
            book.get(ChainId::Goerli.id(), ContractName::BiconomyForwarder).unwrap(),
            Address::ZERO
        );
        assert_eq!(book.contract_publisher(), CONTRACT_PUBLISHER_ADDRESS);
    }

    #[test]
    fn test_every_public_chain_is_listed() {
        let book = AddressBook::builtin();
        for chain in ChainId::ALL {
            if chain == ChainId::Hardhat {
                assert!(book.addresses(chain.id()).is_err());
            } else {
                assert!(book.addresses(chain.id()).is_ok(), "{chain} missing");
            }
        }
    }

    #[test]
    fn test_native_token() {
        assert!(is_native_token(NATIVE_TOKEN_ADDRESS));
        assert!(is_native_token(Address::ZERO));
        assert!(!is_native_token(REGISTRY_ADDRESS));
    }

    #[test]
    fn test_unknown_chain() {
        let book = AddressBook::builtin();
        assert!(matches!(
            book.get(12345, ContractName::Registry),
            Err(SdkError::UnsupportedChain(12345))
        ));
        assert!(matches!(ChainId::try_from(12345), Err(SdkError::UnsupportedChain(12345))));
        assert_eq!(ChainId::try_from(137).unwrap(), ChainId::Polygon);
    }

    #[test]
    fn test_local_network_overrides() {
        let factory = Address::repeat_byte(0xfa);
        let publisher = Address::repeat_byte(0xbb);
        let book = AddressBook::from_lookup(|key| match key {
            FACTORY_ADDRESS_ENV => Some(factory.to_string()),
            CONTRACT_PUBLISHER_ADDRESS_ENV => Some(publisher.to_string()),
            _ => None,
        })
        .unwrap();

        let hardhat = ChainId::Hardhat.id();
        assert_eq!(book.get(hardhat, ContractName::Factory).unwrap(), factory);
        assert_eq!(book.get(hardhat, ContractName::Registry).unwrap(), Address::ZERO);
        assert_eq!(
            book.get(hardhat, ContractName::OpenZeppelinForwarder).unwrap(),
            Address::ZERO
        );
        assert_eq!(book.contract_publisher(), publisher);
    }

    #[test]
    fn test_malformed_override_is_config_error() {
        let err = AddressBook::from_lookup(|key| {
            (key == REGISTRY_ADDRESS_ENV).then(|| "0xnope".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }
}
