use super::ContractInterface;
use crate::contract::ContractWrapper;

/// The function signatures that identify a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub name: &'static str,
    pub functions: &'static [&'static str],
    /// Older deployments expose the capability under different signatures.
    pub legacy: &'static [&'static str],
}

impl Fingerprint {
    pub const fn new(name: &'static str, functions: &'static [&'static str]) -> Self {
        Self {
            name,
            functions,
            legacy: &[],
        }
    }

    pub const fn with_legacy(self, legacy: &'static [&'static str]) -> Self {
        Self { legacy, ..self }
    }

    pub fn matches(&self, interface: &ContractInterface) -> bool {
        let all_present = |set: &[&str]| set.iter().all(|sig| interface.has_signature(sig));
        all_present(self.functions) || (!self.legacy.is_empty() && all_present(self.legacy))
    }
}

/// Whether the contract behind `contract` declares `fingerprint`.
pub fn detect_contract_feature(contract: &ContractWrapper, fingerprint: &Fingerprint) -> bool {
    let detected = fingerprint.matches(contract.interface());
    tracing::debug!(
        target: "contractkit::detection",
        address = %contract.address(),
        feature = fingerprint.name,
        detected,
        "Feature detection"
    );
    detected
}

/// Names of every fingerprint in `fingerprints` the interface satisfies.
pub fn detect_features<'a>(
    interface: &ContractInterface,
    fingerprints: impl IntoIterator<Item = &'a Fingerprint>,
) -> Vec<&'static str> {
    fingerprints
        .into_iter()
        .filter(|fp| fp.matches(interface))
        .map(|fp| fp.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::features::{self, erc721};

    #[test]
    fn test_exact_function_set_matches_and_each_removal_fails() {
        for fingerprint in features::ALL {
            let full = ContractInterface::from_signatures(fingerprint.functions.iter());
            assert!(fingerprint.matches(&full), "{} should match", fingerprint.name);

            for skipped in 0..fingerprint.functions.len() {
                let partial = ContractInterface::from_signatures(
                    fingerprint
                        .functions
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != skipped)
                        .map(|(_, sig)| sig),
                );
                assert!(
                    !fingerprint.matches(&partial),
                    "{} matched without {}",
                    fingerprint.name,
                    fingerprint.functions[skipped]
                );
            }
        }
    }

    #[test]
    fn test_legacy_signatures_match() {
        let legacy = ContractInterface::from_signatures(["nextTokenIdToMint()"]);
        assert!(erc721::SUPPLY.matches(&legacy));
        assert!(!erc721::MINTABLE.matches(&legacy));
    }

    #[test]
    fn test_legacy_claim_signature_detects_claim_conditions() {
        let legacy = ContractInterface::from_signatures([
            "claim(address,uint256,address,uint256,bytes32[],uint256)",
        ]);
        assert!(erc721::CLAIMABLE_WITH_CONDITIONS.matches(&legacy));
        assert!(!erc721::CLAIMABLE.matches(&legacy));
        assert_eq!(
            detect_features(&legacy, features::ALL),
            vec!["ERC721ClaimableWithConditions"]
        );
    }

    #[test]
    fn test_empty_interface_matches_nothing() {
        let empty = ContractInterface::default();
        assert!(detect_features(&empty, features::ALL).is_empty());
    }

    #[test]
    fn test_detect_features_lists_names() {
        let interface = ContractInterface::from_signatures([
            "mintTo(address,string)",
            "multicall(bytes[])",
            "burn(uint256)",
        ]);
        let detected = detect_features(&interface, features::ALL);
        assert_eq!(
            detected,
            vec!["ERC721Mintable", "ERC721BatchMintable", "ERC721Burnable", "Multicall"]
        );
    }
}
