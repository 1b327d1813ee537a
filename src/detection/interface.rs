use std::collections::BTreeSet;

use alloy_json_abi::JsonAbi;

/// The function set a contract declares, as canonical signatures.
///
/// This is static metadata: it comes from the contract's ABI, never from the
/// chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractInterface {
    signatures: BTreeSet<String>,
    names: BTreeSet<String>,
}

impl ContractInterface {
    pub fn from_abi(abi: &JsonAbi) -> Self {
        let mut interface = Self::default();
        for function in abi.functions() {
            interface.insert(function.signature());
        }
        interface
    }

    /// Parse either a bare ABI array or a compiler artifact with an `abi` key.
    pub fn from_abi_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let abi_value = match value {
            serde_json::Value::Object(mut artifact) if artifact.contains_key("abi") => {
                artifact.remove("abi").unwrap_or_default()
            }
            other => other,
        };
        let abi: JsonAbi = serde_json::from_value(abi_value)?;
        Ok(Self::from_abi(&abi))
    }

    /// Build from human readable signatures such as `"mintTo(address,string)"`.
    pub fn from_signatures<I, S>(signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut interface = Self::default();
        for signature in signatures {
            interface.insert(normalize(signature.as_ref()));
        }
        interface
    }

    fn insert(&mut self, signature: String) {
        let name = signature
            .split_once('(')
            .map_or(signature.as_str(), |(name, _)| name)
            .to_string();
        self.names.insert(name);
        self.signatures.insert(signature);
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn has_signature(&self, signature: &str) -> bool {
        self.signatures.contains(&normalize(signature))
    }

    pub fn signatures(&self) -> impl Iterator<Item = &str> {
        self.signatures.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

fn normalize(signature: &str) -> String {
    signature.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABI: &str = r#"[
        {"type":"function","name":"mintTo","stateMutability":"nonpayable",
         "inputs":[{"name":"to","type":"address"},{"name":"uri","type":"string"}],
         "outputs":[{"name":"","type":"uint256"}]},
        {"type":"function","name":"claim","stateMutability":"payable",
         "inputs":[
            {"name":"receiver","type":"address"},
            {"name":"quantity","type":"uint256"},
            {"name":"currency","type":"address"},
            {"name":"pricePerToken","type":"uint256"},
            {"name":"allowlistProof","type":"tuple","components":[
                {"name":"proof","type":"bytes32[]"},
                {"name":"quantityLimitPerWallet","type":"uint256"},
                {"name":"pricePerToken","type":"uint256"},
                {"name":"currency","type":"address"}]},
            {"name":"data","type":"bytes"}],
         "outputs":[]},
        {"type":"event","name":"Transfer","anonymous":false,
         "inputs":[{"name":"from","type":"address","indexed":true}]}
    ]"#;

    #[test]
    fn test_from_abi_json_collects_functions_only() {
        let interface = ContractInterface::from_abi_json(ABI).unwrap();
        assert_eq!(interface.len(), 2);
        assert!(interface.has_function("mintTo"));
        assert!(!interface.has_function("Transfer"));
        assert!(interface.has_signature("mintTo(address,string)"));
        assert!(interface.has_signature(
            "claim(address,uint256,address,uint256,(bytes32[],uint256,uint256,address),bytes)"
        ));
    }

    #[test]
    fn test_from_artifact_json() {
        let artifact = format!(r#"{{"contractName":"Drop","abi":{ABI}}}"#);
        let interface = ContractInterface::from_abi_json(&artifact).unwrap();
        assert!(interface.has_function("claim"));
    }

    #[test]
    fn test_signatures_ignore_whitespace() {
        let interface = ContractInterface::from_signatures(["mintTo(address, string)"]);
        assert!(interface.has_signature("mintTo(address,string)"));
        assert!(interface.has_function("mintTo"));
        assert!(!interface.has_function("burn"));
    }
}
