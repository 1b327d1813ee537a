//! Optional capability objects.
//!
//! A facade resolves each extension once at construction and stores the result
//! as a [`Capability`]. Callers never see a missing object: an absent extension
//! is a typed [`SdkError::ExtensionNotImplemented`].

use crate::detection::{ContractInterface, Fingerprint};
use crate::error::{Result, SdkError};

#[derive(Debug, Clone)]
pub enum Capability<T> {
    NotImplemented(&'static str),
    Implemented(T),
}

impl<T> Capability<T> {
    /// Build the capability object if `fingerprint` is declared by `interface`.
    pub fn detect(
        interface: &ContractInterface,
        fingerprint: &Fingerprint,
        build: impl FnOnce() -> T,
    ) -> Self {
        Self::when(fingerprint.matches(interface), fingerprint.name, build)
    }

    /// Build the capability object when `present` holds.
    pub fn when(present: bool, feature: &'static str, build: impl FnOnce() -> T) -> Self {
        if present {
            Self::Implemented(build())
        } else {
            Self::NotImplemented(feature)
        }
    }

    pub fn get(&self) -> Result<&T> {
        match self {
            Self::Implemented(inner) => Ok(inner),
            Self::NotImplemented(feature) => Err(SdkError::ExtensionNotImplemented(feature)),
        }
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::Implemented(inner) => Some(inner),
            Self::NotImplemented(_) => None,
        }
    }

    pub fn is_implemented(&self) -> bool {
        matches!(self, Self::Implemented(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::features::erc721;

    #[test]
    fn test_absent_capability_is_typed_error() {
        let interface = ContractInterface::from_signatures(["burn(uint256)"]);
        let mintable = Capability::detect(&interface, &erc721::MINTABLE, || "mint");
        let burnable = Capability::detect(&interface, &erc721::BURNABLE, || "burn");

        assert!(matches!(
            mintable.get(),
            Err(SdkError::ExtensionNotImplemented("ERC721Mintable"))
        ));
        assert_eq!(*burnable.get().unwrap(), "burn");
        assert!(burnable.is_implemented());
        assert!(mintable.as_option().is_none());
    }

    #[test]
    fn test_builder_not_run_when_absent() {
        let mut built = false;
        let capability = Capability::when(false, "ERC721Burnable", || built = true);
        assert!(!capability.is_implemented());
        assert!(!built);
    }
}
