//! Fingerprints of the known contract extensions.

use super::Fingerprint;

pub const MULTICALL: Fingerprint = Fingerprint::new("Multicall", &["multicall(bytes[])"]);

pub mod erc721 {
    use super::Fingerprint;

    pub const BASE: Fingerprint = Fingerprint::new(
        "ERC721",
        &[
            "balanceOf(address)",
            "ownerOf(uint256)",
            "tokenURI(uint256)",
            "isApprovedForAll(address,address)",
            "setApprovalForAll(address,bool)",
            "approve(address,uint256)",
            "safeTransferFrom(address,address,uint256)",
        ],
    );

    pub const SUPPLY: Fingerprint =
        Fingerprint::new("ERC721Supply", &["totalSupply()"]).with_legacy(&["nextTokenIdToMint()"]);

    pub const ENUMERABLE: Fingerprint = Fingerprint::new(
        "ERC721Enumerable",
        &["tokenOfOwnerByIndex(address,uint256)"],
    );

    pub const MINTABLE: Fingerprint =
        Fingerprint::new("ERC721Mintable", &["mintTo(address,string)"]);

    pub const BATCH_MINTABLE: Fingerprint = Fingerprint::new(
        "ERC721BatchMintable",
        &["mintTo(address,string)", "multicall(bytes[])"],
    );

    pub const BURNABLE: Fingerprint = Fingerprint::new("ERC721Burnable", &["burn(uint256)"]);

    pub const LAZY_MINTABLE: Fingerprint = Fingerprint::new(
        "ERC721LazyMintable",
        &["lazyMint(uint256,string,bytes)"],
    );

    pub const CLAIMABLE: Fingerprint =
        Fingerprint::new("ERC721Claimable", &["claim(address,uint256)"]);

    pub const CLAIMABLE_WITH_CONDITIONS: Fingerprint = Fingerprint::new(
        "ERC721ClaimableWithConditions",
        &[
            "claim(address,uint256,address,uint256,(bytes32[],uint256,uint256,address),bytes)",
            "getActiveClaimConditionId()",
            "getClaimConditionById(uint256)",
        ],
    )
    .with_legacy(&["claim(address,uint256,address,uint256,bytes32[],uint256)"]);

    pub const REVEALABLE: Fingerprint = Fingerprint::new(
        "ERC721Revealable",
        &[
            "reveal(uint256,bytes)",
            "encryptDecrypt(bytes,bytes)",
            "getBaseURICount()",
            "getBatchIdAtIndex(uint256)",
            "encryptedData(uint256)",
        ],
    );

    pub const SIGNATURE_MINT: Fingerprint = Fingerprint::new(
        "ERC721SignatureMint",
        &[
            "mintWithSignature((address,address,uint256,address,string,uint256,uint256,address,uint128,uint128,bytes32),bytes)",
            "verify((address,address,uint256,address,string,uint256,uint256,address,uint128,uint128,bytes32),bytes)",
        ],
    );

    pub const ALL: &[Fingerprint] = &[
        BASE,
        SUPPLY,
        ENUMERABLE,
        MINTABLE,
        BATCH_MINTABLE,
        BURNABLE,
        LAZY_MINTABLE,
        CLAIMABLE,
        CLAIMABLE_WITH_CONDITIONS,
        REVEALABLE,
        SIGNATURE_MINT,
    ];
}

pub mod erc20 {
    use super::Fingerprint;

    pub const BASE: Fingerprint = Fingerprint::new(
        "ERC20",
        &[
            "balanceOf(address)",
            "totalSupply()",
            "transfer(address,uint256)",
            "allowance(address,address)",
            "approve(address,uint256)",
            "transferFrom(address,address,uint256)",
            "decimals()",
        ],
    );

    pub const MINTABLE: Fingerprint =
        Fingerprint::new("ERC20Mintable", &["mintTo(address,uint256)"]);

    pub const BATCH_MINTABLE: Fingerprint = Fingerprint::new(
        "ERC20BatchMintable",
        &["mintTo(address,uint256)", "multicall(bytes[])"],
    );

    pub const BURNABLE: Fingerprint =
        Fingerprint::new("ERC20Burnable", &["burn(uint256)", "burnFrom(address,uint256)"]);

    pub const ALL: &[Fingerprint] = &[BASE, MINTABLE, BATCH_MINTABLE, BURNABLE];
}

/// Every known fingerprint, ERC721 first.
pub const ALL: &[Fingerprint] = &[
    erc721::BASE,
    erc721::SUPPLY,
    erc721::ENUMERABLE,
    erc721::MINTABLE,
    erc721::BATCH_MINTABLE,
    erc721::BURNABLE,
    erc721::LAZY_MINTABLE,
    erc721::CLAIMABLE,
    erc721::CLAIMABLE_WITH_CONDITIONS,
    erc721::REVEALABLE,
    erc721::SIGNATURE_MINT,
    erc20::BASE,
    erc20::MINTABLE,
    erc20::BATCH_MINTABLE,
    erc20::BURNABLE,
    MULTICALL,
];

/// Look up a fingerprint by its feature name.
pub fn by_name(name: &str) -> Option<&'static Fingerprint> {
    ALL.iter().find(|fp| fp.name == name)
}
