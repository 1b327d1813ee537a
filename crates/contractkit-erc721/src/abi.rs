//! Solidity interfaces used by the ERC721 capability classes.

use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct ClaimCondition {
        uint256 startTimestamp;
        uint256 maxClaimableSupply;
        uint256 supplyClaimed;
        uint256 quantityLimitPerWallet;
        bytes32 merkleRoot;
        uint256 pricePerToken;
        address currency;
        string metadata;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct AllowlistProof {
        bytes32[] proof;
        uint256 quantityLimitPerWallet;
        uint256 pricePerToken;
        address currency;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct MintRequest {
        address to;
        address royaltyRecipient;
        uint256 royaltyBps;
        address primarySaleRecipient;
        string uri;
        uint256 quantity;
        uint256 pricePerToken;
        address currency;
        uint128 validityStartTimestamp;
        uint128 validityEndTimestamp;
        bytes32 uid;
    }

    interface IERC721 {
        function balanceOf(address owner) external view returns (uint256);
        function ownerOf(uint256 tokenId) external view returns (address);
        function tokenURI(uint256 tokenId) external view returns (string memory);
        function isApprovedForAll(address owner, address operator) external view returns (bool);
        function setApprovalForAll(address operator, bool approved) external;
        function approve(address to, uint256 tokenId) external;
        function safeTransferFrom(address from, address to, uint256 tokenId) external;
    }

    interface IERC721Supply {
        function totalSupply() external view returns (uint256);
        function nextTokenIdToMint() external view returns (uint256);
    }

    interface IERC721Enumerable {
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
    }

    interface IMintableERC721 {
        event TokensMinted(address indexed mintedTo, uint256 indexed tokenIdMinted, string uri);

        function mintTo(address to, string calldata uri) external returns (uint256);
    }

    interface IBurnableERC721 {
        function burn(uint256 tokenId) external;
    }

    interface ILazyMint {
        event TokensLazyMinted(uint256 indexed startTokenId, uint256 endTokenId, string baseURI, bytes encryptedBaseURI);

        function lazyMint(uint256 amount, string calldata baseURIForTokens, bytes calldata extraData) external returns (uint256 batchId);
    }

    interface IClaimableERC721 {
        event TokensClaimed(address indexed claimer, address indexed receiver, uint256 indexed startTokenId, uint256 quantityClaimed);

        function claim(address receiver, uint256 quantity) external payable;
    }

    interface IDrop {
        event TokensClaimed(uint256 indexed claimConditionIndex, address indexed claimer, address indexed receiver, uint256 startTokenId, uint256 quantityClaimed);
        event ClaimConditionsUpdated(ClaimCondition[] claimConditions, bool resetEligibility);

        function claim(address receiver, uint256 quantity, address currency, uint256 pricePerToken, AllowlistProof calldata allowlistProof, bytes memory data) external payable;
        function setClaimConditions(ClaimCondition[] calldata phases, bool resetClaimEligibility) external;
        function claimCondition() external view returns (uint256 currentStartId, uint256 count);
        function getActiveClaimConditionId() external view returns (uint256);
        function getClaimConditionById(uint256 conditionId) external view returns (ClaimCondition memory condition);
    }

    interface IDelayedReveal {
        event TokenURIRevealed(uint256 indexed index, string revealedURI);

        function reveal(uint256 index, bytes calldata key) external returns (string memory revealedURI);
        function encryptDecrypt(bytes memory data, bytes calldata key) external pure returns (bytes memory result);
        function getBaseURICount() external view returns (uint256);
        function getBatchIdAtIndex(uint256 index) external view returns (uint256);
        function encryptedData(uint256 batchId) external view returns (bytes memory);
    }

    interface ISignatureMintERC721 {
        event TokensMintedWithSignature(address indexed signer, address indexed mintedTo, uint256 indexed tokenIdMinted, MintRequest mintRequest);

        function mintWithSignature(MintRequest calldata req, bytes calldata signature) external payable returns (address signer);
        function verify(MintRequest calldata req, bytes calldata signature) external view returns (bool success, address signer);
    }
}
