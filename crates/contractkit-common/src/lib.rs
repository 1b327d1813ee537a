//! Common utilities for contractkit capability classes
//!
//! Provides the off-chain content storage seam (IPFS by default) and the NFT
//! metadata model with its upload/fetch helpers.

pub mod metadata;
pub mod storage;

pub use metadata::{
    base_uri_from_batch, fetch_token_metadata, upload_or_extract_uri, upload_or_extract_uris,
    NftMetadata, NftMetadataInput, NftMetadataOrUri, NftMetadataOwner,
};
pub use storage::{
    ContentStorage, IpfsStorage, StorageError, UploadOptions, UploadProgress,
    DEFAULT_IPFS_API, DEFAULT_IPFS_GATEWAY,
};
