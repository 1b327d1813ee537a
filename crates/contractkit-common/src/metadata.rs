//! NFT metadata model and the upload/fetch helpers shared by capability classes.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::storage::{ContentStorage, StorageError, UploadOptions};

/// Metadata supplied by the caller when minting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NftMetadataInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
    /// Any other fields, preserved as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NftMetadataInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Either a metadata document to upload, or a URI that already points to one.
#[derive(Debug, Clone, PartialEq)]
pub enum NftMetadataOrUri {
    Uri(String),
    Metadata(NftMetadataInput),
}

impl From<&str> for NftMetadataOrUri {
    fn from(uri: &str) -> Self {
        Self::Uri(uri.to_string())
    }
}

impl From<String> for NftMetadataOrUri {
    fn from(uri: String) -> Self {
        Self::Uri(uri)
    }
}

impl From<NftMetadataInput> for NftMetadataOrUri {
    fn from(metadata: NftMetadataInput) -> Self {
        Self::Metadata(metadata)
    }
}

/// Resolved metadata of an on-chain token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    #[serde(default)]
    pub id: U256,
    #[serde(default)]
    pub uri: String,
    #[serde(flatten)]
    pub fields: NftMetadataInput,
}

/// Token metadata together with its current owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftMetadataOwner {
    pub metadata: NftMetadata,
    pub owner: Address,
}

/// Download and parse the metadata behind a token URI.
///
/// ERC1155-style `{id}` placeholders are replaced with the zero-padded hex id.
pub async fn fetch_token_metadata(
    token_id: U256,
    token_uri: &str,
    storage: &dyn ContentStorage,
) -> Result<NftMetadata, StorageError> {
    let resolved = if token_uri.contains("{id}") {
        token_uri.replace("{id}", &format!("{token_id:064x}"))
    } else {
        token_uri.to_string()
    };

    let document = storage.download_json(&resolved).await?;
    let mut fields: NftMetadataInput = serde_json::from_value(document)?;
    fields.extra.remove("id");
    fields.extra.remove("uri");

    Ok(NftMetadata {
        id: token_id,
        uri: token_uri.to_string(),
        fields,
    })
}

/// Upload a metadata document, or pass a URI through untouched.
pub async fn upload_or_extract_uri(
    metadata: &NftMetadataOrUri,
    storage: &dyn ContentStorage,
) -> Result<String, StorageError> {
    match metadata {
        NftMetadataOrUri::Uri(uri) => Ok(uri.clone()),
        NftMetadataOrUri::Metadata(doc) => storage.upload(&serde_json::to_value(doc)?).await,
    }
}

/// Upload a batch of metadata documents, or pass a batch of URIs through.
///
/// A batch must be homogeneous: all URIs or all documents.
pub async fn upload_or_extract_uris(
    metadatas: &[NftMetadataOrUri],
    storage: &dyn ContentStorage,
    options: &UploadOptions,
) -> Result<Vec<String>, StorageError> {
    let uris: Vec<String> = metadatas
        .iter()
        .filter_map(|m| match m {
            NftMetadataOrUri::Uri(uri) => Some(uri.clone()),
            NftMetadataOrUri::Metadata(_) => None,
        })
        .collect();

    if uris.len() == metadatas.len() {
        return Ok(uris);
    }
    if !uris.is_empty() {
        return Err(StorageError::MixedBatch);
    }

    let docs = metadatas
        .iter()
        .filter_map(|m| match m {
            NftMetadataOrUri::Metadata(doc) => Some(serde_json::to_value(doc)),
            NftMetadataOrUri::Uri(_) => None,
        })
        .collect::<Result<Vec<_>, _>>()?;

    storage.upload_batch(&docs, options).await
}

/// Shared base URI of a batch, always ending with `/`.
pub fn base_uri_from_batch(uris: &[String]) -> Result<String, StorageError> {
    let first = uris.first().ok_or(StorageError::EmptyBatch)?;
    let base = base_of(first);
    for uri in uris {
        if base_of(uri) != base {
            return Err(StorageError::MismatchedBaseUri {
                expected: base.to_string(),
                got: uri.clone(),
            });
        }
    }
    Ok(format!("{base}/"))
}

fn base_of(uri: &str) -> &str {
    uri.rfind('/').map_or(uri, |idx| &uri[..idx])
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Serves one document and remembers which URI was asked for.
    #[derive(Default)]
    struct SingleDocument {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContentStorage for SingleDocument {
        async fn upload(&self, _: &serde_json::Value) -> Result<String, StorageError> {
            Err(StorageError::Upload("read-only".to_string()))
        }

        async fn upload_batch(
            &self,
            _: &[serde_json::Value],
            _: &UploadOptions,
        ) -> Result<Vec<String>, StorageError> {
            Err(StorageError::Upload("read-only".to_string()))
        }

        async fn download(&self, uri: &str) -> Result<String, StorageError> {
            self.requested.lock().unwrap().push(uri.to_string());
            Ok(r#"{"id":"0xff","name":"Genesis Pass","image":"ipfs://QmArt/255.png","edition":"first"}"#
                .to_string())
        }
    }

    #[tokio::test]
    async fn test_fetch_substitutes_erc1155_id_placeholder() {
        let storage = SingleDocument::default();
        let metadata = fetch_token_metadata(U256::from(255u64), "https://meta.example/{id}.json", &storage)
            .await
            .unwrap();

        let expected = format!("https://meta.example/{}ff.json", "0".repeat(62));
        assert_eq!(*storage.requested.lock().unwrap(), vec![expected]);
        assert_eq!(metadata.uri, "https://meta.example/{id}.json");
        assert_eq!(metadata.id, U256::from(255u64));
        assert_eq!(metadata.fields.name.as_deref(), Some("Genesis Pass"));
        assert_eq!(metadata.fields.extra.get("edition"), Some(&serde_json::json!("first")));
        assert!(!metadata.fields.extra.contains_key("id"));
    }

    #[tokio::test]
    async fn test_fetch_leaves_plain_uri_untouched() {
        let storage = SingleDocument::default();
        fetch_token_metadata(U256::from(3u64), "ipfs://QmBatch/3", &storage)
            .await
            .unwrap();
        assert_eq!(*storage.requested.lock().unwrap(), vec!["ipfs://QmBatch/3".to_string()]);
    }

    #[test]
    fn test_base_uri_from_batch() {
        let uris = vec!["ipfs://Qm/0".to_string(), "ipfs://Qm/1".to_string()];
        assert_eq!(base_uri_from_batch(&uris).unwrap(), "ipfs://Qm/");
    }

    #[test]
    fn test_base_uri_from_batch_mismatch() {
        let uris = vec!["ipfs://QmA/0".to_string(), "ipfs://QmB/1".to_string()];
        assert!(matches!(
            base_uri_from_batch(&uris),
            Err(StorageError::MismatchedBaseUri { .. })
        ));
    }

    #[test]
    fn test_base_uri_from_empty_batch() {
        assert!(matches!(base_uri_from_batch(&[]), Err(StorageError::EmptyBatch)));
    }

    #[test]
    fn test_metadata_input_keeps_extra_fields() {
        let json = r#"{"name":"Sword","level":3}"#;
        let input: NftMetadataInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.name.as_deref(), Some("Sword"));
        assert_eq!(input.extra.get("level"), Some(&serde_json::json!(3)));
        let back = serde_json::to_value(&input).unwrap();
        assert_eq!(back, serde_json::json!({"name": "Sword", "level": 3}));
    }
}
