//! Off-chain content storage used for NFT metadata.
//!
//! [`ContentStorage`] is the seam capability classes upload metadata through
//! before submitting a transaction, and read token metadata back from.
//!
//! [`IpfsStorage`] is the default implementation:
//! - Uploads go through an IPFS HTTP API (`/api/v0/add`). Batches are wrapped
//!   in a directory whose entries are named by file number, so every URI in a
//!   batch shares the same `ipfs://<cid>/` base.
//! - Downloads resolve `https://` / `http://` URLs, `ipfs://` URIs (through a
//!   gateway), `data:` URIs (base64 and URL-encoded) and raw inline JSON.
//! - HTTP reads are retried with exponential backoff for transient errors.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

// Retry configuration
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
const MAX_RETRIES: u32 = 5;
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Public gateway used when none is configured.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Local Kubo node API used when none is configured.
pub const DEFAULT_IPFS_API: &str = "http://127.0.0.1:5001";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Unsupported URI: {0}")]
    UnsupportedUri(String),
    #[error("Malformed data URI")]
    MalformedDataUri,
    #[error("Invalid JSON content: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("Cannot mix URIs and metadata objects in one batch")]
    MixedBatch,
    #[error("Batch is empty")]
    EmptyBatch,
    #[error("Can only create batches with the same base URI for every entry in the batch. Expected '{expected}' or '{expected}/', got '{got}'")]
    MismatchedBaseUri { expected: String, got: String },
}

/// Progress of a batch upload, reported once per stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub progress: usize,
    pub total: usize,
}

/// Options for [`ContentStorage::upload_batch`].
#[derive(Clone, Default)]
pub struct UploadOptions {
    /// File number of the first entry (entry `i` is stored as `start_file_number + i`).
    pub start_file_number: u64,
    /// Called after each file is accepted by the storage backend.
    pub on_progress: Option<Arc<dyn Fn(UploadProgress) + Send + Sync>>,
}

impl fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadOptions")
            .field("start_file_number", &self.start_file_number)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl UploadOptions {
    pub fn starting_at(start_file_number: u64) -> Self {
        Self {
            start_file_number,
            on_progress: None,
        }
    }

    pub fn report(&self, progress: usize, total: usize) {
        if let Some(cb) = &self.on_progress {
            cb(UploadProgress { progress, total });
        }
    }
}

/// Content-addressed storage for off-chain JSON documents.
#[async_trait]
pub trait ContentStorage: Send + Sync {
    /// Store a single document and return its URI.
    async fn upload(&self, data: &serde_json::Value) -> Result<String, StorageError>;

    /// Store documents as one batch sharing a base URI.
    ///
    /// Returns one URI per input document, in order. An empty batch stores
    /// nothing and returns no URIs.
    async fn upload_batch(
        &self,
        data: &[serde_json::Value],
        options: &UploadOptions,
    ) -> Result<Vec<String>, StorageError>;

    /// Fetch the raw content behind a URI.
    async fn download(&self, uri: &str) -> Result<String, StorageError>;

    /// Fetch the content behind a URI and parse it as JSON.
    ///
    /// Raw quotes inside string values and stray control characters are
    /// repaired first; both show up in deployed token metadata.
    async fn download_json(&self, uri: &str) -> Result<serde_json::Value, StorageError> {
        let raw = self.download(uri).await?;
        serde_json::from_str(&repair_json(&raw)).map_err(|e| {
            tracing::debug!(
                target: "contractkit_common::storage",
                uri,
                error = %e,
                "Downloaded content is not JSON"
            );
            StorageError::from(e)
        })
    }
}

/// One line of the `/api/v0/add` NDJSON response.
#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Hash")]
    hash: String,
}

/// IPFS-backed [`ContentStorage`].
#[derive(Debug, Clone)]
pub struct IpfsStorage {
    client: reqwest::Client,
    api_url: String,
    gateway_url: String,
}

impl IpfsStorage {
    pub fn new(api_url: impl Into<String>, gateway_url: impl Into<String>) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        let mut gateway_url = gateway_url.into();
        if !gateway_url.ends_with('/') {
            gateway_url.push('/');
        }
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            gateway_url,
        })
    }

    /// Rewrite `ipfs://` URIs to the configured gateway; other URIs pass through.
    pub fn resolve_gateway_url(&self, uri: &str) -> String {
        match uri.strip_prefix("ipfs://") {
            Some(cid) => format!("{}{}", self.gateway_url, cid),
            None => uri.to_string(),
        }
    }

    /// GET a URL, retrying transport errors with exponential backoff.
    ///
    /// A non-success status is final.
    async fn get_with_retry(&self, url: &str) -> Result<String, StorageError> {
        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 0;
        let resp = loop {
            match self.client.get(url).send().await {
                Ok(resp) => break resp,
                Err(e) if attempt < MAX_RETRIES => {
                    attempt += 1;
                    tracing::debug!(
                        target: "contractkit_common::storage",
                        url,
                        error = %e,
                        attempt,
                        "Content request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => {
                    tracing::debug!(
                        target: "contractkit_common::storage",
                        url,
                        error = %e,
                        "Content request failed, giving up"
                    );
                    return Err(e.into());
                }
            }
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(StorageError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }

    /// Add files to the node and return the parsed response lines.
    async fn add(
        &self,
        files: Vec<(String, Vec<u8>)>,
        wrap_with_directory: bool,
    ) -> Result<Vec<AddResponse>, StorageError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, bytes) in files {
            let part = reqwest::multipart::Part::bytes(bytes)
                .file_name(name)
                .mime_str("application/json")?;
            form = form.part("file", part);
        }

        let url = format!(
            "{}/api/v0/add?pin=true&wrap-with-directory={}",
            self.api_url, wrap_with_directory
        );
        let resp = self.client.post(&url).multipart(form).send().await?;
        if !resp.status().is_success() {
            return Err(StorageError::Status {
                url,
                status: resp.status().as_u16(),
            });
        }

        let body = resp.text().await?;
        body.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str::<AddResponse>(line).map_err(StorageError::from))
            .collect()
    }
}

#[async_trait]
impl ContentStorage for IpfsStorage {
    async fn upload(&self, data: &serde_json::Value) -> Result<String, StorageError> {
        let bytes = serde_json::to_vec(data)?;
        let entries = self.add(vec![("0".to_string(), bytes)], false).await?;
        let entry = entries
            .last()
            .ok_or_else(|| StorageError::Upload("empty response from IPFS node".to_string()))?;

        tracing::debug!(
            target: "contractkit_common::storage",
            cid = %entry.hash,
            "Uploaded document"
        );
        Ok(format!("ipfs://{}", entry.hash))
    }

    async fn upload_batch(
        &self,
        data: &[serde_json::Value],
        options: &UploadOptions,
    ) -> Result<Vec<String>, StorageError> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let total = data.len();
        let mut files = Vec::with_capacity(total);
        for (i, doc) in data.iter().enumerate() {
            let file_number = options.start_file_number + i as u64;
            files.push((file_number.to_string(), serde_json::to_vec(doc)?));
        }

        let entries = self.add(files, true).await?;
        let mut stored = 0;
        let mut directory = None;
        for entry in &entries {
            if entry.name.is_empty() {
                directory = Some(entry.hash.clone());
            } else {
                stored += 1;
                options.report(stored, total);
            }
        }

        let cid = directory
            .ok_or_else(|| StorageError::Upload("IPFS node did not return a directory entry".to_string()))?;

        tracing::debug!(
            target: "contractkit_common::storage",
            cid = %cid,
            files = total,
            "Uploaded batch"
        );

        Ok((0..total)
            .map(|i| format!("ipfs://{}/{}", cid, options.start_file_number + i as u64))
            .collect())
    }

    async fn download(&self, uri: &str) -> Result<String, StorageError> {
        if uri.starts_with("http://") || uri.starts_with("https://") || uri.starts_with("ipfs://") {
            return self.get_with_retry(&self.resolve_gateway_url(uri)).await;
        }
        if let Some(rest) = uri.strip_prefix("data:") {
            return decode_data_uri(rest);
        }
        if serde_json::from_str::<serde::de::IgnoredAny>(uri).is_ok() {
            return Ok(uri.to_string());
        }

        tracing::debug!(
            target: "contractkit_common::storage",
            uri,
            "Unsupported URI scheme and not inline JSON"
        );
        Err(StorageError::UnsupportedUri(uri.to_string()))
    }
}

/// Decode the part of a `data:` URI after the scheme.
///
/// The body is base64 when the media type carries a `;base64` parameter and
/// percent-encoded otherwise.
fn decode_data_uri(rest: &str) -> Result<String, StorageError> {
    let Some((header, body)) = rest.split_once(',') else {
        tracing::debug!(target: "contractkit_common::storage", "data: URI without a body");
        return Err(StorageError::MalformedDataUri);
    };

    if header.split(';').any(|param| param == "base64") {
        use base64::Engine;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(body)
            .map_err(|_| StorageError::MalformedDataUri)?;
        return String::from_utf8(bytes).map_err(|_| StorageError::MalformedDataUri);
    }

    Ok(urlencoding::decode(body).map_or_else(|_| body.to_string(), |decoded| decoded.into_owned()))
}

/// Escape raw quotes inside JSON string values and drop control characters.
///
/// A quote inside a string closes it only when the next non-whitespace
/// character is structural (`:`, `,`, `}`, `]`) or the input ends there.
fn repair_json(raw: &str) -> String {
    let chars: Vec<char> = raw
        .chars()
        .filter(|c| !c.is_ascii_control() || matches!(*c, '\n' | '\r' | '\t'))
        .collect();

    let mut out = String::with_capacity(chars.len());
    let mut in_string = false;
    let mut escaped = false;
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '"' if !in_string => in_string = true,
            '"' if escaped => {}
            '"' => {
                let closes = chars[i + 1..]
                    .iter()
                    .find(|next| !next.is_whitespace())
                    .is_none_or(|next| matches!(*next, ':' | ',' | '}' | ']'));
                if closes {
                    in_string = false;
                } else {
                    out.push('\\');
                }
            }
            _ => {}
        }
        escaped = in_string && c == '\\' && !escaped;
        out.push(c);
    }
    out
}
