use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use contractkit_common::{ContentStorage, StorageError, UploadOptions};

#[derive(Default)]
struct State {
    files: HashMap<String, String>,
    uploads: usize,
    batches: usize,
}

/// [`ContentStorage`] backed by a map.
///
/// Batches are stored under `ipfs://QmMemory<n>/<file number>` so they share a
/// base URI like a real directory upload.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed content at `uri`.
    pub fn insert(&self, uri: impl Into<String>, content: impl Into<String>) {
        self.state().files.insert(uri.into(), content.into());
    }

    /// Stored document at `uri`, parsed as JSON.
    pub fn document(&self, uri: &str) -> Option<serde_json::Value> {
        self.state()
            .files
            .get(uri)
            .and_then(|raw| serde_json::from_str(raw).ok())
    }

    /// Number of documents uploaded so far.
    pub fn upload_count(&self) -> usize {
        self.state().uploads
    }
}

#[async_trait]
impl ContentStorage for MemoryStorage {
    async fn upload(&self, data: &serde_json::Value) -> Result<String, StorageError> {
        let mut state = self.state();
        state.uploads += 1;
        let uri = format!("ipfs://QmMemoryFile{}", state.uploads);
        state.files.insert(uri.clone(), data.to_string());
        Ok(uri)
    }

    async fn upload_batch(
        &self,
        data: &[serde_json::Value],
        options: &UploadOptions,
    ) -> Result<Vec<String>, StorageError> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let uris = {
            let mut state = self.state();
            state.batches += 1;
            let directory = format!("ipfs://QmMemory{}", state.batches);
            let start = options.start_file_number;
            let mut uris = Vec::with_capacity(data.len());
            for (offset, doc) in data.iter().enumerate() {
                let uri = format!("{directory}/{}", start + offset as u64);
                state.files.insert(uri.clone(), doc.to_string());
                state.uploads += 1;
                uris.push(uri);
            }
            uris
        };

        for done in 1..=uris.len() {
            options.report(done, uris.len());
        }
        Ok(uris)
    }

    async fn download(&self, uri: &str) -> Result<String, StorageError> {
        self.state()
            .files
            .get(uri)
            .cloned()
            .ok_or_else(|| StorageError::UnsupportedUri(uri.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_batch_stores_nothing() {
        let storage = MemoryStorage::new();
        let uris = storage
            .upload_batch(&[], &UploadOptions::default())
            .await
            .unwrap();
        assert!(uris.is_empty());
        assert_eq!(storage.upload_count(), 0);

        let uris = storage
            .upload_batch(&[serde_json::json!({"name": "Pass"})], &UploadOptions::default())
            .await
            .unwrap();
        assert_eq!(uris, vec!["ipfs://QmMemory1/0".to_string()]);
    }
}
