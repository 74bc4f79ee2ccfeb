//! In-memory binary storage keyed by content reference.

use async_trait::async_trait;
use cs_05_document_lifecycle::ContentSource;
use dashmap::DashMap;
use shared_types::StoreError;

#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    blobs: DashMap<String, Vec<u8>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, content_ref: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.blobs.insert(content_ref.into(), bytes.into());
    }
}

#[async_trait]
impl ContentSource for InMemoryContentStore {
    async fn fetch(&self, content_ref: &str) -> Result<Vec<u8>, StoreError> {
        self.blobs
            .get(content_ref)
            .map(|b| b.value().clone())
            .ok_or_else(|| StoreError::NotFound(content_ref.to_string()))
    }
}
