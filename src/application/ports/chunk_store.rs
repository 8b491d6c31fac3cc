use async_trait::async_trait;

use crate::domain::{Chunk, ChunkingStrategy, DocumentId};

/// Storage collaborator boundary. Persistence and indexing happen behind
/// this port; the core only hands over complete, linked chunk sets.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    async fn store(
        &self,
        document_id: &DocumentId,
        strategy: ChunkingStrategy,
        chunks: &[Chunk],
    ) -> Result<(), ChunkStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ChunkStoreError {
    #[error("chunk storage failed: {0}")]
    StorageFailed(String),
}
