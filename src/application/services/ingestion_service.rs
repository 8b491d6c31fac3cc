use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::Instrument;

use crate::application::ports::{ChunkStore, ChunkStoreError};
use crate::domain::{Chunk, ChunkingStrategy, Document, DocumentId};

use super::chunking_pipeline::{ChunkingPipeline, PipelineError};

/// Runs every configured pipeline over incoming documents and hands the
/// resulting chunk sets to the storage collaborator.
///
/// Documents are independent: a batch processes them in parallel, and a
/// provider failure on one document leaves the others untouched. Within one
/// document, all strategies must succeed or the document is reported failed
/// and contributes zero chunks.
pub struct IngestionService<S>
where
    S: ChunkStore,
{
    pipelines: Vec<Arc<ChunkingPipeline>>,
    chunk_store: Arc<S>,
}

impl<S> IngestionService<S>
where
    S: ChunkStore + 'static,
{
    pub fn new(pipelines: Vec<Arc<ChunkingPipeline>>, chunk_store: Arc<S>) -> Self {
        Self {
            pipelines,
            chunk_store,
        }
    }

    pub async fn ingest(
        &self,
        document: &Document,
    ) -> Result<HashMap<ChunkingStrategy, Vec<Chunk>>, IngestionError> {
        let runs = self.pipelines.iter().map(|pipeline| {
            let pipeline = Arc::clone(pipeline);
            async move {
                let chunks = pipeline
                    .process(document)
                    .await
                    .map_err(|source| IngestionError::Pipeline {
                        strategy: pipeline.strategy(),
                        source,
                    })?;
                Ok::<_, IngestionError>((pipeline.strategy(), chunks))
            }
        });

        let results = futures::future::try_join_all(runs).await?;

        let mut by_strategy = HashMap::new();
        for (strategy, chunks) in results {
            self.chunk_store
                .store(&document.id, strategy, &chunks)
                .await?;
            by_strategy.insert(strategy, chunks);
        }

        Ok(by_strategy)
    }

    pub async fn ingest_batch(self: Arc<Self>, documents: Vec<Document>) -> BatchReport {
        let mut tasks = JoinSet::new();

        for (index, document) in documents.into_iter().enumerate() {
            let service = Arc::clone(&self);
            let span = tracing::info_span!(
                "ingest_document",
                document_id = %document.id,
                title = %document.title,
            );
            tasks.spawn(
                async move {
                    let outcome = service.ingest(&document).await;
                    if let Err(e) = &outcome {
                        tracing::error!(error = %e, "Document ingestion failed");
                    }
                    (index, document.id, outcome)
                }
                .instrument(span),
            );
        }

        let mut completed = Vec::new();
        let mut failed = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, document_id, Ok(by_strategy))) => completed.push((
                    index,
                    DocumentChunkSets {
                        document_id,
                        by_strategy,
                    },
                )),
                Ok((index, document_id, Err(e))) => failed.push((
                    index,
                    FailedDocument {
                        document_id,
                        reason: e.to_string(),
                    },
                )),
                Err(join_error) => {
                    tracing::error!(error = %join_error, "Ingestion task panicked");
                }
            }
        }

        completed.sort_by_key(|(index, _)| *index);
        failed.sort_by_key(|(index, _)| *index);

        BatchReport {
            completed: completed.into_iter().map(|(_, sets)| sets).collect(),
            failed: failed.into_iter().map(|(_, failure)| failure).collect(),
        }
    }
}

#[derive(Debug)]
pub struct DocumentChunkSets {
    pub document_id: DocumentId,
    pub by_strategy: HashMap<ChunkingStrategy, Vec<Chunk>>,
}

#[derive(Debug)]
pub struct FailedDocument {
    pub document_id: DocumentId,
    pub reason: String,
}

#[derive(Debug)]
pub struct BatchReport {
    pub completed: Vec<DocumentChunkSets>,
    pub failed: Vec<FailedDocument>,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("pipeline {strategy}: {source}")]
    Pipeline {
        strategy: ChunkingStrategy,
        source: PipelineError,
    },
    #[error("chunk storage: {0}")]
    Storage(#[from] ChunkStoreError),
}
