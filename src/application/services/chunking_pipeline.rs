use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::application::ports::{Embedder, EmbedderError, TextSplitter, TokenCounter};
use crate::domain::{Chunk, ChunkingStrategy, Document, Embedding};

use super::chunk_assembler::{AssemblyError, ChunkAssembler};
use super::contextual_blender::{BlendError, ContextualBlender};

const DEFAULT_EMBED_CONCURRENCY: usize = 8;

/// One chunking configuration: token budget, overlap, and whether chunk
/// embeddings are blended with a document-level context embedding.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub strategy: ChunkingStrategy,
    pub max_tokens: usize,
    pub overlap_tokens: usize,
    pub contextual_blending: bool,
    pub embed_concurrency: usize,
}

impl PipelineConfig {
    pub fn semantic_1024() -> Self {
        Self {
            strategy: ChunkingStrategy::Semantic1024,
            max_tokens: 1024,
            overlap_tokens: 100,
            contextual_blending: false,
            embed_concurrency: DEFAULT_EMBED_CONCURRENCY,
        }
    }

    pub fn semantic_256() -> Self {
        Self {
            strategy: ChunkingStrategy::Semantic256,
            max_tokens: 256,
            overlap_tokens: 20,
            contextual_blending: false,
            embed_concurrency: DEFAULT_EMBED_CONCURRENCY,
        }
    }

    pub fn late_chunking_1024() -> Self {
        Self {
            strategy: ChunkingStrategy::LateChunking1024,
            contextual_blending: true,
            ..Self::semantic_1024()
        }
    }

    pub fn late_chunking_256() -> Self {
        Self {
            strategy: ChunkingStrategy::LateChunking256,
            contextual_blending: true,
            ..Self::semantic_256()
        }
    }

    pub fn canonical(strategy: ChunkingStrategy) -> Self {
        match strategy {
            ChunkingStrategy::Semantic1024 => Self::semantic_1024(),
            ChunkingStrategy::Semantic256 => Self::semantic_256(),
            ChunkingStrategy::LateChunking1024 => Self::late_chunking_1024(),
            ChunkingStrategy::LateChunking256 => Self::late_chunking_256(),
        }
    }
}

/// Runs one document through one chunking configuration: assemble, embed,
/// and (for late-chunking variants) blend against the document context.
///
/// Processing is all-or-nothing per document. If any embedding call fails
/// the whole chunk set is discarded; downstream consumers rely on
/// contiguous sequencing and complete linking, so partial output is never
/// returned.
pub struct ChunkingPipeline {
    config: PipelineConfig,
    assembler: ChunkAssembler,
    embedder: Arc<dyn Embedder>,
    blender: ContextualBlender,
}

impl ChunkingPipeline {
    pub fn new(
        config: PipelineConfig,
        splitter: Arc<dyn TextSplitter>,
        counter: Arc<dyn TokenCounter>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let assembler = ChunkAssembler::new(config.strategy, config.max_tokens, splitter, counter);
        Self {
            config,
            assembler,
            embedder,
            blender: ContextualBlender::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn strategy(&self) -> ChunkingStrategy {
        self.config.strategy
    }

    #[tracing::instrument(
        skip(self, document),
        fields(strategy = %self.config.strategy, document_id = %document.id)
    )]
    pub async fn process(&self, document: &Document) -> Result<Vec<Chunk>, PipelineError> {
        let mut chunks = self.assembler.assemble(document)?;
        if chunks.is_empty() {
            tracing::debug!("Document produced no chunks");
            return Ok(chunks);
        }

        // For blending strategies the document embedding is a hard barrier:
        // computed exactly once, before any chunk blending can begin.
        let document_context = if self.config.contextual_blending {
            let context_text = ContextualBlender::document_context_text(document);
            Some(self.embedder.embed(&context_text).await?)
        } else {
            None
        };

        let embeddings = self.embed_in_order(&chunks).await?;

        let dimensions = embeddings[0].dimensions();
        for embedding in &embeddings {
            if embedding.dimensions() != dimensions {
                return Err(PipelineError::DimensionMismatch {
                    expected: dimensions,
                    actual: embedding.dimensions(),
                });
            }
        }
        if let Some(context) = &document_context {
            if context.dimensions() != dimensions {
                return Err(PipelineError::DimensionMismatch {
                    expected: dimensions,
                    actual: context.dimensions(),
                });
            }
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = Some(match &document_context {
                Some(context) => self.blender.blend(&embedding, context)?,
                None => embedding,
            });
            chunk.document_context_embedding = document_context.clone();
        }

        chunks.sort_by_key(|c| c.sequence);
        tracing::info!(chunk_count = chunks.len(), "Document processed");
        Ok(chunks)
    }

    /// Embeds chunk texts with bounded concurrency. Completion order varies;
    /// results are re-keyed by chunk index so output order never depends on
    /// it.
    async fn embed_in_order(&self, chunks: &[Chunk]) -> Result<Vec<Embedding>, EmbedderError> {
        let concurrency = self.config.embed_concurrency.max(1);

        let calls = chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| (index, Arc::clone(&self.embedder), chunk.text.clone()))
            .collect::<Vec<(usize, Arc<dyn Embedder + 'static>, String)>>();

        type EmbedFuture = Pin<Box<dyn Future<Output = Result<(usize, Embedding), EmbedderError>> + Send>>;
        let calls: Vec<EmbedFuture> = calls
            .into_iter()
            .map(|(index, embedder, text)| {
                Box::pin(async move {
                    embedder.embed(&text).await.map(|embedding| (index, embedding))
                }) as EmbedFuture
            })
            .collect();

        let mut indexed: Vec<(usize, Embedding)> = stream::iter(calls)
            .buffer_unordered(concurrency)
            .try_collect()
            .await?;

        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, embedding)| embedding).collect())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("chunk assembly: {0}")]
    Assembly(#[from] AssemblyError),
    #[error("embedding provider: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("contextual blending: {0}")]
    Blending(#[from] BlendError),
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
