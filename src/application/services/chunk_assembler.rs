use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::{TextSplitter, TextSplitterError, TokenCounter};
use crate::domain::{Chunk, ChunkId, ChunkingStrategy, Document};

/// Turns per-contribution split pieces into sequenced, linked chunk records.
///
/// Contributions are processed in document order; sequence numbers are
/// contiguous from 0 within (document, strategy). After construction a
/// single linking pass fills the previous/next pointers, then the
/// single-speaker invariant is asserted over every chunk.
pub struct ChunkAssembler {
    strategy: ChunkingStrategy,
    max_tokens: usize,
    splitter: Arc<dyn TextSplitter>,
    counter: Arc<dyn TokenCounter>,
}

impl ChunkAssembler {
    pub fn new(
        strategy: ChunkingStrategy,
        max_tokens: usize,
        splitter: Arc<dyn TextSplitter>,
        counter: Arc<dyn TokenCounter>,
    ) -> Self {
        Self {
            strategy,
            max_tokens,
            splitter,
            counter,
        }
    }

    pub fn assemble(&self, document: &Document) -> Result<Vec<Chunk>, AssemblyError> {
        let mut chunks = Vec::new();

        for contribution in &document.contributions {
            let pieces = self.splitter.split(&contribution.text)?;

            for piece in pieces {
                if piece.text.trim().is_empty() {
                    continue;
                }

                let (text, token_count, truncated) = self.enforce_budget(piece.text);
                let sequence = chunks.len() as u32;

                chunks.push(Chunk {
                    id: ChunkId::derive(self.strategy, &document.id, sequence),
                    text,
                    token_count,
                    embedding: None,
                    strategy: self.strategy,
                    sequence,
                    previous_chunk_id: None,
                    next_chunk_id: None,
                    document_id: document.id.clone(),
                    document_title: document.title.clone(),
                    document_date: document.timestamp,
                    speaker: contribution.speaker.clone(),
                    citation: document.citation.clone(),
                    contribution_ids: vec![contribution.id.clone()],
                    document_context_embedding: None,
                    truncated,
                    created_at: Utc::now(),
                });
            }
        }

        link_chunks(&mut chunks);
        self.assert_speaker_boundaries(document, &chunks)?;

        Ok(chunks)
    }

    /// An over-budget piece is hard-cut to exactly `max_tokens` and flagged,
    /// the only error condition recovered without surfacing a failure.
    fn enforce_budget(&self, text: String) -> (String, usize, bool) {
        let token_count = self.counter.count(&text);
        if token_count <= self.max_tokens {
            return (text, token_count, false);
        }

        tracing::warn!(
            strategy = %self.strategy,
            token_count,
            max_tokens = self.max_tokens,
            "Over-budget piece hard-truncated"
        );
        let cut = self.counter.slice(&text, 0, self.max_tokens);
        (cut, self.max_tokens, true)
    }

    /// A chunk mixing text from two speakers signals a defect in the
    /// splitter or assembler, so a violation is fatal rather than a
    /// recoverable data condition.
    fn assert_speaker_boundaries(
        &self,
        document: &Document,
        chunks: &[Chunk],
    ) -> Result<(), AssemblyError> {
        let speaker_by_contribution: HashMap<_, _> = document
            .contributions
            .iter()
            .map(|c| (&c.id, &c.speaker.name))
            .collect();

        for chunk in chunks {
            let mut names = chunk
                .contribution_ids
                .iter()
                .filter_map(|id| speaker_by_contribution.get(id).copied());

            let Some(first) = names.next() else {
                return Err(AssemblyError::SpeakerBoundaryViolation {
                    chunk_id: chunk.id.clone(),
                });
            };

            if *first != chunk.speaker.name || names.any(|name| name != first) {
                return Err(AssemblyError::SpeakerBoundaryViolation {
                    chunk_id: chunk.id.clone(),
                });
            }
        }

        Ok(())
    }
}

fn link_chunks(chunks: &mut [Chunk]) {
    let ids: Vec<ChunkId> = chunks.iter().map(|c| c.id.clone()).collect();
    for (index, chunk) in chunks.iter_mut().enumerate() {
        chunk.previous_chunk_id = if index > 0 {
            Some(ids[index - 1].clone())
        } else {
            None
        };
        chunk.next_chunk_id = ids.get(index + 1).cloned();
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("text splitting: {0}")]
    Splitting(#[from] TextSplitterError),
    #[error("chunk {chunk_id} violates the single-speaker boundary")]
    SpeakerBoundaryViolation { chunk_id: ChunkId },
}
