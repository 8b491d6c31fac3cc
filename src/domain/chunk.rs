use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::contribution::{ContributionId, Speaker};
use super::document::{Citation, DocumentId};
use super::embedding::Embedding;
use super::strategy::ChunkingStrategy;

/// The minimal retrievable unit: one piece of one speaker's contribution,
/// carrying its embedding and full provenance.
///
/// Chunks are immutable once built, except for the single linking pass that
/// fills `previous_chunk_id` / `next_chunk_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub token_count: usize,
    pub embedding: Option<Embedding>,
    pub strategy: ChunkingStrategy,
    /// 0-based, contiguous within (document, strategy).
    pub sequence: u32,
    pub previous_chunk_id: Option<ChunkId>,
    pub next_chunk_id: Option<ChunkId>,
    pub document_id: DocumentId,
    pub document_title: String,
    pub document_date: Option<DateTime<Utc>>,
    pub speaker: Speaker,
    pub citation: Citation,
    pub contribution_ids: Vec<ContributionId>,
    /// Present only for late-chunking strategies; identical for every chunk
    /// of the same document.
    pub document_context_embedding: Option<Embedding>,
    /// Set when an over-budget piece was hard-cut to exactly the token
    /// budget, so downstream auditors can detect induced data loss.
    pub truncated: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkId(String);

impl ChunkId {
    /// Chunk ids are derived, not minted: `{strategy}-{document}-{sequence:04}`.
    pub fn derive(strategy: ChunkingStrategy, document_id: &DocumentId, sequence: u32) -> Self {
        Self(format!("{}-{}-{:04}", strategy, document_id, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
