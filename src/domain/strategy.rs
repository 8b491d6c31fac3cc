use std::fmt;

use serde::{Deserialize, Serialize};

/// The four chunking configurations compared by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChunkingStrategy {
    #[serde(rename = "semantic_1024")]
    Semantic1024,
    #[serde(rename = "semantic_256")]
    Semantic256,
    #[serde(rename = "late_chunking_1024")]
    LateChunking1024,
    #[serde(rename = "late_chunking_256")]
    LateChunking256,
}

impl ChunkingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkingStrategy::Semantic1024 => "semantic_1024",
            ChunkingStrategy::Semantic256 => "semantic_256",
            ChunkingStrategy::LateChunking1024 => "late_chunking_1024",
            ChunkingStrategy::LateChunking256 => "late_chunking_256",
        }
    }

    pub fn all() -> [ChunkingStrategy; 4] {
        [
            ChunkingStrategy::Semantic1024,
            ChunkingStrategy::Semantic256,
            ChunkingStrategy::LateChunking1024,
            ChunkingStrategy::LateChunking256,
        ]
    }

    /// Late-chunking variants blend a document-level embedding into each chunk.
    pub fn uses_contextual_blending(&self) -> bool {
        matches!(
            self,
            ChunkingStrategy::LateChunking1024 | ChunkingStrategy::LateChunking256
        )
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
