mod chunk;
mod contribution;
mod document;
mod embedding;
mod party;
mod strategy;

pub use chunk::{Chunk, ChunkId};
pub use contribution::{Contribution, ContributionId, ContributionType, Speaker};
pub use document::{Citation, Document, DocumentId};
pub use embedding::Embedding;
pub use party::{PartyAlignment, PartyRegister, UNKNOWN_PARTY};
pub use strategy::ChunkingStrategy;
