use crate::domain::{Document, Embedding};

pub const CHUNK_WEIGHT: f32 = 0.7;
pub const DOCUMENT_WEIGHT: f32 = 0.3;

/// Blends a chunk's local embedding with the document-level embedding for
/// late-chunking strategies: `0.7 * chunk + 0.3 * document` per element.
///
/// The result is intentionally not renormalized to unit length; the blend
/// magnitude is preserved rather than projected back onto a sphere.
pub struct ContextualBlender {
    chunk_weight: f32,
    document_weight: f32,
}

impl ContextualBlender {
    pub fn new() -> Self {
        Self {
            chunk_weight: CHUNK_WEIGHT,
            document_weight: DOCUMENT_WEIGHT,
        }
    }

    pub fn with_weights(chunk_weight: f32, document_weight: f32) -> Result<Self, BlendError> {
        if !chunk_weight.is_finite() || !document_weight.is_finite() {
            return Err(BlendError::InvalidWeights(format!(
                "weights must be finite, got chunk={} document={}",
                chunk_weight, document_weight
            )));
        }
        Ok(Self {
            chunk_weight,
            document_weight,
        })
    }

    pub fn blend(
        &self,
        chunk_embedding: &Embedding,
        document_embedding: &Embedding,
    ) -> Result<Embedding, BlendError> {
        if chunk_embedding.dimensions() != document_embedding.dimensions() {
            return Err(BlendError::DimensionMismatch {
                chunk: chunk_embedding.dimensions(),
                document: document_embedding.dimensions(),
            });
        }

        let values = chunk_embedding
            .values
            .iter()
            .zip(document_embedding.values.iter())
            .map(|(c, d)| self.chunk_weight * c + self.document_weight * d)
            .collect();

        Ok(Embedding::new(values))
    }

    /// The text whose embedding becomes the document-level context: every
    /// contribution in order, rendered as `"{speaker} ({party}): {text}"`
    /// and joined by blank lines. The party parenthetical is omitted when
    /// the speaker has no recorded party.
    pub fn document_context_text(document: &Document) -> String {
        document
            .contributions
            .iter()
            .map(|contribution| {
                let name = if contribution.speaker.name.trim().is_empty() {
                    "Unknown Speaker"
                } else {
                    contribution.speaker.name.as_str()
                };
                let party = contribution.speaker.party.trim();
                if party.is_empty() {
                    format!("{}: {}", name, contribution.text)
                } else {
                    format!("{} ({}): {}", name, party, contribution.text)
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for ContextualBlender {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BlendError {
    #[error("embedding dimension mismatch: chunk ({chunk}) vs document ({document})")]
    DimensionMismatch { chunk: usize, document: usize },
    #[error("invalid blend weights: {0}")]
    InvalidWeights(String),
}
