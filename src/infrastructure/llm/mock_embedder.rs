use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

/// Deterministic in-process embedder for tests and scaffolding.
///
/// Vectors are seeded from the text itself, so equal texts always embed
/// identically and different texts (almost always) differ. An optional
/// per-call delay derived from the same seed lets concurrency tests observe
/// out-of-order completion.
pub struct MockEmbedder {
    dimensions: usize,
    jitter: bool,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            jitter: false,
        }
    }

    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    fn vector_for(&self, text: &str) -> Embedding {
        // FNV-1a over the text bytes seeds a simple LCG per dimension.
        let mut seed: u64 = 0xcbf2_9ce4_8422_2325;
        for b in text.as_bytes() {
            seed ^= u64::from(*b);
            seed = seed.wrapping_mul(0x0000_0100_0000_01b3);
        }
        let mut state = seed;
        let values = (0..self.dimensions)
            .map(|_| {
                state = state
                    .wrapping_mul(6_364_136_223_846_793_005)
                    .wrapping_add(1_442_695_040_888_963_407);
                ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect();
        Embedding::new(values)
    }

    async fn maybe_sleep(&self, text: &str) {
        if self.jitter {
            let delay = (text.len() % 17) as u64;
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        self.maybe_sleep(text).await;
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}
