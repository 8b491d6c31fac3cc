use std::sync::LazyLock;

use tiktoken_rs::CoreBPE;

use crate::application::ports::TokenCounter;

static TOKENIZER: LazyLock<CoreBPE> = LazyLock::new(|| {
    tiktoken_rs::cl100k_base().expect("Failed to initialize cl100k_base tokenizer")
});

/// Exact subword token accounting via the cl100k_base vocabulary.
pub struct TiktokenCounter;

impl TiktokenCounter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TiktokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        TOKENIZER.encode_with_special_tokens(text).len()
    }

    fn slice(&self, text: &str, start: usize, end: usize) -> String {
        let ids = TOKENIZER.encode_with_special_tokens(text);
        let start = start.min(ids.len());
        let mut end = end.min(ids.len());
        if start >= end {
            return String::new();
        }
        // Byte-level BPE can cut a UTF-8 character mid-token; back off until
        // the range decodes cleanly.
        while end > start {
            if let Ok(decoded) = TOKENIZER.decode(ids[start..end].to_vec()) {
                return decoded;
            }
            end -= 1;
        }
        String::new()
    }
}
