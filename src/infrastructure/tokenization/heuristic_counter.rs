use crate::application::ports::TokenCounter;

const CHARS_PER_TOKEN: usize = 4;

/// Character-based approximation: one token per four characters of English
/// text, rounded up. Cheap, deterministic, and documented as approximate;
/// useful where exact subword counts are not worth a tokenizer pass.
pub struct HeuristicCounter;

impl HeuristicCounter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeuristicCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCounter for HeuristicCounter {
    fn count(&self, text: &str) -> usize {
        text.chars().count().div_ceil(CHARS_PER_TOKEN)
    }

    fn slice(&self, text: &str, start: usize, end: usize) -> String {
        if start >= end {
            return String::new();
        }
        text.chars()
            .skip(start * CHARS_PER_TOKEN)
            .take((end - start) * CHARS_PER_TOKEN)
            .collect()
    }
}
