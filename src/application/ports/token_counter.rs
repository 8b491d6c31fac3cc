/// Token accounting pinned per pipeline run.
///
/// A pipeline uses exactly one counter for splitting, budget checks and the
/// counts stamped onto chunks; mixing counting methods within one run is
/// disallowed.
pub trait TokenCounter: Send + Sync {
    /// Number of tokens in `text`. Deterministic for a fixed implementation.
    fn count(&self, text: &str) -> usize;

    /// The substring covering the token index range `start..end`, clamped to
    /// the text's actual token length.
    fn slice(&self, text: &str, start: usize, end: usize) -> String;
}
