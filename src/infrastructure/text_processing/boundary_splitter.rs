use std::sync::Arc;

use crate::application::ports::{SplitPiece, TextSplitter, TextSplitterError, TokenCounter};

/// Separator classes from coarse to fine: paragraph, line, sentence end,
/// clause, word. Raw token slicing is the fallback below all of them.
const SEPARATOR_CLASSES: &[&[&str]] = &[
    &["\n\n"],
    &["\n"],
    &[". ", "! ", "? "],
    &["; ", ", "],
    &[" "],
];

/// Recursive, priority-ordered splitter that keeps every piece inside a
/// token budget.
///
/// Text within budget is returned unsplit with no overlap inserted.
/// Otherwise the splitter cuts at the coarsest separator class whose
/// segments can be packed within budget, descending class by class; a
/// segment with no usable separators at any class is sliced by raw token
/// index, reinserting the trailing `overlap_tokens` of each window as the
/// prefix of the next.
pub struct RecursiveBoundarySplitter {
    max_tokens: usize,
    overlap_tokens: usize,
    overlap_within_budget: bool,
    counter: Arc<dyn TokenCounter>,
}

impl RecursiveBoundarySplitter {
    pub fn new(
        max_tokens: usize,
        overlap_tokens: usize,
        counter: Arc<dyn TokenCounter>,
    ) -> Result<Self, TextSplitterError> {
        if max_tokens == 0 {
            return Err(TextSplitterError::InvalidConfiguration(
                "max_tokens must be positive".to_string(),
            ));
        }
        if overlap_tokens >= max_tokens {
            return Err(TextSplitterError::InvalidConfiguration(format!(
                "overlap_tokens ({}) must be smaller than max_tokens ({})",
                overlap_tokens, max_tokens
            )));
        }
        Ok(Self {
            max_tokens,
            overlap_tokens,
            overlap_within_budget: true,
            counter,
        })
    }

    /// Let reinserted overlap ride on top of the next window's budget
    /// instead of consuming it. Windows after the first then carry up to
    /// `max_tokens + overlap_tokens` tokens, so the per-chunk budget
    /// invariant no longer holds; the canonical pipelines do not use this.
    pub fn with_overlap_outside_budget(mut self) -> Self {
        self.overlap_within_budget = false;
        self
    }

    fn split_at_class(
        &self,
        text: &str,
        class_idx: usize,
        out: &mut Vec<String>,
    ) -> Result<(), TextSplitterError> {
        let Some(separators) = SEPARATOR_CLASSES.get(class_idx) else {
            self.slice_raw_tokens(text, out);
            return Ok(());
        };

        let segments = segment(text, separators);
        if segments.len() <= 1 {
            return self.split_at_class(text, class_idx + 1, out);
        }

        // Greedy packing with an exact recount before every append; token
        // counts are not additive across concatenation.
        let mut current = String::new();
        for seg in segments {
            if self.counter.count(seg) > self.max_tokens {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                self.split_at_class(seg, class_idx + 1, out)?;
                continue;
            }
            if current.is_empty() {
                current = seg.to_string();
                continue;
            }
            let tentative = format!("{current}{seg}");
            if self.counter.count(&tentative) > self.max_tokens {
                out.push(std::mem::replace(&mut current, seg.to_string()));
            } else {
                current = tentative;
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        Ok(())
    }

    /// Finest level: cut by token index. After the first window, the
    /// trailing `overlap_tokens` of the previous window prefix the next one.
    fn slice_raw_tokens(&self, text: &str, out: &mut Vec<String>) {
        let total = self.counter.count(text);
        if total <= self.max_tokens {
            out.push(text.to_string());
            return;
        }

        let window = if self.overlap_within_budget {
            self.max_tokens
        } else {
            self.max_tokens + self.overlap_tokens
        };

        let first_end = self.max_tokens.min(total);
        out.push(self.counter.slice(text, 0, first_end));

        let mut consumed = first_end;
        while consumed < total {
            let begin = consumed - self.overlap_tokens;
            let end = (begin + window).min(total);
            out.push(self.counter.slice(text, begin, end));
            consumed = end;
        }
    }
}

impl TextSplitter for RecursiveBoundarySplitter {
    fn split(&self, text: &str) -> Result<Vec<SplitPiece>, TextSplitterError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        if self.counter.count(text) <= self.max_tokens {
            return Ok(vec![SplitPiece::new(text)]);
        }

        let mut raw = Vec::new();
        self.split_at_class(text, 0, &mut raw)?;

        Ok(raw
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(SplitPiece::new)
            .collect())
    }
}

/// Cut `text` after every occurrence of any separator, keeping the
/// separator attached to the preceding segment so concatenation restores
/// the original text.
fn segment<'a>(text: &'a str, separators: &[&str]) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut rest = text;
    loop {
        let cut = separators
            .iter()
            .filter_map(|sep| rest.find(sep).map(|i| i + sep.len()))
            .min();
        match cut {
            Some(at) if at < rest.len() => {
                segments.push(&rest[..at]);
                rest = &rest[at..];
            }
            _ => {
                if !rest.is_empty() {
                    segments.push(rest);
                }
                break;
            }
        }
    }
    segments
}
