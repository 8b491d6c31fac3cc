use std::sync::Arc;

use kinabalu::application::ports::{TextSplitter, TextSplitterError, TokenCounter};
use kinabalu::infrastructure::text_processing::RecursiveBoundarySplitter;
use kinabalu::infrastructure::tokenization::HeuristicCounter;

const MAX_TOKENS: usize = 12;
const OVERLAP_TOKENS: usize = 2;

fn counter() -> Arc<dyn TokenCounter> {
    Arc::new(HeuristicCounter::new())
}

fn splitter(max_tokens: usize, overlap_tokens: usize) -> RecursiveBoundarySplitter {
    RecursiveBoundarySplitter::new(max_tokens, overlap_tokens, counter())
        .expect("valid splitter config")
}

#[test]
fn given_text_within_budget_when_split_then_returns_single_piece_without_overlap() {
    let text = "A short remark.";

    let pieces = splitter(MAX_TOKENS, OVERLAP_TOKENS).split(text).unwrap();

    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].text, text);
}

#[test]
fn given_empty_text_when_split_then_returns_no_pieces() {
    let pieces = splitter(MAX_TOKENS, OVERLAP_TOKENS).split("   ").unwrap();
    assert!(pieces.is_empty());
}

#[test]
fn given_text_exactly_at_budget_when_split_then_returns_single_piece() {
    // 48 chars is exactly 12 heuristic tokens.
    let text = "x".repeat(48);

    let pieces = splitter(MAX_TOKENS, OVERLAP_TOKENS).split(&text).unwrap();

    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].text, text);
}

#[test]
fn given_two_paragraphs_over_budget_when_split_then_cuts_at_paragraph_boundary() {
    let para_one = "a".repeat(40);
    let para_two = "b".repeat(40);
    let text = format!("{}\n\n{}", para_one, para_two);

    let pieces = splitter(MAX_TOKENS, OVERLAP_TOKENS).split(&text).unwrap();

    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0].text, para_one);
    assert_eq!(pieces[1].text, para_two);
}

#[test]
fn given_oversized_paragraph_when_split_then_descends_to_sentence_boundaries() {
    let text = "First sentence here now. Second sentence here now. \
                Third sentence here now. Fourth sentence here now.";

    let pieces = splitter(MAX_TOKENS, OVERLAP_TOKENS).split(text).unwrap();
    let counter = counter();

    assert!(pieces.len() > 1);
    for piece in &pieces {
        assert!(counter.count(&piece.text) <= MAX_TOKENS);
        assert!(piece.text.trim_end().ends_with('.'));
    }
}

#[test]
fn given_long_mixed_text_when_split_then_every_piece_respects_budget() {
    let words: Vec<String> = (0..300).map(|i| format!("word{i}")).collect();
    let text = words.join(" ");
    let splitter = splitter(MAX_TOKENS, OVERLAP_TOKENS);
    let counter = counter();

    let pieces = splitter.split(&text).unwrap();

    assert!(pieces.len() > 1);
    for piece in &pieces {
        assert!(
            counter.count(&piece.text) <= MAX_TOKENS,
            "piece over budget: '{}'",
            piece.text
        );
    }
}

#[test]
fn given_separator_free_run_when_split_then_slices_raw_tokens_with_overlap() {
    // 100 chars = 25 heuristic tokens, no separators at any class.
    let text = "x".repeat(100);
    let max = 10;
    let overlap = 2;

    let pieces = splitter(max, overlap).split(&text).unwrap();
    let counter = counter();

    // First window takes 10 tokens, each following window re-reads 2 and
    // advances 8: 10 + 8 + 7 tokens.
    assert_eq!(pieces.len(), 3);
    for piece in &pieces {
        assert!(counter.count(&piece.text) <= max);
    }
    assert_eq!(pieces[0].text.len(), 40);

    // Overlap reinsertion: each piece after the first starts with the
    // trailing overlap tokens (8 chars) of its predecessor.
    let tail_of_first = &pieces[0].text[pieces[0].text.len() - overlap * 4..];
    assert!(pieces[1].text.starts_with(tail_of_first));
}

#[test]
fn given_word_and_oversized_run_when_split_then_both_are_within_budget() {
    let text = format!("short intro {}", "y".repeat(120));

    let pieces = splitter(MAX_TOKENS, OVERLAP_TOKENS).split(&text).unwrap();
    let counter = counter();

    assert!(pieces.len() > 1);
    for piece in &pieces {
        assert!(counter.count(&piece.text) <= MAX_TOKENS);
    }
}

#[test]
fn given_overlap_not_smaller_than_budget_when_constructed_then_rejects_configuration() {
    let result = RecursiveBoundarySplitter::new(10, 10, counter());

    assert!(matches!(
        result,
        Err(TextSplitterError::InvalidConfiguration(_))
    ));
}

#[test]
fn given_zero_budget_when_constructed_then_rejects_configuration() {
    let result = RecursiveBoundarySplitter::new(0, 0, counter());

    assert!(matches!(
        result,
        Err(TextSplitterError::InvalidConfiguration(_))
    ));
}
