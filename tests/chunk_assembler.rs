use std::sync::Arc;

use chrono::{TimeZone, Utc};
use kinabalu::application::ports::{
    SplitPiece, TextSplitter, TextSplitterError, TokenCounter,
};
use kinabalu::application::services::ChunkAssembler;
use kinabalu::domain::{
    ChunkingStrategy, Citation, Contribution, ContributionId, ContributionType, Document,
    DocumentId, Speaker,
};
use kinabalu::infrastructure::text_processing::RecursiveBoundarySplitter;
use kinabalu::infrastructure::tokenization::HeuristicCounter;

const MAX_TOKENS: usize = 64;
const OVERLAP_TOKENS: usize = 8;

fn counter() -> Arc<dyn TokenCounter> {
    Arc::new(HeuristicCounter::new())
}

fn contribution(id: &str, speaker_name: &str, text: &str) -> Contribution {
    Contribution::new(
        ContributionId::new(id),
        Speaker::new(speaker_name, "Lab", "Backbencher"),
        text.to_string(),
        ContributionType::Speech,
    )
}

fn document(contributions: Vec<Contribution>) -> Document {
    Document::new(
        DocumentId::new("debate-42"),
        "Finance Bill Second Reading".to_string(),
        Some(Utc.with_ymd_and_hms(2024, 5, 12, 12, 0, 0).unwrap()),
        Citation::new("HC Deb 12 May 2024 vol 732 c45", "732", "45", "https://example.org/c45"),
        contributions,
    )
}

fn assembler(strategy: ChunkingStrategy) -> ChunkAssembler {
    let splitter =
        RecursiveBoundarySplitter::new(MAX_TOKENS, OVERLAP_TOKENS, counter()).unwrap();
    ChunkAssembler::new(strategy, MAX_TOKENS, Arc::new(splitter), counter())
}

fn long_text(words: usize) -> String {
    (0..words)
        .map(|i| format!("word{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn given_short_contributions_when_assembled_then_one_chunk_each_in_document_order() {
    let doc = document(vec![
        contribution("c1", "Alice Hartley", "A brief opening remark."),
        contribution("c2", "Ben Osei", "A brief reply."),
    ]);

    let chunks = assembler(ChunkingStrategy::Semantic1024)
        .assemble(&doc)
        .unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].speaker.name, "Alice Hartley");
    assert_eq!(chunks[1].speaker.name, "Ben Osei");
    assert!(!chunks[0].truncated);
}

#[test]
fn given_assembled_chunks_then_sequences_are_contiguous_from_zero() {
    let doc = document(vec![
        contribution("c1", "Alice Hartley", &long_text(400)),
        contribution("c2", "Ben Osei", &long_text(100)),
    ]);

    let chunks = assembler(ChunkingStrategy::Semantic256)
        .assemble(&doc)
        .unwrap();

    assert!(chunks.len() > 2);
    for (index, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.sequence, index as u32);
    }
}

#[test]
fn given_assembled_chunks_then_linking_pass_forms_a_complete_chain() {
    let doc = document(vec![contribution("c1", "Alice Hartley", &long_text(300))]);

    let chunks = assembler(ChunkingStrategy::Semantic256)
        .assemble(&doc)
        .unwrap();

    assert!(chunks.len() > 1);
    assert!(chunks.first().unwrap().previous_chunk_id.is_none());
    assert!(chunks.last().unwrap().next_chunk_id.is_none());

    // Forward traversal visits every chunk exactly once, in sequence order.
    let mut visited = 0;
    let mut cursor = Some(&chunks[0]);
    while let Some(chunk) = cursor {
        assert_eq!(chunk.sequence, visited);
        visited += 1;
        cursor = chunk
            .next_chunk_id
            .as_ref()
            .map(|next| chunks.iter().find(|c| &c.id == next).unwrap());
    }
    assert_eq!(visited as usize, chunks.len());

    for window in chunks.windows(2) {
        assert_eq!(window[1].previous_chunk_id.as_ref(), Some(&window[0].id));
    }
}

#[test]
fn given_assembled_chunks_then_ids_derive_from_strategy_document_and_sequence() {
    let doc = document(vec![contribution("c1", "Alice Hartley", "A short remark.")]);

    let chunks = assembler(ChunkingStrategy::LateChunking256)
        .assemble(&doc)
        .unwrap();

    assert_eq!(chunks[0].id.as_str(), "late_chunking_256-debate-42-0000");
}

#[test]
fn given_assembled_chunks_then_provenance_points_at_source_contribution() {
    let doc = document(vec![
        contribution("c1", "Alice Hartley", &long_text(200)),
        contribution("c2", "Ben Osei", "A brief reply."),
    ]);

    let chunks = assembler(ChunkingStrategy::Semantic256)
        .assemble(&doc)
        .unwrap();

    for chunk in &chunks {
        assert_eq!(chunk.contribution_ids.len(), 1);
        let expected_speaker = if chunk.contribution_ids[0].as_str() == "c1" {
            "Alice Hartley"
        } else {
            "Ben Osei"
        };
        assert_eq!(chunk.speaker.name, expected_speaker);
        assert_eq!(chunk.document_id.as_str(), "debate-42");
        assert_eq!(chunk.citation.reference, "HC Deb 12 May 2024 vol 732 c45");
    }
}

#[test]
fn given_empty_contribution_when_assembled_then_contributes_no_chunks() {
    let doc = document(vec![
        contribution("c1", "Alice Hartley", "   "),
        contribution("c2", "Ben Osei", "A brief reply."),
    ]);

    let chunks = assembler(ChunkingStrategy::Semantic1024)
        .assemble(&doc)
        .unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].speaker.name, "Ben Osei");
}

/// A splitter stub that ignores the budget, standing in for foreign
/// implementations behind the port.
struct OverbudgetSplitter;

impl TextSplitter for OverbudgetSplitter {
    fn split(&self, text: &str) -> Result<Vec<SplitPiece>, TextSplitterError> {
        Ok(vec![SplitPiece::new(text)])
    }
}

#[test]
fn given_over_budget_piece_when_assembled_then_hard_truncates_to_exact_budget() {
    let doc = document(vec![contribution("c1", "Alice Hartley", &long_text(200))]);
    let assembler = ChunkAssembler::new(
        ChunkingStrategy::Semantic256,
        MAX_TOKENS,
        Arc::new(OverbudgetSplitter),
        counter(),
    );

    let chunks = assembler.assemble(&doc).unwrap();

    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].truncated);
    assert_eq!(chunks[0].token_count, MAX_TOKENS);
    assert_eq!(counter().count(&chunks[0].text), MAX_TOKENS);
}

#[test]
fn given_contribution_exactly_at_budget_when_assembled_then_single_untruncated_chunk() {
    // 256 chars is exactly 64 heuristic tokens.
    let text = "z".repeat(MAX_TOKENS * 4);
    let doc = document(vec![contribution("c1", "Alice Hartley", &text)]);

    let chunks = assembler(ChunkingStrategy::Semantic1024)
        .assemble(&doc)
        .unwrap();

    assert_eq!(chunks.len(), 1);
    assert!(!chunks[0].truncated);
    assert_eq!(chunks[0].token_count, MAX_TOKENS);
}

#[test]
fn given_multi_speaker_document_when_assembled_then_every_chunk_has_one_speaker() {
    let doc = document(vec![
        contribution("c1", "Alice Hartley", &long_text(50)),
        contribution("c2", "Alice Hartley", &long_text(2000)),
        contribution("c3", "Ben Osei", &long_text(100)),
    ]);

    let chunks = assembler(ChunkingStrategy::Semantic256)
        .assemble(&doc)
        .unwrap();

    assert!(chunks.len() > 3);
    for chunk in &chunks {
        let names: std::collections::HashSet<_> = chunk
            .contribution_ids
            .iter()
            .map(|id| {
                doc.contributions
                    .iter()
                    .find(|c| &c.id == id)
                    .map(|c| c.speaker.name.clone())
                    .unwrap()
            })
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names.contains(&chunk.speaker.name));
    }
}
