use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::domain::{Chunk, ChunkingStrategy, PartyAlignment, PartyRegister};

/// Sequence-distance window for pairwise chunk comparison: only chunks
/// whose positions differ by at most this much are positionally comparable.
const LOCALITY_WINDOW: u32 = 2;

/// Representation thresholds for the systematic-bias flags, relative to the
/// mean representation across strategies.
const OVERREPRESENTATION_FACTOR: f64 = 1.2;
const UNDERREPRESENTATION_FACTOR: f64 = 0.8;

/// Divergence above which the summary flags the strategies as significantly
/// disagreeing.
const SIGNIFICANT_DIVERGENCE: f64 = 50.0;

/// Statistical audit of how much the chunking strategies disagree.
///
/// A pure function of its input: chunk sets for the same document from
/// multiple pipeline runs go in, a flat serializable result comes out. The
/// party register is injected configuration; the analyzer holds no other
/// state and nothing across calls.
pub struct DivergenceAnalyzer {
    register: PartyRegister,
}

impl DivergenceAnalyzer {
    pub fn new(register: PartyRegister) -> Self {
        Self { register }
    }

    pub fn analyze(
        &self,
        chunks_by_strategy: &HashMap<ChunkingStrategy, Vec<Chunk>>,
    ) -> ValidationResults {
        // BTreeMap iteration keeps every derived map deterministic.
        let ordered: BTreeMap<ChunkingStrategy, &[Chunk]> = chunks_by_strategy
            .iter()
            .map(|(strategy, chunks)| (*strategy, chunks.as_slice()))
            .collect();

        ValidationResults {
            chunk_overlap: self.analyze_overlap(&ordered),
            speaker_diversity: self.analyze_speaker_diversity(&ordered),
            temporal_consistency: self.analyze_temporal_consistency(&ordered),
            party_balance: self.analyze_party_balance(&ordered),
            metadata_completeness: self.analyze_metadata_completeness(&ordered),
            summary: self.summarize(&ordered),
        }
    }

    fn analyze_overlap(&self, ordered: &BTreeMap<ChunkingStrategy, &[Chunk]>) -> ChunkOverlapMetrics {
        let mut text_overlap_percentages = BTreeMap::new();
        let mut identical_chunks = BTreeMap::new();
        let mut average_word_overlap = BTreeMap::new();
        let mut average_embedding_similarity = BTreeMap::new();

        let strategies: Vec<_> = ordered.keys().copied().collect();
        for (i, &a) in strategies.iter().enumerate() {
            for &b in &strategies[i + 1..] {
                let key = pair_key(a, b);
                let comparison = compare_chunk_sets(ordered[&a], ordered[&b]);

                text_overlap_percentages.insert(key.clone(), comparison.overlap_percentage);
                identical_chunks.insert(key.clone(), comparison.identical_count);
                average_word_overlap.insert(key.clone(), comparison.average_word_overlap);
                average_embedding_similarity.insert(key, comparison.average_embedding_similarity);
            }
        }

        ChunkOverlapMetrics {
            text_overlap_percentages,
            identical_chunks,
            average_word_overlap,
            average_embedding_similarity,
        }
    }

    fn analyze_speaker_diversity(
        &self,
        ordered: &BTreeMap<ChunkingStrategy, &[Chunk]>,
    ) -> SpeakerDiversityMetrics {
        let mut by_strategy = BTreeMap::new();
        let mut speaker_favoritism: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();

        for (&strategy, &chunks) in ordered {
            let mut chunks_per_speaker: BTreeMap<String, usize> = BTreeMap::new();
            for chunk in chunks {
                let name = speaker_name(chunk);
                *chunks_per_speaker.entry(name.clone()).or_default() += 1;
            }

            for (name, count) in &chunks_per_speaker {
                speaker_favoritism
                    .entry(name.clone())
                    .or_default()
                    .insert(strategy.as_str().to_string(), *count);
            }

            let dominant_speaker = dominant_share(&chunks_per_speaker, chunks.len());
            by_strategy.insert(
                strategy.as_str().to_string(),
                SpeakerDiversity {
                    unique_speakers: chunks_per_speaker.len(),
                    chunks_per_speaker,
                    dominant_speaker,
                },
            );
        }

        SpeakerDiversityMetrics {
            by_strategy,
            speaker_favoritism,
        }
    }

    fn analyze_temporal_consistency(
        &self,
        ordered: &BTreeMap<ChunkingStrategy, &[Chunk]>,
    ) -> TemporalConsistencyMetrics {
        let mut by_strategy = BTreeMap::new();

        for (&strategy, &chunks) in ordered {
            let dated = chunks.iter().filter(|c| c.document_date.is_some()).count();
            let dated_chunk_fraction = if chunks.is_empty() {
                0.0
            } else {
                dated as f64 / chunks.len() as f64
            };

            let mut sorted: Vec<_> = chunks.iter().collect();
            sorted.sort_by_key(|c| c.sequence);

            let mut sequence_gap_count = 0usize;
            let mut total_gap = 0u64;
            for window in sorted.windows(2) {
                let gap = u64::from(window[1].sequence)
                    .saturating_sub(u64::from(window[0].sequence))
                    .saturating_sub(1);
                if gap > 0 {
                    sequence_gap_count += 1;
                    total_gap += gap;
                }
            }

            let average_sequence_gap = if sequence_gap_count > 0 {
                total_gap as f64 / sequence_gap_count as f64
            } else {
                0.0
            };

            by_strategy.insert(
                strategy.as_str().to_string(),
                TemporalConsistency {
                    dated_chunk_fraction,
                    sequence_gap_count,
                    average_sequence_gap,
                },
            );
        }

        TemporalConsistencyMetrics { by_strategy }
    }

    fn analyze_party_balance(
        &self,
        ordered: &BTreeMap<ChunkingStrategy, &[Chunk]>,
    ) -> PartyBalanceMetrics {
        let mut by_strategy = BTreeMap::new();

        for (&strategy, &chunks) in ordered {
            let mut party_distribution: BTreeMap<String, usize> = BTreeMap::new();
            let mut government = 0usize;
            let mut opposition = 0usize;

            for chunk in chunks {
                let code = self.register.canonical(&chunk.speaker.party);
                match self.register.alignment(&code) {
                    PartyAlignment::Government => government += 1,
                    PartyAlignment::Opposition => opposition += 1,
                    PartyAlignment::Other => {}
                }
                *party_distribution.entry(code).or_default() += 1;
            }

            let government_opposition_ratio = if opposition > 0 {
                government as f64 / opposition as f64
            } else {
                government as f64
            };

            let dominant_party = dominant_share(&party_distribution, chunks.len());
            by_strategy.insert(
                strategy.as_str().to_string(),
                PartyBalance {
                    party_distribution,
                    government_opposition_ratio,
                    dominant_party,
                },
            );
        }

        let systematic_bias = self.detect_systematic_bias(ordered, &by_strategy);

        PartyBalanceMetrics {
            by_strategy,
            systematic_bias,
        }
    }

    /// A party is over/underrepresented in a strategy when its share there
    /// deviates from its mean share across all strategies by more than the
    /// configured factors.
    fn detect_systematic_bias(
        &self,
        ordered: &BTreeMap<ChunkingStrategy, &[Chunk]>,
        by_strategy: &BTreeMap<String, PartyBalance>,
    ) -> BTreeMap<String, PartyBias> {
        let all_parties: BTreeSet<String> = by_strategy
            .values()
            .flat_map(|balance| balance.party_distribution.keys().cloned())
            .collect();

        let totals: BTreeMap<String, usize> = ordered
            .iter()
            .map(|(strategy, chunks)| (strategy.as_str().to_string(), chunks.len()))
            .collect();

        let mut bias = BTreeMap::new();
        for party in all_parties {
            let representations: Vec<(String, f64)> = by_strategy
                .iter()
                .map(|(strategy, balance)| {
                    let count = balance.party_distribution.get(&party).copied().unwrap_or(0);
                    let total = totals.get(strategy).copied().unwrap_or(0);
                    let share = if total > 0 {
                        count as f64 / total as f64 * 100.0
                    } else {
                        0.0
                    };
                    (strategy.clone(), share)
                })
                .collect();

            let mean = representations.iter().map(|(_, share)| share).sum::<f64>()
                / representations.len() as f64;

            let mut overrepresented_in = Vec::new();
            let mut underrepresented_in = Vec::new();
            for (strategy, share) in representations {
                if share > mean * OVERREPRESENTATION_FACTOR {
                    overrepresented_in.push(strategy);
                } else if share < mean * UNDERREPRESENTATION_FACTOR {
                    underrepresented_in.push(strategy);
                }
            }

            bias.insert(
                party,
                PartyBias {
                    overrepresented_in,
                    underrepresented_in,
                },
            );
        }

        bias
    }

    fn analyze_metadata_completeness(
        &self,
        ordered: &BTreeMap<ChunkingStrategy, &[Chunk]>,
    ) -> MetadataCompletenessMetrics {
        let mut by_strategy = BTreeMap::new();
        let mut field_validation = FieldValidation::default();

        for (&strategy, &chunks) in ordered {
            let mut chunks_with_missing_metadata = 0usize;
            let mut invalid_citations = 0usize;

            for chunk in chunks {
                let mut missing = 0usize;

                if chunk.speaker.name.trim().is_empty() {
                    missing += 1;
                    field_validation.speaker.invalid += 1;
                } else {
                    field_validation.speaker.valid += 1;
                }

                if chunk.citation.is_complete() {
                    field_validation.citation.valid += 1;
                } else {
                    missing += 1;
                    invalid_citations += 1;
                    field_validation.citation.invalid += 1;
                }

                let linked = !chunk.document_id.as_str().is_empty()
                    && !chunk.document_title.trim().is_empty()
                    && chunk.document_date.is_some();
                if linked {
                    field_validation.document_linkage.valid += 1;
                } else {
                    missing += 1;
                    field_validation.document_linkage.invalid += 1;
                }

                let embedded = chunk.embedding.as_ref().is_some_and(|e| !e.is_empty());
                if embedded {
                    field_validation.embedding.valid += 1;
                } else {
                    missing += 1;
                    field_validation.embedding.invalid += 1;
                }

                if missing > 0 {
                    chunks_with_missing_metadata += 1;
                }
            }

            let completeness_fraction = if chunks.is_empty() {
                0.0
            } else {
                (chunks.len() - chunks_with_missing_metadata) as f64 / chunks.len() as f64
            };

            by_strategy.insert(
                strategy.as_str().to_string(),
                MetadataCompleteness {
                    total_chunks: chunks.len(),
                    chunks_with_missing_metadata,
                    completeness_fraction,
                    invalid_citations,
                },
            );
        }

        MetadataCompletenessMetrics {
            by_strategy,
            field_validation,
        }
    }

    fn summarize(&self, ordered: &BTreeMap<ChunkingStrategy, &[Chunk]>) -> ValidationSummary {
        let counts: Vec<usize> = ordered.values().map(|chunks| chunks.len()).collect();
        let total_chunks_analyzed = counts.iter().sum();
        let strategies_compared: Vec<String> = ordered
            .keys()
            .map(|strategy| strategy.as_str().to_string())
            .collect();

        let overall_divergence = divergence_score(&counts);

        let mut significant_differences = Vec::new();
        let mut recommendations = Vec::new();
        if overall_divergence > SIGNIFICANT_DIVERGENCE {
            significant_differences
                .push("High variance in chunk counts between strategies".to_string());
            recommendations.push(
                "Review chunking parameters to understand why strategies diverge significantly"
                    .to_string(),
            );
        }

        ValidationSummary {
            total_chunks_analyzed,
            strategies_compared,
            overall_divergence,
            significant_differences,
            recommendations,
        }
    }
}

struct PairComparison {
    overlap_percentage: f64,
    identical_count: usize,
    average_word_overlap: f64,
    average_embedding_similarity: f64,
}

fn compare_chunk_sets(a: &[Chunk], b: &[Chunk]) -> PairComparison {
    let texts_a: HashSet<String> = a.iter().map(|c| normalize_text(&c.text)).collect();
    let texts_b: HashSet<String> = b.iter().map(|c| normalize_text(&c.text)).collect();

    let identical_count = texts_a.intersection(&texts_b).count();
    let total_unique = texts_a.union(&texts_b).count();
    let overlap_percentage = if total_unique > 0 {
        identical_count as f64 / total_unique as f64 * 100.0
    } else {
        0.0
    };

    // Explicit sliding locality window over sequence numbers rather than a
    // filtered full cross product.
    let mut sorted_a: Vec<&Chunk> = a.iter().collect();
    let mut sorted_b: Vec<&Chunk> = b.iter().collect();
    sorted_a.sort_by_key(|c| c.sequence);
    sorted_b.sort_by_key(|c| c.sequence);

    let mut word_overlap_total = 0.0;
    let mut cosine_total = 0.0;
    let mut compared = 0usize;
    let mut cosine_compared = 0usize;
    let mut window_start = 0usize;

    for chunk_a in &sorted_a {
        while window_start < sorted_b.len()
            && sorted_b[window_start].sequence + LOCALITY_WINDOW < chunk_a.sequence
        {
            window_start += 1;
        }

        let mut j = window_start;
        while j < sorted_b.len() && sorted_b[j].sequence <= chunk_a.sequence + LOCALITY_WINDOW {
            let chunk_b = sorted_b[j];
            word_overlap_total += word_overlap_similarity(&chunk_a.text, &chunk_b.text);
            compared += 1;

            if let (Some(ea), Some(eb)) = (&chunk_a.embedding, &chunk_b.embedding) {
                cosine_total += f64::from(ea.cosine_similarity(eb));
                cosine_compared += 1;
            }
            j += 1;
        }
    }

    PairComparison {
        overlap_percentage,
        identical_count,
        average_word_overlap: if compared > 0 {
            word_overlap_total / compared as f64
        } else {
            0.0
        },
        average_embedding_similarity: if cosine_compared > 0 {
            cosine_total / cosine_compared as f64
        } else {
            0.0
        },
    }
}

/// Jaccard similarity over lowercase word sets.
fn word_overlap_similarity(a: &str, b: &str) -> f64 {
    let words_a: HashSet<String> = a.split_whitespace().map(str::to_lowercase).collect();
    let words_b: HashSet<String> = b.split_whitespace().map(str::to_lowercase).collect();

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }
    words_a.intersection(&words_b).count() as f64 / union as f64
}

fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

fn speaker_name(chunk: &Chunk) -> String {
    if chunk.speaker.name.trim().is_empty() {
        "Unknown".to_string()
    } else {
        chunk.speaker.name.clone()
    }
}

fn dominant_share(counts: &BTreeMap<String, usize>, total: usize) -> DominantShare {
    let dominant = counts.iter().max_by_key(|(_, count)| **count);
    match dominant {
        Some((name, count)) if total > 0 => DominantShare {
            name: name.clone(),
            percentage: *count as f64 / total as f64 * 100.0,
        },
        _ => DominantShare {
            name: "None".to_string(),
            percentage: 0.0,
        },
    }
}

/// Coefficient-of-variation style instability measure over per-strategy
/// chunk counts, capped at 100.
fn divergence_score(counts: &[usize]) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = counts
        .iter()
        .map(|&count| {
            let diff = count as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / counts.len() as f64;

    (variance / mean * 100.0).min(100.0)
}

fn pair_key(a: ChunkingStrategy, b: ChunkingStrategy) -> String {
    format!("{}_vs_{}", a, b)
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResults {
    pub chunk_overlap: ChunkOverlapMetrics,
    pub speaker_diversity: SpeakerDiversityMetrics,
    pub temporal_consistency: TemporalConsistencyMetrics,
    pub party_balance: PartyBalanceMetrics,
    pub metadata_completeness: MetadataCompletenessMetrics,
    pub summary: ValidationSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkOverlapMetrics {
    /// Keyed by unordered strategy pair, `"{a}_vs_{b}"`.
    pub text_overlap_percentages: BTreeMap<String, f64>,
    pub identical_chunks: BTreeMap<String, usize>,
    pub average_word_overlap: BTreeMap<String, f64>,
    pub average_embedding_similarity: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeakerDiversityMetrics {
    pub by_strategy: BTreeMap<String, SpeakerDiversity>,
    /// speaker -> strategy -> chunk count, across all strategies.
    pub speaker_favoritism: BTreeMap<String, BTreeMap<String, usize>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeakerDiversity {
    pub unique_speakers: usize,
    pub chunks_per_speaker: BTreeMap<String, usize>,
    pub dominant_speaker: DominantShare,
}

#[derive(Debug, Clone, Serialize)]
pub struct DominantShare {
    pub name: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemporalConsistencyMetrics {
    pub by_strategy: BTreeMap<String, TemporalConsistency>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemporalConsistency {
    pub dated_chunk_fraction: f64,
    pub sequence_gap_count: usize,
    pub average_sequence_gap: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartyBalanceMetrics {
    pub by_strategy: BTreeMap<String, PartyBalance>,
    pub systematic_bias: BTreeMap<String, PartyBias>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartyBalance {
    pub party_distribution: BTreeMap<String, usize>,
    pub government_opposition_ratio: f64,
    pub dominant_party: DominantShare,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartyBias {
    pub overrepresented_in: Vec<String>,
    pub underrepresented_in: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataCompletenessMetrics {
    pub by_strategy: BTreeMap<String, MetadataCompleteness>,
    pub field_validation: FieldValidation,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataCompleteness {
    pub total_chunks: usize,
    pub chunks_with_missing_metadata: usize,
    pub completeness_fraction: f64,
    pub invalid_citations: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FieldValidation {
    pub speaker: FieldTally,
    pub citation: FieldTally,
    pub document_linkage: FieldTally,
    pub embedding: FieldTally,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FieldTally {
    pub valid: usize,
    pub invalid: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub total_chunks_analyzed: usize,
    pub strategies_compared: Vec<String>,
    pub overall_divergence: f64,
    pub significant_differences: Vec<String>,
    pub recommendations: Vec<String>,
}
