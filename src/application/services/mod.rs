mod chunk_assembler;
mod chunking_pipeline;
mod contextual_blender;
mod divergence_analyzer;
mod ingestion_service;

pub use chunk_assembler::{AssemblyError, ChunkAssembler};
pub use chunking_pipeline::{ChunkingPipeline, PipelineConfig, PipelineError};
pub use contextual_blender::{BlendError, ContextualBlender, CHUNK_WEIGHT, DOCUMENT_WEIGHT};
pub use divergence_analyzer::{
    ChunkOverlapMetrics, DivergenceAnalyzer, DominantShare, FieldTally, FieldValidation,
    MetadataCompleteness, MetadataCompletenessMetrics, PartyBalance, PartyBalanceMetrics,
    PartyBias, SpeakerDiversity, SpeakerDiversityMetrics, TemporalConsistency,
    TemporalConsistencyMetrics, ValidationResults, ValidationSummary,
};
pub use ingestion_service::{
    BatchReport, DocumentChunkSets, FailedDocument, IngestionError, IngestionService,
};
