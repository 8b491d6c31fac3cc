mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AnalysisSettings, ChunkingSettings, EmbeddingsSettings, LoggingSettings, Settings,
};
