use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub embeddings: EmbeddingsSettings,
    pub chunking: ChunkingSettings,
    pub analysis: AnalysisSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsSettings {
    pub model: String,
    pub dimension: usize,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingSettings {
    /// Concurrent embedding calls in flight per document.
    pub embed_concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    /// Canonical codes of the parties forming the government for the
    /// sittings under analysis.
    pub government_parties: Vec<String>,
    pub opposition_parties: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Environment-variable construction, for hosts that do not ship a
    /// config file.
    pub fn from_env() -> Self {
        Self {
            embeddings: EmbeddingsSettings {
                model: std::env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "text-embedding-3-large".to_string()),
                dimension: std::env::var("EMBEDDING_DIMENSION")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3072),
                api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            },
            chunking: ChunkingSettings {
                embed_concurrency: std::env::var("EMBED_CONCURRENCY")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(8),
            },
            analysis: AnalysisSettings {
                government_parties: csv_env("GOVERNMENT_PARTIES", &["Lab"]),
                opposition_parties: csv_env(
                    "OPPOSITION_PARTIES",
                    &["Con", "LD", "SNP", "Green", "DUP", "RUK", "PC"],
                ),
            },
            logging: LoggingSettings {
                level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                enable_json: std::env::var("LOG_FORMAT")
                    .map(|v| v.to_lowercase() == "json")
                    .unwrap_or(false),
            },
        }
    }
}

fn csv_env(key: &str, default: &[&str]) -> Vec<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => default.iter().map(|s| s.to_string()).collect(),
    }
}
