use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::contribution::Contribution;

/// A complete transcribed debate in the canonical shape the core consumes.
///
/// The timestamp is optional: the ingestion collaborator may fail to parse a
/// sitting date, and the temporal audit reports the dated fraction rather
/// than rejecting the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub citation: Citation,
    pub contributions: Vec<Contribution>,
}

impl Document {
    pub fn new(
        id: DocumentId,
        title: String,
        timestamp: Option<DateTime<Utc>>,
        citation: Citation,
        contributions: Vec<Contribution>,
    ) -> Self {
        Self {
            id,
            title,
            timestamp,
            citation,
            contributions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Citation block for the official record, e.g.
/// "HC Deb 12 May 2023 vol 732 c45".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub reference: String,
    pub volume: String,
    pub column: String,
    pub url: String,
}

impl Citation {
    pub fn new(
        reference: impl Into<String>,
        volume: impl Into<String>,
        column: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            reference: reference.into(),
            volume: volume.into(),
            column: column.into(),
            url: url.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.reference.trim().is_empty()
    }
}
