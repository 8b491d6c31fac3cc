use serde::{Deserialize, Serialize};

/// A single speaker turn inside a debate transcript, as delivered by the
/// ingestion collaborator. The core never parses raw source data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: ContributionId,
    pub speaker: Speaker,
    pub text: String,
    pub kind: ContributionType,
}

impl Contribution {
    pub fn new(
        id: ContributionId,
        speaker: Speaker,
        text: String,
        kind: ContributionType,
    ) -> Self {
        Self {
            id,
            speaker,
            text,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContributionId(String);

impl ContributionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContributionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub name: String,
    pub party: String,
    pub role: String,
}

impl Speaker {
    pub fn new(
        name: impl Into<String>,
        party: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            party: party.into(),
            role: role.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionType {
    Speech,
    Question,
    Answer,
    Intervention,
}

impl ContributionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionType::Speech => "speech",
            ContributionType::Question => "question",
            ContributionType::Answer => "answer",
            ContributionType::Intervention => "intervention",
        }
    }
}
