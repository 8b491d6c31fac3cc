use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Sentinel canonical code for parties the register does not recognise.
pub const UNKNOWN_PARTY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyAlignment {
    Government,
    Opposition,
    Other,
}

/// Alias-to-canonical-code lookup for party names, plus the
/// government/opposition split for the sitting being analysed.
///
/// Which parties form the government is an external, time-varying political
/// fact, so the register is injected configuration rather than a constant
/// baked into the analyzer. Lookups are case-insensitive; anything the
/// register has never heard of resolves to [`UNKNOWN_PARTY`].
#[derive(Debug, Clone)]
pub struct PartyRegister {
    aliases: HashMap<String, String>,
    government: HashSet<String>,
    opposition: HashSet<String>,
}

impl PartyRegister {
    pub fn new(
        aliases: impl IntoIterator<Item = (String, String)>,
        government: impl IntoIterator<Item = String>,
        opposition: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(alias, code)| (alias.to_lowercase(), code))
                .collect(),
            government: government.into_iter().collect(),
            opposition: opposition.into_iter().collect(),
        }
    }

    /// House of Commons register for the 2024 parliament.
    pub fn uk_commons_2024() -> Self {
        let aliases = [
            ("lab", "Lab"),
            ("labour", "Lab"),
            ("labour (co-op)", "Lab"),
            ("con", "Con"),
            ("conservative", "Con"),
            ("ld", "LD"),
            ("lib dem", "LD"),
            ("liberal democrat", "LD"),
            ("snp", "SNP"),
            ("scottish national party", "SNP"),
            ("green", "Green"),
            ("green party", "Green"),
            ("dup", "DUP"),
            ("democratic unionist party", "DUP"),
            ("ruk", "RUK"),
            ("reform", "RUK"),
            ("reform uk", "RUK"),
            ("pc", "PC"),
            ("plaid cymru", "PC"),
            ("ind", "Ind"),
            ("independent", "Ind"),
        ]
        .into_iter()
        .map(|(a, c)| (a.to_string(), c.to_string()));

        Self::new(
            aliases,
            ["Lab".to_string()],
            [
                "Con".to_string(),
                "LD".to_string(),
                "SNP".to_string(),
                "Green".to_string(),
                "DUP".to_string(),
                "RUK".to_string(),
                "PC".to_string(),
            ],
        )
    }

    /// Resolve a free-text party name to its canonical code.
    pub fn canonical(&self, raw: &str) -> String {
        let key = raw.trim().to_lowercase();
        if key.is_empty() {
            return UNKNOWN_PARTY.to_string();
        }
        match self.aliases.get(&key) {
            Some(code) => code.clone(),
            // Already-canonical codes pass through unchanged.
            None if self.government.contains(raw) || self.opposition.contains(raw) => {
                raw.to_string()
            }
            None => UNKNOWN_PARTY.to_string(),
        }
    }

    pub fn alignment(&self, canonical_code: &str) -> PartyAlignment {
        if self.government.contains(canonical_code) {
            PartyAlignment::Government
        } else if self.opposition.contains(canonical_code) {
            PartyAlignment::Opposition
        } else {
            PartyAlignment::Other
        }
    }
}
