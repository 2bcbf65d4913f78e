//! TOML seed configuration for a session.
//!
//! A seed file lists the names available at start-up, their records, and
//! optionally a few historical payments. It is read once; nothing is ever
//! written back to it implicitly.
//!
//! ```toml
//! strict = false
//!
//! [[names]]
//! name = "freelance.eth"
//! address = "0xdD2FD4581271e230360230F9337D5c0430Bf44C0"
//! records = [
//!     ["split.contractor", "0x9012345678901234567890123456789012345678"],
//!     ["split.contractor.percent", "100"],
//! ]
//!
//! [[history]]
//! id = "0x3c4d5e6f7a8b..."
//! name = "freelance.eth"
//! amount = "2.5"
//! age_hours = 72
//! recipients = 1
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::split::{PaymentResult, RecordSet, ResolveMode, SplitResolver};
use crate::store::SplitStore;
use crate::types::{now_millis, Address, Timestamp};

/// One hour in milliseconds
const HOUR_MS: i64 = 60 * 60 * 1000;

/// TOML-serializable session seed
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedConfigToml {
    /// Fail fast on incomplete recipients and invalid writes
    #[serde(default)]
    pub strict: bool,
    /// Configured names, in listing order
    #[serde(default)]
    pub names: Vec<NameConfigToml>,
    /// Historical payments, newest first
    #[serde(default)]
    pub history: Vec<HistoryEntryToml>,
}

/// TOML-serializable record set for one name
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NameConfigToml {
    /// The name
    pub name: String,
    /// Main address (synthetic if absent)
    #[serde(default)]
    pub address: Option<String>,
    /// Text records as `[key, value]` pairs, in order
    #[serde(default)]
    pub records: Vec<(String, String)>,
}

/// TOML-serializable history entry (summary only)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntryToml {
    /// Transaction id
    pub id: String,
    /// Name that was paid
    pub name: String,
    /// Amount as text
    pub amount: String,
    /// How long ago the payment happened (default: 24)
    #[serde(default = "default_age_hours")]
    pub age_hours: u32,
    /// Number of recipients
    pub recipients: usize,
}

fn default_age_hours() -> u32 {
    24
}

/// Seed file errors
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// File is not valid seed TOML
    #[error("config parse error: {0}")]
    Parse(String),
}

impl SeedConfigToml {
    /// Load from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, SeedError> {
        toml::from_str(content).map_err(|e| SeedError::Parse(e.to_string()))
    }

    /// Save to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SeedError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SeedError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolution mode the seed asks for
    #[must_use]
    pub fn mode(&self) -> ResolveMode {
        if self.strict {
            ResolveMode::Strict
        } else {
            ResolveMode::Lenient
        }
    }

    /// Build a store, timing history entries relative to now
    #[must_use]
    pub fn into_store(self) -> SplitStore {
        self.into_store_at(now_millis())
    }

    /// Build a store, timing history entries relative to `now`
    #[must_use]
    pub fn into_store_at(self, now: Timestamp) -> SplitStore {
        let mut store = SplitStore::new(SplitResolver::new(self.mode()));

        for entry in self.names {
            let address = entry.address.map_or_else(Address::synthetic, Address::from);
            store.insert_records(entry.name, RecordSet::from_pairs(address, entry.records));
        }

        for entry in self.history {
            let timestamp = now - i64::from(entry.age_hours) * HOUR_MS;
            store.seed_history(PaymentResult::summary(
                entry.id,
                entry.name,
                entry.amount,
                timestamp,
                entry.recipients,
            ));
        }

        store
    }
}

fn name_config(name: &str, address: &str, records: &[(&str, &str)]) -> NameConfigToml {
    NameConfigToml {
        name: name.to_string(),
        address: Some(address.to_string()),
        records: records
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    }
}

fn history_entry(
    id: &str,
    name: &str,
    amount: &str,
    age_hours: u32,
    recipients: usize,
) -> HistoryEntryToml {
    HistoryEntryToml {
        id: id.to_string(),
        name: name.to_string(),
        amount: amount.to_string(),
        age_hours,
        recipients,
    }
}

/// Built-in demo seed: three configured names and three past payments
#[must_use]
pub fn default_demo_toml() -> SeedConfigToml {
    SeedConfigToml {
        strict: false,
        names: vec![
            name_config(
                "payments.company.eth",
                "0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb",
                &[
                    ("split.wallet1", "0x1234567890123456789012345678901234567890"),
                    ("split.wallet1.percent", "40"),
                    ("split.wallet2", "0x2345678901234567890123456789012345678901"),
                    ("split.wallet2.percent", "35"),
                    ("split.wallet3", "0x3456789012345678901234567890123456789012"),
                    ("split.wallet3.percent", "20"),
                    ("split.treasury", "0x4567890123456789012345678901234567890123"),
                    ("split.treasury.percent", "5"),
                ],
            ),
            name_config(
                "team.dao.eth",
                "0x8626f6940E2eb28930eFb4CeF49B2d1F2C9C1199",
                &[
                    ("split.dev1", "0x5678901234567890123456789012345678901234"),
                    ("split.dev1.percent", "30"),
                    ("split.dev2", "0x6789012345678901234567890123456789012345"),
                    ("split.dev2.percent", "30"),
                    ("split.marketing", "0x7890123456789012345678901234567890123456"),
                    ("split.marketing.percent", "25"),
                    ("split.operations", "0x8901234567890123456789012345678901234567"),
                    ("split.operations.percent", "15"),
                ],
            ),
            name_config(
                "freelance.eth",
                "0xdD2FD4581271e230360230F9337D5c0430Bf44C0",
                &[
                    ("split.contractor", "0x9012345678901234567890123456789012345678"),
                    ("split.contractor.percent", "70"),
                    ("split.platform", "0x0123456789012345678901234567890123456789"),
                    ("split.platform.percent", "20"),
                    ("split.tax", "0x1234567890123456789012345678901234567891"),
                    ("split.tax.percent", "10"),
                ],
            ),
        ],
        history: vec![
            history_entry("0x1a2b3c4d5e6f...", "payments.company.eth", "5.0", 24, 4),
            history_entry("0x2b3c4d5e6f7a...", "team.dao.eth", "10.0", 48, 4),
            history_entry("0x3c4d5e6f7a8b...", "freelance.eth", "2.5", 72, 3),
        ],
    }
}
