//! Text-record sets attached to a name.
//!
//! A record set is an insertion-ordered key/value map plus the name's main
//! address. Split configuration is encoded with two keys per recipient:
//!
//! ```text
//! split.treasury          = 0x4567...
//! split.treasury.percent  = 5
//! ```

use super::SplitEntry;
use crate::types::Address;

/// Prefix shared by every split record key
pub const SPLIT_PREFIX: &str = "split.";

/// Suffix marking a recipient's percentage record
pub const PERCENT_SUFFIX: &str = ".percent";

/// Key holding a recipient's address
#[must_use]
pub fn address_key(recipient: &str) -> String {
    format!("{SPLIT_PREFIX}{recipient}")
}

/// Key holding a recipient's percentage
#[must_use]
pub fn percent_key(recipient: &str) -> String {
    format!("{SPLIT_PREFIX}{recipient}{PERCENT_SUFFIX}")
}

/// Recipient named by an address key, if `key` is one.
///
/// `split.dev1` names `dev1`; `split.dev1.percent` and `avatar` name nobody.
#[must_use]
pub fn recipient_of(key: &str) -> Option<&str> {
    if key.ends_with(PERCENT_SUFFIX) {
        return None;
    }
    key.strip_prefix(SPLIT_PREFIX)
}

/// Resolvable configuration for one name
#[derive(Clone, Debug, PartialEq)]
pub struct RecordSet {
    /// Primary address of the name
    pub main_address: Address,
    /// Records in insertion order
    records: Vec<(String, String)>,
}

impl RecordSet {
    /// Create an empty record set
    #[must_use]
    pub fn new(main_address: Address) -> Self {
        Self {
            main_address,
            records: Vec::new(),
        }
    }

    /// Create from key/value pairs, keeping their order
    #[must_use]
    pub fn from_pairs<K, V>(main_address: Address, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new(main_address);
        for (key, value) in pairs {
            set.insert(key, value);
        }
        set
    }

    /// Create from split entries, deriving the address/percent key pair of
    /// each recipient in order
    #[must_use]
    pub fn from_entries(main_address: Address, entries: &[SplitEntry]) -> Self {
        let mut set = Self::new(main_address);
        for entry in entries {
            set.insert(address_key(&entry.name), entry.address.as_str());
            set.insert(percent_key(&entry.name), entry.percent.to_string());
        }
        set
    }

    /// Set a record.
    ///
    /// An existing key keeps its position; its old value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        if let Some(slot) = self.records.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }

        self.records.push((key, value));
        None
    }

    /// Look up a record
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|(k, _)| k.as_str())
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace every record, keeping the main address
    pub fn replace_records(&mut self, other: Self) {
        self.records = other.records;
    }
}
