//! Opaque recipient addresses.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of random bytes behind a synthetic address (40 hex characters)
const SYNTHETIC_ADDRESS_BYTES: usize = 20;

/// A destination address.
///
/// Addresses are carried as-is: no checksum or format validation happens
/// here. The only constraint the crate relies on is that a usable address
/// is not blank.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address string
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Generate a random placeholder address (`0x` + 40 hex chars).
    ///
    /// Used for names created locally that have no resolvable owner.
    /// Not derived from any key.
    #[must_use]
    pub fn synthetic() -> Self {
        let mut bytes = [0u8; SYNTHETIC_ADDRESS_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// Borrow the address text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the address is empty or whitespace only
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}
