//! Split configuration and payment fan-out.
//!
//! ## Flow
//!
//! 1. **Records**: a name carries `split.*` text records ([`RecordSet`])
//! 2. **Resolution**: [`SplitResolver::resolve`] groups them into recipients
//!    and checks the percentages total 100
//! 3. **Payment**: [`SplitResolver::compute_payment`] applies an amount to
//!    the resulting [`SplitPlan`]
//! 4. **History**: the caller records the [`PaymentResult`] in a
//!    [`PaymentHistory`]
//!
//! Resolution happens on every request; plans are never cached, so an
//! updated record set takes effect on the next payment.

pub mod history;
pub mod payment;
pub mod records;
pub mod resolver;

use serde::{Deserialize, Serialize};

use crate::types::{Address, AmountError};

pub use history::PaymentHistory;
pub use payment::{PaymentResult, PaymentStatus, RecipientPayment};
pub use records::RecordSet;
pub use resolver::{ResolveMode, SplitResolver};

/// One resolved recipient
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitEntry {
    /// Recipient identifier (the key suffix after `split.`)
    pub name: String,
    /// Destination address
    pub address: Address,
    /// Share in percent
    pub percent: f64,
}

impl SplitEntry {
    /// Create a new entry
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<Address>, percent: f64) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            percent,
        }
    }
}

/// A validated split configuration for one name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitPlan {
    /// Name the plan was resolved for
    pub name: String,
    /// Primary address of the name
    pub main_address: Address,
    /// Recipients in discovery order
    pub entries: Vec<SplitEntry>,
    /// Sum of entry percentages (100 within tolerance)
    pub total_percent: f64,
}

/// Errors raised while resolving a name's split configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// No record set exists for the name
    #[error("name {0:?} is not configured")]
    UnknownName(String),

    /// Percentages do not add up
    #[error("split percentages must total 100 (got {total})")]
    InvalidTotal {
        /// Sum of the included percentages
        total: f64,
    },

    /// A recipient has only one half of its key pair (strict mode)
    #[error("recipient {0:?} is missing its address or percent record")]
    IncompleteRecipient(String),

    /// A percent record is not a usable number (strict mode)
    #[error("recipient {recipient:?} has invalid percent {value:?}")]
    InvalidPercent {
        /// Recipient name
        recipient: String,
        /// Raw record value
        value: String,
    },
}

/// Errors raised by malformed caller input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Payment amount rejected
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Recipient without a name
    #[error("every recipient needs a name")]
    EmptyRecipientName,

    /// Recipient without an address
    #[error("recipient {0:?} needs an address")]
    EmptyAddress(String),

    /// Recipient name that would collide with the percent key scheme
    #[error("recipient name {0:?} is reserved")]
    ReservedRecipientName(String),

    /// Recipient listed more than once
    #[error("recipient {0:?} is listed more than once")]
    DuplicateRecipient(String),

    /// Percent outside 0..=100 or not finite
    #[error("recipient {recipient:?} has invalid percent {percent}")]
    InvalidPercent {
        /// Recipient name
        recipient: String,
        /// Offending value
        percent: f64,
    },

    /// Percentages do not add up (strict mode writes)
    #[error("split percentages must total 100 (got {total})")]
    InvalidTotal {
        /// Sum of the supplied percentages
        total: f64,
    },
}

/// Either failure of an operation that resolves and then validates input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplitError {
    /// Configuration could not be resolved
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Caller input rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type for split operations
pub type SplitResult<T> = Result<T, SplitError>;
