//! In-memory payment history, newest first.

use std::collections::VecDeque;

use super::PaymentResult;
use crate::types::Amount;

/// Payments made during this session
#[derive(Clone, Debug, Default)]
pub struct PaymentHistory {
    /// Newest at the front
    entries: VecDeque<PaymentResult>,
}

impl PaymentHistory {
    /// Create an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a payment as the newest entry
    pub fn record(&mut self, payment: PaymentResult) {
        self.entries.push_front(payment);
    }

    /// Append an entry as the oldest one (used when seeding)
    pub fn record_oldest(&mut self, payment: PaymentResult) {
        self.entries.push_back(payment);
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &PaymentResult> {
        self.entries.iter()
    }

    /// Most recent payment
    #[must_use]
    pub fn latest(&self) -> Option<&PaymentResult> {
        self.entries.front()
    }

    /// Number of payments
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no payment has been made
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all payment amounts; unparsable amounts count as zero
    #[must_use]
    pub fn total_volume(&self) -> Amount {
        self.entries
            .iter()
            .filter_map(PaymentResult::parsed_amount)
            .sum()
    }
}
