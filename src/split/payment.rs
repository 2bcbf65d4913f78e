//! Payment results.
//!
//! A payment result is the simulated transaction: an id, the amount sent to
//! the name, and the per-recipient breakdown in plan order.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{SplitEntry, SplitPlan};
use crate::types::{Address, Amount, Timestamp, AMOUNT_DECIMALS};

/// Random bytes behind a transaction id (64 hex characters)
const TX_ID_BYTES: usize = 32;

/// Generate a fresh transaction id (`0x` + 64 hex chars)
#[must_use]
pub fn generate_tx_id() -> String {
    let mut bytes = [0u8; TX_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

/// Settlement status of a payment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Every share was delivered
    Completed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
        }
    }
}

/// One recipient's share of a payment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipientPayment {
    /// Recipient name
    pub name: String,
    /// Destination address
    pub address: Address,
    /// Share in percent
    pub percent: f64,
    /// Share of the amount, fixed to four decimals
    pub amount: String,
}

impl RecipientPayment {
    /// Apply an amount to one split entry
    #[must_use]
    pub fn from_entry(entry: &SplitEntry, amount: Amount) -> Self {
        Self {
            name: entry.name.clone(),
            address: entry.address.clone(),
            percent: entry.percent,
            amount: amount.percentage(entry.percent).to_fixed(AMOUNT_DECIMALS),
        }
    }
}

/// Break an amount down across a plan, in plan order
#[must_use]
pub fn breakdown(plan: &SplitPlan, amount: Amount) -> Vec<RecipientPayment> {
    plan.entries
        .iter()
        .map(|entry| RecipientPayment::from_entry(entry, amount))
        .collect()
}

/// Outcome of a payment to a name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// Transaction id
    pub id: String,
    /// Name the payment was sent to
    pub source_name: String,
    /// Amount as supplied by the payer
    pub amount: String,
    /// When the payment was made
    pub timestamp: Timestamp,
    /// Settlement status
    pub status: PaymentStatus,
    /// Number of recipients the payment was split across
    pub recipient_count: usize,
    /// Per-recipient breakdown in plan order.
    ///
    /// Empty for seeded history entries that only record a count.
    pub payments: Vec<RecipientPayment>,
}

impl PaymentResult {
    /// Create a completed payment with a fresh id
    #[must_use]
    pub fn new(
        source_name: String,
        amount: String,
        timestamp: Timestamp,
        payments: Vec<RecipientPayment>,
    ) -> Self {
        Self {
            id: generate_tx_id(),
            source_name,
            amount,
            timestamp,
            status: PaymentStatus::Completed,
            recipient_count: payments.len(),
            payments,
        }
    }

    /// Create a summary-only entry (no breakdown), as used for seeded history
    #[must_use]
    pub fn summary(
        id: String,
        source_name: String,
        amount: String,
        timestamp: Timestamp,
        recipient_count: usize,
    ) -> Self {
        Self {
            id,
            source_name,
            amount,
            timestamp,
            status: PaymentStatus::Completed,
            recipient_count,
            payments: Vec::new(),
        }
    }

    /// Parsed amount, or `None` if the stored text is not a valid amount
    #[must_use]
    pub fn parsed_amount(&self) -> Option<Amount> {
        Amount::parse(&self.amount).ok()
    }

    /// Shortened id for display (first 20 chars)
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id.get(..20).unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> SplitPlan {
        SplitPlan {
            name: "a.eth".to_string(),
            main_address: Address::from("0xmain"),
            entries: vec![
                SplitEntry::new("a", "0xAAA", 60.0),
                SplitEntry::new("b", "0xBBB", 40.0),
            ],
            total_percent: 100.0,
        }
    }

    #[test]
    fn test_tx_id_shape() {
        let id = generate_tx_id();
        assert_eq!(id.len(), 66);
        assert!(id.starts_with("0x"));
        assert_ne!(id, generate_tx_id());
    }

    #[test]
    fn test_breakdown_in_plan_order() {
        let payments = breakdown(&plan(), Amount::parse("10").unwrap());

        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].name, "a");
        assert_eq!(payments[0].amount, "6.0000");
        assert_eq!(payments[1].name, "b");
        assert_eq!(payments[1].amount, "4.0000");
    }

    #[test]
    fn test_new_counts_recipients() {
        let payments = breakdown(&plan(), Amount::parse("1").unwrap());
        let result = PaymentResult::new("a.eth".into(), "1".into(), 0, payments);

        assert_eq!(result.recipient_count, 2);
        assert_eq!(result.status, PaymentStatus::Completed);
        assert_eq!(result.short_id().len(), 20);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&PaymentStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }

    #[test]
    fn test_summary_short_id_tolerates_short_ids() {
        let result = PaymentResult::summary("0x1a2b".into(), "a.eth".into(), "5.0".into(), 0, 4);
        assert_eq!(result.short_id(), "0x1a2b");
        assert!(result.payments.is_empty());
        assert_eq!(result.parsed_amount().unwrap().value(), 5.0);
    }
}
