//! Session store: the name directory plus payment history.
//!
//! One `SplitStore` is built per process (see [`crate::config`]) and handed
//! to whatever drives it. All mutation goes through `&mut self`, so
//! payments land in history in the order they were submitted.

use std::collections::HashMap;

use tracing::info;

use crate::split::{
    ConfigurationError, PaymentHistory, PaymentResult, RecipientPayment, RecordSet, SplitEntry,
    SplitPlan, SplitResolver, SplitResult, ValidationError,
};
use crate::types::{Address, Amount, VOLUME_DECIMALS};

/// Aggregate figures for the session
#[derive(Clone, Debug, PartialEq)]
pub struct StoreStats {
    /// Payments in history
    pub total_payments: usize,
    /// Sum of all payment amounts
    pub total_volume: Amount,
    /// Configured names
    pub configured_names: usize,
}

impl StoreStats {
    /// Volume rendered with two decimals
    #[must_use]
    pub fn volume_display(&self) -> String {
        self.total_volume.to_fixed(VOLUME_DECIMALS)
    }
}

/// Name directory and payment history for one session
#[derive(Debug, Default)]
pub struct SplitStore {
    /// Record sets by name
    configs: HashMap<String, RecordSet>,
    /// Names in the order they were added
    order: Vec<String>,
    /// Payments, newest first
    history: PaymentHistory,
    /// Resolution rules
    resolver: SplitResolver,
}

impl SplitStore {
    /// Create an empty store
    #[must_use]
    pub fn new(resolver: SplitResolver) -> Self {
        Self {
            resolver,
            ..Self::default()
        }
    }

    /// The resolver in use
    #[must_use]
    pub fn resolver(&self) -> &SplitResolver {
        &self.resolver
    }

    /// Add or replace a name's record set verbatim.
    ///
    /// No validation: records are checked when the name is resolved.
    pub fn insert_records(&mut self, name: impl Into<String>, records: RecordSet) {
        let name = name.into();
        if !self.configs.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.configs.insert(name, records);
    }

    /// Seed a history entry behind all existing ones
    pub fn seed_history(&mut self, payment: PaymentResult) {
        self.history.record_oldest(payment);
    }

    /// Configured names, in the order they were added
    #[must_use]
    pub fn list_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Whether a name is configured
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    /// Raw record set of a name
    pub fn records(&self, name: &str) -> Result<&RecordSet, ConfigurationError> {
        self.configs
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownName(name.to_string()))
    }

    /// Primary address of a name
    pub fn main_address(&self, name: &str) -> Result<&Address, ConfigurationError> {
        self.records(name).map(|r| &r.main_address)
    }

    /// A single text record of a name, `None` if the key is unset
    pub fn text_record(&self, name: &str, key: &str) -> Result<Option<&str>, ConfigurationError> {
        self.records(name).map(|r| r.get(key))
    }

    /// Resolve a name's split configuration
    pub fn resolve(&self, name: &str) -> Result<SplitPlan, ConfigurationError> {
        let records = self.records(name)?;
        self.resolver.resolve(name, records)
    }

    /// Show how an amount would be split, without paying
    pub fn preview(&self, name: &str, amount: &str) -> SplitResult<Vec<RecipientPayment>> {
        let plan = self.resolve(name)?;
        Ok(self.resolver.preview(&plan, amount)?)
    }

    /// Pay a name: resolve its current split, compute the shares and record
    /// the payment as the newest history entry
    pub fn compute_payment(&mut self, name: &str, amount: &str) -> SplitResult<PaymentResult> {
        let plan = self.resolve(name)?;
        let payment = self.resolver.compute_payment(&plan, amount)?;

        info!(
            tx = %payment.id,
            split_name = name,
            amount = %payment.amount,
            recipients = payment.recipient_count,
            "payment split"
        );

        self.history.record(payment.clone());
        Ok(payment)
    }

    /// Replace (or create) a name's split records from entries.
    ///
    /// A new name gets a synthetic main address. Entries are shape-checked;
    /// the percentage total is only enforced by a strict resolver.
    pub fn upsert(&mut self, name: &str, entries: &[SplitEntry]) -> Result<(), ValidationError> {
        let entries: Vec<SplitEntry> = entries
            .iter()
            .map(|e| SplitEntry::new(e.name.trim(), e.address.as_str().trim(), e.percent))
            .collect();
        self.resolver.check_entries(&entries)?;

        if let Some(existing) = self.configs.get_mut(name) {
            let fresh = RecordSet::from_entries(existing.main_address.clone(), &entries);
            existing.replace_records(fresh);
            info!(split_name = name, recipients = entries.len(), "split configuration updated");
        } else {
            let records = RecordSet::from_entries(Address::synthetic(), &entries);
            info!(
                split_name = name,
                address = %records.main_address,
                recipients = entries.len(),
                "split configuration created"
            );
            self.insert_records(name, records);
        }

        Ok(())
    }

    /// Payment history
    #[must_use]
    pub fn history(&self) -> &PaymentHistory {
        &self.history
    }

    /// Session totals
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total_payments: self.history.len(),
            total_volume: self.history.total_volume(),
            configured_names: self.configs.len(),
        }
    }
}
