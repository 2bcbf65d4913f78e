//! Split resolution and payment computation.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::payment::{breakdown, PaymentResult, RecipientPayment};
use super::records::{address_key, percent_key, recipient_of, PERCENT_SUFFIX};
use super::{ConfigurationError, RecordSet, SplitEntry, SplitPlan, ValidationError};
use crate::types::{now_millis, Amount};
use crate::{FULL_SHARE, PERCENT_TOLERANCE};

/// How half-specified configuration is treated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolveMode {
    /// Drop recipients missing an address or percent; accept any total on
    /// write and check it only on resolve
    #[default]
    Lenient,
    /// Fail on incomplete recipients and on writes that do not total 100
    Strict,
}

/// Resolves record sets into split plans and applies amounts to them.
///
/// Stateless apart from its mode; every call is a pure function of its
/// inputs (payment ids and timestamps aside).
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitResolver {
    mode: ResolveMode,
}

impl SplitResolver {
    /// Create a resolver with the given mode
    #[must_use]
    pub const fn new(mode: ResolveMode) -> Self {
        Self { mode }
    }

    /// Create a strict resolver
    #[must_use]
    pub const fn strict() -> Self {
        Self::new(ResolveMode::Strict)
    }

    /// Current mode
    #[must_use]
    pub const fn mode(&self) -> ResolveMode {
        self.mode
    }

    /// Resolve a name's records into a validated plan.
    ///
    /// Recipients are discovered from `split.<name>` keys in record order.
    /// Recipients lacking either half of their key pair are dropped before
    /// the total is checked (lenient), or rejected outright (strict).
    pub fn resolve(&self, name: &str, records: &RecordSet) -> Result<SplitPlan, ConfigurationError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for recipient in records.keys().filter_map(recipient_of) {
            if !seen.insert(recipient) {
                continue;
            }

            match self.entry_for(recipient, records)? {
                Some(entry) => entries.push(entry),
                None => warn!(
                    split_name = name,
                    recipient,
                    "dropping incomplete or invalid split recipient"
                ),
            }
        }

        let total_percent: f64 = entries.iter().map(|e| e.percent).sum();
        if !within_tolerance(total_percent) {
            return Err(ConfigurationError::InvalidTotal {
                total: total_percent,
            });
        }

        debug!(
            split_name = name,
            recipients = entries.len(),
            total_percent,
            "resolved split configuration"
        );

        Ok(SplitPlan {
            name: name.to_string(),
            main_address: records.main_address.clone(),
            entries,
            total_percent,
        })
    }

    /// Look up one recipient's key pair.
    ///
    /// `Ok(None)` means the recipient is incomplete or its share is unusable,
    /// and may be skipped.
    fn entry_for(
        &self,
        recipient: &str,
        records: &RecordSet,
    ) -> Result<Option<SplitEntry>, ConfigurationError> {
        let address = non_blank(records.get(&address_key(recipient)));
        let raw_percent = non_blank(records.get(&percent_key(recipient)));

        let (Some(address), Some(raw_percent)) = (address, raw_percent) else {
            return match self.mode {
                ResolveMode::Lenient => Ok(None),
                ResolveMode::Strict => Err(ConfigurationError::IncompleteRecipient(
                    recipient.to_string(),
                )),
            };
        };

        // A share outside 0..=100 is treated like an unreadable one
        let percent = raw_percent
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| (0.0..=FULL_SHARE).contains(p));

        match (percent, self.mode) {
            (Some(p), _) => Ok(Some(SplitEntry::new(recipient, address, p))),
            (None, ResolveMode::Lenient) => Ok(None),
            (None, ResolveMode::Strict) => Err(ConfigurationError::InvalidPercent {
                recipient: recipient.to_string(),
                value: raw_percent.to_string(),
            }),
        }
    }

    /// Break an amount down across a plan without recording anything
    pub fn preview(
        &self,
        plan: &SplitPlan,
        amount: &str,
    ) -> Result<Vec<RecipientPayment>, ValidationError> {
        let parsed = Amount::parse(amount)?;
        Ok(breakdown(plan, parsed))
    }

    /// Apply an amount to a plan, producing a completed payment.
    ///
    /// Each share is `amount * percent / 100` fixed to four decimals
    /// (half away from zero). The result is not recorded anywhere; that is
    /// the caller's job.
    pub fn compute_payment(
        &self,
        plan: &SplitPlan,
        amount: &str,
    ) -> Result<PaymentResult, ValidationError> {
        let parsed = Amount::parse(amount)?;
        let payments = breakdown(plan, parsed);

        Ok(PaymentResult::new(
            plan.name.clone(),
            amount.trim().to_string(),
            now_millis(),
            payments,
        ))
    }

    /// Check split entries before they are written as records.
    ///
    /// Shape is always checked. The total is only checked in strict mode.
    pub fn check_entries(&self, entries: &[SplitEntry]) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();

        for entry in entries {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(ValidationError::EmptyRecipientName);
            }
            if name.ends_with(PERCENT_SUFFIX) {
                return Err(ValidationError::ReservedRecipientName(entry.name.clone()));
            }
            if !seen.insert(name) {
                return Err(ValidationError::DuplicateRecipient(entry.name.clone()));
            }
            if entry.address.is_blank() {
                return Err(ValidationError::EmptyAddress(entry.name.clone()));
            }
            if !entry.percent.is_finite() || !(0.0..=FULL_SHARE).contains(&entry.percent) {
                return Err(ValidationError::InvalidPercent {
                    recipient: entry.name.clone(),
                    percent: entry.percent,
                });
            }
        }

        if self.mode == ResolveMode::Strict {
            let total: f64 = entries.iter().map(|e| e.percent).sum();
            if !within_tolerance(total) {
                return Err(ValidationError::InvalidTotal { total });
            }
        }

        Ok(())
    }
}

/// Whether a percentage total counts as 100
#[must_use]
pub fn within_tolerance(total: f64) -> bool {
    (total - FULL_SHARE).abs() <= PERCENT_TOLERANCE
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Address;

    fn records(pairs: &[(&str, &str)]) -> RecordSet {
        RecordSet::from_pairs(Address::from("0xmain"), pairs.iter().copied())
    }

    fn two_way() -> RecordSet {
        records(&[
            ("split.a", "0xAAA"),
            ("split.a.percent", "60"),
            ("split.b", "0xBBB"),
            ("split.b.percent", "40"),
        ])
    }

    #[test]
    fn test_resolve_two_way_split() {
        let plan = SplitResolver::default().resolve("a.eth", &two_way()).unwrap();

        assert_eq!(
            plan.entries,
            vec![
                SplitEntry::new("a", "0xAAA", 60.0),
                SplitEntry::new("b", "0xBBB", 40.0),
            ]
        );
        assert_eq!(plan.total_percent, 100.0);
        assert_eq!(plan.main_address, Address::from("0xmain"));
        assert_eq!(plan.name, "a.eth");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = SplitResolver::default();
        let set = two_way();
        assert_eq!(
            resolver.resolve("a.eth", &set).unwrap(),
            resolver.resolve("a.eth", &set).unwrap()
        );
    }

    #[test]
    fn test_resolve_total_95_fails() {
        let set = records(&[
            ("split.a", "0xAAA"),
            ("split.a.percent", "55"),
            ("split.b", "0xBBB"),
            ("split.b.percent", "40"),
        ]);
        let err = SplitResolver::default().resolve("a.eth", &set).unwrap_err();

        assert_eq!(err, ConfigurationError::InvalidTotal { total: 95.0 });
        assert!(err.to_string().contains("95"));
    }

    #[test]
    fn test_resolve_tolerance() {
        let set = records(&[
            ("split.a", "0xAAA"),
            ("split.a.percent", "33.33"),
            ("split.b", "0xBBB"),
            ("split.b.percent", "33.33"),
            ("split.c", "0xCCC"),
            ("split.c.percent", "33.34"),
        ]);
        assert!(SplitResolver::default().resolve("a.eth", &set).is_ok());

        let set = records(&[("split.a", "0xAAA"), ("split.a.percent", "99.98")]);
        assert!(SplitResolver::default().resolve("a.eth", &set).is_err());
    }

    #[test]
    fn test_discovery_order_follows_records() {
        // Percent keys first, addresses later in reverse order
        let set = records(&[
            ("split.b.percent", "40"),
            ("split.a.percent", "60"),
            ("split.b", "0xBBB"),
            ("split.a", "0xAAA"),
        ]);
        let plan = SplitResolver::default().resolve("a.eth", &set).unwrap();
        let names: Vec<_> = plan.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_unrelated_records_ignored() {
        let mut set = two_way();
        set.insert("avatar", "ipfs://x");
        set.insert("url", "https://example.com");

        let plan = SplitResolver::default().resolve("a.eth", &set).unwrap();
        assert_eq!(plan.entries.len(), 2);
    }

    #[test]
    fn test_lenient_drops_half_specified_then_fails_total() {
        // `c` has an address but no percent: dropped, leaving 100
        let mut set = two_way();
        set.insert("split.c", "0xCCC");
        let plan = SplitResolver::default().resolve("a.eth", &set).unwrap();
        assert_eq!(plan.entries.len(), 2);

        // `b` loses its percent: dropped, total falls to 60
        let set = records(&[
            ("split.a", "0xAAA"),
            ("split.a.percent", "60"),
            ("split.b", "0xBBB"),
        ]);
        let err = SplitResolver::default().resolve("a.eth", &set).unwrap_err();
        assert_eq!(err, ConfigurationError::InvalidTotal { total: 60.0 });
    }

    #[test]
    fn test_orphan_percent_never_discovered() {
        // No `split.c` key, so `c` is not a recipient at all
        let mut set = two_way();
        set.insert("split.c.percent", "10");
        let plan = SplitResolver::strict().resolve("a.eth", &set).unwrap();
        assert_eq!(plan.entries.len(), 2);
    }

    #[test]
    fn test_lenient_drops_unparsable_percent() {
        let mut set = two_way();
        set.insert("split.c", "0xCCC");
        set.insert("split.c.percent", "lots");
        assert!(SplitResolver::default().resolve("a.eth", &set).is_ok());
    }

    #[test]
    fn test_lenient_drops_out_of_range_percents() {
        let set = records(&[
            ("split.a", "0xA"),
            ("split.a.percent", "150"),
            ("split.b", "0xB"),
            ("split.b.percent", "-50"),
        ]);
        let resolver = SplitResolver::default();
        assert_eq!(
            resolver.resolve("a.eth", &set),
            Err(ConfigurationError::InvalidTotal { total: 0.0 })
        );

        let mut set = two_way();
        set.insert("split.c", "0xCCC");
        set.insert("split.c.percent", "150");
        let plan = resolver.resolve("a.eth", &set).unwrap();
        let names: Vec<_> = plan.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        let result = resolver.compute_payment(&plan, "10").unwrap();
        let amounts: Vec<_> = result.payments.iter().map(|p| p.amount.as_str()).collect();
        assert_eq!(amounts, vec!["6.0000", "4.0000"]);
    }

    #[test]
    fn test_strict_rejects_out_of_range_percent() {
        let mut set = two_way();
        set.insert("split.c", "0xCCC");
        set.insert("split.c.percent", "150");
        let err = SplitResolver::strict().resolve("a.eth", &set).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InvalidPercent {
                recipient: "c".into(),
                value: "150".into()
            }
        );
    }

    #[test]
    fn test_compute_payment_huge_amount() {
        let set = records(&[("split.all", "0xA"), ("split.all.percent", "100")]);
        let resolver = SplitResolver::default();
        let plan = resolver.resolve("a.eth", &set).unwrap();

        for amount in ["1e305", "1.7e308"] {
            let result = resolver.compute_payment(&plan, amount).unwrap();
            let share = &result.payments[0].amount;
            assert!(!share.contains("inf"), "{amount} paid {share}");
            let paid: f64 = share.parse().unwrap();
            let expected: f64 = amount.parse().unwrap();
            assert!((paid - expected).abs() <= expected * 1e-15);
        }
    }

    #[test]
    fn test_strict_rejects_incomplete() {
        let mut set = two_way();
        set.insert("split.c", "0xCCC");
        let err = SplitResolver::strict().resolve("a.eth", &set).unwrap_err();
        assert_eq!(err, ConfigurationError::IncompleteRecipient("c".into()));
    }

    #[test]
    fn test_strict_rejects_bad_percent() {
        let mut set = two_way();
        set.insert("split.c", "0xCCC");
        set.insert("split.c.percent", "-5");
        let err = SplitResolver::strict().resolve("a.eth", &set).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidPercent { .. }));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let mut set = two_way();
        set.insert("split.c", "");
        set.insert("split.c.percent", "0");
        assert!(SplitResolver::default().resolve("a.eth", &set).is_ok());
        assert!(SplitResolver::strict().resolve("a.eth", &set).is_err());
    }

    #[test]
    fn test_compute_payment_scenario() {
        let resolver = SplitResolver::default();
        let plan = resolver.resolve("a.eth", &two_way()).unwrap();
        let result = resolver.compute_payment(&plan, "10").unwrap();

        let amounts: Vec<_> = result.payments.iter().map(|p| p.amount.as_str()).collect();
        assert_eq!(amounts, vec!["6.0000", "4.0000"]);
        assert_eq!(result.amount, "10");
        assert_eq!(result.source_name, "a.eth");
        assert_eq!(result.recipient_count, 2);
    }

    #[test]
    fn test_compute_payment_ids_unique() {
        let resolver = SplitResolver::default();
        let plan = resolver.resolve("a.eth", &two_way()).unwrap();
        let first = resolver.compute_payment(&plan, "1").unwrap();
        let second = resolver.compute_payment(&plan, "1").unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_compute_payment_rejects_bad_amounts() {
        let resolver = SplitResolver::default();
        let plan = resolver.resolve("a.eth", &two_way()).unwrap();

        assert!(matches!(
            resolver.compute_payment(&plan, "ten"),
            Err(ValidationError::Amount(_))
        ));
        assert!(matches!(
            resolver.compute_payment(&plan, "-1"),
            Err(ValidationError::Amount(_))
        ));
        assert!(resolver.compute_payment(&plan, "0").is_ok());
    }

    #[test]
    fn test_preview_matches_payment() {
        let resolver = SplitResolver::default();
        let plan = resolver.resolve("a.eth", &two_way()).unwrap();
        let preview = resolver.preview(&plan, "2.5").unwrap();
        let result = resolver.compute_payment(&plan, "2.5").unwrap();
        assert_eq!(preview, result.payments);
    }

    #[test]
    fn test_check_entries_shape() {
        let resolver = SplitResolver::default();

        assert_eq!(
            resolver.check_entries(&[SplitEntry::new(" ", "0x1", 100.0)]),
            Err(ValidationError::EmptyRecipientName)
        );
        assert_eq!(
            resolver.check_entries(&[SplitEntry::new("x", "", 100.0)]),
            Err(ValidationError::EmptyAddress("x".into()))
        );
        assert_eq!(
            resolver.check_entries(&[SplitEntry::new("x.percent", "0x1", 100.0)]),
            Err(ValidationError::ReservedRecipientName("x.percent".into()))
        );
        assert!(matches!(
            resolver.check_entries(&[SplitEntry::new("x", "0x1", f64::NAN)]),
            Err(ValidationError::InvalidPercent { .. })
        ));
        assert_eq!(
            resolver.check_entries(&[
                SplitEntry::new("x", "0x1", 50.0),
                SplitEntry::new("x", "0x2", 50.0),
            ]),
            Err(ValidationError::DuplicateRecipient("x".into()))
        );
    }

    #[test]
    fn test_check_entries_total_only_in_strict() {
        let entries = [SplitEntry::new("x", "0x1", 40.0)];
        assert!(SplitResolver::default().check_entries(&entries).is_ok());
        assert_eq!(
            SplitResolver::strict().check_entries(&entries),
            Err(ValidationError::InvalidTotal { total: 40.0 })
        );
    }
}
