//! Core value types shared across the crate.

mod address;
mod amount;

pub use address::Address;
pub use amount::{Amount, AmountError, AMOUNT_DECIMALS, VOLUME_DECIMALS};

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

/// Current wall-clock time in milliseconds
#[must_use]
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Render a timestamp as a calendar date (UTC), or `"unknown"` if out of range
#[must_use]
pub fn format_date(ts: Timestamp) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ts)
        .map_or_else(|| "unknown".to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}
