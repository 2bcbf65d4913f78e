//! # `ENSplit`
//!
//! Name-addressed payment splitting, simulated.
//!
//! A payment sent to a single name fans out to several recipient addresses.
//! The split is read from key/value text records attached to the name:
//!
//! ```text
//! split.<recipient>          -> address
//! split.<recipient>.percent  -> decimal percentage
//! ```
//!
//! ## Architecture
//!
//! - [`split::SplitResolver`] turns a [`split::RecordSet`] into a validated
//!   [`split::SplitPlan`] and applies amounts to it. Pure.
//! - [`store::SplitStore`] owns the name directory and the payment history
//!   for one session and is the surface callers talk to.
//! - [`config`] loads the initial directory from TOML.
//!
//! Nothing touches a real chain: addresses are opaque strings, transaction
//! ids are random, and all state lives for the lifetime of the process.

#![forbid(unsafe_code)]
#![deny(clippy::all, rust_2018_idioms)]
#![warn(clippy::pedantic, clippy::nursery, missing_docs)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Share arithmetic is done in f64 and rendered as fixed-point text
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value
)]

pub mod config;
pub mod split;
pub mod store;
pub mod types;

pub use config::{default_demo_toml, SeedConfigToml, SeedError};
pub use split::{
    ConfigurationError, PaymentHistory, PaymentResult, PaymentStatus, RecipientPayment,
    RecordSet, ResolveMode, SplitEntry, SplitError, SplitPlan, SplitResolver, ValidationError,
};
pub use store::{SplitStore, StoreStats};
pub use types::{now_millis, Address, Amount, Timestamp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Allowed deviation of a split's percentage total from 100
pub const PERCENT_TOLERANCE: f64 = 0.01;

/// Percentage total every valid split must reach
pub const FULL_SHARE: f64 = 100.0;
