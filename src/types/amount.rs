//! Decimal payment amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional digits of a rendered per-recipient share
pub const AMOUNT_DECIMALS: usize = 4;

/// Fractional digits of rendered aggregate volume
pub const VOLUME_DECIMALS: usize = 2;

/// A finite, non-negative payment amount.
///
/// Amounts enter the system as decimal text and leave it as fixed-point
/// text. Arithmetic in between is plain `f64`; rounding only happens when
/// rendering (see [`Amount::to_fixed`]).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(f64);

impl Amount {
    /// Zero amount
    pub const ZERO: Self = Self(0.0);

    /// Parse a decimal amount, ignoring surrounding whitespace.
    ///
    /// # Errors
    /// Returns error if the text is not a finite number or is negative
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;

        if !value.is_finite() {
            return Err(AmountError::NotANumber(trimmed.to_string()));
        }
        if value < 0.0 {
            return Err(AmountError::Negative(trimmed.to_string()));
        }

        // Normalise -0 so it never renders with a sign
        Ok(Self(value.abs()))
    }

    /// Raw value
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Share of this amount for a percentage (`amount * percent / 100`)
    #[must_use]
    pub fn percentage(self, percent: f64) -> Self {
        let share = self.0 * percent / crate::FULL_SHARE;
        if share.is_finite() {
            Self(share)
        } else {
            // Amounts near f64::MAX overflow before the division
            Self(self.0 * (percent / crate::FULL_SHARE))
        }
    }

    /// Render with a fixed number of fractional digits.
    ///
    /// Rounds half away from zero at the last kept digit, so `0.00005`
    /// becomes `0.0001` at four decimals. Values too large to scale have no
    /// fractional part left to round and are printed as they are.
    #[must_use]
    pub fn to_fixed(self, decimals: usize) -> String {
        let factor = 10f64.powi(decimals as i32);
        let scaled = self.0 * factor;
        if !scaled.is_finite() {
            return format!("{:.*}", decimals, self.0);
        }

        let rounded = scaled.round() / factor;
        // -0 (e.g. -0.00001 rounded) renders unsigned
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        format!("{:.*}", decimals, rounded)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fixed(AMOUNT_DECIMALS))
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

/// Amount parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// Not a finite decimal number
    #[error("invalid amount: {0:?} is not a number")]
    NotANumber(String),
    /// Below zero
    #[error("invalid amount: {0} is negative")]
    Negative(String),
}
