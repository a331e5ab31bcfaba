//! Prices in integer minor units.

use core::iter::Sum;
use core::ops::Add;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

const MINOR_PER_MAJOR: u64 = 100;

/// Binary floating point noise tolerated when scaling to cents (`0.29 * 100`
/// is `28.999999999999996`).
const CENT_EPSILON: f64 = 1e-6;

/// A non-negative price in the smallest currency unit (cents).
///
/// The hosted table stores decimal prices (`89.99`); they are converted once at
/// the provider boundary so that comparisons and bucket bounds are exact.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Whole currency units, e.g. `Price::from_major(25)` is $25.00.
    pub const fn from_major(major: u64) -> Self {
        Self(major * MINOR_PER_MAJOR)
    }

    /// Convert a decimal major-unit amount to cents.
    ///
    /// Fractions of a cent are truncated toward zero, so a half-open range
    /// with whole-cent bounds holds the same prices before and after
    /// conversion (`24.996` stays below `25.00`).
    pub fn from_decimal(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("price cannot be negative"));
        }
        let scaled = amount * MINOR_PER_MAJOR as f64;
        let nearest = scaled.round();
        let minor = if (scaled - nearest).abs() < CENT_EPSILON {
            nearest
        } else {
            scaled.floor()
        };
        if minor > u64::MAX as f64 {
            return Err(DomainError::validation("price is out of range"));
        }
        Ok(Self(minor as u64))
    }

    pub const fn minor(self) -> u64 {
        self.0
    }

    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(u64::from(quantity)).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "${}.{:02}",
            self.0 / MINOR_PER_MAJOR,
            self.0 % MINOR_PER_MAJOR
        )
    }
}

impl ValueObject for Price {}
