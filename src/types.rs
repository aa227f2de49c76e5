//! Domain-specific newtypes for type safety.
//!
//! This module provides strongly-typed wrappers for common domain concepts
//! to prevent mixing up values at compile time. Uses `derive_more` to
//! eliminate arithmetic boilerplate while maintaining zero-cost abstractions.

use std::fmt;
use std::iter::Sum;
use std::ops::{AddAssign, Sub, SubAssign};

use derive_more::{Add as DeriveAdd, From, Into};
use serde::{Deserialize, Serialize};

// ============================================================================
// Macros for reducing boilerplate
// ============================================================================

/// Generates common methods for numeric newtypes.
macro_rules! impl_newtype_common {
    ($type:ty) => {
        impl $type {
            /// Create a new instance.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the inner value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }

            /// Check if the value is zero.
            #[must_use]
            pub const fn is_zero(self) -> bool {
                self.0 == 0
            }
        }
    };
}

/// Generates Sub, assignment and Sum trait implementations.
macro_rules! impl_arith_traits {
    ($type:ty) => {
        impl Sub for $type {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl SubAssign for $type {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl AddAssign for $type {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::default(), |acc, v| acc + v)
            }
        }
    };
}

// ============================================================================
// Cents
// ============================================================================

/// A money amount in cents.
///
/// The backend sends amounts as decimal numbers (`89.99`); they are rounded
/// to whole cents on ingestion so sums never accumulate float error.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    DeriveAdd,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "f64", into = "f64")]
pub struct Cents(pub i64);

impl_newtype_common!(Cents);
impl_arith_traits!(Cents);

impl Cents {
    /// Create from a whole-dollar amount.
    #[must_use]
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    /// Convert to a decimal amount.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Format with a currency symbol and thousands separators, e.g. `$1,234.50`.
    #[must_use]
    pub fn format_with(self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let dollars = (abs / 100).to_string();
        let cents = abs % 100;

        let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
        for (i, ch) in dollars.chars().enumerate() {
            if i > 0 && (dollars.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!("{sign}{symbol}{grouped}.{cents:02}")
    }
}

impl TryFrom<f64> for Cents {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(format!("amount must be finite, got {value}"));
        }
        #[allow(clippy::cast_possible_truncation)]
        let cents = (value * 100.0).round() as i64;
        Ok(Self(cents))
    }
}

impl From<Cents> for f64 {
    fn from(value: Cents) -> Self {
        value.as_f64()
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with("$"))
    }
}

// ============================================================================
// Points
// ============================================================================

/// Chore reward points.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    DeriveAdd,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Points(pub i64);

impl_newtype_common!(Points);
impl_arith_traits!(Points);

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pts", self.0)
    }
}

// ============================================================================
// DayCount
// ============================================================================

/// A signed number of calendar days between two dates.
///
/// Negative values are in the past.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, DeriveAdd, From, Into,
)]
pub struct DayCount(pub i64);

impl_newtype_common!(DayCount);
impl_arith_traits!(DayCount);

impl DayCount {
    /// Magnitude of the difference, regardless of direction.
    #[must_use]
    pub const fn magnitude(self) -> u64 {
        self.0.unsigned_abs()
    }

    /// Whether the count points into the past.
    #[must_use]
    pub const fn is_past(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.magnitude() {
            1 => write!(f, "1 day"),
            n => write!(f, "{n} days"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cents {
        use super::*;

        #[test]
        fn rounds_decimal_amounts() {
            assert_eq!(Cents::try_from(89.99).unwrap(), Cents::new(8999));
            assert_eq!(Cents::try_from(0.1 + 0.2).unwrap(), Cents::new(30));
            assert!(Cents::try_from(f64::NAN).is_err());
        }

        #[test]
        fn formatting() {
            assert_eq!(Cents::new(123_450).format_with("$"), "$1,234.50");
            assert_eq!(Cents::new(5).to_string(), "$0.05");
            assert_eq!(Cents::new(-1999).to_string(), "-$19.99");
            assert_eq!(Cents::from_dollars(1_000_000).to_string(), "$1,000,000.00");
        }

        #[test]
        fn sums() {
            let total: Cents = [Cents::new(100), Cents::new(250)].into_iter().sum();
            assert_eq!(total, Cents::new(350));
        }

        #[test]
        fn deserializes_from_json_number() {
            let amount: Cents = serde_json::from_str("142.5").unwrap();
            assert_eq!(amount, Cents::new(14_250));
        }
    }

    mod points {
        use super::*;

        #[test]
        fn arithmetic() {
            let mut p = Points::new(5);
            p += Points::new(3);
            assert_eq!(p, Points::new(8));
            assert_eq!(p - Points::new(2), Points::new(6));
            assert_eq!(p.to_string(), "8 pts");
        }
    }

    mod day_count {
        use super::*;

        #[test]
        fn display_and_direction() {
            assert_eq!(DayCount::new(-5).to_string(), "5 days");
            assert_eq!(DayCount::new(1).to_string(), "1 day");
            assert!(DayCount::new(-1).is_past());
            assert!(!DayCount::new(0).is_past());
            assert_eq!(DayCount::new(-5).magnitude(), 5);
        }
    }
}
