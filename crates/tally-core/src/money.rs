//! # Money Module
//!
//! Provides the `Money` type for handling prices and price deltas safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The inventory server reports prices as JSON numbers:                   │
//! │    { "price": 12.1 }   → 12.1 - 10.0 = 2.0999999999999996  ❌          │
//! │                                                                         │
//! │  A delta like that never compares equal to zero after a round trip,    │
//! │  so the reconciler would see phantom price changes forever.             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Convert once at the wire boundary, do integer math everywhere else. │
//! │    1210 - 1000 = 210 cents, exactly                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let line_total = price.multiply_quantity(2);
//! assert_eq!(line_total.cents(), 2198);
//! assert_eq!(line_total.to_string(), "$21.98");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: price deltas are negative when the server lowers a price
/// - **Single field tuple struct**: serializes as a bare integer
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ProductSnapshot.price ──► StockEntry.price ──► line total (× cart qty) │
/// │          │                                                              │
/// │          └──► ItemDelta.price_delta ──► checkout change report          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(10).cents(), 1000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Converts a JSON number expressed in major units into cents.
    ///
    /// ## Wire Boundary
    /// This is the ONLY place a floating value is allowed to become Money.
    /// Integers are scaled exactly; fractional values are rounded to the
    /// nearest cent.
    ///
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let n: serde_json::Number = serde_json::from_str("12.1").unwrap();
    /// assert_eq!(Money::from_major_units(&n).unwrap().cents(), 1210);
    /// ```
    pub fn from_major_units(number: &serde_json::Number) -> Result<Self, ValidationError> {
        if let Some(whole) = number.as_i64() {
            return whole
                .checked_mul(100)
                .map(Money)
                .ok_or_else(|| out_of_range(number));
        }

        match number.as_f64() {
            Some(value) if value.is_finite() => {
                let cents = (value * 100.0).round();
                if cents.abs() >= i64::MAX as f64 {
                    return Err(out_of_range(number));
                }
                Ok(Money(cents as i64))
            }
            _ => Err(out_of_range(number)),
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit (dollar) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: Box1 × 2 at $10.00
    ///      │
    ///      ▼
    /// multiply_quantity(2) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: $20.00
    /// ```
    ///
    /// Prices come from the server unbounded, so the product saturates at
    /// `i64::MAX` cents instead of overflowing.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

fn out_of_range(number: &serde_json::Number) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: format!("{} is not representable in cents", number),
    }
}

// =============================================================================
// Wire Format Helpers
// =============================================================================

/// Deserializes a price given in major units (`12.5`) into cents.
///
/// Used with `#[serde(deserialize_with = "...")]` on wire types.
pub fn deserialize_major_units<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    Money::from_major_units(&number).map_err(serde::de::Error::custom)
}

/// Serializes cents back into major units, as an integer when exact.
pub fn serialize_major_units<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if money.cents() % 100 == 0 {
        serializer.serialize_i64(money.dollars())
    } else {
        serializer.serialize_f64(money.cents() as f64 / 100.0)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable form used in change reports and totals: `$12.10`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a cart quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
