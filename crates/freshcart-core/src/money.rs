//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The storefront API sends prices as JSON numbers:                      │
//! │    { "price": 10, "count": 2 }, { "price": 5.5, "count": 1 }           │
//! │                                                                         │
//! │  Summing them as floats drifts:                                        │
//! │    0.1 + 0.2 = 0.30000000000000004                                     │
//! │                                                                         │
//! │  OUR SOLUTION: convert ONCE at the API boundary, then integer cents    │
//! │    10.00 → 1000,  5.50 → 550                                           │
//! │    1000 × 2 + 550 × 1 = 2550 → "25.50"                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use freshcart_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let line = price * 2;                // $21.98
//! assert_eq!(line.to_decimal_string(), "21.98");
//!
//! // Wire values are rounded to two decimals exactly once
//! let total = Money::from_decimal(0.1 + 0.2);
//! assert_eq!(total.cents(), 30);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Local adjustments can subtract
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Two decimals by construction**: every `Money` renders as `N.NN`
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──┬──► CartItem.unit_price ──► CartItem.line_total       │
/// │                  │                                                      │
/// │                  └──► Displayed as "$10.99" on product cards            │
/// │                                                                         │
/// │  CartSnapshot.total_price ──► CartState.total_price ──► select_total    │
/// │                                  (cart screen, checkout screen)         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude accepted from the API: ten trillion dollars.
    pub const MAX_WIRE_CENTS: i64 = 1_000_000_000_000_000;

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use freshcart_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a decimal amount as sent by the API.
    ///
    /// Rounds half away from zero to two decimal places. Non-finite input
    /// (NaN, infinity) becomes zero and magnitudes beyond
    /// [`Money::MAX_WIRE_CENTS`] are clamped to it.
    ///
    /// ## Example
    /// ```rust
    /// use freshcart_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(5.5).cents(), 550);
    /// assert_eq!(Money::from_decimal(19.999).cents(), 2000);
    /// assert_eq!(Money::from_decimal(0.125).cents(), 13);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        // Scaling first loses precision at the third decimal (0.125 * 100
        // lands on 12.499999...). Nudge by a sub-cent epsilon before rounding.
        let scaled = amount * 100.0;
        let nudged = scaled + scaled.signum() * 1e-7;
        let limit = Self::MAX_WIRE_CENTS as f64;
        Money(nudged.round().clamp(-limit, limit) as i64)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    ///
    /// ## Example
    /// ```rust
    /// use freshcart_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).dollars(), 10);
    /// assert_eq!(Money::from_cents(-550).dollars(), -5);
    /// ```
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
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

    /// Multiplies money by a line quantity, saturating at the `i64` range.
    ///
    /// ## Example
    /// ```rust
    /// use freshcart_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Formats the amount with exactly two decimals and no currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use freshcart_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(2550).to_decimal_string(), "25.50");
    /// assert_eq!(Money::from_cents(-5).to_decimal_string(), "-0.05");
    /// ```
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money the way the storefront screens do: `$25.50`.
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
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a line quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
