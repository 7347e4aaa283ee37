//! Exact decimal price representation.
//!
//! Menu prices in this storefront are quoted in Bitcoin, so the amounts are
//! tiny fractions (`0.0038`) and float drift would show up immediately in
//! order totals. `Price` wraps [`rust_decimal::Decimal`] so that sums stay
//! exact: `0.0038 + 0.0042` renders as `0.008`, never `0.00800000000000001`.
//!
//! The order API emits prices as JSON numbers; some tooling round-trips them
//! as numeric strings. Both are accepted on deserialization.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::{Error as DeError, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input string is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A decimal currency amount in the menu's native unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 0.0038 + 0.0042 sums to scale-4 "0.0080"; normalize to "0.008"
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .map(Self)
            .map_err(|_| PriceError::Invalid(s.to_owned()))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // The API speaks JSON numbers; fall back to the exact string form
        // for amounts outside f64 range
        match self.0.to_f64() {
            Some(amount) => serializer.serialize_f64(amount),
            None => serializer.serialize_str(&self.0.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceVisitor;

        impl Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or numeric string")
            }

            fn visit_f64<E: DeError>(self, v: f64) -> Result<Self::Value, E> {
                // f64 Display is the shortest round-trip form, so going
                // through it recovers the decimal the JSON source spelled out
                Decimal::from_str(&v.to_string())
                    .map(Price)
                    .map_err(E::custom)
            }

            fn visit_u64<E: DeError>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Price(Decimal::from(v)))
            }

            fn visit_i64<E: DeError>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Price(Decimal::from(v)))
            }

            fn visit_str<E: DeError>(self, v: &str) -> Result<Self::Value, E> {
                Decimal::from_str(v).map(Price).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        Price::from_str(s).unwrap()
    }

    #[test]
    fn test_sum_is_exact() {
        let total: Price = [price("0.0038"), price("0.0042")].iter().sum();
        assert_eq!(total, price("0.008"));
        assert_eq!(total.to_string(), "0.008");
    }

    #[test]
    fn test_display_trims_trailing_zeros() {
        assert_eq!((price("0.0040") + price("0.0040")).to_string(), "0.008");
        assert_eq!(price("2.50").to_string(), "2.5");
        assert_eq!(Price::ZERO.to_string(), "0");
    }

    #[test]
    fn test_deserialize_from_number() {
        let p: Price = serde_json::from_str("0.0038").unwrap();
        assert_eq!(p, price("0.0038"));
    }

    #[test]
    fn test_deserialize_from_integer() {
        let p: Price = serde_json::from_str("100").unwrap();
        assert_eq!(p, price("100"));
    }

    #[test]
    fn test_deserialize_from_string() {
        let p: Price = serde_json::from_str("\"0.0042\"").unwrap();
        assert_eq!(p, price("0.0042"));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&price("0.0038")).unwrap();
        assert_eq!(json, "0.0038");
    }

    #[test]
    fn test_serde_roundtrip_keeps_value() {
        let original = price("0.0014");
        let json = serde_json::to_string(&original).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_from_str_invalid() {
        assert!(Price::from_str("cheese").is_err());
    }

    #[test]
    fn test_add_assign() {
        let mut total = Price::ZERO;
        total += price("0.0014");
        total += price("0.0014");
        assert_eq!(total.to_string(), "0.0028");
    }
}
