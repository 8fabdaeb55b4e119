//! Integer price representation.
//!
//! Prices are stored in the smallest currency unit as an `i64`, so all
//! arithmetic is exact. Display formatting groups digits in thousands
//! (e.g. `89000` renders as `89.000 ₫`).

use core::fmt;

use serde::{Deserialize, Serialize};

/// A price in the smallest currency unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a new price from an amount in the smallest currency unit.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Multiply the unit price by a line quantity.
    #[must_use]
    pub const fn line_total(&self, quantity: i64) -> Self {
        Self(self.0 * quantity)
    }

    /// Format the amount with dot-separated thousands groups.
    #[must_use]
    pub fn grouped(&self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if self.0 < 0 {
            out.push('-');
        }
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(c);
        }
        out
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ₫", self.grouped())
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

impl From<Price> for i64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

// SQLx support (with sqlite feature)
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Price {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Price {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_small() {
        assert_eq!(Price::new(0).grouped(), "0");
        assert_eq!(Price::new(999).grouped(), "999");
    }

    #[test]
    fn test_grouped_thousands() {
        assert_eq!(Price::new(89000).grouped(), "89.000");
        assert_eq!(Price::new(257000).grouped(), "257.000");
        assert_eq!(Price::new(1234567).grouped(), "1.234.567");
    }

    #[test]
    fn test_grouped_negative() {
        assert_eq!(Price::new(-5000).grouped(), "-5.000");
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::new(79000).to_string(), "79.000 ₫");
    }

    #[test]
    fn test_line_total() {
        assert_eq!(Price::new(89000).line_total(2), Price::new(178000));
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::new(178000), Price::new(79000)].into_iter().sum();
        assert_eq!(total, Price::new(257000));
    }
}
