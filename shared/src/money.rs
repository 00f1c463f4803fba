//! Monetary amounts
//!
//! [`Money`] wraps [`Decimal`] so prices and totals never go through floating
//! point arithmetic. On the wire it serializes as a JSON number; in SQLite it
//! is stored as canonical decimal TEXT (e.g. `"12.50"`), which compares and
//! round-trips exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An exact monetary amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub Decimal);

impl Money {
    /// Zero amount
    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money(d)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Money(s.parse()?))
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        Money(iter.map(|m| m.0).sum())
    }
}

// ===== sqlx integration (TEXT column) =====

#[cfg(feature = "db")]
mod db {
    use super::Money;
    use sqlx::Sqlite;
    use sqlx::encode::IsNull;
    use sqlx::error::BoxDynError;
    use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
    use std::borrow::Cow;

    impl sqlx::Type<Sqlite> for Money {
        fn type_info() -> SqliteTypeInfo {
            <&str as sqlx::Type<Sqlite>>::type_info()
        }

        fn compatible(ty: &SqliteTypeInfo) -> bool {
            <&str as sqlx::Type<Sqlite>>::compatible(ty)
        }
    }

    impl<'q> sqlx::Encode<'q, Sqlite> for Money {
        fn encode_by_ref(
            &self,
            buf: &mut Vec<SqliteArgumentValue<'q>>,
        ) -> Result<IsNull, BoxDynError> {
            buf.push(SqliteArgumentValue::Text(Cow::Owned(self.0.to_string())));
            Ok(IsNull::No)
        }
    }

    impl<'r> sqlx::Decode<'r, Sqlite> for Money {
        fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
            let text = <&str as sqlx::Decode<Sqlite>>::decode(value)?;
            Ok(Money(text.parse()?))
        }
    }
}
