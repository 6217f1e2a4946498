//! Money type for expense amounts
//!
//! Amounts are stored as signed cents (i64). Negative amounts are income,
//! zero and positive amounts are expenditures.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// A monetary amount in cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use minex::models::Money;
    /// let amount = Money::from_cents(350); // 3.50
    /// assert_eq!(amount.to_string(), "3.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// The cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Income entries are stored as negative amounts
    pub const fn is_income(&self) -> bool {
        self.0 < 0
    }

    /// Zero counts as an expenditure
    pub const fn is_expenditure(&self) -> bool {
        self.0 >= 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Parse an amount typed by the user
    ///
    /// Accepts "3.50", "3,50", "3.5", "3", "-3.50" and an optional currency
    /// symbol before or after the number. The sign may come before or after
    /// a leading symbol ("-€5", "€-5"), but only once. More than two decimal
    /// places is rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(s.trim().to_string());

        let mut rest = s.trim();
        let mut negative = false;
        if let Some(stripped) = rest.strip_prefix('-') {
            negative = true;
            rest = stripped.trim_start();
        }
        rest = rest.trim_start_matches(is_currency_symbol).trim_start();
        if !negative {
            if let Some(stripped) = rest.strip_prefix('-') {
                negative = true;
                rest = stripped.trim_start();
            }
        }
        let rest = rest.trim_end_matches(is_currency_symbol).trim_end();
        if rest.is_empty() {
            return Err(invalid());
        }

        let (whole, fraction) = match rest.split_once(['.', ',']) {
            Some((whole, fraction)) => (whole, fraction),
            None => (rest, ""),
        };
        if fraction.len() > 2 {
            return Err(MoneyParseError::TooManyDecimals(s.trim().to_string()));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
            || (whole.is_empty() && fraction.is_empty())
        {
            return Err(invalid());
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|u| u.checked_add(cents))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -total } else { total }))
    }

    /// Format as `3.50 €` with the symbol after the number
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if symbol.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", self, symbol)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Symbols like `€` or `$`; letters, digits, separators and signs are not
fn is_currency_symbol(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '.' | ',' | '-' | '+')
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyParseError {
    #[error("Not a valid amount: {0}")]
    InvalidFormat(String),
    #[error("Only two decimal places are allowed: {0}")]
    TooManyDecimals(String),
}
