//! Amount type for handling monetary values entered on the command line or read from the workbook.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may or may not include a dollar sign and thousands separators.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents how an amount was (or should be) formatted.
///
/// # Examples
///  - `AmountFormat{ dollar: true, commas: true }` -> `$60,000.00`
///  - `AmountFormat{ dollar: false, commas: true }` -> `60,000.00`
///  - `AmountFormat{ dollar: false, commas: false }` -> `60000.00`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmountFormat {
    /// Whether a dollar sign is present in the formatting.
    dollar: bool,
    /// Whether commas are present as thousands separators in the formatting.
    commas: bool,
}

impl Default for AmountFormat {
    fn default() -> Self {
        PLAIN_FORMAT
    }
}

/// Amounts typed into a form carry no currency symbol, the currency is its own column.
const PLAIN_FORMAT: AmountFormat = AmountFormat {
    dollar: false,
    commas: false,
};

/// Used for the balance views.
pub const DISPLAY_FORMAT: AmountFormat = AmountFormat {
    dollar: false,
    commas: true,
};

/// Represents a monetary amount.
///
/// Formatting is considered significant for the purposes of equality, so for numeric comparisons
/// you should access the `Decimal` value and use that.
///
/// ```
/// # use minty::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("42.5").unwrap();
/// let b = Amount::from_str("$42.50").unwrap();
/// assert_ne!(a, b);
/// assert_eq!(a.value(), b.value());
/// assert_eq!(a.fixed2(), "42.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    /// The parsed numerical value.
    value: Decimal,
    /// The way the numerical value was parsed from, or should be written to, a `String`.
    format: AmountFormat,
}

impl Amount {
    /// Creates a new Amount from a Decimal value with default `String` formatting.
    pub const fn new(value: Decimal) -> Self {
        Self {
            value,
            format: PLAIN_FORMAT,
        }
    }

    /// Creates a new Amount from a Decimal value with the specified formatting.
    pub const fn new_with_format(value: Decimal, format: AmountFormat) -> Self {
        Self { value, format }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    /// Returns true if the amount is less than zero.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }

    /// The value rounded to cents, ties to even. This is the rounding used by the bill tally.
    pub fn round2(&self) -> Decimal {
        round2(self.value)
    }

    /// The value rounded to cents and rendered with exactly two decimals, e.g. `42.50`.
    pub fn fixed2(&self) -> String {
        format!("{:.2}", self.round2())
    }

    /// The value as a float, for writing numeric cells.
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or_default()
    }

    /// Returns a copy that renders with `format`.
    pub fn with_format(self, format: AmountFormat) -> Self {
        Self { format, ..self }
    }
}

/// Rounds to two decimal places, ties to even.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut dollar_sign = false;
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            if let Some(after_dollar) = after_minus.strip_prefix('$') {
                dollar_sign = true;
                format!("-{after_dollar}")
            } else {
                trimmed.to_string()
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            dollar_sign = true;
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        let without_commas = without_dollar.replace(',', "");
        let commas = without_commas.len() < without_dollar.len();

        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount {
            value,
            format: AmountFormat {
                dollar: dollar_sign,
                commas,
            },
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            ("-", self.value().abs())
        } else {
            ("", self.value())
        };
        let dol = if self.format.dollar { "$" } else { "" };

        if self.format.commas {
            write!(
                f,
                "{sign}{dol}{}",
                format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
            )
        } else {
            write!(f, "{sign}{dol}{num}")
        }
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("42.50").unwrap();
        assert_eq!(amount.value(), dec("42.50"));
        assert_eq!(amount.to_string(), "42.50");
    }

    #[test]
    fn test_parse_dollar_and_commas() {
        let amount = Amount::from_str("  $1,234.5 ").unwrap();
        assert_eq!(amount.value(), dec("1234.5"));
        assert_eq!(amount.to_string(), "$1,234.50");
    }

    #[test]
    fn test_parse_empty_is_zero() {
        let amount = Amount::from_str("").unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("twelve").is_err());
    }

    #[test]
    fn test_fixed2_pads_and_rounds() {
        assert_eq!(Amount::from_str("42.5").unwrap().fixed2(), "42.50");
        assert_eq!(Amount::from_str("7").unwrap().fixed2(), "7.00");
        assert_eq!(Amount::from_str("0.125").unwrap().fixed2(), "0.12");
        assert_eq!(Amount::from_str("0.135").unwrap().fixed2(), "0.14");
    }

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(dec("2.675")), dec("2.68"));
        assert_eq!(round2(dec("2.665")), dec("2.66"));
        assert_eq!(round2(dec("17.5")), dec("17.50"));
    }

    #[test]
    fn test_zero_is_not_positive_or_negative() {
        let zero = Amount::from_str("0.00").unwrap();
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_sign() {
        assert!(Amount::from_str("-$5.00").unwrap().is_negative());
        assert!(Amount::from_str("5.00").unwrap().is_positive());
    }

    #[test]
    fn test_display_format() {
        let amount = Amount::new(dec("-60000")).with_format(DISPLAY_FORMAT);
        assert_eq!(amount.to_string(), "-60,000.00");
    }

    #[test]
    fn test_serde() {
        let amount: Amount = serde_json::from_str("\"$50.00\"").unwrap();
        assert_eq!(amount.value(), dec("50.00"));
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"$50.00\"");
    }
}
