//! Monetary amounts as exchanged with the backend.
//!
//! The backend encodes money as `{ "currency": "JPY", "amount": 1000 }` where
//! `amount` is an integer in the currency's smallest unit. Zero-valued fields
//! may be omitted entirely, so both fields default when absent.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A monetary amount with currency information.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// ISO 4217 currency code as sent by the backend (e.g., "JPY").
    #[serde(default)]
    pub currency: String,
    /// Amount in the currency's smallest unit (yen, cents).
    #[serde(default)]
    pub amount: i64,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(currency: impl Into<String>, amount: i64) -> Self {
        Self {
            currency: currency.into(),
            amount,
        }
    }

    /// Create an amount in Japanese yen, the store's default currency.
    #[must_use]
    pub fn jpy(amount: i64) -> Self {
        Self::new(CurrencyCode::JPY.code(), amount)
    }

    /// Multiply the amount by a quantity, saturating on overflow.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            currency: self.currency.clone(),
            amount: self.amount.saturating_mul(i64::from(quantity)),
        }
    }

    /// The parsed currency code, if it is one the storefront knows how to format.
    #[must_use]
    pub fn currency_code(&self) -> Option<CurrencyCode> {
        CurrencyCode::parse(&self.currency)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // An empty currency means the backend omitted it; the store sells in yen.
        let code = if self.currency.is_empty() {
            Some(CurrencyCode::JPY)
        } else {
            self.currency_code()
        };

        let Some(code) = code else {
            return write!(f, "{} {}", group_thousands(self.amount), self.currency);
        };

        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        match code.minor_digits() {
            0 => write!(f, "{sign}{}{}", code.symbol(), group_thousands_u(abs)),
            digits => {
                let scale = 10_u64.pow(digits);
                write!(
                    f,
                    "{sign}{}{}.{:0width$}",
                    code.symbol(),
                    group_thousands_u(abs / scale),
                    abs % scale,
                    width = digits as usize
                )
            }
        }
    }
}

/// ISO 4217 currency codes the storefront can format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    JPY,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Parse a currency code (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "JPY" => Some(Self::JPY),
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            _ => None,
        }
    }

    /// The three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::JPY => "JPY",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::JPY => "¥",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Number of digits in the minor unit (yen has none).
    #[must_use]
    pub const fn minor_digits(self) -> u32 {
        match self {
            Self::JPY => 0,
            Self::USD | Self::EUR | Self::GBP => 2,
        }
    }
}

fn group_thousands(value: i64) -> String {
    let grouped = group_thousands_u(value.unsigned_abs());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn group_thousands_u(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_jpy() {
        assert_eq!(Money::jpy(1000).to_string(), "¥1,000");
        assert_eq!(Money::jpy(0).to_string(), "¥0");
        assert_eq!(Money::jpy(1_234_567).to_string(), "¥1,234,567");
        assert_eq!(Money::jpy(-500).to_string(), "-¥500");
    }

    #[test]
    fn test_display_minor_units() {
        assert_eq!(Money::new("USD", 1999).to_string(), "$19.99");
        assert_eq!(Money::new("eur", 5).to_string(), "€0.05");
        assert_eq!(Money::new("USD", 123_456).to_string(), "$1,234.56");
    }

    #[test]
    fn test_display_unknown_currency() {
        assert_eq!(Money::new("KRW", 15000).to_string(), "15,000 KRW");
    }

    #[test]
    fn test_display_missing_currency_defaults_to_yen() {
        assert_eq!(Money::new("", 300).to_string(), "¥300");
    }

    #[test]
    fn test_times() {
        let price = Money::jpy(1000);
        assert_eq!(price.times(4), Money::jpy(4000));
        assert_eq!(Money::jpy(i64::MAX).times(2).amount, i64::MAX);
    }

    #[test]
    fn test_deserialize_with_omitted_fields() {
        let money: Money = serde_json::from_str("{}").unwrap();
        assert_eq!(money, Money::default());

        let money: Money = serde_json::from_str(r#"{"currency":"JPY","amount":1000}"#).unwrap();
        assert_eq!(money, Money::jpy(1000));
    }

    #[test]
    fn test_serialize_amount_as_number() {
        let json = serde_json::to_value(Money::jpy(4000)).unwrap();
        assert_eq!(json, serde_json::json!({"currency": "JPY", "amount": 4000}));
    }
}
