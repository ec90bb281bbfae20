//! Status enums for orders and payments.
//!
//! The backend serializes protobuf enums either by name
//! (`"ORDER_STATUS_PENDING"`) or, depending on the encoder, by number. Both
//! forms are accepted. Values the client does not know are kept verbatim in
//! an `Unknown` variant instead of failing the whole response.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A wire enum value as it may appear in a backend response.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEnum {
    Name(String),
    Number(i64),
}

/// Order lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    /// A status this client does not recognise.
    Unknown(String),
}

impl OrderStatus {
    /// The backend's wire name for this status.
    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Pending => "ORDER_STATUS_PENDING",
            Self::Confirmed => "ORDER_STATUS_CONFIRMED",
            Self::Processing => "ORDER_STATUS_PROCESSING",
            Self::Shipped => "ORDER_STATUS_SHIPPED",
            Self::Delivered => "ORDER_STATUS_DELIVERED",
            Self::Cancelled => "ORDER_STATUS_CANCELLED",
            Self::Unknown(raw) => raw,
        }
    }

    /// Customer-facing label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Processing",
            Self::Confirmed => "Confirmed",
            Self::Processing => "Preparing shipment",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether the order can still change.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    fn from_wire(raw: &str) -> Self {
        match raw {
            "ORDER_STATUS_PENDING" => Self::Pending,
            "ORDER_STATUS_CONFIRMED" => Self::Confirmed,
            "ORDER_STATUS_PROCESSING" => Self::Processing,
            "ORDER_STATUS_SHIPPED" => Self::Shipped,
            "ORDER_STATUS_DELIVERED" => Self::Delivered,
            "ORDER_STATUS_CANCELLED" => Self::Cancelled,
            other => Self::Unknown(other.to_owned()),
        }
    }

    fn from_number(n: i64) -> Self {
        match n {
            1 => Self::Pending,
            2 => Self::Confirmed,
            3 => Self::Processing,
            4 => Self::Shipped,
            5 => Self::Delivered,
            6 => Self::Cancelled,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawEnum::deserialize(deserializer)? {
            RawEnum::Name(name) => Self::from_wire(&name),
            RawEnum::Number(n) => Self::from_number(n),
        })
    }
}

/// Payment lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
    /// A status this client does not recognise.
    Unknown(String),
}

impl PaymentStatus {
    /// The backend's wire name for this status.
    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Pending => "PAYMENT_STATUS_PENDING",
            Self::Completed => "PAYMENT_STATUS_COMPLETED",
            Self::Failed => "PAYMENT_STATUS_FAILED",
            Self::Refunded => "PAYMENT_STATUS_REFUNDED",
            Self::Unknown(raw) => raw,
        }
    }

    fn from_wire(raw: &str) -> Self {
        match raw {
            "PAYMENT_STATUS_PENDING" => Self::Pending,
            "PAYMENT_STATUS_COMPLETED" => Self::Completed,
            "PAYMENT_STATUS_FAILED" => Self::Failed,
            "PAYMENT_STATUS_REFUNDED" => Self::Refunded,
            other => Self::Unknown(other.to_owned()),
        }
    }

    fn from_number(n: i64) -> Self {
        match n {
            1 => Self::Pending,
            2 => Self::Completed,
            3 => Self::Failed,
            4 => Self::Refunded,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl Serialize for PaymentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawEnum::deserialize(deserializer)? {
            RawEnum::Name(name) => Self::from_wire(&name),
            RawEnum::Number(n) => Self::from_number(n),
        })
    }
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    BankTransfer,
    ConvenienceStore,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreditCard => write!(f, "credit_card"),
            Self::BankTransfer => write!(f, "bank_transfer"),
            Self::ConvenienceStore => write!(f, "convenience_store"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(Self::CreditCard),
            "bank_transfer" => Ok(Self::BankTransfer),
            "convenience_store" => Ok(Self::ConvenienceStore),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_from_name() {
        let status: OrderStatus = serde_json::from_str("\"ORDER_STATUS_SHIPPED\"").unwrap();
        assert_eq!(status, OrderStatus::Shipped);
        assert_eq!(status.label(), "Shipped");
    }

    #[test]
    fn test_order_status_from_number() {
        let status: OrderStatus = serde_json::from_str("2").unwrap();
        assert_eq!(status, OrderStatus::Confirmed);
    }

    #[test]
    fn test_order_status_unknown_is_preserved() {
        let status: OrderStatus = serde_json::from_str("\"ORDER_STATUS_ON_HOLD\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown("ORDER_STATUS_ON_HOLD".to_string()));
        assert_eq!(status.label(), "ORDER_STATUS_ON_HOLD");
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            "\"ORDER_STATUS_ON_HOLD\""
        );
    }

    #[test]
    fn test_order_status_is_final() {
        assert!(OrderStatus::Cancelled.is_final());
        assert!(!OrderStatus::Pending.is_final());
    }

    #[test]
    fn test_payment_status_roundtrip() {
        let status: PaymentStatus = serde_json::from_str("\"PAYMENT_STATUS_COMPLETED\"").unwrap();
        assert_eq!(status, PaymentStatus::Completed);
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            "\"PAYMENT_STATUS_COMPLETED\""
        );
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("credit_card".parse::<PaymentMethod>(), Ok(PaymentMethod::CreditCard));
        assert!("cash".parse::<PaymentMethod>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"bank_transfer\""
        );
    }
}
