//! Basic types for the fee status module

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Student identifier as issued by the API
///
/// Kept in its JSON form so a record round-trips unchanged; the API has
/// been seen to issue both numeric and string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentId {
    Number(i64),
    Text(String),
}

impl From<i64> for StudentId {
    fn from(id: i64) -> Self {
        StudentId::Number(id)
    }
}

impl From<&str> for StudentId {
    fn from(id: &str) -> Self {
        StudentId::Text(id.to_string())
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentId::Number(n) => write!(f, "{}", n),
            StudentId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Officer decision on a fee payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Accept,
    Reject,
}

impl std::str::FromStr for Action {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accept" | "accepted" => Ok(Action::Accept),
            "reject" | "rejected" => Ok(Action::Reject),
            _ => Err(format!("Invalid action: {}", s)),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Accept => write!(f, "accept"),
            Action::Reject => write!(f, "reject"),
        }
    }
}

/// Fee payment status reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Paid")]
    Paid,
    #[serde(alias = "Partial")]
    Partial,
    #[serde(alias = "Overdue")]
    Overdue,
    /// Any status label this module does not know about
    #[serde(untagged)]
    Other(String),
}

impl FeeStatus {
    /// Label used for display and as the sort key
    pub fn as_str(&self) -> &str {
        match self {
            FeeStatus::Pending => "pending",
            FeeStatus::Paid => "paid",
            FeeStatus::Partial => "partial",
            FeeStatus::Overdue => "overdue",
            FeeStatus::Other(label) => label,
        }
    }
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive field the API sends either as a JSON number or as text.
/// Kept in the form it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    pub fn is_empty(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.is_empty())
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Text(String::new())
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Scalar::Text(text.to_string())
    }
}

impl From<String> for Scalar {
    fn from(text: String) -> Self {
        Scalar::Text(text)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Numeric field that may arrive as a number or as numeric text.
///
/// Anything that does not parse as `T` is kept verbatim in `Raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lenient<T> {
    Value(T),
    Raw(String),
}

impl<T> Lenient<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Lenient::Value(v) => Some(v),
            Lenient::Raw(_) => None,
        }
    }
}

impl<T: FromStr + DeserializeOwned> Lenient<T> {
    fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => match s.trim().parse::<T>() {
                Ok(v) => Lenient::Value(v),
                Err(_) => Lenient::Raw(s),
            },
            other => {
                let raw = other.to_string();
                serde_json::from_value(other)
                    .map(Lenient::Value)
                    .unwrap_or(Lenient::Raw(raw))
            }
        }
    }
}

impl<T: Serialize> Serialize for Lenient<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Lenient::Value(v) => v.serialize(serializer),
            Lenient::Raw(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de, T: FromStr + DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Lenient::from_json)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Lenient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lenient::Value(v) => write!(f, "{}", v),
            Lenient::Raw(s) => f.write_str(s),
        }
    }
}
