//! Core data models for the fee status module

use feestatus_config::OfficerConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::{CoreError, CoreResult};
use super::types::{Action, FeeStatus, Lenient, Scalar, StudentId};

/// Student fee record as owned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Stable identifier, the merge key for update results
    pub id: StudentId,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub enrollment_no: Scalar,
    #[serde(default, deserialize_with = "lenient_text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub mobile: Scalar,
    #[serde(default)]
    pub year: Option<Lenient<i32>>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub payment_mode: String,
    /// The API spells this field `Amount`
    #[serde(rename = "Amount", alias = "amount", default)]
    pub amount: Option<Lenient<Decimal>>,
    /// Absent when the API did not report a status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_status: Option<FeeStatus>,
    /// Officer decision; absent or empty means undecided
    #[serde(default, deserialize_with = "optional_action")]
    pub remarks: Option<Action>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub proof_of_payment: Option<String>,
}

impl Student {
    /// Create a bare record with only the id set
    pub fn new(id: impl Into<StudentId>) -> Self {
        Self {
            id: id.into(),
            enrollment_no: Scalar::default(),
            full_name: String::new(),
            email: String::new(),
            mobile: Scalar::default(),
            year: None,
            payment_mode: String::new(),
            amount: None,
            fee_status: None,
            remarks: None,
            reason: None,
            proof_of_payment: None,
        }
    }

    /// Rejection reason, only when the payment was rejected
    pub fn rejection_reason(&self) -> Option<&str> {
        match self.remarks {
            Some(Action::Reject) => self.reason.as_deref().filter(|r| !r.trim().is_empty()),
            _ => None,
        }
    }

    /// Proof-of-payment reference, if one was uploaded
    pub fn proof_reference(&self) -> Option<&str> {
        self.proof_of_payment
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn lenient_scalar<'de, D>(deserializer: D) -> Result<Scalar, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => Scalar::default(),
        Some(serde_json::Value::Number(n)) => Scalar::Number(n),
        Some(serde_json::Value::String(s)) => Scalar::Text(s),
        Some(other) => Scalar::Text(other.to_string()),
    })
}

fn optional_action<'de, D>(deserializer: D) -> Result<Option<Action>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Officer identity shown in the module header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Officer {
    pub name: String,
    pub designation: Option<String>,
    pub email: String,
}

impl From<&OfficerConfig> for Officer {
    fn from(config: &OfficerConfig) -> Self {
        Self {
            name: config.name.clone(),
            designation: config.designation.clone(),
            email: config.email.clone(),
        }
    }
}

/// Body of `PATCH /api/FeeStatus/students/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub action: Action,
    pub value: Option<String>,
}

impl StatusUpdate {
    /// Plain decision with no accompanying value
    pub fn action(action: Action) -> Self {
        Self { action, value: None }
    }

    /// Rejection carrying the officer's reason
    pub fn rejection(reason: &str) -> Self {
        Self {
            action: Action::Reject,
            value: Some(reason.trim().to_string()),
        }
    }

    /// Check that a rejection carries a reason.
    ///
    /// The module itself submits whatever it is given; front ends call this
    /// before submitting.
    pub fn validate(&self) -> CoreResult<()> {
        if self.action == Action::Reject {
            let has_reason = self.value.as_deref().map_or(false, |v| !v.trim().is_empty());
            if !has_reason {
                return Err(CoreError::ValidationGap {
                    message: "reject requires a non-empty reason".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A proof-of-payment download the front end may trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Reference to the uploaded file, absolute or relative to the API
    pub url: String,
    /// Suggested file name without extension
    pub filename: String,
}

impl DownloadRequest {
    /// Build a request for the student's proof, if one was uploaded
    pub fn for_student(student: &Student) -> Option<Self> {
        student.proof_reference().map(|url| Self {
            url: url.to_string(),
            filename: format!("{}_ProofOfPayment", student.full_name),
        })
    }
}
