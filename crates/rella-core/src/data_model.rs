//! Data Model: Reason, Action, ModelOutput
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::context::DerivedBuckets;

/// Scalar carried by reason parameters and derived buckets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(n) => Some(*n as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// JSON form handed to template interpolation
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Integer(n) => Value::from(*n),
            Scalar::Float(f) => Value::from(*f),
            Scalar::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Integer(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

/// Action priority, ordered low < medium < high
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbolic, language-agnostic justification for an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    pub key: String,
    #[serde(default)]
    pub params: BTreeMap<String, Scalar>,
}

impl Reason {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            params: BTreeMap::new(),
        }
    }

    /// Attach a template parameter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&Scalar> {
        self.params.get(name)
    }
}

/// Rendered text attached by the localization layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub reasons: Vec<String>,
}

/// A recommended or vetoed operational step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub code: String,
    /// Always set on recommendations; not-recommended verdicts carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub reasons: Vec<Reason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized: Option<LocalizedText>,
}

impl Action {
    pub fn recommended(code: impl Into<String>, priority: Priority, reasons: Vec<Reason>) -> Self {
        Self {
            code: code.into(),
            priority: Some(priority),
            reasons,
            localized: None,
        }
    }

    pub fn not_recommended(code: impl Into<String>, reasons: Vec<Reason>) -> Self {
        Self {
            code: code.into(),
            priority: None,
            reasons,
            localized: None,
        }
    }

    /// Priority used for duplicate resolution; a missing priority ranks lowest
    pub fn rank(&self) -> Priority {
        self.priority.unwrap_or(Priority::Low)
    }

    pub fn reason_keys(&self) -> Vec<&str> {
        self.reasons.iter().map(|r| r.key.as_str()).collect()
    }
}

/// Result of one domain evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub derived: DerivedBuckets,
    pub recommendations: Vec<Action>,
    pub not_recommended: Vec<Action>,
}

impl ModelOutput {
    pub fn recommendation(&self, code: &str) -> Option<&Action> {
        self.recommendations.iter().find(|a| a.code == code)
    }

    pub fn rejection(&self, code: &str) -> Option<&Action> {
        self.not_recommended.iter().find(|a| a.code == code)
    }

    pub fn recommendation_codes(&self) -> Vec<&str> {
        self.recommendations.iter().map(|a| a.code.as_str()).collect()
    }

    pub fn not_recommended_codes(&self) -> Vec<&str> {
        self.not_recommended.iter().map(|a| a.code.as_str()).collect()
    }

    /// Digest of the canonical JSON encoding (e.g. "blake3:ab12...")
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(format!("blake3:{}", blake3::hash(&bytes)))
    }
}
