//! Unified Error Model
use thiserror::Error;

use crate::rule::RuleError;

#[derive(Error, Debug)]
pub enum RellaError {
    #[error("DOMAIN/unknown domain '{name}' (available: {available})")]
    UnknownDomain { name: String, available: String },

    #[error("DOMAIN/'{0}' is already registered")]
    DuplicateDomain(String),

    #[error("RULE/{domain}.{rule}: {source}")]
    RuleFault {
        domain: String,
        rule: &'static str,
        #[source]
        source: RuleError,
    },
}

impl RellaError {
    pub fn unknown_domain<I, S>(name: &str, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let available = available
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        RellaError::UnknownDomain {
            name: name.to_string(),
            available,
        }
    }

    /// Errors caused by the caller's request rather than a defect in the engine
    pub fn is_client_error(&self) -> bool {
        matches!(self, RellaError::UnknownDomain { .. })
    }
}
