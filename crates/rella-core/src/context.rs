//! Evaluation Context: typed fields plus derived buckets, immutable once built
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data_model::Scalar;
use crate::rule::RuleError;

/// Flat bucket name → value mapping produced by a domain's deriver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivedBuckets(BTreeMap<String, Scalar>);

impl DerivedBuckets {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Categorical bucket, e.g. `moisture_bucket = "low"`
    pub fn category(&self, name: &str) -> Result<&str, RuleError> {
        self.lookup(name)?
            .as_str()
            .ok_or_else(|| RuleError::BucketType { name: name.to_string(), expected: "category" })
    }

    /// Boolean bucket, e.g. `wet_bucket = true`
    pub fn flag(&self, name: &str) -> Result<bool, RuleError> {
        self.lookup(name)?
            .as_bool()
            .ok_or_else(|| RuleError::BucketType { name: name.to_string(), expected: "flag" })
    }

    /// Numeric bucket, e.g. `feed_per_animal = 10.0`
    pub fn measure(&self, name: &str) -> Result<f64, RuleError> {
        self.lookup(name)?
            .as_f64()
            .ok_or_else(|| RuleError::BucketType { name: name.to_string(), expected: "measure" })
    }

    fn lookup(&self, name: &str) -> Result<&Scalar, RuleError> {
        self.0
            .get(name)
            .ok_or_else(|| RuleError::MissingBucket(name.to_string()))
    }
}

/// Per-evaluation context handed to every rule by shared reference
#[derive(Debug, Clone)]
pub struct Context<F> {
    fields: F,
    derived: DerivedBuckets,
}

impl<F> Context<F> {
    pub fn new(fields: F, derived: DerivedBuckets) -> Self {
        Self { fields, derived }
    }

    /// Typed raw fields read from the scenario
    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn derived(&self) -> &DerivedBuckets {
        &self.derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets() -> DerivedBuckets {
        DerivedBuckets::new()
            .with("moisture_bucket", "low")
            .with("wet_bucket", true)
            .with("feed_per_animal", 10.0)
    }

    #[test]
    fn test_typed_access() {
        let b = buckets();
        assert_eq!(b.category("moisture_bucket").unwrap(), "low");
        assert!(b.flag("wet_bucket").unwrap());
        assert_eq!(b.measure("feed_per_animal").unwrap(), 10.0);
    }

    #[test]
    fn test_missing_bucket_is_an_error() {
        let err = buckets().category("moisture_bukcet").unwrap_err();
        assert!(matches!(err, RuleError::MissingBucket(ref name) if name == "moisture_bukcet"));
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let err = buckets().flag("moisture_bucket").unwrap_err();
        assert!(matches!(err, RuleError::BucketType { expected: "flag", .. }));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let value = serde_json::to_value(buckets()).unwrap();
        assert_eq!(value["moisture_bucket"], "low");
        assert_eq!(value["wet_bucket"], true);
    }
}
