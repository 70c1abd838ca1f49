//! Domain contract: the capabilities a farm domain plugs into the engine
use serde_json::Value;

use crate::context::{Context, DerivedBuckets};
use crate::data_model::ModelOutput;
use crate::error::RellaError;
use crate::rule::Rule;
use crate::scenario::ScenarioView;

/// One kind of farming operation
pub trait Domain: Send + Sync + 'static {
    /// Typed raw fields extracted from a scenario
    type Fields;

    /// Registry name (ex: "wheat")
    fn name(&self) -> &'static str;

    /// Read typed fields, each with its documented default
    fn read_fields(&self, view: &ScenarioView<'_>) -> Self::Fields;

    /// Pure, total bucket derivation
    fn derive_buckets(&self, fields: &Self::Fields) -> DerivedBuckets;

    /// Assemble the immutable rule context
    fn build_context(&self, fields: Self::Fields, derived: DerivedBuckets) -> Context<Self::Fields> {
        Context::new(fields, derived)
    }

    /// Rules in evaluation order
    fn rules(&self) -> &[Rule<Self::Fields>];
}

/// Object-safe view of a domain, as stored by the registry
pub trait DomainPipeline: Send + Sync {
    fn domain_name(&self) -> &'static str;

    fn rule_names(&self) -> Vec<&'static str>;

    fn evaluate(&self, record: &Value) -> Result<ModelOutput, RellaError>;
}

impl<D: Domain> DomainPipeline for D {
    fn domain_name(&self) -> &'static str {
        Domain::name(self)
    }

    fn rule_names(&self) -> Vec<&'static str> {
        self.rules().iter().map(Rule::name).collect()
    }

    fn evaluate(&self, record: &Value) -> Result<ModelOutput, RellaError> {
        crate::runner::run_domain(self, record)
    }
}
