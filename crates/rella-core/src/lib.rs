//! Rella Core: scenario view, domain contract, rules and conflict resolution
//!
//! Generic engine shared by every farm domain. A domain supplies typed field
//! extraction, bucket derivation and an ordered rule list; the runner drives
//! them and reconciles the proposed actions.
//!
//! ```text
//! record → ScenarioView → Fields → DerivedBuckets → Context
//!                                                      ↓
//!                          ModelOutput ← resolve ← rules (single pass)
//! ```

pub mod conflict;
pub mod context;
pub mod data_model;
pub mod domain;
pub mod error;
pub mod rule;
pub mod runner;
pub mod scenario;

pub use conflict::resolve_conflicts;
pub use context::{Context, DerivedBuckets};
pub use data_model::{Action, LocalizedText, ModelOutput, Priority, Reason, Scalar};
pub use domain::{Domain, DomainPipeline};
pub use error::RellaError;
pub use rule::{Proposals, Rule, RuleError, RuleFn};
pub use runner::run_domain;
pub use scenario::ScenarioView;

/// Engine version
pub const RELLA_VERSION: &str = "1.0.0";
