//! Rules and the proposal collectors they append to
//!
//! A rule is a named plain function over the immutable context. Rules run in
//! the domain's declared order, once each; they can only append to
//! [`Proposals`], never read what earlier rules proposed.

use thiserror::Error;

use crate::context::Context;
use crate::data_model::{Action, Priority, Reason};

/// Logic defects raised by a rule. These are not absorbed by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("BUCKET/missing '{0}'")]
    MissingBucket(String),

    #[error("BUCKET/'{name}' is not a {expected}")]
    BucketType { name: String, expected: &'static str },
}

pub type RuleFn<F> = fn(&Context<F>, &mut Proposals) -> Result<(), RuleError>;

/// A single named rule evaluator
pub struct Rule<F> {
    name: &'static str,
    eval: RuleFn<F>,
}

impl<F> Rule<F> {
    pub const fn new(name: &'static str, eval: RuleFn<F>) -> Self {
        Self { name, eval }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, ctx: &Context<F>, out: &mut Proposals) -> Result<(), RuleError> {
        (self.eval)(ctx, out)
    }
}

/// Raw, unresolved output of a rule pass
#[derive(Debug, Default)]
pub struct Proposals {
    recommended: Vec<Action>,
    not_recommended: Vec<Action>,
}

impl Proposals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recommend(&mut self, code: &str, priority: Priority, reasons: Vec<Reason>) {
        self.recommended.push(Action::recommended(code, priority, reasons));
    }

    pub fn advise_against(&mut self, code: &str, reasons: Vec<Reason>) {
        self.not_recommended.push(Action::not_recommended(code, reasons));
    }

    pub fn len(&self) -> usize {
        self.recommended.len() + self.not_recommended.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (recommended, not_recommended) in insertion order
    pub fn into_parts(self) -> (Vec<Action>, Vec<Action>) {
        (self.recommended, self.not_recommended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DerivedBuckets;

    struct Fields {
        wind: f64,
    }

    fn storm(ctx: &Context<Fields>, out: &mut Proposals) -> Result<(), RuleError> {
        if ctx.derived().flag("high_wind")? {
            out.recommend(
                "SECURE_ORCHARD",
                Priority::High,
                vec![Reason::new("high_wind_warning").with("wind", ctx.fields().wind)],
            );
            out.advise_against("SPRAY_PESTICIDES", vec![Reason::new("high_wind_no_spray")]);
        }
        Ok(())
    }

    #[test]
    fn test_rule_appends_to_both_collections() {
        let rule = Rule::new("storm_preparation", storm);
        let ctx = Context::new(Fields { wind: 45.0 }, DerivedBuckets::new().with("high_wind", true));
        let mut out = Proposals::new();

        rule.apply(&ctx, &mut out).unwrap();

        assert_eq!(rule.name(), "storm_preparation");
        let (recs, nots) = out.into_parts();
        assert_eq!(recs[0].code, "SECURE_ORCHARD");
        assert_eq!(recs[0].priority, Some(Priority::High));
        assert_eq!(nots[0].code, "SPRAY_PESTICIDES");
        assert_eq!(nots[0].priority, None);
    }

    #[test]
    fn test_rule_surfaces_missing_bucket() {
        let rule = Rule::new("storm_preparation", storm);
        let ctx = Context::new(Fields { wind: 45.0 }, DerivedBuckets::new());
        let mut out = Proposals::new();

        let err = rule.apply(&ctx, &mut out).unwrap_err();
        assert_eq!(err, RuleError::MissingBucket("high_wind".to_string()));
        assert!(out.is_empty());
    }
}
