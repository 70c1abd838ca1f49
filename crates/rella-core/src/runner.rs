//! Domain Runner: view → derive → context → rules → resolve
use serde_json::Value;

use crate::conflict::resolve_conflicts;
use crate::data_model::ModelOutput;
use crate::domain::Domain;
use crate::error::RellaError;
use crate::rule::Proposals;
use crate::scenario::ScenarioView;

/// Evaluate one scenario record against a domain
///
/// Data-shape problems never fail here; only rule defects do.
pub fn run_domain<D: Domain>(domain: &D, record: &Value) -> Result<ModelOutput, RellaError> {
    let view = ScenarioView::decision_inputs(record);
    let fields = domain.read_fields(&view);
    let derived = domain.derive_buckets(&fields);
    let ctx = domain.build_context(fields, derived.clone());

    let rules = domain.rules();
    let mut proposals = Proposals::new();
    for rule in rules {
        rule.apply(&ctx, &mut proposals).map_err(|source| RellaError::RuleFault {
            domain: domain.name().to_string(),
            rule: rule.name(),
            source,
        })?;
    }

    let proposed = proposals.len();
    let (recommended, not_recommended) = proposals.into_parts();
    let (recommendations, not_recommended) = resolve_conflicts(recommended, not_recommended);

    tracing::debug!(
        domain = domain.name(),
        rules = rules.len(),
        proposed,
        recommended = recommendations.len(),
        not_recommended = not_recommended.len(),
        "evaluated scenario"
    );

    Ok(ModelOutput {
        derived,
        recommendations,
        not_recommended,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Context, DerivedBuckets};
    use crate::data_model::{Priority, Reason};
    use crate::rule::{Rule, RuleError};
    use serde_json::json;

    struct Pond;

    struct PondFields {
        level_pct: f64,
        pump_ok: bool,
    }

    fn fill(ctx: &Context<PondFields>, out: &mut Proposals) -> Result<(), RuleError> {
        if ctx.derived().category("level")? == "low" {
            out.recommend(
                "FILL_POND",
                Priority::Medium,
                vec![Reason::new("level_low").with("pct", ctx.fields().level_pct)],
            );
        }
        Ok(())
    }

    fn pump(ctx: &Context<PondFields>, out: &mut Proposals) -> Result<(), RuleError> {
        if !ctx.fields().pump_ok {
            out.advise_against("FILL_POND", vec![Reason::new("pump_down")]);
        }
        Ok(())
    }

    fn broken(ctx: &Context<PondFields>, _out: &mut Proposals) -> Result<(), RuleError> {
        ctx.derived().flag("no_such_bucket").map(|_| ())
    }

    static RULES: [Rule<PondFields>; 2] = [Rule::new("fill", fill), Rule::new("pump", pump)];

    impl Domain for Pond {
        type Fields = PondFields;

        fn name(&self) -> &'static str {
            "pond"
        }

        fn read_fields(&self, view: &ScenarioView<'_>) -> PondFields {
            PondFields {
                level_pct: view.number(&["pond", "level_pct"], 100.0),
                pump_ok: view.flag(&["pond", "pump_ok"], true),
            }
        }

        fn derive_buckets(&self, fields: &PondFields) -> DerivedBuckets {
            let level = if fields.level_pct < 30.0 { "low" } else { "ok" };
            DerivedBuckets::new().with("level", level)
        }

        fn rules(&self) -> &[Rule<PondFields>] {
            &RULES
        }
    }

    struct BrokenPond;

    static BROKEN_RULES: [Rule<PondFields>; 1] = [Rule::new("broken", broken)];

    impl Domain for BrokenPond {
        type Fields = PondFields;

        fn name(&self) -> &'static str {
            "broken_pond"
        }

        fn read_fields(&self, view: &ScenarioView<'_>) -> PondFields {
            Pond.read_fields(view)
        }

        fn derive_buckets(&self, fields: &PondFields) -> DerivedBuckets {
            Pond.derive_buckets(fields)
        }

        fn rules(&self) -> &[Rule<PondFields>] {
            &BROKEN_RULES
        }
    }

    #[test]
    fn test_pipeline_recommends() {
        let record = json!({ "decision_inputs": { "pond": { "level_pct": 12 } } });
        let output = run_domain(&Pond, &record).unwrap();
        assert_eq!(output.derived.category("level").unwrap(), "low");
        assert_eq!(output.recommendation_codes(), vec!["FILL_POND"]);
        assert!(output.not_recommended.is_empty());
    }

    #[test]
    fn test_pipeline_applies_veto() {
        let record = json!({ "decision_inputs": { "pond": { "level_pct": 12, "pump_ok": false } } });
        let output = run_domain(&Pond, &record).unwrap();
        assert!(output.recommendations.is_empty());
        assert_eq!(output.not_recommended_codes(), vec!["FILL_POND"]);
    }

    #[test]
    fn test_empty_record_uses_defaults() {
        let output = run_domain(&Pond, &json!({})).unwrap();
        assert_eq!(output.derived.category("level").unwrap(), "ok");
        assert!(output.recommendations.is_empty());
    }

    #[test]
    fn test_rule_fault_propagates() {
        let err = run_domain(&BrokenPond, &json!({})).unwrap_err();
        match err {
            RellaError::RuleFault { domain, rule, source } => {
                assert_eq!(domain, "broken_pond");
                assert_eq!(rule, "broken");
                assert_eq!(source, RuleError::MissingBucket("no_such_bucket".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_deterministic() {
        let record = json!({ "decision_inputs": { "pond": { "level_pct": 5, "pump_ok": true } } });
        let a = run_domain(&Pond, &record).unwrap();
        let b = run_domain(&Pond, &record).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }
}
