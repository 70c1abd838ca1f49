//! Attach localized text to actions and model output.
//!
//! Structured reasons are kept; the rendered strings go into
//! `Action::localized`, replacing any earlier localization.

use rella_core::{Action, LocalizedText, ModelOutput};

use crate::renderer::ReasonCatalog;

pub fn localize_action(catalog: &ReasonCatalog, mut action: Action, domain: &str, language: &str) -> Action {
    action.localized = Some(LocalizedText {
        language: language.to_string(),
        priority: action.priority.map(|p| catalog.localize_priority(p, language)),
        reasons: catalog.render_all(&action.reasons, domain, language),
    });
    action
}

/// Localize a batch of actions, preserving order
pub fn localize_actions(catalog: &ReasonCatalog, actions: Vec<Action>, domain: &str, language: &str) -> Vec<Action> {
    actions
        .into_iter()
        .map(|a| localize_action(catalog, a, domain, language))
        .collect()
}

/// Localize both action lists of an evaluation; derived buckets are untouched
pub fn localize_output(catalog: &ReasonCatalog, output: ModelOutput, domain: &str, language: &str) -> ModelOutput {
    ModelOutput {
        derived: output.derived,
        recommendations: localize_actions(catalog, output.recommendations, domain, language),
        not_recommended: localize_actions(catalog, output.not_recommended, domain, language),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{DomainTemplates, TranslationsFile};
    use rella_core::{DerivedBuckets, Priority, Reason};

    fn catalog() -> ReasonCatalog {
        let templates = DomainTemplates::default()
            .with_template("az", "dry_conditions", "Quru şərait.")
            .with_template("az", "water_unavailable", "Su mənbəyi yoxdur (mövcud={{available}}).")
            .with_template("en", "dry_conditions", "Dry conditions.");
        let translations = TranslationsFile::from_yaml(
            r#"
booleans:
  az: { "true": "bəli", "false": "xeyr" }
values:
  az: { high: yüksək }
"#,
        )
        .unwrap();
        ReasonCatalog::default()
            .with_translations(translations)
            .with_domain("wheat", templates)
    }

    #[test]
    fn test_localize_action_keeps_reasons() {
        let action = Action::recommended("IRRIGATE_TODAY", Priority::High, vec![Reason::new("dry_conditions")]);
        let localized = localize_action(&catalog(), action, "wheat", "az");

        assert_eq!(localized.reason_keys(), vec!["dry_conditions"]);
        let text = localized.localized.unwrap();
        assert_eq!(text.language, "az");
        assert_eq!(text.priority.as_deref(), Some("yüksək"));
        assert_eq!(text.reasons, vec!["Quru şərait."]);
    }

    #[test]
    fn test_not_recommended_has_no_priority_text() {
        let action = Action::not_recommended(
            "IRRIGATE_TODAY",
            vec![Reason::new("water_unavailable").with("available", false)],
        );
        let text = localize_action(&catalog(), action, "wheat", "az").localized.unwrap();
        assert_eq!(text.priority, None);
        assert_eq!(text.reasons, vec!["Su mənbəyi yoxdur (mövcud=xeyr)."]);
    }

    #[test]
    fn test_relocalize_replaces() {
        let cat = catalog();
        let action = Action::recommended("IRRIGATE_TODAY", Priority::High, vec![Reason::new("dry_conditions")]);
        let once = localize_action(&cat, action, "wheat", "az");
        let twice = localize_action(&cat, once, "wheat", "en");

        let text = twice.localized.unwrap();
        assert_eq!(text.language, "en");
        assert_eq!(text.priority.as_deref(), Some("high"));
        assert_eq!(text.reasons, vec!["Dry conditions."]);
    }

    #[test]
    fn test_localize_output() {
        let output = ModelOutput {
            derived: DerivedBuckets::new().with("moisture_bucket", "low"),
            recommendations: vec![Action::recommended("IRRIGATE_TODAY", Priority::High, vec![Reason::new("dry_conditions")])],
            not_recommended: vec![Action::not_recommended("FERTILIZE", vec![Reason::new("unknown_key")])],
        };
        let localized = localize_output(&catalog(), output.clone(), "wheat", "az");

        assert_eq!(localized.derived, output.derived);
        assert_eq!(localized.recommendation_codes(), vec!["IRRIGATE_TODAY"]);
        let rejected = localized.rejection("FERTILIZE").unwrap();
        assert_eq!(rejected.localized.as_ref().unwrap().reasons, vec!["unknown_key"]);
    }
}
