//! Reason rendering for Rella.
//!
//! Templates are Handlebars strings compiled once when a domain's tables are
//! added. Rendering is total: a missing template yields the raw reason key, a
//! missing parameter or an uncompilable template yields the template text.

use handlebars::Handlebars;
use rella_core::{Priority, Reason, Scalar};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::templates::{BoolWords, CatalogSettings, DomainTemplates, TemplateTable, TranslationsFile};

/// Localized templates and translation maps, keyed by (domain, language, key)
pub struct ReasonCatalog {
    settings: CatalogSettings,
    tables: HashMap<String, HashMap<String, TemplateTable>>,
    booleans: HashMap<String, BoolWords>,
    values: HashMap<String, HashMap<String, String>>,
    handlebars: Handlebars<'static>,
}

impl ReasonCatalog {
    pub fn new(settings: CatalogSettings) -> Self {
        let mut handlebars = Handlebars::new();
        // Missing parameters must fail so the template text is used instead
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        Self {
            settings,
            tables: HashMap::new(),
            booleans: HashMap::new(),
            values: HashMap::new(),
            handlebars,
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn with_translations(mut self, translations: TranslationsFile) -> Self {
        self.add_translations(translations);
        self
    }

    pub fn with_domain(mut self, domain: &str, templates: DomainTemplates) -> Self {
        self.add_domain(domain, templates);
        self
    }

    /// Merge boolean/value words; settings in the file replace the current ones
    pub fn add_translations(&mut self, translations: TranslationsFile) {
        if let Some(settings) = translations.settings {
            self.settings = settings;
        }
        self.booleans.extend(translations.booleans);
        for (language, words) in translations.values {
            self.values.entry(language).or_default().extend(words);
        }
    }

    /// Merge a domain's template tables, compiling every template
    pub fn add_domain(&mut self, domain: &str, templates: DomainTemplates) {
        for (language, table) in templates.languages {
            for (key, template) in &table {
                let name = template_name(domain, &language, key);
                if let Err(e) = self.handlebars.register_template_string(&name, template) {
                    // A replaced key must not keep rendering its previous template
                    self.handlebars.unregister_template(&name);
                    tracing::warn!(template = %name, error = %e, "template failed to compile; raw text will be used");
                }
            }
            self.tables
                .entry(domain.to_string())
                .or_default()
                .entry(language)
                .or_default()
                .extend(table);
        }
    }

    /// Whether any template table exists for `domain`
    pub fn has_domain(&self, domain: &str) -> bool {
        self.tables
            .get(domain)
            .map(|langs| langs.values().any(|t| !t.is_empty()))
            .unwrap_or(false)
    }

    /// List domains with templates
    pub fn list_domains(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = self
            .tables
            .keys()
            .filter(|d| self.has_domain(d))
            .map(|d| d.as_str())
            .collect();
        domains.sort_unstable();
        domains
    }

    /// Select the table used for (domain, language)
    ///
    /// Order: (domain, language), (domain, default language),
    /// (fallback domain, language), (fallback domain, default language).
    /// Returns the (domain, language) the table was found under.
    pub fn select_table(&self, domain: &str, language: &str) -> Option<(&str, &str, &TemplateTable)> {
        let default_language = self.settings.default_language.as_str();
        let fallback_domain = self.settings.fallback_domain.as_str();

        [
            (domain, language),
            (domain, default_language),
            (fallback_domain, language),
            (fallback_domain, default_language),
        ]
        .into_iter()
        .find_map(|(d, l)| {
            let (table_domain, langs) = self.tables.get_key_value(d)?;
            let (table_language, table) = langs.get_key_value(l)?;
            (!table.is_empty()).then_some((table_domain.as_str(), table_language.as_str(), table))
        })
    }

    /// Template text used for `key`, if any
    pub fn template(&self, domain: &str, language: &str, key: &str) -> Option<&str> {
        self.select_table(domain, language)
            .and_then(|(_, _, table)| table.get(key))
            .map(String::as_str)
    }

    /// Localized word for a categorical value, or the value itself
    pub fn translate_value<'a>(&'a self, value: &'a str, language: &str) -> &'a str {
        self.values
            .get(language)
            .and_then(|words| words.get(value))
            .map(String::as_str)
            .unwrap_or(value)
    }

    pub fn localize_priority(&self, priority: Priority, language: &str) -> String {
        self.translate_value(priority.as_str(), language).to_string()
    }

    /// Translate booleans and known categorical strings; numbers pass through
    pub fn normalize_params(&self, params: &BTreeMap<String, Scalar>, language: &str) -> Map<String, Value> {
        let bools = self.booleans.get(language);
        params
            .iter()
            .map(|(name, value)| {
                let normalized = match value {
                    Scalar::Bool(b) => match bools {
                        Some(words) => Value::String(words.word(*b).to_string()),
                        None => Value::Bool(*b),
                    },
                    Scalar::Text(s) => Value::String(self.translate_value(s, language).to_string()),
                    other => other.to_json(),
                };
                (name.clone(), normalized)
            })
            .collect()
    }

    /// Render one reason. Never fails.
    pub fn render(&self, reason: &Reason, domain: &str, language: &str) -> String {
        let Some((table_domain, table_language, table)) = self.select_table(domain, language) else {
            tracing::debug!(domain, language, key = %reason.key, "no template table; rendering raw key");
            return reason.key.clone();
        };
        let Some(template) = table.get(&reason.key) else {
            tracing::debug!(domain, language, key = %reason.key, "template missing; rendering raw key");
            return reason.key.clone();
        };

        let name = template_name(table_domain, table_language, &reason.key);
        if !self.handlebars.has_template(&name) {
            return template.clone();
        }

        let data = Value::Object(self.normalize_params(&reason.params, language));
        match self.handlebars.render(&name, &data) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(template = %name, error = %e, "render failed; using template text");
                template.clone()
            }
        }
    }

    pub fn render_all(&self, reasons: &[Reason], domain: &str, language: &str) -> Vec<String> {
        reasons
            .iter()
            .map(|r| self.render(r, domain, language))
            .collect()
    }
}

impl Default for ReasonCatalog {
    fn default() -> Self {
        Self::new(CatalogSettings::default())
    }
}

fn template_name(domain: &str, language: &str, key: &str) -> String {
    format!("{domain}/{language}/{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_catalog() -> ReasonCatalog {
        let wheat = DomainTemplates::from_yaml(
            r#"
languages:
  az:
    soil_moisture_low: "Torpaq rütubəti aşağıdır ({{sm}}%)."
    irrigation_not_possible: "Suvarma mümkün deyil (mümkün={{irrigation_possible}})."
    soil_moisture_level: "Torpaq rütubəti {{moisture_bucket}} səviyyədədir ({{sm}}%)."
  en:
    soil_moisture_low: "Soil moisture is low ({{sm}}%)."
"#,
        )
        .unwrap();
        let orchard = DomainTemplates::from_yaml(
            r#"
languages:
  az:
    high_wind_warning: "Güclü külək xəbərdarlığı ({{wind}} km/saat)."
    broken: "Açılmamış {{#if x}} blok"
"#,
        )
        .unwrap();
        let translations = TranslationsFile::from_yaml(
            r#"
booleans:
  az: { "true": "bəli", "false": "xeyr" }
values:
  az: { low: aşağı, high: yüksək }
"#,
        )
        .unwrap();

        ReasonCatalog::default()
            .with_translations(translations)
            .with_domain("wheat", wheat)
            .with_domain("orchard", orchard)
    }

    #[test]
    fn test_render_requested_language() {
        let catalog = test_catalog();
        let reason = Reason::new("soil_moisture_low").with("sm", 15.0);
        assert_eq!(catalog.render(&reason, "wheat", "en"), "Soil moisture is low (15.0%).");
        assert_eq!(catalog.render(&reason, "wheat", "az"), "Torpaq rütubəti aşağıdır (15.0%).");
    }

    #[test]
    fn test_falls_back_to_default_language() {
        let catalog = test_catalog();
        let reason = Reason::new("high_wind_warning").with("wind", 45i64);
        assert_eq!(catalog.render(&reason, "orchard", "en"), "Güclü külək xəbərdarlığı (45 km/saat).");
    }

    #[test]
    fn test_falls_back_to_fallback_domain() {
        let catalog = test_catalog();
        let reason = Reason::new("soil_moisture_low").with("sm", 12i64);
        assert_eq!(catalog.render(&reason, "greenhouse", "en"), "Soil moisture is low (12%).");
        assert_eq!(catalog.render(&reason, "greenhouse", "ru"), "Torpaq rütubəti aşağıdır (12%).");
    }

    #[test]
    fn test_key_missing_from_selected_table_renders_key() {
        let catalog = test_catalog();
        // en table exists for wheat but lacks this key; no per-key fallthrough
        let reason = Reason::new("irrigation_not_possible").with("irrigation_possible", false);
        assert_eq!(catalog.render(&reason, "wheat", "en"), "irrigation_not_possible");
        assert_eq!(catalog.render(&Reason::new("no_such_key"), "wheat", "az"), "no_such_key");
    }

    #[test]
    fn test_empty_catalog_renders_key() {
        let catalog = ReasonCatalog::default();
        assert_eq!(catalog.render(&Reason::new("dry_conditions"), "wheat", "az"), "dry_conditions");
    }

    #[test]
    fn test_boolean_and_value_translation() {
        let catalog = test_catalog();
        let reason = Reason::new("irrigation_not_possible").with("irrigation_possible", false);
        assert_eq!(catalog.render(&reason, "wheat", "az"), "Suvarma mümkün deyil (mümkün=xeyr).");

        let reason = Reason::new("soil_moisture_level").with("moisture_bucket", "high").with("sm", 40.0);
        assert_eq!(catalog.render(&reason, "wheat", "az"), "Torpaq rütubəti yüksək səviyyədədir (40.0%).");
    }

    #[test]
    fn test_unknown_values_pass_through() {
        let catalog = test_catalog();
        let params = BTreeMap::from([
            ("stage".to_string(), Scalar::from("booting")),
            ("sm".to_string(), Scalar::from(18.5)),
            ("ok".to_string(), Scalar::from(true)),
        ]);
        let normalized = catalog.normalize_params(&params, "en");
        assert_eq!(normalized["stage"], "booting");
        assert_eq!(normalized["sm"], 18.5);
        assert_eq!(normalized["ok"], true);
    }

    #[test]
    fn test_missing_param_renders_template_text() {
        let catalog = test_catalog();
        let reason = Reason::new("soil_moisture_low");
        assert_eq!(catalog.render(&reason, "wheat", "en"), "Soil moisture is low ({{sm}}%).");
    }

    #[test]
    fn test_uncompilable_template_renders_text() {
        let catalog = test_catalog();
        assert_eq!(catalog.render(&Reason::new("broken"), "orchard", "az"), "Açılmamış {{#if x}} blok");
    }

    #[test]
    fn test_replaced_template_failing_to_compile_renders_new_text() {
        let mut catalog = test_catalog();
        catalog.add_domain(
            "wheat",
            DomainTemplates::default().with_template("en", "soil_moisture_low", "Dry soil {{#if sm}}"),
        );
        let reason = Reason::new("soil_moisture_low").with("sm", 15.0);
        assert_eq!(catalog.template("wheat", "en", "soil_moisture_low"), Some("Dry soil {{#if sm}}"));
        assert_eq!(catalog.render(&reason, "wheat", "en"), "Dry soil {{#if sm}}");
    }

    #[test]
    fn test_no_html_escaping() {
        let catalog = ReasonCatalog::default().with_domain(
            "wheat",
            DomainTemplates::default().with_template("az", "stage_is", "Mərhələ: {{stage}}."),
        );
        let reason = Reason::new("stage_is").with("stage", "<early & late>");
        assert_eq!(catalog.render(&reason, "wheat", "az"), "Mərhələ: <early & late>.");
    }

    #[test]
    fn test_localize_priority() {
        let catalog = test_catalog();
        assert_eq!(catalog.localize_priority(Priority::High, "az"), "yüksək");
        assert_eq!(catalog.localize_priority(Priority::Medium, "az"), "medium");
        assert_eq!(catalog.localize_priority(Priority::High, "en"), "high");
    }

    #[test]
    fn test_list_domains() {
        let catalog = test_catalog();
        assert_eq!(catalog.list_domains(), vec!["orchard", "wheat"]);
        assert!(catalog.has_domain("wheat"));
        assert!(!catalog.has_domain("mixed"));
    }
}
