//! Rella Registry: name → domain pipeline, plus the shared reason catalog
//!
//! Built once with [`RegistryBuilder`] and read-only afterwards, so a single
//! registry can be shared across threads.
use rella_core::{DomainPipeline, ModelOutput, RellaError};
use rella_out::{localize_output, CatalogSettings, DomainTemplates, ReasonCatalog, TranslationsFile};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Summary of a registered domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub name: String,
    pub rules: Vec<String>,
    pub localized: bool,
}

struct Entry {
    pipeline: Box<dyn DomainPipeline>,
    localized: bool,
}

#[derive(Default)]
pub struct RegistryBuilder {
    entries: BTreeMap<String, Entry>,
    catalog: ReasonCatalog,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a domain without reason templates
    pub fn register<P>(&mut self, pipeline: P) -> Result<&mut Self, RellaError>
    where
        P: DomainPipeline + 'static,
    {
        self.insert(Box::new(pipeline), false)
    }

    /// Register a domain together with its template tables
    pub fn register_localized<P>(&mut self, pipeline: P, templates: DomainTemplates) -> Result<&mut Self, RellaError>
    where
        P: DomainPipeline + 'static,
    {
        let name = pipeline.domain_name();
        self.insert(Box::new(pipeline), true)?;
        self.catalog.add_domain(name, templates);
        Ok(self)
    }

    pub fn translations(&mut self, translations: TranslationsFile) -> &mut Self {
        self.catalog.add_translations(translations);
        self
    }

    pub fn settings(&mut self, settings: CatalogSettings) -> &mut Self {
        self.catalog.add_translations(TranslationsFile {
            settings: Some(settings),
            ..TranslationsFile::default()
        });
        self
    }

    pub fn build(self) -> DomainRegistry {
        DomainRegistry {
            entries: self.entries,
            catalog: self.catalog,
        }
    }

    fn insert(&mut self, pipeline: Box<dyn DomainPipeline>, localized: bool) -> Result<&mut Self, RellaError> {
        let name = pipeline.domain_name();
        if self.entries.contains_key(name) {
            return Err(RellaError::DuplicateDomain(name.to_string()));
        }
        tracing::info!(domain = name, rules = pipeline.rule_names().len(), localized, "registered domain");
        self.entries.insert(name.to_string(), Entry { pipeline, localized });
        Ok(self)
    }
}

pub struct DomainRegistry {
    entries: BTreeMap<String, Entry>,
    catalog: ReasonCatalog,
}

impl DomainRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registered names, sorted
    pub fn list_domains(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Look up a domain's pipeline
    pub fn bundle(&self, name: &str) -> Result<&dyn DomainPipeline, RellaError> {
        match self.entries.get(name) {
            Some(entry) => Ok(entry.pipeline.as_ref()),
            None => {
                tracing::warn!(domain = name, "unknown domain requested");
                Err(RellaError::unknown_domain(name, self.list_domains()))
            }
        }
    }

    pub fn info(&self, name: &str) -> Result<DomainInfo, RellaError> {
        let pipeline = self.bundle(name)?;
        Ok(DomainInfo {
            name: name.to_string(),
            rules: pipeline.rule_names().into_iter().map(String::from).collect(),
            localized: self.is_localized(name),
        })
    }

    /// Evaluate a scenario record with the named domain
    pub fn evaluate(&self, name: &str, record: &Value) -> Result<ModelOutput, RellaError> {
        self.bundle(name)?.evaluate(record)
    }

    /// Whether the domain was registered with templates
    pub fn is_localized(&self, name: &str) -> bool {
        self.entries.get(name).map(|e| e.localized).unwrap_or(false)
    }

    /// Attach localized text; domains without templates pass through unchanged
    pub fn localize(&self, output: ModelOutput, name: &str, language: &str) -> ModelOutput {
        if !self.is_localized(name) {
            tracing::debug!(domain = name, "domain has no templates; output left as is");
            return output;
        }
        localize_output(&self.catalog, output, name, language)
    }

    /// Evaluate, then localize
    pub fn evaluate_localized(&self, name: &str, record: &Value, language: &str) -> Result<ModelOutput, RellaError> {
        let output = self.evaluate(name, record)?;
        Ok(self.localize(output, name, language))
    }

    pub fn catalog(&self) -> &ReasonCatalog {
        &self.catalog
    }
}
