//! Template and translation files for the reason catalog.
//!
//! Two YAML formats:
//! - domain templates: `languages.<lang>.<reason_key>: "<handlebars template>"`
//! - translations: catalog settings plus boolean and value words per language

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::CatalogError;

/// reason key → template, for one (domain, language)
pub type TemplateTable = HashMap<String, String>;

/// All template tables of one domain
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainTemplates {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub languages: HashMap<String, TemplateTable>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl DomainTemplates {
    /// Load templates from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_yaml(&read(path.as_ref())?)
    }

    /// Parse templates from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn table(&self, language: &str) -> Option<&TemplateTable> {
        self.languages.get(language)
    }

    /// Add or replace a single template
    pub fn with_template(
        mut self,
        language: impl Into<String>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.languages
            .entry(language.into())
            .or_default()
            .insert(key.into(), template.into());
        self
    }

    /// List languages with at least one template
    pub fn list_languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self
            .languages
            .iter()
            .filter(|(_, t)| !t.is_empty())
            .map(|(l, _)| l.as_str())
            .collect();
        langs.sort_unstable();
        langs
    }
}

/// Engine-wide localization settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_fallback_domain")]
    pub fallback_domain: String,
}

fn default_language() -> String {
    "az".to_string()
}

fn default_fallback_domain() -> String {
    "wheat".to_string()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            fallback_domain: default_fallback_domain(),
        }
    }
}

/// Words used for boolean parameters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoolWords {
    #[serde(rename = "true")]
    pub yes: String,
    #[serde(rename = "false")]
    pub no: String,
}

impl BoolWords {
    pub fn word(&self, value: bool) -> &str {
        if value {
            &self.yes
        } else {
            &self.no
        }
    }
}

/// Translations file: settings, boolean words and value words per language
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationsFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub settings: Option<CatalogSettings>,
    #[serde(default)]
    pub booleans: HashMap<String, BoolWords>,
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, String>>,
}

impl TranslationsFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_yaml(&read(path.as_ref())?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

fn read(path: &Path) -> Result<String, CatalogError> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })
}
