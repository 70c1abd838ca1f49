//! Rella Domains: built-in farm domains and their bundled reason catalogs
//!
//! Each domain reads its fields from `decision_inputs`, derives buckets and
//! runs an ordered rule list (see `rella_core::Domain`). Catalogs ship as YAML
//! under `catalogs/` and are compiled into the crate.
//!
//! ```ignore
//! let registry = rella_domains::default_registry()?;
//! let output = registry.evaluate("wheat", &record)?;
//! let output = registry.localize(output, "wheat", "en");
//! ```

pub mod greenhouse;
pub mod livestock;
pub mod mixed;
pub mod orchard;
pub mod wheat;

pub use greenhouse::Greenhouse;
pub use livestock::Livestock;
pub use mixed::Mixed;
pub use orchard::Orchard;
pub use wheat::Wheat;

use once_cell::sync::Lazy;
use rella_core::RellaError;
use rella_out::{CatalogError, DomainTemplates, ReasonCatalog, TranslationsFile};
use rella_registry::DomainRegistry;

/// Names of the built-in domains, sorted
pub const BUILTIN_DOMAINS: [&str; 5] = ["greenhouse", "livestock", "mixed", "orchard", "wheat"];

static TRANSLATIONS: Lazy<TranslationsFile> = Lazy::new(|| {
    bundled(
        "translations",
        TranslationsFile::from_yaml(include_str!("../catalogs/translations.yaml")),
    )
});

static TEMPLATES: Lazy<Vec<(&'static str, DomainTemplates)>> = Lazy::new(|| {
    [
        ("greenhouse", include_str!("../catalogs/greenhouse.yaml")),
        ("livestock", include_str!("../catalogs/livestock.yaml")),
        ("mixed", include_str!("../catalogs/mixed.yaml")),
        ("orchard", include_str!("../catalogs/orchard.yaml")),
        ("wheat", include_str!("../catalogs/wheat.yaml")),
    ]
    .into_iter()
    .map(|(domain, yaml)| (domain, bundled(domain, DomainTemplates::from_yaml(yaml))))
    .collect()
});

static CATALOG: Lazy<ReasonCatalog> = Lazy::new(|| {
    let mut catalog = ReasonCatalog::default().with_translations(TRANSLATIONS.clone());
    for (domain, templates) in TEMPLATES.iter() {
        catalog.add_domain(domain, templates.clone());
    }
    catalog
});

fn bundled<T: Default>(name: &str, parsed: Result<T, CatalogError>) -> T {
    parsed.unwrap_or_else(|e| {
        tracing::warn!(catalog = name, error = %e, "bundled catalog unreadable; using empty tables");
        T::default()
    })
}

/// Bundled template tables of a built-in domain
pub fn bundled_templates(domain: &str) -> Option<&'static DomainTemplates> {
    TEMPLATES.iter().find(|(d, _)| *d == domain).map(|(_, t)| t)
}

/// Bundled settings plus boolean and value words
pub fn bundled_translations() -> &'static TranslationsFile {
    &TRANSLATIONS
}

/// Catalog holding every bundled domain table
pub fn builtin_catalog() -> &'static ReasonCatalog {
    &CATALOG
}

/// Registry with all five built-in domains and their bundled catalogs
pub fn default_registry() -> Result<DomainRegistry, RellaError> {
    let templates = |domain: &str| bundled_templates(domain).cloned().unwrap_or_default();

    let mut builder = DomainRegistry::builder();
    builder
        .translations(bundled_translations().clone())
        .register_localized(Wheat, templates("wheat"))?
        .register_localized(Livestock, templates("livestock"))?
        .register_localized(Orchard, templates("orchard"))?
        .register_localized(Greenhouse, templates("greenhouse"))?
        .register_localized(Mixed, templates("mixed"))?;
    Ok(builder.build())
}

/// Round to one decimal, as reported per-animal amounts are
///
/// Rounds the exact decimal value with ties to even, so 0.25 becomes 0.2.
pub(crate) fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1_ties_to_even() {
        assert_eq!(round1(0.25), 0.2);
        assert_eq!(round1(0.75), 0.8);
        assert_eq!(round1(0.35), 0.3);
        assert_eq!(round1(100.0 / 3.0), 33.3);
        assert_eq!(round1(9.96), 10.0);
        assert_eq!(round1(-2.25), -2.2);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_bundled_catalogs_parse() {
        for domain in BUILTIN_DOMAINS {
            let templates = DomainTemplates::from_yaml(match domain {
                "greenhouse" => include_str!("../catalogs/greenhouse.yaml"),
                "livestock" => include_str!("../catalogs/livestock.yaml"),
                "mixed" => include_str!("../catalogs/mixed.yaml"),
                "orchard" => include_str!("../catalogs/orchard.yaml"),
                _ => include_str!("../catalogs/wheat.yaml"),
            })
            .unwrap();
            assert_eq!(templates.list_languages(), vec!["az", "en"], "{domain}");
        }
        TranslationsFile::from_yaml(include_str!("../catalogs/translations.yaml")).unwrap();
    }

    #[test]
    fn test_az_and_en_cover_same_keys() {
        for domain in BUILTIN_DOMAINS {
            let templates = bundled_templates(domain).unwrap();
            let mut az: Vec<&String> = templates.table("az").unwrap().keys().collect();
            let mut en: Vec<&String> = templates.table("en").unwrap().keys().collect();
            az.sort();
            en.sort();
            assert_eq!(az, en, "{domain}");
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.list_domains(), BUILTIN_DOMAINS.to_vec());
        assert_eq!(catalog.settings().default_language, "az");
        assert_eq!(catalog.settings().fallback_domain, "wheat");
    }
}
