//! Rella-OUT: reason catalog and localization
//!
//! Renders the symbolic reasons produced by domain rules into text in a
//! requested language. Templates are loaded per domain from YAML and rendered
//! with Handlebars; booleans and categorical values are translated first.
//!
//! # Example
//!
//! ```ignore
//! use rella_out::{DomainTemplates, ReasonCatalog, TranslationsFile};
//!
//! let catalog = ReasonCatalog::default()
//!     .with_translations(TranslationsFile::load("catalogs/translations.yaml")?)
//!     .with_domain("wheat", DomainTemplates::load("catalogs/wheat.yaml")?);
//!
//! let text = catalog.render(&reason, "wheat", "en");
//! ```

pub mod localize;
pub mod renderer;
pub mod templates;

pub use localize::{localize_action, localize_actions, localize_output};
pub use renderer::ReasonCatalog;
pub use templates::{BoolWords, CatalogSettings, DomainTemplates, TemplateTable, TranslationsFile};

use thiserror::Error;

/// Errors raised while loading catalog files
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("CATALOG/read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CATALOG/parse: {0}")]
    Parse(#[from] serde_yaml::Error),
}
