//! Error types for guide construction and navigation.

use thiserror::Error;

/// Errors raised while building or driving a guide page.
///
/// Runtime scroll tracking never surfaces these: a missing anchor during
/// tracking is logged and skipped. They are returned where a caller asked for
/// something specific (a section to scroll to, a content file to load).
#[derive(Debug, Error)]
pub enum GuideError {
    /// Section list violates id uniqueness or ordering.
    #[error("invalid section list: {0}")]
    InvalidSections(String),

    /// Requested section id is not in the page's section list.
    #[error("unknown section: {0}")]
    UnknownSection(String),

    /// Section id is configured but no element carries it.
    #[error("no element with id \"{0}\" in the document")]
    MissingAnchor(String),

    /// A metadata URL failed to parse as an absolute URL.
    #[error("invalid URL for {field}: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    /// Content data failed a structural check.
    #[error("invalid content in {slug}: {message}")]
    InvalidContent { slug: String, message: String },

    /// Guide slug not present in the bundled catalog.
    #[error("no bundled guide named {0}")]
    UnknownGuide(String),

    /// YAML content failed to deserialize.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON-LD serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading a content file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GuideError>;
