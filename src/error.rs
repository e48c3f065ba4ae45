//! Error types for the quotedoc library.

use crate::builder::SectionRole;
use thiserror::Error;

/// Result type alias for quotedoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while composing a document tree.
///
/// None of these ever reach callers of [`crate::Selector::generate`]; they
/// travel between tiers and sections and end, at worst, in a diagnostic
/// document.
#[derive(Error, Debug)]
pub enum Error {
    /// The quotation record was entirely absent where a builder requires it.
    #[error("quotation data is missing")]
    MissingQuotation,

    /// A section builder failed to produce its node.
    #[error("failed to build {section} section: {reason}")]
    SectionBuild {
        /// Which section failed.
        section: SectionRole,
        /// Human-readable failure description.
        reason: String,
    },

    /// The configured template type is not one of the known brands.
    #[error("unknown template type: {0:?}")]
    UnknownTemplateType(String),

    /// Fetching the company seal image failed.
    #[error("seal fetch failed: {0}")]
    SealFetch(String),

    /// Serializing the document tree failed.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::SealFetch(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingQuotation;
        assert_eq!(err.to_string(), "quotation data is missing");

        let err = Error::SectionBuild {
            section: SectionRole::ItemsTable,
            reason: "bad row".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to build items table section: bad row"
        );

        let err = Error::UnknownTemplateType("fancy".to_string());
        assert_eq!(err.to_string(), "unknown template type: \"fancy\"");
    }

    #[test]
    fn test_serde_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialize(_)));
    }
}
