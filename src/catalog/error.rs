// Catalog error types

use hyper::StatusCode;
use thiserror::Error;

/// Failure of a sign-up or removal against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Activity not found")]
    ActivityNotFound,
    #[error("Student already signed up for this activity")]
    AlreadySignedUp,
    #[error("Participant not found in activity")]
    ParticipantNotFound,
}

impl CatalogError {
    /// HTTP status reported to the caller for this error
    pub const fn status(self) -> StatusCode {
        match self {
            Self::ActivityNotFound | Self::ParticipantNotFound => StatusCode::NOT_FOUND,
            Self::AlreadySignedUp => StatusCode::BAD_REQUEST,
        }
    }
}

/// Failure while loading a catalog seed file at startup
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse seed file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("seed file '{0}' defines no activities")]
    Empty(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(CatalogError::ActivityNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(CatalogError::ParticipantNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(CatalogError::AlreadySignedUp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_detail_messages() {
        assert_eq!(CatalogError::ActivityNotFound.to_string(), "Activity not found");
        assert_eq!(
            CatalogError::AlreadySignedUp.to_string(),
            "Student already signed up for this activity"
        );
        assert_eq!(
            CatalogError::ParticipantNotFound.to_string(),
            "Participant not found in activity"
        );
    }
}
