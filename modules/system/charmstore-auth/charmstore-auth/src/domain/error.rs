//! Domain errors for charm store authorization.

use charmstore_auth_sdk::{BakeryError, CharmstoreAuthError, StoreError};

/// Internal domain errors.
///
/// Only failures without a verdict end up here; denials and challenges are
/// [`charmstore_auth_sdk::Decision`] values.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("entity {id:?} not found")]
    EntityNotFound { id: String },

    #[error("cannot retrieve entity {id:?} for authorization: {source}")]
    StoreUnavailable {
        id: String,
        #[source]
        source: StoreError,
    },

    #[error("cannot mint macaroon: {0}")]
    MintFailed(#[source] BakeryError),

    #[error("cannot verify request: {0}")]
    Bakery(#[source] BakeryError),
}

impl DomainError {
    /// Attach the entity id to a store failure, keeping not-found distinct.
    #[must_use]
    pub fn store(id: &str, source: StoreError) -> Self {
        match source {
            StoreError::NotFound => Self::EntityNotFound { id: id.to_owned() },
            source => Self::StoreUnavailable {
                id: id.to_owned(),
                source,
            },
        }
    }
}

impl From<DomainError> for CharmstoreAuthError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::EntityNotFound { id } => Self::ResourceNotFound { id },
            DomainError::StoreUnavailable { id, source } => Self::Unavailable { id, source },
            DomainError::MintFailed(source) => Self::MintFailed(source),
            DomainError::Bakery(source) => Self::Bakery(source),
        }
    }
}
