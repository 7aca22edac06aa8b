//! Error types for the charm store authorization module.

use thiserror::Error;

/// Errors from parsing an HTTP Basic `Authorization` header.
///
/// [`CredentialsError::Missing`] is not a failure from the caller's point of
/// view: it means no Basic credentials were offered and macaroon
/// verification may be tried instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("missing HTTP auth header")]
    Missing,

    #[error("invalid HTTP auth header")]
    MalformedHeader,

    #[error("invalid HTTP auth encoding")]
    MalformedEncoding,

    #[error("invalid HTTP auth contents")]
    MalformedContents,
}

/// Distinguishes a macaroon that needs a third-party discharge from one
/// that failed verification outright (or is absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationErrorKind {
    /// A macaroon was found but its third-party caveat is not discharged.
    DischargeRequired,
    /// No usable macaroon: absent, unknown, expired, or a caveat failed.
    Invalid,
}

/// Macaroon verification failure reported by the [`crate::Bakery`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("verification failed: {message}")]
pub struct VerificationError {
    kind: VerificationErrorKind,
    message: String,
}

impl VerificationError {
    #[must_use]
    pub fn new(kind: VerificationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn discharge_required(message: impl Into<String>) -> Self {
        Self::new(VerificationErrorKind::DischargeRequired, message)
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(VerificationErrorKind::Invalid, message)
    }

    #[must_use]
    pub fn kind(&self) -> VerificationErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn is_discharge_required(&self) -> bool {
        self.kind == VerificationErrorKind::DischargeRequired
    }
}

/// Errors returned by a [`crate::Bakery`] implementation.
#[derive(Debug, Clone, Error)]
pub enum BakeryError {
    /// The request carried no usable proof of identity.
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// The caller's request context was cancelled.
    #[error("bakery call cancelled")]
    Cancelled,

    /// The caller's deadline elapsed.
    #[error("bakery call timed out")]
    Timeout,

    /// The bakery (or its backing identity service) cannot be reached.
    #[error("bakery unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors returned by an [`crate::EntityAclStore`] implementation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors from the authorization API.
///
/// These are failures that carry no authorization verdict. Denial and
/// discharge challenges are expressed through [`crate::Decision`], not here.
#[derive(Debug, Error)]
pub enum CharmstoreAuthError {
    /// The entity does not exist. Callers should answer 404 rather than 401.
    #[error("entity {id:?} not found")]
    ResourceNotFound { id: String },

    /// The entity store failed for a reason other than `NotFound`.
    #[error("cannot retrieve entity {id:?} for authorization: {source}")]
    Unavailable {
        id: String,
        #[source]
        source: StoreError,
    },

    /// A discharge challenge was needed but the bakery could not mint one.
    #[error("cannot mint macaroon: {0}")]
    MintFailed(#[source] BakeryError),

    /// Macaroon verification failed for a reason other than verification
    /// (cancellation, timeout, unreachable identity service).
    #[error("cannot verify request: {0}")]
    Bakery(#[source] BakeryError),
}
