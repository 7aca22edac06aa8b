//! Domain models for the charm store authorization module.

use std::collections::HashMap;

use charmstore_security::MembershipError;
use serde::{Deserialize, Serialize};

use crate::error::{CredentialsError, VerificationError};

/// Attribute names declared back to the charm store by the identity service.
pub mod attrs {
    pub const USERNAME: &str = "username";
    /// Whitespace-separated list of group names.
    pub const GROUPS: &str = "groups";
}

/// Condition the identity service discharges for a logged-in user.
pub const IS_AUTHENTICATED_USER: &str = "is-authenticated-user";

/// Cookie path of every discharge challenge: the whole service.
pub const CHALLENGE_COOKIE_PATH: &str = "/";

/// Attributes declared by a verified macaroon.
pub type DeclaredAttributes = HashMap<String, String>;

/// An opaque macaroon as produced by the [`crate::Bakery`].
///
/// The authorization module never looks inside; it only forwards the value
/// to the client in a discharge challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Macaroon(serde_json::Value);

impl Macaroon {
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

/// A first- or third-party caveat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caveat {
    /// Location of the discharging service; empty for first-party caveats.
    pub location: String,
    pub condition: String,
}

/// A third-party caveat whose discharge must declare the listed attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedDeclaredCaveat {
    pub caveat: Caveat,
    pub declared: Vec<String>,
}

impl NeedDeclaredCaveat {
    /// The caveat the charm store attaches to every challenge: prove to
    /// `location` that you are an authenticated user and declare your
    /// username and groups.
    #[must_use]
    pub fn authenticated_user(location: impl Into<String>) -> Self {
        Self {
            caveat: Caveat {
                location: location.into(),
                condition: IS_AUTHENTICATED_USER.to_owned(),
            },
            declared: vec![attrs::USERNAME.to_owned(), attrs::GROUPS.to_owned()],
        }
    }
}

/// Why a request was refused.
///
/// The messages are safe to return to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DenyReason {
    /// Basic credentials were supplied but do not match the admin pair.
    #[error("invalid user name or password")]
    InvalidCredentials,

    /// Authentication could not be attempted: a malformed Basic header, or
    /// no credentials while macaroon verification is not configured.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(CredentialsError),

    /// The identity service declared no username.
    #[error("no username declared")]
    InvalidIdentity,

    /// The authenticated user is not in the ACL.
    #[error("access denied for user {username:?}")]
    AccessDenied { username: String },
}

impl From<MembershipError> for DenyReason {
    fn from(e: MembershipError) -> Self {
        match e {
            MembershipError::InvalidIdentity => Self::InvalidIdentity,
            MembershipError::AccessDenied { username } => Self::AccessDenied { username },
        }
    }
}

/// A freshly minted macaroon the client must discharge and resend.
#[derive(Debug, Clone)]
pub struct DischargeChallenge {
    pub macaroon: Macaroon,
    /// Path the discharged macaroon cookie applies to.
    pub cookie_path: String,
    /// The verification failure that triggered the challenge.
    pub cause: VerificationError,
}

/// Outcome of an authorization decision.
#[must_use]
#[derive(Debug, Clone)]
pub enum Decision {
    /// The request may proceed.
    Allow,
    /// The request is refused.
    Denied(DenyReason),
    /// The caller should discharge the challenge macaroon and retry.
    DischargeRequired(DischargeChallenge),
}

impl Decision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}
