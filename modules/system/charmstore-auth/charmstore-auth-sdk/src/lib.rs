//! Charm store authorization SDK
//!
//! This crate provides the public API for the `charmstore_auth` module:
//!
//! - [`CharmstoreAuthClient`] - Public API trait for request handlers
//! - [`Bakery`] - Macaroon verification and minting collaborator
//! - [`EntityAclStore`] - ACL lookup collaborator
//! - [`Decision`], [`DenyReason`], [`DischargeChallenge`] - Decision models
//! - [`CharmstoreAuthError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use charmstore_auth_sdk::{CharmstoreAuthClient, Decision};
//!
//! let (parts, body) = request.into_parts();
//! match auth.authorize_entity(&parts, "cs:~bob/trusty/wordpress-1").await? {
//!     Decision::Allow => { /* serve the request */ }
//!     Decision::Denied(reason) => { /* 401 */ }
//!     Decision::DischargeRequired(challenge) => { /* 407 with challenge.macaroon */ }
//! }
//! ```

pub mod api;
pub mod bakery_api;
pub mod error;
pub mod models;
pub mod store_api;

// Re-export main types at crate root
pub use api::CharmstoreAuthClient;
pub use bakery_api::Bakery;
pub use error::{
    BakeryError, CharmstoreAuthError, CredentialsError, StoreError, VerificationError,
    VerificationErrorKind,
};
pub use models::{
    CHALLENGE_COOKIE_PATH, Caveat, DeclaredAttributes, Decision, DenyReason, DischargeChallenge,
    IS_AUTHENTICATED_USER, Macaroon, NeedDeclaredCaveat, attrs,
};
pub use store_api::EntityAclStore;

pub use charmstore_security::{Acl, Authorization, EntityAcls, principals};
