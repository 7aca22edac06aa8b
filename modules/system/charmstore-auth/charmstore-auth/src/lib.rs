//! Charm store request authorization module
//!
//! Decides for every inbound request whether the caller may act on a
//! resource. Callers are identified either by the static administrator
//! credentials (HTTP Basic) or by a discharged macaroon verified through the
//! [`charmstore_auth_sdk::Bakery`]. When neither is present and macaroon
//! authentication is configured, a fresh discharge challenge is minted
//! instead of denying the request.
//!
//! Provides the `CharmstoreAuthClient` implementation for consumption by
//! request handlers.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod module;

pub use config::CharmstoreAuthConfig;
pub use module::CharmstoreAuth;
