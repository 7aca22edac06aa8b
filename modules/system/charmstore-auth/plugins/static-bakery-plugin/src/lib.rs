#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Bakery Plugin
//!
//! A [`charmstore_auth_sdk::Bakery`] for development and testing. Macaroons
//! are plain cookie values: configured values map to fixed identities, and
//! minted macaroons stay undischarged until [`domain::Service::discharge`]
//! is called. No signatures are checked.
//!
//! ## Configuration
//!
//! ```yaml
//! static_bakery_plugin:
//!   location: "charmstore"
//!   cookie_prefix: "macaroon-"
//!   max_pending: 1024
//!   identities:
//!     - macaroon: "alice-token"
//!       username: "alice"
//!       groups: ["charmers"]
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use module::StaticBakeryPlugin;
