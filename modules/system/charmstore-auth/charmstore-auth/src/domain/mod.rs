//! Domain layer for charm store authorization.

pub mod authenticator;
pub mod credentials;
pub mod error;
pub mod local_client;
pub mod minter;
pub mod service;

pub use authenticator::Authenticator;
pub use error::DomainError;
pub use local_client::CharmstoreAuthLocalClient;
pub use minter::MacaroonMinter;
pub use service::Service;
