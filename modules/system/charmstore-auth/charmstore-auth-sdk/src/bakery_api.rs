//! Collaborator trait for macaroon verification and minting.
//!
//! The bakery owns every cryptographic detail: caveat construction,
//! signatures, discharge verification. The authorization module only asks
//! it to check a request or to mint a challenge.

use async_trait::async_trait;
use http::request::Parts;

use crate::error::BakeryError;
use crate::models::{Caveat, DeclaredAttributes, Macaroon, NeedDeclaredCaveat};

/// Macaroon verification and minting service.
///
/// Implementations must be safe to call from many requests at once.
/// Calls may block on I/O; callers bound them with their own deadline, and
/// implementations report cancellation or timeout as
/// [`BakeryError::Cancelled`] / [`BakeryError::Timeout`].
#[async_trait]
pub trait Bakery: Send + Sync {
    /// Verify the macaroons carried by `request` (typically in cookies)
    /// against `required` first-party caveats, returning the attributes the
    /// discharges declared.
    ///
    /// # Errors
    ///
    /// - `Verification` if the request carries no usable macaroon or one
    ///   still needs a discharge
    /// - `Cancelled`, `Timeout`, `Unavailable`, `Internal` otherwise
    async fn check_request(
        &self,
        request: &Parts,
        required: &[Caveat],
    ) -> Result<DeclaredAttributes, BakeryError>;

    /// Mint a new macaroon carrying the given third-party caveat.
    ///
    /// # Errors
    ///
    /// Any [`BakeryError`] other than `Verification`.
    async fn new_macaroon(&self, caveat: NeedDeclaredCaveat) -> Result<Macaroon, BakeryError>;
}
