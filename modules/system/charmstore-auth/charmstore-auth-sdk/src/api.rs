//! Public API trait for charm store request authorization.
//!
//! Request handlers call this trait once per request. The module implements
//! it and delegates to the entity store and the bakery.

use async_trait::async_trait;
use charmstore_security::Acl;
use http::request::Parts;

use crate::error::CharmstoreAuthError;
use crate::models::Decision;

/// Public API trait for charm store request authorization.
///
/// ```ignore
/// let (parts, body) = request.into_parts();
/// let decision = auth.authorize_entity(&parts, id).await?;
/// ```
///
/// Denials and discharge challenges are [`Decision`] variants, not errors:
/// the dispatch layer must handle all three outcomes.
#[async_trait]
pub trait CharmstoreAuthClient: Send + Sync {
    /// Authorize a request against an explicit ACL.
    ///
    /// # Errors
    ///
    /// - `MintFailed` if a discharge challenge was needed but could not be minted
    /// - `Bakery` if macaroon verification failed for a non-verification reason
    async fn authorize(&self, request: &Parts, acl: &Acl) -> Result<Decision, CharmstoreAuthError>;

    /// Authorize a request against the ACLs of the given entity, using the
    /// write ACL for mutating methods and the read ACL otherwise.
    ///
    /// # Errors
    ///
    /// - `ResourceNotFound` if the entity does not exist
    /// - `Unavailable` if the entity store failed
    /// - everything [`CharmstoreAuthClient::authorize`] returns
    async fn authorize_entity(
        &self,
        request: &Parts,
        entity_id: &str,
    ) -> Result<Decision, CharmstoreAuthError>;

    /// Authorize a request, choosing between already-known read and write ACLs
    /// by method.
    ///
    /// # Errors
    ///
    /// Same as [`CharmstoreAuthClient::authorize`].
    async fn authorize_with_perms(
        &self,
        request: &Parts,
        read: &Acl,
        write: &Acl,
    ) -> Result<Decision, CharmstoreAuthError>;

    /// Authorize a request to change the promulgation status of an entity.
    /// Only members of the promulgators group (and the admin) may do so.
    ///
    /// # Errors
    ///
    /// Same as [`CharmstoreAuthClient::authorize`].
    async fn authorize_promulgation(
        &self,
        request: &Parts,
    ) -> Result<Decision, CharmstoreAuthError>;
}
