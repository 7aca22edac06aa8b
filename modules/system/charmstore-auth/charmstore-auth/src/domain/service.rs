//! Domain service for charm store authorization.

use std::sync::Arc;

use charmstore_auth_sdk::{Acl, Bakery, Decision, DenyReason, EntityAclStore, principals};
use http::Method;
use http::request::Parts;
use tracing::{debug, info, warn};

use super::authenticator::{Authenticator, AuthnFailure};
use super::error::DomainError;
use super::minter::MacaroonMinter;
use crate::config::CharmstoreAuthConfig;

/// Charm store authorization service.
pub struct Service {
    authenticator: Authenticator,
    store: Arc<dyn EntityAclStore>,
}

impl Service {
    /// Build the service. Macaroon authentication is enabled only when a
    /// bakery is supplied and the config names an identity location.
    #[must_use]
    pub fn new(
        cfg: &CharmstoreAuthConfig,
        bakery: Option<Arc<dyn Bakery>>,
        store: Arc<dyn EntityAclStore>,
    ) -> Self {
        let macaroons = bakery
            .zip(cfg.identity_location())
            .map(|(bakery, location)| MacaroonMinter::new(bakery, location.to_owned()));

        Self {
            authenticator: Authenticator::new(
                cfg.auth_username.clone(),
                cfg.auth_password.clone(),
                macaroons,
            ),
            store,
        }
    }

    #[must_use]
    pub fn verifies_macaroons(&self) -> bool {
        self.authenticator.verifies_macaroons()
    }

    /// Decide whether `request` may proceed under `acl`.
    ///
    /// # Errors
    ///
    /// - `MintFailed` if a challenge was needed but could not be minted
    /// - `Bakery` for bakery failures other than verification
    #[tracing::instrument(
        skip_all,
        fields(method = %request.method, path = request.uri.path(), acl = %acl)
    )]
    pub async fn authorize(&self, request: &Parts, acl: &Acl) -> Result<Decision, DomainError> {
        if acl.is_open() {
            return Ok(Decision::Allow);
        }

        match self.authenticator.check_request(request).await {
            Ok(auth) => match acl.check_membership(&auth) {
                Ok(()) => {
                    info!(
                        username = auth.username(),
                        admin = auth.is_admin(),
                        "Request authorized"
                    );
                    Ok(Decision::Allow)
                }
                Err(e) => {
                    debug!(error = %e, "Request denied by ACL");
                    Ok(Decision::Denied(DenyReason::from(e)))
                }
            },
            Err(AuthnFailure::Denied(reason)) => {
                debug!(reason = %reason, "Authentication refused");
                Ok(Decision::Denied(reason))
            }
            Err(AuthnFailure::Challenge { minter, cause }) => {
                debug!(
                    cause = %cause,
                    identity_location = minter.identity_location(),
                    "Minting discharge challenge"
                );
                minter
                    .mint_challenge(cause)
                    .await
                    .map(Decision::DischargeRequired)
            }
            Err(AuthnFailure::Bakery(e)) => {
                warn!(error = %e, "Macaroon verification failed");
                Err(DomainError::Bakery(e))
            }
        }
    }

    /// Authorize `request` against the ACLs of the base entity of `entity_id`.
    ///
    /// # Errors
    ///
    /// - `EntityNotFound` if the entity does not exist
    /// - `StoreUnavailable` if the entity store failed
    /// - everything [`Service::authorize`] returns
    #[tracing::instrument(skip_all, fields(entity_id = %entity_id))]
    pub async fn authorize_entity(
        &self,
        request: &Parts,
        entity_id: &str,
    ) -> Result<Decision, DomainError> {
        let acls = self
            .store
            .base_entity_acls(entity_id)
            .await
            .map_err(|e| DomainError::store(entity_id, e))?;
        self.authorize_with_perms(request, &acls.read, &acls.write)
            .await
    }

    /// Authorize against `write` for mutating methods and `read` otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`Service::authorize`].
    pub async fn authorize_with_perms(
        &self,
        request: &Parts,
        read: &Acl,
        write: &Acl,
    ) -> Result<Decision, DomainError> {
        let acl = if is_mutating(&request.method) {
            write
        } else {
            read
        };
        self.authorize(request, acl).await
    }

    /// Authorize a change to the promulgation status of an entity.
    ///
    /// # Errors
    ///
    /// Same as [`Service::authorize`].
    pub async fn authorize_promulgation(&self, request: &Parts) -> Result<Decision, DomainError> {
        self.authorize(request, &Acl::new([principals::PROMULGATORS]))
            .await
    }
}

/// Methods that modify an entity and therefore need the write ACL.
fn is_mutating(method: &Method) -> bool {
    matches!(method.as_str(), "DELETE" | "PATCH" | "POST" | "PUT")
}
