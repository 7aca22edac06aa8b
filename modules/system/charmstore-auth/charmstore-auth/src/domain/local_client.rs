//! Local (in-process) client for charm store authorization.

use std::sync::Arc;

use async_trait::async_trait;
use charmstore_auth_sdk::{Acl, CharmstoreAuthClient, CharmstoreAuthError, Decision};
use http::request::Parts;

use super::{DomainError, Service};

/// Local client wrapping the service.
pub struct CharmstoreAuthLocalClient {
    svc: Arc<Service>,
}

impl CharmstoreAuthLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> CharmstoreAuthError {
    match &e {
        DomainError::EntityNotFound { .. } => {
            tracing::debug!(operation = op, error = %e, "charmstore_auth entity lookup failed");
        }
        _ => tracing::error!(operation = op, error = ?e, "charmstore_auth call failed"),
    }
    e.into()
}

#[async_trait]
impl CharmstoreAuthClient for CharmstoreAuthLocalClient {
    async fn authorize(&self, request: &Parts, acl: &Acl) -> Result<Decision, CharmstoreAuthError> {
        self.svc
            .authorize(request, acl)
            .await
            .map_err(|e| log_and_convert("authorize", e))
    }

    async fn authorize_entity(
        &self,
        request: &Parts,
        entity_id: &str,
    ) -> Result<Decision, CharmstoreAuthError> {
        self.svc
            .authorize_entity(request, entity_id)
            .await
            .map_err(|e| log_and_convert("authorize_entity", e))
    }

    async fn authorize_with_perms(
        &self,
        request: &Parts,
        read: &Acl,
        write: &Acl,
    ) -> Result<Decision, CharmstoreAuthError> {
        self.svc
            .authorize_with_perms(request, read, write)
            .await
            .map_err(|e| log_and_convert("authorize_with_perms", e))
    }

    async fn authorize_promulgation(
        &self,
        request: &Parts,
    ) -> Result<Decision, CharmstoreAuthError> {
        self.svc
            .authorize_promulgation(request)
            .await
            .map_err(|e| log_and_convert("authorize_promulgation", e))
    }
}
