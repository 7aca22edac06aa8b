//! Collaborator trait for reading entity ACLs.

use async_trait::async_trait;
use charmstore_security::EntityAcls;

use crate::error::StoreError;

/// Read-only view of the entity store used for authorization.
#[async_trait]
pub trait EntityAclStore: Send + Sync {
    /// Return the read and write ACLs of the base entity that `entity_id`
    /// belongs to.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such entity exists
    /// - `Unavailable` or `Internal` for store failures
    async fn base_entity_acls(&self, entity_id: &str) -> Result<EntityAcls, StoreError>;
}
