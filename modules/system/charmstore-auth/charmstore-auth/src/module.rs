//! Charm store authorization module.

use std::sync::{Arc, OnceLock};

use charmstore_auth_sdk::{Bakery, CharmstoreAuthClient, EntityAclStore};
use tracing::{info, warn};

use crate::config::CharmstoreAuthConfig;
use crate::domain::{CharmstoreAuthLocalClient, Service};

/// Charm store authorization module.
///
/// Owns the domain service and hands out the [`CharmstoreAuthClient`] that
/// request handlers call.
#[derive(Default)]
pub struct CharmstoreAuth {
    service: OnceLock<Arc<Service>>,
}

impl CharmstoreAuth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the module to its collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if the module was already initialized.
    #[tracing::instrument(skip_all, fields(identity_location))]
    pub fn init(
        &self,
        cfg: &CharmstoreAuthConfig,
        bakery: Option<Arc<dyn Bakery>>,
        store: Arc<dyn EntityAclStore>,
    ) -> anyhow::Result<Arc<dyn CharmstoreAuthClient>> {
        if let Some(location) = cfg.identity_location() {
            tracing::Span::current().record("identity_location", location);
        }
        let admin_login = !cfg.auth_username.is_empty();
        info!(admin_login, "Initializing charmstore_auth");

        match (bakery.is_some(), cfg.identity_location().is_some()) {
            (true, true) => {}
            (false, false) => info!("Macaroon authentication disabled"),
            (true, false) => {
                warn!("Bakery supplied without identity_location; macaroons disabled");
            }
            (false, true) => {
                warn!("identity_location configured without a bakery; macaroons disabled");
            }
        }

        let svc = Arc::new(Service::new(cfg, bakery, store));
        self.service
            .set(svc.clone())
            .map_err(|_| anyhow::anyhow!("Service already initialized"))?;

        info!(
            macaroons = svc.verifies_macaroons(),
            "charmstore_auth initialized"
        );
        Ok(Arc::new(CharmstoreAuthLocalClient::new(svc)))
    }
}
