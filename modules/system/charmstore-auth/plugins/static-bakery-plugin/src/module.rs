//! Static bakery plugin module.

use std::sync::{Arc, OnceLock};

use charmstore_auth_sdk::Bakery;
use tracing::info;

use crate::config::StaticBakeryPluginConfig;
use crate::domain::Service;

/// Static bakery plugin module.
///
/// Provides macaroon-to-identity mapping from configuration.
#[derive(Default)]
pub struct StaticBakeryPlugin {
    service: OnceLock<Arc<Service>>,
}

impl StaticBakeryPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the plugin was already initialized.
    pub fn init(&self, cfg: &StaticBakeryPluginConfig) -> anyhow::Result<Arc<dyn Bakery>> {
        info!("Initializing static_bakery_plugin");
        tracing::warn!(
            "Static bakery plugin does not verify macaroon signatures. \
             Do NOT use it in production."
        );

        info!(
            location = %cfg.location,
            cookie_prefix = %cfg.cookie_prefix,
            identity_count = cfg.identities.len(),
            max_pending = cfg.max_pending,
            "Loaded plugin configuration"
        );

        let service = Arc::new(Service::from_config(cfg));
        self.service
            .set(service.clone())
            .map_err(|_| anyhow::anyhow!("Service already initialized"))?;

        info!("Static bakery plugin initialized");
        Ok(service)
    }

    /// The initialized service, for discharging minted macaroons in tests.
    #[must_use]
    pub fn service(&self) -> Option<Arc<Service>> {
        self.service.get().cloned()
    }
}
