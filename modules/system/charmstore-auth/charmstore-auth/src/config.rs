//! Configuration for charm store authorization.

use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

/// Environment variable prefix, e.g. `CHARMSTORE_AUTH_AUTH_USERNAME`.
pub const ENV_PREFIX: &str = "CHARMSTORE_AUTH_";

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CharmstoreAuthConfig {
    /// Administrator user name accepted through HTTP Basic auth.
    /// Empty disables admin login.
    pub auth_username: String,

    /// Administrator password.
    #[serde(deserialize_with = "deserialize_secret")]
    pub auth_password: SecretString,

    /// Location of the identity service that discharges
    /// `is-authenticated-user` caveats.
    ///
    /// Absent (or empty) disables macaroon authentication: only the admin
    /// credentials and open ACLs then grant access.
    pub identity_location: Option<String>,
}

impl Default for CharmstoreAuthConfig {
    fn default() -> Self {
        Self {
            auth_username: String::new(),
            auth_password: SecretString::from(String::new()),
            identity_location: None,
        }
    }
}

impl CharmstoreAuthConfig {
    /// Identity location, treating the empty string as unset.
    #[must_use]
    pub fn identity_location(&self) -> Option<&str> {
        self.identity_location
            .as_deref()
            .filter(|location| !location.is_empty())
    }

    /// Load configuration from an optional YAML file, overridden by
    /// `CHARMSTORE_AUTH_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value has the
    /// wrong type.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("invalid charmstore auth configuration")
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}
