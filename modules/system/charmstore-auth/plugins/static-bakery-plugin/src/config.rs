//! Configuration for the static bakery plugin.

use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticBakeryPluginConfig {
    /// Location stamped on minted macaroons.
    pub location: String,

    /// Only cookies whose name starts with this prefix carry macaroons.
    pub cookie_prefix: String,

    /// Pre-discharged macaroons and the identities they declare.
    pub identities: Vec<IdentityMapping>,

    /// Most minted macaroons kept awaiting discharge; the oldest is
    /// forgotten first.
    pub max_pending: usize,
}

impl Default for StaticBakeryPluginConfig {
    fn default() -> Self {
        Self {
            location: "charmstore".to_owned(),
            cookie_prefix: "macaroon-".to_owned(),
            identities: Vec::new(),
            max_pending: 1024,
        }
    }
}

/// Maps a cookie value to the identity its discharge declares.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityMapping {
    /// The cookie value to match.
    pub macaroon: String,
    pub username: String,
    #[serde(default)]
    pub groups: Vec<String>,
}
