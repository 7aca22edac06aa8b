//! Service implementation for the static bakery plugin.

use std::collections::{HashMap, VecDeque};

use charmstore_auth_sdk::{DeclaredAttributes, Macaroon, NeedDeclaredCaveat, attrs};
use cookie::Cookie;
use dashmap::DashMap;
use http::HeaderMap;
use http::header::COOKIE;
use parking_lot::Mutex;
use serde_json::json;

use crate::config::{IdentityMapping, StaticBakeryPluginConfig};

/// Declared identity of a discharged macaroon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub groups: Vec<String>,
}

impl From<&IdentityMapping> for Identity {
    fn from(m: &IdentityMapping) -> Self {
        Self {
            username: m.username.clone(),
            groups: m.groups.clone(),
        }
    }
}

/// What a request's cookies amount to.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    Discharged(Identity),
    Undischarged,
    Unknown,
    NoMacaroons,
}

/// Minted macaroons awaiting discharge, oldest first.
///
/// `order` holds at most `capacity` ids and every key of `caveats` is in
/// `order`; ids discharged early linger in `order` until evicted.
struct Pending {
    capacity: usize,
    order: VecDeque<String>,
    caveats: HashMap<String, NeedDeclaredCaveat>,
}

impl Pending {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::new(),
            caveats: HashMap::new(),
        }
    }

    fn insert(&mut self, id: String, caveat: NeedDeclaredCaveat) {
        self.order.push_back(id.clone());
        self.caveats.insert(id, caveat);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.caveats.remove(&oldest);
            }
        }
    }
}

/// Static bakery service.
///
/// Discharged macaroons map to identities. Minted ones are kept until
/// discharged or until `max_pending` newer ones push them out.
pub struct Service {
    location: String,
    cookie_prefix: String,
    discharged: DashMap<String, Identity>,
    pending: Mutex<Pending>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticBakeryPluginConfig) -> Self {
        Self {
            location: cfg.location.clone(),
            cookie_prefix: cfg.cookie_prefix.clone(),
            discharged: cfg
                .identities
                .iter()
                .map(|m| (m.macaroon.clone(), Identity::from(m)))
                .collect(),
            pending: Mutex::new(Pending::new(cfg.max_pending)),
        }
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Number of minted macaroons still awaiting discharge.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.lock().caveats.len()
    }

    /// Look up the macaroons carried in `Cookie` headers. A discharged one
    /// wins over an undischarged one.
    #[must_use]
    pub fn lookup(&self, headers: &HeaderMap) -> Lookup {
        let mut result = Lookup::NoMacaroons;
        for value in self.macaroon_cookies(headers) {
            if let Some(identity) = self.discharged.get(&value) {
                return Lookup::Discharged(identity.clone());
            }
            if self.pending.lock().caveats.contains_key(&value) {
                result = Lookup::Undischarged;
            } else if result == Lookup::NoMacaroons {
                result = Lookup::Unknown;
            }
        }
        result
    }

    /// Mint a macaroon for `caveat` and remember it as undischarged,
    /// evicting the oldest pending one when full.
    #[must_use]
    pub fn mint(&self, caveat: NeedDeclaredCaveat) -> Macaroon {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let macaroon = Macaroon::new(json!({
            "identifier": id,
            "location": self.location,
            "caveats": [{
                "location": caveat.caveat.location,
                "condition": caveat.caveat.condition,
                "declared": caveat.declared,
            }],
        }));
        self.pending.lock().insert(id, caveat);
        macaroon
    }

    /// Discharge a minted macaroon as `identity`, as the identity service
    /// would after a successful login.
    ///
    /// Returns `false` if `macaroon_id` is not pending (never minted,
    /// already discharged, or evicted).
    #[must_use]
    pub fn discharge(&self, macaroon_id: &str, identity: Identity) -> bool {
        if self.pending.lock().caveats.remove(macaroon_id).is_none() {
            return false;
        }
        self.discharged.insert(macaroon_id.to_owned(), identity);
        true
    }

    /// Values of the cookies named with the macaroon prefix. Entries that
    /// are not valid cookies are skipped.
    fn macaroon_cookies(&self, headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .filter(|c| c.name().starts_with(self.cookie_prefix.as_str()))
            .map(|c| c.value_trimmed().to_owned())
            .collect()
    }
}

/// Attributes declared by a discharged identity; groups are space-separated.
#[must_use]
pub fn declared_attributes(identity: &Identity) -> DeclaredAttributes {
    DeclaredAttributes::from([
        (attrs::USERNAME.to_owned(), identity.username.clone()),
        (attrs::GROUPS.to_owned(), identity.groups.join(" ")),
    ])
}
