#![allow(dead_code)]

//! Hand-written collaborators shared by the integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use charmstore_auth::CharmstoreAuthConfig;
use charmstore_auth::domain::credentials::basic_auth_header;
use charmstore_auth_sdk::{
    Acl, Bakery, BakeryError, Caveat, DeclaredAttributes, EntityAclStore, EntityAcls, Macaroon,
    NeedDeclaredCaveat, StoreError, VerificationError,
};
use http::header::{AUTHORIZATION, COOKIE};
use http::request::Parts;
use http::{Method, Request};
use secrecy::SecretString;

pub const ADMIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "s3cr3t-pa:ss";
pub const IDENTITY_LOCATION: &str = "https://identity.example.com";

pub fn config(identity_location: Option<&str>) -> CharmstoreAuthConfig {
    CharmstoreAuthConfig {
        auth_username: ADMIN.to_owned(),
        auth_password: SecretString::from(ADMIN_PASSWORD.to_owned()),
        identity_location: identity_location.map(str::to_owned),
    }
}

pub fn request(method: Method, basic: Option<(&str, &str)>) -> Parts {
    let mut req = Request::builder()
        .method(method)
        .uri("/~charmers/trusty/wordpress-42/archive");
    if let Some((user, pass)) = basic {
        req = req.header(AUTHORIZATION, basic_auth_header(user, pass));
    }
    req.body(()).unwrap().into_parts().0
}

pub fn request_with_cookie(method: Method, cookie: &str) -> Parts {
    Request::builder()
        .method(method)
        .uri("/~charmers/trusty/wordpress-42/archive")
        .header(COOKIE, cookie)
        .body(())
        .unwrap()
        .into_parts()
        .0
}

pub fn acl(names: &[&str]) -> Acl {
    Acl::new(names.iter().copied())
}

/// Bakery returning canned results and counting calls.
pub struct MockBakery {
    check: Mutex<Option<Result<DeclaredAttributes, BakeryError>>>,
    mint: Mutex<Option<Result<Macaroon, BakeryError>>>,
    pub check_calls: AtomicUsize,
    pub minted_caveats: Mutex<Vec<NeedDeclaredCaveat>>,
}

impl MockBakery {
    fn new(check: Result<DeclaredAttributes, BakeryError>) -> Self {
        Self {
            check: Mutex::new(Some(check)),
            mint: Mutex::new(None),
            check_calls: AtomicUsize::new(0),
            minted_caveats: Mutex::new(Vec::new()),
        }
    }

    pub fn declaring(username: &str, groups: &str) -> Arc<Self> {
        let declared = DeclaredAttributes::from([
            ("username".to_owned(), username.to_owned()),
            ("groups".to_owned(), groups.to_owned()),
        ]);
        Arc::new(Self::new(Ok(declared)))
    }

    pub fn unverified() -> Arc<Self> {
        let err = VerificationError::invalid("no macaroons found in request");
        Arc::new(Self::new(Err(err.into())))
    }

    pub fn failing(err: BakeryError) -> Arc<Self> {
        Arc::new(Self::new(Err(err)))
    }

    pub fn with_mint_error(self: Arc<Self>, err: BakeryError) -> Arc<Self> {
        *self.mint.lock().unwrap() = Some(Err(err));
        self
    }

    pub fn checks(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    pub fn mints(&self) -> usize {
        self.minted_caveats.lock().unwrap().len()
    }
}

#[async_trait]
impl Bakery for MockBakery {
    async fn check_request(
        &self,
        _request: &Parts,
        required: &[Caveat],
    ) -> Result<DeclaredAttributes, BakeryError> {
        assert!(required.is_empty(), "no first-party caveats expected");
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        self.check.lock().unwrap().clone().unwrap()
    }

    async fn new_macaroon(&self, caveat: NeedDeclaredCaveat) -> Result<Macaroon, BakeryError> {
        self.minted_caveats.lock().unwrap().push(caveat);
        match self.mint.lock().unwrap().clone() {
            Some(canned) => canned,
            None => Ok(Macaroon::new(serde_json::json!({ "identifier": "minted-1" }))),
        }
    }
}

/// Entity store backed by a map; unknown ids are `NotFound`.
#[derive(Default)]
pub struct MockStore {
    entities: HashMap<String, EntityAcls>,
    failure: Option<String>,
}

impl MockStore {
    pub fn with_entity(mut self, id: &str, read: &[&str], write: &[&str]) -> Self {
        self.entities
            .insert(id.to_owned(), EntityAcls::new(acl(read), acl(write)));
        self
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            entities: HashMap::new(),
            failure: Some(reason.to_owned()),
        }
    }

    pub fn into_arc(self) -> Arc<dyn EntityAclStore> {
        Arc::new(self)
    }
}

#[async_trait]
impl EntityAclStore for MockStore {
    async fn base_entity_acls(&self, entity_id: &str) -> Result<EntityAcls, StoreError> {
        if let Some(reason) = &self.failure {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        self.entities
            .get(entity_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}
