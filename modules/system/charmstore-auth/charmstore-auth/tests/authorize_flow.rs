#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for request authorization
//!
//! These tests verify that:
//! 1. Open ACLs never trigger authentication
//! 2. Admin Basic credentials bypass ACLs, wrong ones are refused outright
//! 3. Requests without credentials get a discharge challenge when macaroon
//!    authentication is configured
//! 4. Entity ACLs are chosen by method and missing entities are reported
//!    separately from denials

mod common;

use std::sync::Arc;

use charmstore_auth::CharmstoreAuth;
use charmstore_auth_sdk::{
    Bakery, BakeryError, CharmstoreAuthClient, CharmstoreAuthError, CredentialsError, Decision,
    DenyReason, EntityAclStore, StoreError, VerificationErrorKind,
};
use common::{
    ADMIN, ADMIN_PASSWORD, IDENTITY_LOCATION, MockBakery, MockStore, acl, config, request,
    request_with_cookie,
};
use http::Method;

fn client(
    identity_location: Option<&str>,
    bakery: Option<Arc<MockBakery>>,
    store: Arc<dyn EntityAclStore>,
) -> Arc<dyn CharmstoreAuthClient> {
    let bakery = bakery.map(|b| b as Arc<dyn Bakery>);
    CharmstoreAuth::new()
        .init(&config(identity_location), bakery, store)
        .unwrap()
}

fn macaroon_client(bakery: Arc<MockBakery>) -> Arc<dyn CharmstoreAuthClient> {
    client(Some(IDENTITY_LOCATION), Some(bakery), wordpress_store())
}

fn wordpress_store() -> Arc<dyn EntityAclStore> {
    MockStore::default()
        .with_entity("cs:~charmers/wordpress", &["everyone"], &["charmers"])
        .into_arc()
}

#[tokio::test]
async fn open_acl_allows_without_authentication() {
    let bakery = MockBakery::failing(BakeryError::Internal("must not be called".to_owned()));
    let auth = macaroon_client(bakery.clone());

    for basic in [None, Some((ADMIN, "wrong")), Some(("bob", "x"))] {
        let decision = auth
            .authorize(&request(Method::GET, basic), &acl(&["alice", "everyone"]))
            .await
            .unwrap();
        assert!(decision.is_allowed());
    }
    assert_eq!(bakery.checks(), 0);
}

#[tokio::test]
async fn admin_credentials_allow_any_acl() {
    let auth = client(None, None, wordpress_store());
    let req = request(Method::PUT, Some((ADMIN, ADMIN_PASSWORD)));

    for names in [&["someoneelse"][..], &[][..]] {
        let decision = auth.authorize(&req, &acl(names)).await.unwrap();
        assert!(decision.is_allowed(), "admin denied for {names:?}");
    }
}

#[tokio::test]
async fn wrong_admin_password_is_unauthorized_not_challenged() {
    let bakery = MockBakery::unverified();
    let auth = macaroon_client(bakery.clone());

    let req = request(Method::GET, Some((ADMIN, "guess")));
    let decision = auth.authorize(&req, &acl(&["alice"])).await.unwrap();

    assert!(matches!(
        decision,
        Decision::Denied(DenyReason::InvalidCredentials)
    ));
    assert_eq!(bakery.checks(), 0);
    assert_eq!(bakery.mints(), 0);
}

#[tokio::test]
async fn malformed_header_is_unauthorized() {
    let auth = macaroon_client(MockBakery::unverified());
    let req = http::Request::builder()
        .header(http::header::AUTHORIZATION, "Basic !!!")
        .body(())
        .unwrap()
        .into_parts()
        .0;

    let decision = auth.authorize(&req, &acl(&["alice"])).await.unwrap();
    assert!(matches!(
        decision,
        Decision::Denied(DenyReason::AuthenticationFailed(
            CredentialsError::MalformedEncoding
        ))
    ));
}

#[tokio::test]
async fn missing_credentials_are_challenged_for_whole_service() {
    let bakery = MockBakery::unverified();
    let auth = macaroon_client(bakery.clone());

    let decision = auth
        .authorize(&request(Method::GET, None), &acl(&["alice"]))
        .await
        .unwrap();

    let Decision::DischargeRequired(challenge) = decision else {
        panic!("Expected DischargeRequired, got: {decision:?}");
    };
    assert_eq!(challenge.cookie_path, "/");
    assert_eq!(challenge.macaroon.as_json()["identifier"], "minted-1");
    assert_eq!(challenge.cause.kind(), VerificationErrorKind::Invalid);

    let caveats = bakery.minted_caveats.lock().unwrap();
    assert_eq!(caveats.len(), 1);
    assert_eq!(caveats[0].caveat.location, IDENTITY_LOCATION);
    assert_eq!(caveats[0].caveat.condition, "is-authenticated-user");
    assert_eq!(caveats[0].declared, ["username", "groups"]);
}

#[tokio::test]
async fn missing_credentials_without_identity_location_are_unauthorized() {
    let bakery = MockBakery::unverified();
    for location in [None, Some("")] {
        let auth = client(location, Some(bakery.clone()), wordpress_store());
        let decision = auth
            .authorize(&request(Method::GET, None), &acl(&["alice"]))
            .await
            .unwrap();
        assert!(matches!(
            decision,
            Decision::Denied(DenyReason::AuthenticationFailed(CredentialsError::Missing))
        ));
    }
    assert_eq!(bakery.checks(), 0);
}

#[tokio::test]
async fn declared_user_and_groups_are_checked_against_acl() {
    let auth = macaroon_client(MockBakery::declaring("bob", "charmers qa"));
    let req = request(Method::GET, None);

    for names in [&["bob"][..], &["qa"][..]] {
        let decision = auth.authorize(&req, &acl(names)).await.unwrap();
        assert!(decision.is_allowed(), "bob denied for {names:?}");
    }

    let decision = auth.authorize(&req, &acl(&["alice", "ops"])).await.unwrap();
    match decision {
        Decision::Denied(DenyReason::AccessDenied { username }) => assert_eq!(username, "bob"),
        other => panic!("Expected AccessDenied, got: {other:?}"),
    }
}

#[tokio::test]
async fn nameless_identity_is_invalid() {
    let auth = macaroon_client(MockBakery::declaring("", "charmers"));

    let decision = auth
        .authorize(&request(Method::GET, None), &acl(&["charmers"]))
        .await
        .unwrap();
    assert!(matches!(
        decision,
        Decision::Denied(DenyReason::InvalidIdentity)
    ));
}

#[tokio::test]
async fn mint_failure_is_an_error() {
    let bakery = MockBakery::unverified()
        .with_mint_error(BakeryError::Unavailable("down".to_owned()));
    let auth = macaroon_client(bakery);

    let err = auth
        .authorize(&request(Method::GET, None), &acl(&["alice"]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CharmstoreAuthError::MintFailed(BakeryError::Unavailable(_))
    ));
    assert!(err.to_string().starts_with("cannot mint macaroon"));
}

#[tokio::test]
async fn bakery_timeout_propagates_without_challenge() {
    let bakery = MockBakery::failing(BakeryError::Timeout);
    let auth = macaroon_client(bakery.clone());

    let err = auth
        .authorize(&request(Method::GET, None), &acl(&["alice"]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CharmstoreAuthError::Bakery(BakeryError::Timeout)
    ));
    assert_eq!(bakery.mints(), 0);
}

#[tokio::test]
async fn entity_acl_is_selected_by_method() {
    let auth = macaroon_client(MockBakery::declaring("bob", ""));
    let id = "cs:~charmers/wordpress";

    let read = auth
        .authorize_entity(&request(Method::GET, None), id)
        .await
        .unwrap();
    assert!(read.is_allowed());

    for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
        let req = request(method.clone(), None);
        let decision = auth.authorize_entity(&req, id).await.unwrap();
        assert!(
            matches!(decision, Decision::Denied(DenyReason::AccessDenied { .. })),
            "{method} should use the write ACL"
        );
    }
}

#[tokio::test]
async fn authorize_with_perms_uses_given_acls() {
    let auth = client(None, None, wordpress_store());
    let read = acl(&["everyone"]);
    let write = acl(&["charmers"]);

    let get = auth
        .authorize_with_perms(&request(Method::HEAD, None), &read, &write)
        .await
        .unwrap();
    assert!(get.is_allowed());

    let post = auth
        .authorize_with_perms(&request(Method::POST, None), &read, &write)
        .await
        .unwrap();
    assert!(!post.is_allowed());
}

#[tokio::test]
async fn missing_entity_is_not_found() {
    let auth = client(None, None, wordpress_store());

    let req = request(Method::GET, Some((ADMIN, ADMIN_PASSWORD)));
    let err = auth.authorize_entity(&req, "cs:nope").await.unwrap_err();
    match err {
        CharmstoreAuthError::ResourceNotFound { id } => assert_eq!(id, "cs:nope"),
        other => panic!("Expected ResourceNotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn store_failure_is_unavailable() {
    let auth = client(None, None, MockStore::unavailable("mongo down").into_arc());

    let err = auth
        .authorize_entity(&request(Method::GET, None), "cs:wordpress")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CharmstoreAuthError::Unavailable {
            source: StoreError::Unavailable(_),
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        r#"cannot retrieve entity "cs:wordpress" for authorization: store unavailable: mongo down"#
    );
}

#[tokio::test]
async fn promulgation_requires_promulgators_group() {
    let promulgator = macaroon_client(MockBakery::declaring("alice", "promulgators"));
    let decision = promulgator
        .authorize_promulgation(&request(Method::PUT, None))
        .await
        .unwrap();
    assert!(decision.is_allowed());

    let charmer = macaroon_client(MockBakery::declaring("bob", "charmers"));
    let decision = charmer
        .authorize_promulgation(&request(Method::PUT, None))
        .await
        .unwrap();
    assert!(!decision.is_allowed());
}

#[tokio::test]
async fn module_initializes_once() {
    let module = CharmstoreAuth::new();
    let store = wordpress_store();
    module.init(&config(None), None, store.clone()).unwrap();
    let err = module.init(&config(None), None, store).err().unwrap();
    assert!(err.to_string().contains("already initialized"));
}

#[tokio::test]
async fn static_bakery_discharge_round_trip() {
    use static_bakery_plugin::StaticBakeryPlugin;
    use static_bakery_plugin::config::StaticBakeryPluginConfig;
    use static_bakery_plugin::domain::service::Identity;

    let plugin = StaticBakeryPlugin::new();
    let bakery = plugin.init(&StaticBakeryPluginConfig::default()).unwrap();
    let cfg = config(Some(IDENTITY_LOCATION));
    let auth = CharmstoreAuth::new()
        .init(&cfg, Some(bakery), wordpress_store())
        .unwrap();
    let id = "cs:~charmers/wordpress";

    // First attempt carries nothing and is challenged.
    let decision = auth
        .authorize_entity(&request(Method::POST, None), id)
        .await
        .unwrap();
    let Decision::DischargeRequired(challenge) = decision else {
        panic!("Expected DischargeRequired, got: {decision:?}");
    };
    let macaroon_id = challenge.macaroon.as_json()["identifier"]
        .as_str()
        .unwrap()
        .to_owned();
    let cookie = format!("macaroon-charmstore={macaroon_id}");

    // Resending the undischarged macaroon is challenged again.
    let decision = auth
        .authorize_entity(&request_with_cookie(Method::POST, &cookie), id)
        .await
        .unwrap();
    match decision {
        Decision::DischargeRequired(again) => {
            assert_eq!(again.cause.kind(), VerificationErrorKind::DischargeRequired);
        }
        other => panic!("Expected DischargeRequired, got: {other:?}"),
    }

    // After the identity service discharges it, the write ACL applies.
    let carol = Identity {
        username: "carol".to_owned(),
        groups: vec!["charmers".to_owned()],
    };
    assert!(plugin.service().unwrap().discharge(&macaroon_id, carol));
    let decision = auth
        .authorize_entity(&request_with_cookie(Method::POST, &cookie), id)
        .await
        .unwrap();
    assert!(decision.is_allowed());
}
