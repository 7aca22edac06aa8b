//! Establishes who is making a request.

use charmstore_auth_sdk::{
    Authorization, BakeryError, CredentialsError, DenyReason, VerificationError, attrs,
};
use http::request::Parts;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use super::credentials::parse_credentials;
use super::minter::MacaroonMinter;

/// Why no [`Authorization`] could be established.
#[derive(Debug)]
pub enum AuthnFailure<'a> {
    /// The request is refused outright.
    Denied(DenyReason),
    /// The bakery found no usable macaroon; `minter` issues the challenge.
    Challenge {
        minter: &'a MacaroonMinter,
        cause: VerificationError,
    },
    /// The bakery failed for another reason.
    Bakery(BakeryError),
}

/// Checks admin Basic credentials first and falls back to macaroon
/// verification when the request carries none.
pub struct Authenticator {
    admin_username: String,
    admin_password: SecretString,
    macaroons: Option<MacaroonMinter>,
}

impl Authenticator {
    /// `macaroons` is `None` when macaroon authentication is not configured.
    #[must_use]
    pub fn new(
        admin_username: String,
        admin_password: SecretString,
        macaroons: Option<MacaroonMinter>,
    ) -> Self {
        Self {
            admin_username,
            admin_password,
            macaroons,
        }
    }

    /// Whether requests without Basic credentials are handed to the bakery.
    #[must_use]
    pub fn verifies_macaroons(&self) -> bool {
        self.macaroons.is_some()
    }

    /// Resolve the identity behind `request`.
    ///
    /// # Errors
    ///
    /// See [`AuthnFailure`].
    pub async fn check_request(&self, request: &Parts) -> Result<Authorization, AuthnFailure<'_>> {
        let err = match parse_credentials(&request.headers) {
            Ok(creds) => {
                return if self.is_admin(&creds.username, &creds.password) {
                    Ok(Authorization::admin())
                } else {
                    Err(AuthnFailure::Denied(DenyReason::InvalidCredentials))
                };
            }
            Err(err) => err,
        };

        let minter = match (&self.macaroons, err) {
            (Some(minter), CredentialsError::Missing) => minter,
            (_, err) => return Err(AuthnFailure::Denied(DenyReason::AuthenticationFailed(err))),
        };

        let declared = minter
            .bakery()
            .check_request(request, &[])
            .await
            .map_err(|e| match e {
                BakeryError::Verification(cause) => AuthnFailure::Challenge { minter, cause },
                other => AuthnFailure::Bakery(other),
            })?;

        let username = declared.get(attrs::USERNAME).cloned().unwrap_or_default();
        let groups = declared
            .get(attrs::GROUPS)
            .map(|g| g.split_whitespace().map(str::to_owned).collect::<Vec<_>>())
            .unwrap_or_default();

        Ok(Authorization::builder()
            .username(username)
            .groups(groups)
            .build())
    }

    fn is_admin(&self, username: &str, password: &SecretString) -> bool {
        // `auth_username` defaults to empty, which leaves admin login off.
        if self.admin_username.is_empty() {
            return false;
        }
        let username_ok = username.as_bytes().ct_eq(self.admin_username.as_bytes());
        let password_ok = password
            .expose_secret()
            .as_bytes()
            .ct_eq(self.admin_password.expose_secret().as_bytes());
        (username_ok & password_ok).into()
    }
}
