//! Mints discharge challenges.

use std::fmt;
use std::sync::Arc;

use charmstore_auth_sdk::{
    Bakery, CHALLENGE_COOKIE_PATH, DischargeChallenge, NeedDeclaredCaveat, VerificationError,
};

use super::DomainError;

/// The bakery together with the identity location it challenges for.
///
/// Present only when macaroon authentication is configured; it verifies
/// requests and builds the macaroon a client must discharge.
pub struct MacaroonMinter {
    bakery: Arc<dyn Bakery>,
    identity_location: String,
}

impl MacaroonMinter {
    #[must_use]
    pub fn new(bakery: Arc<dyn Bakery>, identity_location: String) -> Self {
        Self {
            bakery,
            identity_location,
        }
    }

    #[must_use]
    pub fn identity_location(&self) -> &str {
        &self.identity_location
    }

    #[must_use]
    pub fn bakery(&self) -> &dyn Bakery {
        self.bakery.as_ref()
    }

    /// Mint a macaroon requiring the identity service to declare the
    /// caller's username and groups, and wrap it in a challenge scoped to
    /// the whole service.
    ///
    /// # Errors
    ///
    /// `MintFailed` if the bakery refuses.
    pub async fn mint_challenge(
        &self,
        cause: VerificationError,
    ) -> Result<DischargeChallenge, DomainError> {
        let caveat = NeedDeclaredCaveat::authenticated_user(self.identity_location.clone());
        let macaroon = self
            .bakery
            .new_macaroon(caveat)
            .await
            .map_err(DomainError::MintFailed)?;
        Ok(DischargeChallenge {
            macaroon,
            cookie_path: CHALLENGE_COOKIE_PATH.to_owned(),
            cause,
        })
    }
}

impl fmt::Debug for MacaroonMinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacaroonMinter")
            .field("identity_location", &self.identity_location)
            .finish_non_exhaustive()
    }
}
