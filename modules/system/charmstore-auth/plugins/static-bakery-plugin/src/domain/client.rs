//! Client implementation for the static bakery plugin.
//!
//! Implements `Bakery` using the domain service.

use async_trait::async_trait;
use charmstore_auth_sdk::{
    Bakery, BakeryError, Caveat, DeclaredAttributes, Macaroon, NeedDeclaredCaveat,
    VerificationError,
};
use http::request::Parts;

use super::service::{Lookup, Service, declared_attributes};

#[async_trait]
impl Bakery for Service {
    async fn check_request(
        &self,
        request: &Parts,
        required: &[Caveat],
    ) -> Result<DeclaredAttributes, BakeryError> {
        let identity = match self.lookup(&request.headers) {
            Lookup::Discharged(identity) => identity,
            Lookup::Undischarged => {
                return Err(VerificationError::discharge_required(format!(
                    "macaroon from {} has an undischarged third party caveat",
                    self.location()
                ))
                .into());
            }
            Lookup::Unknown => return Err(VerificationError::invalid("unknown macaroon").into()),
            Lookup::NoMacaroons => {
                return Err(VerificationError::invalid("no macaroons found in request").into());
            }
        };

        // Static macaroons carry no first party caveats to satisfy.
        if let Some(caveat) = required.first() {
            return Err(VerificationError::invalid(format!(
                "caveat \"{}\" not satisfied",
                caveat.condition
            ))
            .into());
        }

        Ok(declared_attributes(&identity))
    }

    async fn new_macaroon(&self, caveat: NeedDeclaredCaveat) -> Result<Macaroon, BakeryError> {
        if caveat.caveat.location.is_empty() {
            return Err(BakeryError::Internal(
                "third party caveat has no location".to_owned(),
            ));
        }
        Ok(self.mint(caveat))
    }
}
