//! HTTP mapping of authorization outcomes.
//!
//! Handlers call [`decision_to_response`] after authorizing and return the
//! response when one is produced; errors go through [`auth_error_to_response`].

mod error;

pub use error::{
    BASIC_REALM, DischargeInfo, ErrorBody, ErrorCode, auth_error_to_response,
    challenge_to_response, decision_to_response, deny_to_response,
};
