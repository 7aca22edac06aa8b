use axum::Json;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use charmstore_auth_sdk::{CharmstoreAuthError, Decision, DenyReason, DischargeChallenge, Macaroon};
use serde::Serialize;

/// Realm advertised in `WWW-Authenticate` on 401 responses.
pub const BASIC_REALM: &str = "CharmStore4";

const BASIC_CHALLENGE: &str = r#"Basic realm="CharmStore4""#;

/// Machine-readable error codes of the charm store API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "unauthorized")]
    Unauthorized,
    #[serde(rename = "not found")]
    NotFound,
    #[serde(rename = "macaroon discharge required")]
    DischargeRequired,
    #[serde(rename = "internal error")]
    Internal,
}

/// Error body returned by the charm store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorBody {
    pub message: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<DischargeInfo>,
}

/// Discharge details attached to a 407 response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DischargeInfo {
    pub macaroon: Macaroon,
    pub macaroon_path: String,
}

/// `None` for [`Decision::Allow`]: the handler proceeds.
#[must_use]
pub fn decision_to_response(decision: Decision) -> Option<Response> {
    match decision {
        Decision::Allow => None,
        Decision::Denied(reason) => Some(deny_to_response(&reason)),
        Decision::DischargeRequired(challenge) => Some(challenge_to_response(challenge)),
    }
}

#[must_use]
pub fn deny_to_response(reason: &DenyReason) -> Response {
    let body = ErrorBody {
        message: reason.to_string(),
        code: ErrorCode::Unauthorized,
        info: None,
    };
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_CHALLENGE))],
        Json(body),
    )
        .into_response()
}

#[must_use]
pub fn challenge_to_response(challenge: DischargeChallenge) -> Response {
    let body = ErrorBody {
        message: challenge.cause.to_string(),
        code: ErrorCode::DischargeRequired,
        info: Some(DischargeInfo {
            macaroon: challenge.macaroon,
            macaroon_path: challenge.cookie_path,
        }),
    };
    (StatusCode::PROXY_AUTHENTICATION_REQUIRED, Json(body)).into_response()
}

/// Map an authorization error. Only not-found keeps its message; everything
/// else is reported as a generic server error.
#[must_use]
pub fn auth_error_to_response(err: &CharmstoreAuthError) -> Response {
    let (status, code, message) = match err {
        CharmstoreAuthError::ResourceNotFound { .. } => {
            (StatusCode::NOT_FOUND, ErrorCode::NotFound, err.to_string())
        }
        CharmstoreAuthError::Unavailable { .. }
        | CharmstoreAuthError::MintFailed(_)
        | CharmstoreAuthError::Bakery(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal,
            "cannot authorize request".to_owned(),
        ),
    };
    let body = ErrorBody {
        message,
        code,
        info: None,
    };
    (status, Json(body)).into_response()
}
