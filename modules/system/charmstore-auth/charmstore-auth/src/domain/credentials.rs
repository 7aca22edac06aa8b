//! HTTP Basic credentials (RFC 2617, section 2).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use charmstore_auth_sdk::CredentialsError;
use http::HeaderMap;
use http::header::AUTHORIZATION;
use secrecy::SecretString;

const BASIC_SCHEME: &str = "Basic";

/// User name and password taken from an `Authorization: Basic` header.
#[derive(Debug)]
pub struct BasicCredentials {
    pub username: String,
    pub password: SecretString,
}

/// Parse the `Authorization` header of a request.
///
/// The header must be exactly `Basic <base64("user:pass")>`. The password is
/// everything after the first `:`, so it may itself contain colons.
///
/// # Errors
///
/// - `Missing` if the header is absent or empty
/// - `MalformedHeader` if it is not two tokens or the scheme is not `Basic`
/// - `MalformedEncoding` if the second token is not standard base64
/// - `MalformedContents` if the decoded text has no `:` or is not UTF-8
pub fn parse_credentials(headers: &HeaderMap) -> Result<BasicCredentials, CredentialsError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(CredentialsError::Missing);
    };
    if value.is_empty() {
        return Err(CredentialsError::Missing);
    }
    let header = value
        .to_str()
        .map_err(|_| CredentialsError::MalformedHeader)?;

    let mut tokens = header.split_whitespace();
    let (Some(scheme), Some(challenge), None) = (tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(CredentialsError::MalformedHeader);
    };
    if scheme != BASIC_SCHEME {
        return Err(CredentialsError::MalformedHeader);
    }

    let decoded = STANDARD
        .decode(challenge)
        .map_err(|_| CredentialsError::MalformedEncoding)?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| CredentialsError::MalformedContents)?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or(CredentialsError::MalformedContents)?;

    Ok(BasicCredentials {
        username: username.to_owned(),
        password: SecretString::from(password.to_owned()),
    })
}

/// Build an `Authorization` header value for the given credentials.
#[must_use]
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!(
        "{BASIC_SCHEME} {}",
        STANDARD.encode(format!("{username}:{password}"))
    )
}
