//! Service-account OAuth for the Sheets API.
//!
//! Signs a short-lived RS256 assertion with the service-account key and
//! exchanges it at the token endpoint. Tokens are cached until shortly
//! before they expire.

use super::{SheetsError, SheetsResult};
use crate::http::error_body;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::{debug, error};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::Mutex;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Subset of a Google service-account JSON key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl ServiceAccountKey {
    /// Parses the JSON key file format.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Clone)]
struct CachedToken {
    value: String,
    expires_at: i64,
}

/// Access-token provider for one service account.
pub struct TokenSource {
    key: ServiceAccountKey,
    http: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(key: ServiceAccountKey, http: Client) -> Self {
        Self {
            key,
            http,
            cached: Mutex::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Returns a valid bearer token, refreshing when close to expiry.
    pub fn access_token(&self) -> SheetsResult<String> {
        let now = Utc::now().timestamp();
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| SheetsError::Auth("token cache poisoned".to_string()))?;
        if let Some(token) = cached.as_ref() {
            if token.expires_at - EXPIRY_MARGIN_SECS > now {
                return Ok(token.value.clone());
            }
        }

        let token = self.fetch_token(now)?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    fn fetch_token(&self, now: i64) -> SheetsResult<CachedToken> {
        let assertion = sign_assertion(&self.key, now)?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = error_body(response, 300);
            error!(
                "event=sheets_auth module=sheets status=error http_status={}",
                status.as_u16()
            );
            return Err(SheetsError::Status {
                context: "token exchange",
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response
            .json()
            .map_err(|err| SheetsError::Decode(format!("token response: {err}")))?;
        debug!(
            "event=sheets_auth module=sheets status=ok expires_in={}",
            body.expires_in
        );
        Ok(CachedToken {
            value: body.access_token,
            expires_at: now + body.expires_in,
        })
    }
}

/// Builds the signed JWT assertion for the token exchange.
pub(crate) fn sign_assertion(key: &ServiceAccountKey, now: i64) -> SheetsResult<String> {
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: SHEETS_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();
    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|err| SheetsError::Auth(format!("invalid private key: {err}")))?;
    encode(&header, &claims, &signing_key)
        .map_err(|err| SheetsError::Auth(format!("failed to sign assertion: {err}")))
}
