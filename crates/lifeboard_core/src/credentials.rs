//! Ordered credential resolution.
//!
//! # Responsibility
//! - Resolve the Gemini API key and the Sheets service-account key.
//! - Try providers in registration order until one yields the credential.
//!
//! # Invariants
//! - A provider failure is logged and the next provider is tried.
//! - `CredentialError::Missing` is returned only after every provider
//!   declined; callers treat it as fatal.
//! - Secret values are never logged.

use crate::sheets::ServiceAccountKey;
use log::{debug, info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::PathBuf;

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const SERVICE_ACCOUNT_SECTION: &str = "gcp_service_account";

/// Credential kinds the application needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKey {
    GeminiApiKey,
    GcpServiceAccount,
}

impl CredentialKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GeminiApiKey => GEMINI_API_KEY_VAR,
            Self::GcpServiceAccount => SERVICE_ACCOUNT_SECTION,
        }
    }
}

/// Resolved secret material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    ApiKey(String),
    ServiceAccount(ServiceAccountKey),
}

/// Credential resolution failure.
#[derive(Debug)]
pub enum CredentialError {
    /// No provider had the credential.
    Missing {
        key: CredentialKey,
        tried: Vec<String>,
    },
    /// A provider found the credential but could not read it.
    Unreadable { provider: String, message: String },
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { key, tried } => write!(
                f,
                "credential `{}` not found (tried: {})",
                key.as_str(),
                tried.join(", ")
            ),
            Self::Unreadable { provider, message } => {
                write!(f, "credential provider `{provider}` failed: {message}")
            }
        }
    }
}

impl Error for CredentialError {}

/// One credential source.
pub trait CredentialProvider {
    fn provider_id(&self) -> &str;

    /// Returns `Ok(None)` when this provider does not hold `key`.
    fn resolve(&self, key: CredentialKey) -> Result<Option<Credential>, CredentialError>;
}

/// Providers tried in order.
#[derive(Default)]
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hosted secrets file, then environment, then local key file.
    pub fn standard(secrets_file: impl Into<PathBuf>, key_file: impl Into<PathBuf>) -> Self {
        Self::new()
            .with(SecretsFileProvider::new(secrets_file))
            .with(EnvProvider)
            .with(KeyFileProvider::new(key_file))
    }

    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn provider_ids(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|provider| provider.provider_id().to_string())
            .collect()
    }

    /// Resolves `key` from the first provider that has it.
    pub fn resolve(&self, key: CredentialKey) -> Result<Credential, CredentialError> {
        for provider in &self.providers {
            match provider.resolve(key) {
                Ok(Some(credential)) => {
                    info!(
                        "event=credential_resolve module=credentials status=ok key={} provider={}",
                        key.as_str(),
                        provider.provider_id()
                    );
                    return Ok(credential);
                }
                Ok(None) => debug!(
                    "event=credential_resolve module=credentials status=miss key={} provider={}",
                    key.as_str(),
                    provider.provider_id()
                ),
                Err(err) => warn!(
                    "event=credential_resolve module=credentials status=error key={} provider={} error={}",
                    key.as_str(),
                    provider.provider_id(),
                    err
                ),
            }
        }
        Err(CredentialError::Missing {
            key,
            tried: self.provider_ids(),
        })
    }

    pub fn gemini_api_key(&self) -> Result<String, CredentialError> {
        match self.resolve(CredentialKey::GeminiApiKey)? {
            Credential::ApiKey(value) => Ok(value),
            Credential::ServiceAccount(_) => Err(unexpected_kind(CredentialKey::GeminiApiKey)),
        }
    }

    pub fn service_account(&self) -> Result<ServiceAccountKey, CredentialError> {
        match self.resolve(CredentialKey::GcpServiceAccount)? {
            Credential::ServiceAccount(key) => Ok(key),
            Credential::ApiKey(_) => Err(unexpected_kind(CredentialKey::GcpServiceAccount)),
        }
    }
}

fn unexpected_kind(key: CredentialKey) -> CredentialError {
    CredentialError::Unreadable {
        provider: "chain".to_string(),
        message: format!("provider returned the wrong credential kind for `{}`", key.as_str()),
    }
}

/// Hosted-secrets TOML file: `GEMINI_API_KEY = "..."` and a
/// `[gcp_service_account]` table.
pub struct SecretsFileProvider {
    path: PathBuf,
}

impl SecretsFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn unreadable(&self, message: String) -> CredentialError {
        CredentialError::Unreadable {
            provider: self.provider_id().to_string(),
            message,
        }
    }
}

impl CredentialProvider for SecretsFileProvider {
    fn provider_id(&self) -> &str {
        "secrets_file"
    }

    fn resolve(&self, key: CredentialKey) -> Result<Option<Credential>, CredentialError> {
        if !self.path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)
            .map_err(|err| self.unreadable(format!("{}: {err}", self.path.display())))?;
        let table: toml::Table = text
            .parse()
            .map_err(|err| self.unreadable(format!("{}: {err}", self.path.display())))?;

        match key {
            CredentialKey::GeminiApiKey => Ok(table
                .get(GEMINI_API_KEY_VAR)
                .and_then(|value| value.as_str())
                .filter(|value| !value.trim().is_empty())
                .map(|value| Credential::ApiKey(value.trim().to_string()))),
            CredentialKey::GcpServiceAccount => match table.get(SERVICE_ACCOUNT_SECTION) {
                None => Ok(None),
                Some(section) => ServiceAccountKey::deserialize(section.clone())
                    .map(|key| Some(Credential::ServiceAccount(key)))
                    .map_err(|err| self.unreadable(format!("[{SERVICE_ACCOUNT_SECTION}]: {err}"))),
            },
        }
    }
}

/// Process environment (after `.env` loading).
pub struct EnvProvider;

impl CredentialProvider for EnvProvider {
    fn provider_id(&self) -> &str {
        "env"
    }

    fn resolve(&self, key: CredentialKey) -> Result<Option<Credential>, CredentialError> {
        match key {
            CredentialKey::GeminiApiKey => Ok(std::env::var(GEMINI_API_KEY_VAR)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(|value| Credential::ApiKey(value.trim().to_string()))),
            CredentialKey::GcpServiceAccount => Ok(None),
        }
    }
}

/// Local service-account JSON key file (`secrets.json`).
pub struct KeyFileProvider {
    path: PathBuf,
}

impl KeyFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialProvider for KeyFileProvider {
    fn provider_id(&self) -> &str {
        "key_file"
    }

    fn resolve(&self, key: CredentialKey) -> Result<Option<Credential>, CredentialError> {
        if key != CredentialKey::GcpServiceAccount || !self.path.is_file() {
            return Ok(None);
        }
        let unreadable = |message: String| CredentialError::Unreadable {
            provider: "key_file".to_string(),
            message: format!("{}: {message}", self.path.display()),
        };
        let text = fs::read_to_string(&self.path).map_err(|err| unreadable(err.to_string()))?;
        let parsed = ServiceAccountKey::from_json(&text).map_err(|err| unreadable(err.to_string()))?;
        Ok(Some(Credential::ServiceAccount(parsed)))
    }
}
