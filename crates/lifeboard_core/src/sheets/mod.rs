//! Google Sheets access for the spreadsheet backend.
//!
//! # Responsibility
//! - Authenticate with a service-account key.
//! - Read, append, clear and rewrite worksheet values by tab name.
//!
//! # Invariants
//! - Access tokens are never logged.
//! - A missing worksheet tab is reported as `None`, not as an error.

pub mod auth;
pub mod client;

pub use auth::{ServiceAccountKey, TokenSource};
pub use client::SheetsClient;

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static SHEET_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("valid sheet url regex"));
static SHEET_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{10,}$").expect("valid sheet id regex"));

pub type SheetsResult<T> = Result<T, SheetsError>;

/// Spreadsheet transport and auth failures.
#[derive(Debug)]
pub enum SheetsError {
    Http(reqwest::Error),
    Status {
        context: &'static str,
        status: u16,
        message: String,
    },
    Auth(String),
    InvalidSheetUrl(String),
    Decode(String),
}

impl Display for SheetsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "{err}"),
            Self::Status {
                context,
                status,
                message,
            } => write!(f, "{context}: HTTP {status} - {message}"),
            Self::Auth(message) => write!(f, "sheets auth failed: {message}"),
            Self::InvalidSheetUrl(value) => write!(f, "not a spreadsheet url or id: `{value}`"),
            Self::Decode(message) => write!(f, "unexpected sheets response: {message}"),
        }
    }
}

impl Error for SheetsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SheetsError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Extracts the spreadsheet id from an edit URL, or accepts a bare id.
pub fn spreadsheet_id(url_or_id: &str) -> SheetsResult<String> {
    let trimmed = url_or_id.trim();
    if let Some(captures) = SHEET_URL_RE.captures(trimmed) {
        return Ok(captures[1].to_string());
    }
    if SHEET_ID_RE.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }
    Err(SheetsError::InvalidSheetUrl(trimmed.to_string()))
}
