//! Core domain logic for the life dashboard.
//! This crate owns storage, filtering, prompt building and summarization;
//! front ends only parse input and render results.

pub mod config;
pub mod credentials;
pub mod db;
pub mod filter;
pub mod http;
pub mod logging;
pub mod model;
pub mod prompt;
pub mod service;
pub mod session;
pub mod sheets;
pub mod store;
pub mod summarize;

pub use config::{AppConfig, BackendKind, ConfigError};
pub use credentials::{CredentialChain, CredentialError};
pub use filter::missing::MissingDay;
pub use filter::window::TimeWindow;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactBook};
pub use model::journal::{JournalEntry, JournalKind};
pub use model::table::{RawTable, TableId};
pub use prompt::{PromptBuilder, PromptContext, PromptLimits, TruncationPolicy};
pub use service::contact_service::{ContactService, ContactStats};
pub use service::journal_service::JournalService;
pub use service::refresher_service::RefresherService;
pub use service::{DashboardError, Refresher};
pub use session::SessionContext;
pub use store::csv_backend::CsvBackend;
pub use store::entry_store::EntryStore;
pub use store::sheets_backend::SheetsBackend;
pub use store::sqlite_backend::SqliteBackend;
pub use store::{StoreError, StoreResult, TableBackend};
pub use summarize::{GeminiClient, SummarizeError, Summarizer};

/// Minimal health-check API for wiring checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
