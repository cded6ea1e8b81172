//! Dashboard use-case services.
//!
//! # Responsibility
//! - Orchestrate store reads, filters, prompt building and summarization.
//! - Turn a missing table into an empty one for every read use-case.
//!
//! # Invariants
//! - Services never bypass the entry store for table access.
//! - Services stay backend-agnostic.

pub mod contact_service;
pub mod journal_service;
pub mod refresher_service;

use crate::filter::contacts::PickError;
use crate::filter::window::TimeWindow;
use crate::model::table::TableId;
use crate::store::{StoreError, StoreResult};
use crate::summarize::SummarizeError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Use-case failure surfaced to the user.
#[derive(Debug)]
pub enum DashboardError {
    Store(StoreError),
    /// Summarization failed; the action is abandoned.
    Service(SummarizeError),
    /// Random pick over an empty view.
    Pick(PickError),
    /// Nothing in the window to summarize.
    NoEntries(TimeWindow),
}

impl Display for DashboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Pick(err) => write!(f, "{err}"),
            Self::NoEntries(window) => write!(f, "no journal entries in window `{window}`"),
        }
    }
}

impl Error for DashboardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Pick(err) => Some(err),
            Self::NoEntries(_) => None,
        }
    }
}

impl From<StoreError> for DashboardError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SummarizeError> for DashboardError {
    fn from(value: SummarizeError) -> Self {
        Self::Service(value)
    }
}

impl From<PickError> for DashboardError {
    fn from(value: PickError) -> Self {
        Self::Pick(value)
    }
}

/// Generated summary plus how much of the data it saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refresher {
    pub text: String,
    pub included_rows: usize,
    pub omitted_rows: usize,
}

/// Maps `NotFound` to an empty value.
pub(crate) fn or_empty<T: Default>(table: TableId, result: StoreResult<T>) -> StoreResult<T> {
    match result {
        Err(StoreError::NotFound(_)) => {
            info!("event=table_load module=service status=empty table={table}");
            Ok(T::default())
        }
        other => other,
    }
}
