//! Journal use-case service.
//!
//! # Responsibility
//! - Save daily entries with last-write-wins per date.
//! - Provide recent/windowed views, missing days and single-journal
//!   refreshers.

use super::{or_empty, DashboardError, Refresher};
use crate::filter::missing::{missing_days, MissingDay};
use crate::filter::window::filter_by_window;
use crate::model::journal::{JournalEntry, JournalKind};
use crate::prompt::{PromptBuilder, PromptContext};
use crate::session::SessionContext;
use crate::store::entry_store::EntryStore;
use crate::store::{StoreResult, TableBackend};
use crate::summarize::Summarizer;
use log::info;

/// Journal use-cases over one entry store.
pub struct JournalService<'a, B: TableBackend> {
    store: &'a EntryStore<B>,
}

impl<'a, B: TableBackend> JournalService<'a, B> {
    pub fn new(store: &'a EntryStore<B>) -> Self {
        Self { store }
    }

    /// Saves `entry`, replacing any entry already stored for its date.
    pub fn save_entry(&self, kind: JournalKind, entry: &JournalEntry) -> StoreResult<()> {
        self.store.upsert_by_date(kind, entry)
    }

    /// Entries newest first; empty when the journal does not exist yet.
    pub fn recent_entries(&self, kind: JournalKind) -> StoreResult<Vec<JournalEntry>> {
        or_empty(kind.table(), self.store.list_recent(kind))
    }

    /// Entries (newest first) inside the session window.
    pub fn entries_in_window(
        &self,
        kind: JournalKind,
        session: &SessionContext,
    ) -> StoreResult<Vec<JournalEntry>> {
        let entries = self.recent_entries(kind)?;
        Ok(filter_by_window(&entries, session.today, session.window))
    }

    /// Past days without an entry, yesterday first.
    pub fn missing_days(
        &self,
        kind: JournalKind,
        session: &SessionContext,
    ) -> StoreResult<Vec<MissingDay>> {
        let entries = self.recent_entries(kind)?;
        Ok(missing_days(&entries, session.today, session.lookback_days))
    }

    /// Summarizes one journal over the session window.
    ///
    /// # Errors
    /// - `DashboardError::NoEntries` when the window is empty or the prompt
    ///   limits leave no row to embed; the summarizer is not called.
    /// - `DashboardError::Service` when the summarizer fails.
    pub fn refresh(
        &self,
        kind: JournalKind,
        session: &SessionContext,
        builder: &PromptBuilder,
        summarizer: &dyn Summarizer,
    ) -> Result<Refresher, DashboardError> {
        let entries = self.entries_in_window(kind, session)?;
        if entries.is_empty() {
            return Err(DashboardError::NoEntries(session.window));
        }

        let context = match kind {
            JournalKind::Life => PromptContext::Life,
            JournalKind::Work => PromptContext::Work,
        };
        let prompt = builder.build_prompt(&entries, context);
        if prompt.included_rows == 0 {
            return Err(DashboardError::NoEntries(session.window));
        }
        info!(
            "event=refresh module=service status=start journal={} window={:?} rows={} omitted={}",
            kind, session.window, prompt.included_rows, prompt.omitted_rows
        );
        let text = summarizer.summarize(&prompt.text)?;
        Ok(Refresher {
            text,
            included_rows: prompt.included_rows,
            omitted_rows: prompt.omitted_rows,
        })
    }
}
