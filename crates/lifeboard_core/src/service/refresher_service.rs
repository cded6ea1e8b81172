//! Combined life/work briefing.

use super::journal_service::JournalService;
use super::{DashboardError, Refresher};
use crate::model::journal::JournalKind;
use crate::prompt::PromptBuilder;
use crate::session::SessionContext;
use crate::store::entry_store::EntryStore;
use crate::store::TableBackend;
use crate::summarize::Summarizer;
use log::info;

/// "Chief of Staff" briefing over both journals.
pub struct RefresherService<'a, B: TableBackend> {
    journals: JournalService<'a, B>,
    builder: PromptBuilder,
}

impl<'a, B: TableBackend> RefresherService<'a, B> {
    pub fn new(store: &'a EntryStore<B>, builder: PromptBuilder) -> Self {
        Self {
            journals: JournalService::new(store),
            builder,
        }
    }

    /// Builds the briefing for the session window.
    ///
    /// A missing journal counts as empty. Both empty, or nothing left after
    /// the prompt limits, is `NoEntries`.
    pub fn briefing(
        &self,
        session: &SessionContext,
        summarizer: &dyn Summarizer,
    ) -> Result<Refresher, DashboardError> {
        let life = self.journals.entries_in_window(JournalKind::Life, session)?;
        let work = self.journals.entries_in_window(JournalKind::Work, session)?;
        if life.is_empty() && work.is_empty() {
            return Err(DashboardError::NoEntries(session.window));
        }

        let prompt = self.builder.build_briefing(&life, &work);
        if prompt.included_rows == 0 {
            return Err(DashboardError::NoEntries(session.window));
        }
        info!(
            "event=briefing module=service status=start window={:?} life_rows={} work_rows={} omitted={}",
            session.window,
            life.len(),
            work.len(),
            prompt.omitted_rows
        );
        let text = summarizer.summarize(&prompt.text)?;
        Ok(Refresher {
            text,
            included_rows: prompt.included_rows,
            omitted_rows: prompt.omitted_rows,
        })
    }
}
