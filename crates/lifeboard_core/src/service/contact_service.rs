//! Rolodex use-case service.
//!
//! # Responsibility
//! - Import a contact CSV as the whole contact table.
//! - Provide category options, filtered views, counts and random picks.
//!
//! # Invariants
//! - Import always replaces the table; it never merges.
//! - Imported contacts always carry a category column.

use super::{or_empty, DashboardError};
use crate::filter::contacts::{categories, filter_by_category, pick_random};
use crate::model::contact::{Contact, ContactBook};
use crate::model::table::TableId;
use crate::session::SessionContext;
use crate::store::csv_backend::read_csv;
use crate::store::entry_store::EntryStore;
use crate::store::{StoreResult, TableBackend};
use log::info;
use rand::Rng;
use std::io::Read;

/// Total and currently visible contact counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactStats {
    pub total: usize,
    pub in_view: usize,
}

/// Contact use-cases over one entry store.
pub struct ContactService<'a, B: TableBackend> {
    store: &'a EntryStore<B>,
}

impl<'a, B: TableBackend> ContactService<'a, B> {
    pub fn new(store: &'a EntryStore<B>) -> Self {
        Self { store }
    }

    /// Replaces the contact table with the CSV read from `source`.
    pub fn import_csv<R: Read>(&self, source: R) -> StoreResult<ContactBook> {
        let raw = read_csv(source)?;
        let book = ContactBook::from_raw(&raw);
        self.store.replace_contacts(&book)?;
        info!(
            "event=contacts_import module=service status=ok rows={} columns={}",
            book.len(),
            book.columns.len()
        );
        Ok(book)
    }

    /// Full contact book; empty before the first import.
    pub fn book(&self) -> StoreResult<ContactBook> {
        or_empty(TableId::Contacts, self.store.load_contacts())
    }

    /// Category selector options.
    pub fn categories(&self) -> StoreResult<Vec<String>> {
        Ok(categories(&self.book()?.contacts))
    }

    /// Contacts matching the session category.
    pub fn filtered(&self, session: &SessionContext) -> StoreResult<Vec<Contact>> {
        let book = self.book()?;
        Ok(filter_by_category(&book.contacts, &session.category)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn stats(&self, session: &SessionContext) -> StoreResult<ContactStats> {
        let book = self.book()?;
        Ok(ContactStats {
            total: book.len(),
            in_view: filter_by_category(&book.contacts, &session.category).len(),
        })
    }

    /// One random contact from the session's filtered view.
    ///
    /// # Errors
    /// - `DashboardError::Pick(PickError::EmptySet)` when the view is empty.
    pub fn random_contact<R: Rng>(
        &self,
        session: &SessionContext,
        rng: &mut R,
    ) -> Result<Contact, DashboardError> {
        let view = self.filtered(session)?;
        let picked = pick_random(&view, rng)?.clone();
        info!(
            "event=contact_pick module=service status=ok in_view={}",
            view.len()
        );
        Ok(picked)
    }
}
