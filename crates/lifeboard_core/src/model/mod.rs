//! Dashboard domain model.
//!
//! # Responsibility
//! - Define journal/contact records shared by stores, filters and services.
//! - Define the backend-level table shape every store reads and writes.
//!
//! # Invariants
//! - A journal table holds at most one entry per calendar date.
//! - Contacts always carry a category (`Uncategorized` by default).

pub mod contact;
pub mod journal;
pub mod table;
