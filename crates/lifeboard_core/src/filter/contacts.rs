//! Contact category filter and random picker.

use crate::model::contact::{Contact, ALL_CONTACTS};
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Random pick failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickError {
    /// No contact to pick from.
    EmptySet,
}

impl Display for PickError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySet => write!(f, "no contacts in the current view"),
        }
    }
}

impl Error for PickError {}

/// Every contact for `All Contacts`, otherwise exact category matches.
pub fn filter_by_category<'a>(contacts: &'a [Contact], category: &str) -> Vec<&'a Contact> {
    if category == ALL_CONTACTS {
        return contacts.iter().collect();
    }
    contacts
        .iter()
        .filter(|contact| contact.category == category)
        .collect()
}

/// Category selector options: `All Contacts`, then categories in first-seen
/// order.
pub fn categories(contacts: &[Contact]) -> Vec<String> {
    let mut options = vec![ALL_CONTACTS.to_string()];
    for contact in contacts {
        if !options.iter().any(|option| *option == contact.category) {
            options.push(contact.category.clone());
        }
    }
    options
}

/// Picks one element uniformly at random.
pub fn pick_random<'a, T, R: Rng>(items: &'a [T], rng: &mut R) -> Result<&'a T, PickError> {
    if items.is_empty() {
        return Err(PickError::EmptySet);
    }
    Ok(&items[rng.random_range(0..items.len())])
}

#[cfg(test)]
mod tests {
    use super::{categories, filter_by_category, pick_random, PickError};
    use crate::model::contact::Contact;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn contacts() -> Vec<Contact> {
        vec![
            Contact::new("A", "Work"),
            Contact::new("B", "Family"),
            Contact::new("C", "Work"),
        ]
    }

    #[test]
    fn filter_by_category_matches_exactly() {
        let all = vec![Contact::new("A", "Work"), Contact::new("B", "Family")];
        let filtered = filter_by_category(&all, "Work");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "A");
        assert!(filter_by_category(&all, "work").is_empty());
    }

    #[test]
    fn all_contacts_selector_returns_everything() {
        let all = contacts();
        assert_eq!(filter_by_category(&all, "All Contacts").len(), 3);
    }

    #[test]
    fn categories_are_unique_in_first_seen_order() {
        assert_eq!(categories(&contacts()), vec!["All Contacts", "Work", "Family"]);
    }

    #[test]
    fn pick_random_on_empty_is_empty_set() {
        let mut rng = StdRng::seed_from_u64(7);
        let empty: Vec<Contact> = Vec::new();
        assert_eq!(pick_random(&empty, &mut rng), Err(PickError::EmptySet));
    }

    #[test]
    fn pick_random_single_always_returns_it() {
        let mut rng = StdRng::seed_from_u64(7);
        let single = vec![Contact::new("Solo", "Friends")];
        for _ in 0..20 {
            assert_eq!(pick_random(&single, &mut rng).unwrap().name, "Solo");
        }
    }

    #[test]
    fn pick_random_eventually_reaches_every_item() {
        let mut rng = StdRng::seed_from_u64(42);
        let all = contacts();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(pick_random(&all, &mut rng).unwrap().name.clone());
        }
        assert_eq!(seen.len(), 3);
    }
}
