//! Cart store
//!
//! Ordered in-memory collection of cart entries for the active session.
//! Additions arrive pre-composed (see [`compose`]) so that one selection -
//! parent plus any bundled companions - lands in a single atomic append.

pub mod compose;

use shared::cart::CartEntry;

pub use compose::compose_entries;

/// Cart validation errors
///
/// Raised before any entry is created; the cart is never mutated on
/// rejection and no network call is attempted.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CartError {
    #[error("a selection from \"{0}\" is required")]
    MissingRequiredOption(String),

    #[error("\"{0}\" allows only one selection")]
    MultipleOptionsInSingleSelect(String),

    #[error("price must be a finite, non-negative amount, got {0}")]
    InvalidPrice(f64),
}

/// Ordered cart for one kiosk session
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    entries: Vec<CartEntry>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append all entries of one selection in a single state update.
    pub fn append(&mut self, entries: Vec<CartEntry>) {
        self.entries.extend(entries);
    }

    /// Remove an entry; an entry carrying a group id takes its whole set
    /// with it, whichever member was targeted.
    ///
    /// Removing an unknown id is a no-op. Returns the number of entries
    /// removed.
    pub fn remove(&mut self, entry_id: &str) -> usize {
        let Some(target) = self.entries.iter().find(|e| e.entry_id == entry_id) else {
            return 0;
        };

        let before = self.entries.len();
        match target.group_id.clone() {
            Some(group_id) => self.entries.retain(|e| !e.in_group(&group_id)),
            None => self.entries.retain(|e| e.entry_id != entry_id),
        }
        before - self.entries.len()
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
