//! Data models for the flashcard system

use std::path::PathBuf;

/// Stable handle to a card inside a `CardStore`.
///
/// Handles are plain indices into the store's arena; cards are never removed
/// during a run so a handle stays valid for the life of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardHandle(pub(crate) usize);

impl CardHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A deck is one file of cards. `index` is its position on the command line
/// and partitions the cards loaded from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub index: usize,
    pub path: PathBuf,
}

impl Deck {
    pub fn new(index: usize, path: PathBuf) -> Self {
        Self { index, path }
    }

    /// Identifier written in review prompts
    pub fn identifier(&self) -> String {
        self.path.display().to_string()
    }
}

/// A single flashcard and its review schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Unique within its deck only
    pub id: u64,
    /// Index of the deck this card was loaded from. Not persisted.
    pub deck: usize,
    /// Seconds since the epoch
    pub created_at: i64,
    /// Seconds since the epoch
    pub due_at: i64,
    pub leech_count: u8,
    /// Opaque payload kept verbatim
    pub extra: String,
    /// Set once the card has been rescheduled in this session
    pub rescheduled_this_pass: bool,
}

impl Card {
    pub fn new(id: u64, deck: usize, created_at: i64, due_at: i64) -> Self {
        Self {
            id,
            deck,
            created_at,
            due_at,
            leech_count: 0,
            extra: String::new(),
            rescheduled_this_pass: false,
        }
    }

    /// Duration between the scheduling anchor and the due time
    pub fn interval(&self) -> i64 {
        self.due_at.saturating_sub(self.created_at)
    }
}
