//! Deck file storage
//!
//! Each deck is a text file with one card per line:
//! ```text
//! 00042<TAB>created<TAB>due<TAB>leeches<TAB>anything else to end of line
//! ```
//! Timestamps use the configured strftime pattern and are read and written
//! as UTC; a pattern without a time of day reads as midnight. Parsing is
//! permissive: short lines and bad fields produce zeroed values and a
//! warning, never an error. Only I/O on the deck files fails.
//!
//! Lines end at `\n` only. A `\r` before it stays in the last field, so CRLF
//! decks are written back the way they were read.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{ParseErrorKind, ParseResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

use super::models::{Card, CardHandle, Deck};

/// Field separator in deck files
pub const DELIM: char = '\t';

const FIELD_COUNT: usize = 5;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read deck {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write deck {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Owns every card loaded for this run, across all decks
#[derive(Debug, Default)]
pub struct CardStore {
    decks: Vec<Deck>,
    cards: Vec<Card>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every deck in order; the position in `paths` becomes the deck index
    pub fn load<P: AsRef<Path>>(paths: &[P], time_format: &str) -> Result<Self> {
        let mut store = Self::new();
        for path in paths {
            store.load_deck(path.as_ref(), time_format)?;
        }
        log::info!(
            "Loaded {} cards from {} decks",
            store.cards.len(),
            store.decks.len()
        );
        Ok(store)
    }

    /// Read one deck file and append its cards. Returns the new deck's index.
    pub fn load_deck(&mut self, path: &Path, time_format: &str) -> Result<usize> {
        let bytes = fs::read(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                log::warn!(
                    "deck {} is not valid UTF-8, replacing bad bytes: {}",
                    path.display(),
                    e.utf8_error()
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        let index = self.add_deck(path.to_path_buf());
        for line in content.split('\n') {
            if line.is_empty() {
                continue;
            }
            self.cards.push(parse_line(line, index, time_format));
        }

        Ok(index)
    }

    /// Register a deck with no cards yet
    pub fn add_deck(&mut self, path: PathBuf) -> usize {
        let index = self.decks.len();
        self.decks.push(Deck::new(index, path));
        index
    }

    pub fn add_card(&mut self, card: Card) -> CardHandle {
        self.cards.push(card);
        CardHandle(self.cards.len() - 1)
    }

    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn deck(&self, index: usize) -> Option<&Deck> {
        self.decks.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, handle: CardHandle) -> &Card {
        &self.cards[handle.0]
    }

    pub fn get_mut(&mut self, handle: CardHandle) -> &mut Card {
        &mut self.cards[handle.0]
    }

    /// All cards in load order
    pub fn iter(&self) -> impl Iterator<Item = (CardHandle, &Card)> {
        self.cards
            .iter()
            .enumerate()
            .map(|(i, card)| (CardHandle(i), card))
    }

    /// Cards belonging to one deck, in load order
    pub fn deck_cards(&self, deck: usize) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |card| card.deck == deck)
    }

    /// Serialize one deck back to its file format
    pub fn render_deck(&self, deck: usize, time_format: &str) -> String {
        self.deck_cards(deck)
            .map(|card| format_line(card, time_format))
            .collect()
    }

    /// Rewrite every deck file. With `debug_suffix`, writes next to the
    /// deck files instead of over them. Returns the paths written.
    pub fn save(&self, time_format: &str, debug_suffix: Option<&str>) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.decks.len());

        for deck in &self.decks {
            let path = match debug_suffix {
                Some(suffix) => with_suffix(&deck.path, suffix),
                None => deck.path.clone(),
            };

            let content = self.render_deck(deck.index, time_format);
            fs::write(&path, content).map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;

            log::info!("Wrote deck {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Parse one deck line. Never fails; missing or bad fields become zero.
pub fn parse_line(line: &str, deck: usize, time_format: &str) -> Card {
    let fields: Vec<&str> = line.splitn(FIELD_COUNT, DELIM).collect();
    if fields.len() < FIELD_COUNT {
        log::warn!(
            "deck {}: short card line ({} of {} fields): {:?}",
            deck,
            fields.len(),
            FIELD_COUNT,
            line
        );
    }

    let id = fields.first().map_or(0, |f| parse_number(f, "id"));

    let mut card = Card::new(
        id,
        deck,
        fields.get(1).map_or(0, |f| parse_timestamp(f, time_format, id)),
        fields.get(2).map_or(0, |f| parse_timestamp(f, time_format, id)),
    );
    card.leech_count = fields
        .get(3)
        .map_or(0, |f| parse_number(f, "leech count").min(u8::MAX as u64) as u8);
    card.extra = fields.get(4).map_or_else(String::new, |f| f.to_string());

    card
}

/// Render one card as a deck line, including the trailing newline
pub fn format_line(card: &Card, time_format: &str) -> String {
    format!(
        "{:05}{d}{}{d}{}{d}{}{d}{}\n",
        card.id,
        format_timestamp(card.created_at, time_format),
        format_timestamp(card.due_at, time_format),
        card.leech_count,
        card.extra,
        d = DELIM
    )
}

fn parse_number(field: &str, what: &str) -> u64 {
    match field.trim().parse::<u64>() {
        Ok(n) => n,
        Err(e) => {
            log::warn!("bad {} {:?}: {}", what, field, e);
            0
        }
    }
}

fn parse_timestamp(field: &str, time_format: &str, id: u64) -> i64 {
    match read_timestamp(field, time_format) {
        Ok(seconds) => seconds,
        Err(e) => {
            log::warn!("card id: {}: malformed timestamp {:?}: {}", id, field, e);
            0
        }
    }
}

/// Read a UTC timestamp written with `time_format`. Date-only patterns
/// yield midnight.
pub fn read_timestamp(field: &str, time_format: &str) -> ParseResult<i64> {
    match NaiveDateTime::parse_from_str(field, time_format) {
        Ok(dt) => Ok(dt.and_utc().timestamp()),
        Err(e) if e.kind() == ParseErrorKind::NotEnough => {
            let date = NaiveDate::parse_from_str(field, time_format)?;
            Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp())
        }
        Err(e) => Err(e),
    }
}

/// Render a UTC timestamp with `time_format`
pub fn format_timestamp(seconds: i64, time_format: &str) -> String {
    let dt = DateTime::from_timestamp(seconds, 0).unwrap_or_else(|| {
        log::warn!("timestamp {} out of range, writing epoch", seconds);
        DateTime::<Utc>::default()
    });
    dt.format(time_format).to_string()
}
