use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::selector::CardSelector;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub id: String,
    pub card: Card,
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read deck file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed deck document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("deck contains no cards")]
    Empty,
    #[error("card {0:?} has a blank title")]
    BlankTitle(String),
    #[error("card id {0:?} appears more than once")]
    DuplicateId(String),
}

/// Deck document entries in file order, duplicates included.
struct DeckDocument(Vec<(String, Card)>);

impl<'de> Deserialize<'de> for DeckDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = DeckDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of card ids to cards")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Card>()? {
                    entries.push(entry);
                }
                Ok(DeckDocument(entries))
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

/// The fixed, non-empty set of cards the service draws from.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct Deck {
    entries: Vec<DeckEntry>,
}

impl Deck {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeckError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| DeckError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DeckError> {
        let DeckDocument(cards) = serde_json::from_str(raw)?;
        Self::from_cards(cards)
    }

    pub fn from_cards(cards: impl IntoIterator<Item = (String, Card)>) -> Result<Self, DeckError> {
        let mut entries: Vec<DeckEntry> = cards
            .into_iter()
            .map(|(id, card)| DeckEntry { id, card })
            .collect();

        if entries.is_empty() {
            return Err(DeckError::Empty);
        }
        if let Some(entry) = entries.iter().find(|e| e.card.title.trim().is_empty()) {
            return Err(DeckError::BlankTitle(entry.id.clone()));
        }
        let mut seen = HashSet::with_capacity(entries.len());
        if let Some(entry) = entries.iter().find(|e| !seen.insert(e.id.as_str())) {
            return Err(DeckError::DuplicateId(entry.id.clone()));
        }

        entries.sort_by(|a, b| compare_ids(&a.id, &b.id));
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; construction rejects empty decks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DeckEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeckEntry> {
        self.entries.iter()
    }

    /// Draw one entry using `selector`. Out-of-range picks wrap around.
    pub fn draw(&self, selector: &dyn CardSelector) -> &DeckEntry {
        let index = selector.pick(self.entries.len()) % self.entries.len();
        &self.entries[index]
    }
}

// Numeric ids sort numerically so "2" comes before "10". Ids with the same
// numeric value ("1", "01") fall back to text order so the result is total.
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
