use serde::Serialize;

use crate::recommend::ItemView;

/// One answered query: what was asked and what came back, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub query: String,
    pub results: Vec<ItemView>,
}

/// Session-scoped, append-only log of answered queries.
///
/// Owned by the presentation layer and passed to whatever renders history;
/// the engine itself records nothing. Entries can be appended and read,
/// never edited or removed, and the log dies with the session.
#[derive(Debug, Default)]
pub struct QueryLog {
    entries: Vec<Recommendation>,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one answered query.
    pub fn record(&mut self, rec: Recommendation) {
        self.entries.push(rec);
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
