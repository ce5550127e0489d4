use std::io;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::LoadError;

/// Column names resolved from the source header row.
const COL_NAME: &str = "name";
const COL_GENRE: &str = "genre";
const COL_RATING: &str = "rating";
const COL_ID: &str = "anime_id";

/// One catalog entry.
#[derive(Debug, Clone)]
pub struct Item {
    /// Stable source identifier, when the source carries one. A presentation
    /// layer can use it to build external references (thumbnails etc.).
    pub id: Option<u32>,
    pub name: String,
    pub genre: String,
    pub rating: f64,
}

/// Lookup behavior of [`Catalog::find_by_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Case-sensitive, byte-exact match against `name`.
    #[default]
    Exact,
    /// Match against the trimmed, case-folded form of `name`.
    Normalized,
}

/// Load-time diagnostics, returned as data so the caller decides how to
/// report them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Data rows seen in the source (header excluded).
    pub rows_read: usize,
    /// Rows dropped for an empty `name`/`genre` or an unusable `rating`.
    pub rows_dropped: usize,
    /// Names that occurred more than once, one entry per extra occurrence.
    /// Lookups resolve to the first occurrence in catalog order.
    pub duplicate_names: Vec<String>,
}

/// The immutable, validated, ordered item collection.
///
/// Row numbers are contiguous from 0 after filtering and never change for
/// the lifetime of the value; the genre index is built against exactly this
/// order.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    by_name: IndexMap<String, usize>,
    by_normalized: IndexMap<String, usize>,
}

impl Catalog {
    /// Reads a CSV catalog file.
    ///
    /// The header row must contain `name`, `genre` and `rating` columns;
    /// every other column is ignored except an optional `anime_id`, which is
    /// captured as [`Item::id`]. Rows with an empty `name` or `genre` field
    /// or a `rating` that does not parse as a finite number are dropped and
    /// counted in the report.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<(Self, LoadReport), LoadError> {
        let rdr = csv::ReaderBuilder::new().from_path(path)?;
        Self::from_csv(rdr)
    }

    /// Reads a CSV catalog from any reader. Same rules as
    /// [`Catalog::from_csv_path`].
    pub fn from_reader<R: io::Read>(reader: R) -> Result<(Self, LoadReport), LoadError> {
        let rdr = csv::ReaderBuilder::new().from_reader(reader);
        Self::from_csv(rdr)
    }

    fn from_csv<R: io::Read>(mut rdr: csv::Reader<R>) -> Result<(Self, LoadReport), LoadError> {
        let headers = rdr.headers()?.clone();
        let col = |name: &'static str| -> Result<usize, LoadError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(LoadError::MissingColumn(name))
        };
        let name_col = col(COL_NAME)?;
        let genre_col = col(COL_GENRE)?;
        let rating_col = col(COL_RATING)?;
        let id_col = headers.iter().position(|h| h == COL_ID);

        let mut items = Vec::new();
        let mut rows_read = 0usize;
        for record in rdr.records() {
            let record = record?;
            rows_read += 1;
            let name = record.get(name_col).unwrap_or("");
            let genre = record.get(genre_col).unwrap_or("");
            let rating = record.get(rating_col).unwrap_or("").trim().parse::<f64>();
            let rating = match rating {
                Ok(r) if r.is_finite() => r,
                _ => continue,
            };
            if name.is_empty() || genre.is_empty() {
                continue;
            }
            let id = id_col
                .and_then(|c| record.get(c))
                .and_then(|s| s.trim().parse::<u32>().ok());
            items.push(Item {
                id,
                name: name.to_string(),
                genre: genre.to_string(),
                rating,
            });
        }
        let kept = items.len();
        let (catalog, mut report) = Self::from_items(items);
        report.rows_read = rows_read;
        report.rows_dropped = rows_read - kept;
        Ok((catalog, report))
    }

    /// Builds a catalog from an in-memory collection, applying the same
    /// validation as the CSV path: items with an empty `name`/`genre` or a
    /// non-finite `rating` are dropped, survivors are compacted in order.
    pub fn from_items(items: Vec<Item>) -> (Self, LoadReport) {
        let rows_read = items.len();
        let items: Vec<Item> = items
            .into_iter()
            .filter(|it| !it.name.is_empty() && !it.genre.is_empty() && it.rating.is_finite())
            .collect();

        let mut by_name: IndexMap<String, usize> = IndexMap::with_capacity(items.len());
        let mut by_normalized: IndexMap<String, usize> = IndexMap::with_capacity(items.len());
        let mut duplicate_names = Vec::new();
        for (row, item) in items.iter().enumerate() {
            if by_name.contains_key(item.name.as_str()) {
                duplicate_names.push(item.name.clone());
            } else {
                by_name.insert(item.name.clone(), row);
            }
            by_normalized.entry(normalize_name(&item.name)).or_insert(row);
        }

        let report = LoadReport {
            rows_read,
            rows_dropped: rows_read - items.len(),
            duplicate_names,
        };
        let catalog = Self {
            items,
            by_name,
            by_normalized,
        };
        (catalog, report)
    }

    /// Row of the first item matching `title` under the given mode.
    pub fn find_by_name(&self, title: &str, mode: MatchMode) -> Option<usize> {
        match mode {
            MatchMode::Exact => self.by_name.get(title).copied(),
            MatchMode::Normalized => self
                .by_normalized
                .get(normalize_name(title).as_str())
                .copied(),
        }
    }

    pub fn get(&self, row: usize) -> Option<&Item> {
        self.items.get(row)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Genre texts in row order, the fit input of the genre index.
    pub fn genres(&self) -> Vec<&str> {
        self.items.iter().map(|it| it.genre.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Case-folded, whitespace-trimmed lookup key.
#[inline]
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
