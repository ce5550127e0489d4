/// This crate is a content-based anime recommendation engine over a CSV catalog.
pub mod catalog;
pub mod error;
pub mod index;
pub mod recommend;
pub mod session;
pub mod utils;

/// Anime Catalog
/// The immutable, validated, ordered item collection the engine is built
/// from.
///
/// Internally, it holds:
/// - The items in source order after filtering (row order = index row order)
/// - A byte-exact name lookup table
/// - A normalized (trimmed, case-folded) name lookup table
///
/// Rows with an empty `name`/`genre` or an unusable `rating` are dropped at
/// load time and the survivors are compacted, so row numbers are contiguous
/// from 0. Duplicate names resolve to the first occurrence in catalog order
/// and are reported in the `LoadReport`.
///
/// The catalog never changes after load; there is no update or delete.
pub use catalog::Catalog;

/// Catalog entry, load diagnostics and lookup mode
/// - `Item`: one catalog row (optional stable id, name, genre text, rating)
/// - `LoadReport`: rows read/dropped and duplicate names, returned as data
///   so the caller decides how to report them
/// - `MatchMode`: byte-exact or normalized title lookup
pub use catalog::{Item, LoadReport, MatchMode};

/// Genre Index
/// The vector space model over the catalog's genre text: an
/// insertion-ordered vocabulary (stop words removed) and one L2-normalized
/// sparse TF-IDF weight vector per catalog row, in catalog order.
///
/// `GenreIndex<N>` has the following generic parameter:
/// - `N`: stored weight scalar (e.g. f32, f64); scoring accumulates in f64
///
/// Built once with `fit`; immutable afterwards. Nearest-neighbor queries
/// score every row by cosine similarity (brute force), sort stably in
/// descending order and exclude the query row itself. An all-stopword
/// catalog produces an empty vocabulary and every query then returns an
/// empty neighbor set instead of failing.
pub use index::GenreIndex;

/// Search hit structure
/// One scored neighbor: the catalog row and its cosine similarity to the
/// query row.
pub use index::search::Neighbor;

/// Recommender
/// The top-level facade of this crate, binding a `Catalog` and a
/// `GenreIndex` behind the two query operations the presentation layer
/// needs: `recommend` (k most similar to a title) and `top_rated`.
///
/// Behavior variants are expressed by `RecommenderConfig` instead of
/// separate code paths:
/// - `match_mode`: exact or normalized title lookup
/// - `rerank_pool`: optionally re-sort a larger neighbor pool by rating
///   descending before truncating
///
/// # Thread Safety
/// The index is fitted once inside the constructor; afterwards every query
/// is a pure `&self` read, so one instance can serve unlimited concurrent
/// readers and a second build can never be triggered.
pub use recommend::Recommender;

/// Recommender configuration and result projection
/// - `RecommenderConfig`: lookup mode and optional rating re-rank pool
/// - `ItemView`: presentation-facing projection of one item (serializable)
pub use recommend::{ItemView, RecommenderConfig};

/// Session history structures
/// - `Recommendation`: one answered query with its ordered results
/// - `QueryLog`: session-scoped, append-only log owned by the presentation
///   layer; the engine itself records nothing
pub use session::{QueryLog, Recommendation};

/// Error taxonomy
/// - `LoadError`: catalog source unreadable or missing required columns;
///   fatal at startup
/// - `RecommendError`: unknown title; recoverable, reported to the end user
pub use error::{LoadError, RecommendError};
