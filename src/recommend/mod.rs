use serde::Serialize;
use static_assertions::assert_impl_all;

use crate::catalog::{Catalog, Item, MatchMode};
use crate::error::RecommendError;
use crate::index::GenreIndex;

/// Tuning knobs of the one recommendation core.
///
/// Behavior variants differ only by configuration, never by separate code
/// paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecommenderConfig {
    /// Title lookup behavior.
    pub match_mode: MatchMode,
    /// When set, `recommend` draws at least this many nearest neighbors
    /// first, re-sorts that pool by rating descending, and only then keeps
    /// `count` entries.
    pub rerank_pool: Option<usize>,
}

/// Presentation-facing projection of one catalog item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: Option<u32>,
    pub name: String,
    pub genre: String,
    pub rating: f64,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            genre: item.genre.clone(),
            rating: item.rating,
        }
    }
}

/// レコメンダ本体
/// カタログとジャンルインデックスを束ねた問い合わせ窓口です
///
/// インデックスのビルドはコンストラクタで一度だけ行われる 以後の問い合わせは
/// すべて共有参照のみの純粋な読み取りで、複数スレッドから同時に呼んでも
/// 再ビルドは起こらない
#[derive(Debug)]
pub struct Recommender {
    catalog: Catalog,
    index: GenreIndex<f32>,
    config: RecommenderConfig,
}

assert_impl_all!(Recommender: Send, Sync);

impl Recommender {
    /// Builds the engine with the default configuration.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_config(catalog, RecommenderConfig::default())
    }

    /// Builds the engine: fits the genre index against the catalog rows.
    /// This is the one blocking step; everything afterwards is a pure read.
    pub fn with_config(catalog: Catalog, config: RecommenderConfig) -> Self {
        let index = GenreIndex::fit(&catalog.genres());
        Self {
            catalog,
            index,
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &GenreIndex<f32> {
        &self.index
    }

    pub fn config(&self) -> RecommenderConfig {
        self.config
    }

    /// 類似タイトル検索
    /// `title`のジャンルに最も近い最大`count`件を類似度降順で返すメソッド
    ///
    /// クエリ自身は決して含まれない タイトルがカタログに無い場合は
    /// `TitleNotFound`を返す ボキャブラリが空の場合は空リストの成功になる
    ///
    /// # Arguments
    /// * `title` - 検索するタイトル (照合は設定の`match_mode`に従う)
    /// * `count` - 返す最大件数
    ///
    /// # Returns
    /// * `Result<Vec<ItemView>, RecommendError>` - 推薦リスト
    pub fn recommend(&self, title: &str, count: usize) -> Result<Vec<ItemView>, RecommendError> {
        let row = self
            .catalog
            .find_by_name(title, self.config.match_mode)
            .ok_or_else(|| RecommendError::TitleNotFound {
                title: title.to_string(),
            })?;

        let pool = self.config.rerank_pool.map_or(count, |p| p.max(count));
        let mut hits = self.index.neighbors(row, pool);
        if self.config.rerank_pool.is_some() {
            // 評価値の降順で池を並べ替える 同評価は類似度順のまま
            let rating = |row: usize| self.catalog.get(row).map_or(f64::MIN, |it| it.rating);
            hits.sort_by(|a, b| rating(b.row).total_cmp(&rating(a.row)));
            hits.truncate(count);
        }

        Ok(hits
            .iter()
            .filter_map(|n| self.catalog.get(n.row))
            .map(ItemView::from)
            .collect())
    }

    /// Highest-rated items, rating descending; equal ratings keep catalog
    /// order.
    pub fn top_rated(&self, count: usize) -> Vec<ItemView> {
        let items = self.catalog.items();
        let mut rows: Vec<usize> = (0..items.len()).collect();
        rows.sort_by(|&a, &b| items[b].rating.total_cmp(&items[a].rating));
        rows.into_iter()
            .take(count)
            .map(|row| ItemView::from(&items[row]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, genre: &str, rating: f64) -> Item {
        Item {
            id: None,
            name: name.into(),
            genre: genre.into(),
            rating,
        }
    }

    fn small_catalog() -> Catalog {
        Catalog::from_items(vec![
            item("A", "Action, Comedy", 8.0),
            item("B", "Action", 7.5),
            item("C", "Romance", 6.0),
        ])
        .0
    }

    fn names(views: &[ItemView]) -> Vec<&str> {
        views.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn recommend_ranks_shared_genre_terms_first() {
        let rec = Recommender::new(small_catalog());
        let views = rec.recommend("A", 2).unwrap();
        assert_eq!(names(&views), vec!["B", "C"]);
    }

    #[test]
    fn top_rated_sorts_by_rating_descending() {
        let rec = Recommender::new(small_catalog());
        assert_eq!(names(&rec.top_rated(2)), vec!["A", "B"]);
        assert_eq!(names(&rec.top_rated(99)), vec!["A", "B", "C"]);
        assert!(rec.top_rated(0).is_empty());
    }

    #[test]
    fn unknown_title_is_a_typed_error_not_an_empty_list() {
        let rec = Recommender::new(small_catalog());
        let err = rec.recommend("Totally Unknown Title 123", 5).unwrap_err();
        assert!(matches!(err, RecommendError::TitleNotFound { .. }));
    }

    #[test]
    fn results_exclude_the_query_and_respect_count() {
        let rec = Recommender::new(small_catalog());
        for title in ["A", "B", "C"] {
            let views = rec.recommend(title, 99).unwrap();
            assert_eq!(views.len(), 2, "min(count, items - 1) for {title}");
            assert!(names(&views).iter().all(|&n| n != title));
            assert_eq!(rec.recommend(title, 1).unwrap().len(), 1);
        }
    }

    #[test]
    fn repeated_calls_return_the_same_list() {
        let rec = Recommender::new(small_catalog());
        let first = rec.recommend("A", 2).unwrap();
        for _ in 0..5 {
            assert_eq!(rec.recommend("A", 2).unwrap(), first);
        }
    }

    #[test]
    fn normalized_mode_folds_case_exact_mode_does_not() {
        let config = RecommenderConfig {
            match_mode: MatchMode::Normalized,
            rerank_pool: None,
        };
        let rec = Recommender::with_config(small_catalog(), config);
        assert_eq!(names(&rec.recommend(" a ", 2).unwrap()), vec!["B", "C"]);

        let rec = Recommender::new(small_catalog());
        assert!(rec.recommend(" a ", 2).is_err());
    }

    #[test]
    fn rerank_pool_reorders_the_candidate_pool_by_rating() {
        let catalog = Catalog::from_items(vec![
            item("A", "Action, Comedy", 5.0),
            item("B", "Action", 6.0),
            item("C", "Comedy", 9.0),
            item("D", "Romance", 10.0),
        ])
        .0;

        // plain similarity order from A: B and C tie on one shared term
        // each, stable order keeps B first; D shares nothing.
        let plain = Recommender::new(catalog.clone());
        assert_eq!(names(&plain.recommend("A", 2).unwrap()), vec!["B", "C"]);

        // with a pool of 3, the highest-rated pool members win instead
        let config = RecommenderConfig {
            match_mode: MatchMode::Exact,
            rerank_pool: Some(3),
        };
        let reranked = Recommender::with_config(catalog, config);
        assert_eq!(names(&reranked.recommend("A", 2).unwrap()), vec!["D", "C"]);
    }

    #[test]
    fn empty_vocabulary_degrades_to_empty_success() {
        let catalog = Catalog::from_items(vec![
            item("X", "of the", 5.0),
            item("Y", "a an", 6.0),
        ])
        .0;
        let rec = Recommender::new(catalog);
        assert_eq!(rec.recommend("X", 5).unwrap(), Vec::<ItemView>::new());
    }

    #[test]
    fn dropped_rows_never_surface_anywhere() {
        let catalog = Catalog::from_items(vec![
            item("A", "Action", 8.0),
            item("Ghost", "", 9.9),
            item("B", "Action", 7.0),
        ])
        .0;
        let rec = Recommender::new(catalog);
        assert!(names(&rec.top_rated(10)).iter().all(|&n| n != "Ghost"));
        assert!(names(&rec.recommend("A", 10).unwrap())
            .iter()
            .all(|&n| n != "Ghost"));
        assert!(rec.recommend("Ghost", 3).is_err());
    }
}
