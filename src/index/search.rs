use num::Float;
use rayon::prelude::*;

use super::GenreIndex;

/// 近傍1件
/// `row`はカタログ行、`score`はコサイン類似度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub score: f64,
}

impl<N> GenreIndex<N>
where
    N: Float + Into<f64> + Send + Sync,
{
    /// k近傍検索
    /// クエリ行自身を除いた上位k件をスコア降順で返すメソッド
    ///
    /// - 類似度は正規化済み行ベクトル同士のドット積 (= コサイン類似度)
    /// - 全行総当たり ソートは安定で、同スコア行はカタログ順を保つ
    /// - ボキャブラリが空、または`row`が範囲外の場合は空を返す
    ///
    /// # Arguments
    /// * `row` - クエリとなるカタログ行
    /// * `k` - 近傍数 (クエリ自身は含まない)
    ///
    /// # Returns
    /// * `Vec<Neighbor>` - ボキャブラリが空でなければちょうど min(k, 行数 - 1) 件
    pub fn neighbors(&self, row: usize, k: usize) -> Vec<Neighbor> {
        if self.is_vocab_empty() {
            return Vec::new();
        }
        let Some(query_vec) = self.row(row) else {
            return Vec::new();
        };

        // 行順を保ったまま全行をスコアリング
        let mut scores: Vec<Neighbor> = self
            .matrix
            .par_iter()
            .enumerate()
            .map(|(i, doc_vec)| Neighbor {
                row: i,
                score: query_vec.dot(doc_vec),
            })
            .collect();

        scores.sort_by(|a, b| b.score.total_cmp(&a.score));
        scores.retain(|n| n.row != row);
        scores.truncate(k);
        scores
    }
}
