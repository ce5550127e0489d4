pub mod search;
pub mod stopwords;
pub mod tokenize;

use std::collections::HashSet;

use indexmap::IndexSet;
use num::Float;
use rayon::prelude::*;

use crate::utils::spvec::SpVec;

use stopwords::ENGLISH_STOP_WORDS;
use tokenize::tokenize;

/// ジャンルインデックス
/// カタログ行ごとのTF-IDF重みベクトルを保持し、近傍検索するための構造体です
///
/// 行iのベクトルはカタログ行iに対応する 両者を別々に並べ替えてはならない
/// ビルド後は不変で、検索は共有参照のみで行える
#[derive(Debug, Clone)]
pub struct GenreIndex<N = f32>
where
    N: Float + Into<f64>,
{
    vocab: IndexSet<String>,
    matrix: Vec<SpVec<N>>,
}

impl<N> GenreIndex<N>
where
    N: Float + Into<f64> + Send + Sync,
{
    /// インデックスをビルドするメソッド
    /// カタログ行ごとのジャンルテキストからボキャブラリと重み行列を構築します
    ///
    /// 手順:
    /// 1. 各行をトークン化しストップワードを除去 (並列)
    /// 2. ボキャブラリと文書頻度を出現順で構築 (決定性のため逐次)
    /// 3. TF-IDF重みを計算し各行をL2正規化 (並列)
    ///
    /// 全行がストップワードのみの場合ボキャブラリは空になるが、ビルド自体は
    /// 成功する その場合の検索は空の結果を返す
    ///
    /// # Arguments
    /// * `docs` - カタログ行順のジャンルテキスト
    ///
    /// # Returns
    /// * `GenreIndex<N>` - ビルド済みインデックス
    pub fn fit<S>(docs: &[S]) -> Self
    where
        S: AsRef<str> + Sync,
    {
        let stop: HashSet<&'static str> = ENGLISH_STOP_WORDS.iter().copied().collect();
        let doc_tokens: Vec<Vec<String>> = docs
            .par_iter()
            .map(|text| {
                tokenize(text.as_ref())
                    .into_iter()
                    .filter(|t| !stop.contains(t.as_str()))
                    .collect()
            })
            .collect();

        let mut vocab: IndexSet<String> = IndexSet::new();
        let mut doc_freq: Vec<u32> = Vec::new();
        for tokens in &doc_tokens {
            let mut seen: Vec<usize> = Vec::with_capacity(tokens.len());
            for token in tokens {
                let dim = match vocab.get_index_of(token.as_str()) {
                    Some(dim) => dim,
                    None => {
                        doc_freq.push(0);
                        vocab.insert_full(token.clone()).0
                    }
                };
                if !seen.contains(&dim) {
                    seen.push(dim);
                    doc_freq[dim] += 1;
                }
            }
        }

        // smoothed idf: ln((1 + n) / (1 + df)) + 1
        let doc_num = docs.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + doc_num) / (1.0 + f64::from(df))).ln() + 1.0)
            .collect();

        let matrix: Vec<SpVec<N>> = doc_tokens
            .par_iter()
            .map(|tokens| {
                let mut dims: Vec<u32> = tokens
                    .iter()
                    .filter_map(|t| vocab.get_index_of(t.as_str()))
                    .map(|dim| dim as u32)
                    .collect();
                dims.sort_unstable();

                // tf: 行内の出現回数 重み = tf * idf
                let mut row = SpVec::with_capacity(dims.len());
                let mut i = 0;
                while i < dims.len() {
                    let dim = dims[i];
                    let mut count = 0u32;
                    while i < dims.len() && dims[i] == dim {
                        count += 1;
                        i += 1;
                    }
                    let weight = f64::from(count) * idf[dim as usize];
                    row.push(dim, N::from(weight).unwrap_or_else(N::zero));
                }
                row.l2_normalize();
                row
            })
            .collect();

        Self { vocab, matrix }
    }

    /// インデックスのドキュメント数を取得するメソッド
    pub fn doc_count(&self) -> usize {
        self.matrix.len()
    }

    /// ボキャブラリの次元数を取得するメソッド
    pub fn vocab_len(&self) -> usize {
        self.vocab.len()
    }

    /// ボキャブラリが空かどうか
    /// 空の場合、全ての検索は空の結果を返す
    pub fn is_vocab_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    /// Iterates vocabulary terms in dimension order.
    pub fn vocab_terms(&self) -> impl Iterator<Item = &str> {
        self.vocab.iter().map(|s| s.as_str())
    }

    /// Returns the normalized weight vector of one catalog row.
    pub fn row(&self, row: usize) -> Option<&SpVec<N>> {
        self.matrix.get(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_builds_vocabulary_in_first_seen_order() {
        let idx: GenreIndex = GenreIndex::fit(&["Action, Comedy", "Action", "Romance"]);
        let terms: Vec<&str> = idx.vocab_terms().collect();
        assert_eq!(terms, vec!["action", "comedy", "romance"]);
        assert_eq!(idx.doc_count(), 3);
    }

    #[test]
    fn fit_removes_stop_words_from_vocabulary() {
        let idx: GenreIndex = GenreIndex::fit(&["Slice of Life", "the Action"]);
        let terms: Vec<&str> = idx.vocab_terms().collect();
        assert_eq!(terms, vec!["slice", "life", "action"]);
    }

    #[test]
    fn fit_is_deterministic_for_fixed_input() {
        let docs = ["Action, Comedy", "Romance, Drama", "Action, Drama, Fantasy"];
        let a: GenreIndex = GenreIndex::fit(&docs);
        let b: GenreIndex = GenreIndex::fit(&docs);
        assert_eq!(
            a.vocab_terms().collect::<Vec<_>>(),
            b.vocab_terms().collect::<Vec<_>>()
        );
        for i in 0..docs.len() {
            assert_eq!(a.row(i), b.row(i), "row {i} differs between builds");
        }
    }

    #[test]
    fn rows_are_unit_length_or_empty() {
        let idx: GenreIndex = GenreIndex::fit(&["Action, Comedy", "of the"]);
        let filled = idx.row(0).unwrap();
        assert!(
            (filled.l2_norm() - 1.0).abs() < 1e-6,
            "row norm: {}",
            filled.l2_norm()
        );
        let zeroed = idx.row(1).unwrap();
        assert_eq!(zeroed.nnz(), 0, "all-stopword genre must produce a zero row");
    }

    #[test]
    fn all_stopword_catalog_yields_empty_vocabulary() {
        let idx: GenreIndex = GenreIndex::fit(&["of the", "a an", ""]);
        assert!(idx.is_vocab_empty());
        assert_eq!(idx.doc_count(), 3);
    }

    #[test]
    fn repeated_terms_raise_term_weight() {
        // "action action comedy" weights the action dimension higher than
        // a single occurrence would, before normalization evens things out.
        let idx: GenreIndex = GenreIndex::fit(&["Action Action Comedy", "Action Comedy"]);
        let double = idx.row(0).unwrap().iter().collect::<Vec<_>>();
        let single = idx.row(1).unwrap().iter().collect::<Vec<_>>();
        assert_eq!(double.len(), 2);
        assert_eq!(single.len(), 2);
        // same dimensions, different balance
        assert!(double[0].1 > single[0].1, "doubled term should dominate its row");
    }
}
