use std::cmp::Ordering;

use num::Float;

/// Zero-suppressed sparse vector (SoA: inds/vals).
/// - Dimensions are stored strictly ascending
/// - Zero weights are never stored
///
/// Genre texts are a handful of tags, so each row touches only a few
/// dimensions of the vocabulary; everything below stays O(nnz).
#[derive(Debug, Clone, PartialEq)]
pub struct SpVec<N> {
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> SpVec<N>
where
    N: Float + Into<f64>,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(nnz: usize) -> Self {
        Self {
            inds: Vec::with_capacity(nnz),
            vals: Vec::with_capacity(nnz),
        }
    }

    /// 次元と重みを末尾に追加するメソッド
    /// 次元は厳密に昇順で追加されなければならない ゼロの重みは格納しない
    ///
    /// # Arguments
    /// * `ind` - 次元インデックス
    /// * `val` - 重み
    #[inline]
    pub fn push(&mut self, ind: u32, val: N) {
        debug_assert!(
            self.inds.last().map_or(true, |&last| last < ind),
            "dimensions must be pushed in strictly ascending order"
        );
        if val.is_zero() {
            return;
        }
        self.inds.push(ind);
        self.vals.push(val);
    }

    /// Number of stored (nonzero) dimensions.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inds.is_empty()
    }

    /// Iterates stored `(dimension, weight)` pairs in ascending dimension order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (u32, N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    /// ドット積を計算するメソッド
    /// 両ベクトルの昇順インデックス列に対するマージ結合で計算する
    ///
    /// # Arguments
    /// * `other` - 他のベクトル
    ///
    /// # Returns
    /// * `f64` - ドット積の結果
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        let mut result = 0.0f64;
        let mut i = 0;
        let mut j = 0;
        while i < self.nnz() && j < other.nnz() {
            match self.inds[i].cmp(&other.inds[j]) {
                Ordering::Equal => {
                    result += self.vals[i].into() * other.vals[j].into();
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    /// L2ノルムの二乗を計算するメソッド
    ///
    /// # Returns
    /// * `f64` - ノルムの二乗
    #[inline]
    pub fn norm_sq(&self) -> f64 {
        self.vals
            .iter()
            .map(|&v| {
                let f: f64 = v.into();
                f * f
            })
            .sum()
    }

    /// L2ノルムを計算するメソッド
    #[inline]
    pub fn l2_norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// 自身をL2正規化するメソッド
    /// ゼロベクトルの場合は何もしない
    pub fn l2_normalize(&mut self) {
        let norm = self.l2_norm();
        if norm == 0.0 {
            return;
        }
        let inv = N::from(1.0 / norm).unwrap_or_else(N::zero);
        for v in self.vals.iter_mut() {
            *v = *v * inv;
        }
    }
}

impl<N> Default for SpVec<N>
where
    N: Float + Into<f64>,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_from(pairs: &[(u32, f32)]) -> SpVec<f32> {
        let mut v = SpVec::with_capacity(pairs.len());
        for &(ind, val) in pairs {
            v.push(ind, val);
        }
        v
    }

    #[test]
    fn push_skips_zero_weights() {
        let v = vec_from(&[(0, 1.0), (3, 0.0), (7, 2.0)]);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(0, 1.0), (7, 2.0)]);
    }

    #[test]
    fn dot_merges_shared_dimensions_only() {
        let a = vec_from(&[(0, 1.0), (2, 2.0), (5, 3.0)]);
        let b = vec_from(&[(2, 4.0), (5, 1.0), (9, 8.0)]);
        assert_eq!(a.dot(&b), 11.0);
        assert_eq!(b.dot(&a), 11.0, "dot should not depend on operand order");
    }

    #[test]
    fn dot_disjoint_or_empty_is_zero() {
        let a = vec_from(&[(0, 1.0), (1, 1.0)]);
        let b = vec_from(&[(2, 1.0), (3, 1.0)]);
        assert_eq!(a.dot(&b), 0.0);
        assert_eq!(a.dot(&SpVec::new()), 0.0);
        assert_eq!(SpVec::<f32>::new().dot(&SpVec::new()), 0.0);
    }

    #[test]
    fn l2_normalize_yields_unit_norm() {
        let mut v = vec_from(&[(1, 3.0), (4, 4.0)]);
        assert_eq!(v.l2_norm(), 5.0);
        v.l2_normalize();
        assert!(
            (v.l2_norm() - 1.0).abs() < 1e-6,
            "norm after normalize: {}",
            v.l2_norm()
        );
    }

    #[test]
    fn l2_normalize_leaves_zero_vector_alone() {
        let mut v: SpVec<f32> = SpVec::new();
        v.l2_normalize();
        assert_eq!(v.nnz(), 0);
    }
}
