//! Per-lane substitution profile.

use crate::scoring::matrix::ScoringMatrix;
use crate::simd::{ScoreElem, SimdScore};

/// Pre-computed substitution scores for one row strip.
///
/// For every column-symbol rank `r` (including the padding rank) and every
/// strip position `j`, the profile holds the lane vector of scores of `r`
/// against the strip's per-lane row symbols. The kernel then gathers one
/// score lane per cell instead of walking the matrix.
///
/// Lifetime: one profile per DP lane; the table is `(D + 1) x width` lane
/// vectors, small enough to rebuild eagerly.
pub(crate) struct SubstitutionProfile<T, const L: usize> {
    scores: Vec<SimdScore<T, L>>,
    width: usize,
}

impl<T: ScoreElem, const L: usize> SubstitutionProfile<T, L> {
    /// Build the profile for a strip of per-lane row ranks.
    pub(crate) fn new(matrix: &ScoringMatrix, strip: &[[u8; L]]) -> Self {
        let rows = matrix.dim() + 1;
        let width = strip.len();
        let mut scores = Vec::with_capacity(rows * width);
        for r in 0..rows {
            for ranks in strip {
                scores.push(SimdScore::from_fn(|k| {
                    T::from_i8(matrix.score_by_rank(r as u8, ranks[k]))
                }));
            }
        }
        Self { scores, width }
    }

    /// Scores of the per-lane column ranks against strip position `j`.
    #[inline(always)]
    pub(crate) fn gather(&self, col_ranks: &[u8; L], j: usize) -> SimdScore<T, L> {
        SimdScore::from_fn(|k| self.scores[col_ranks[k] as usize * self.width + j].get(k))
    }
}
