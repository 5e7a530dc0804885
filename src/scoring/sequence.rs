//! Rank-transformed, lane-padded sequence batches.

use crate::error::AlignError;
use crate::scoring::matrix::{ScoringMatrix, INVALID_RANK};

/// Up to `L` sequence pairs, rank-transformed and padded to a common length
/// with the matrix's zero-scoring padding rank.
///
/// `col_ranks[i - 1]` holds the per-lane ranks of DP row `i` (the first
/// sequence of each pair); `row_ranks[j - 1]` the per-lane ranks of DP column
/// `j` (the second sequence). Per-lane true lengths are kept so the tracker
/// can harvest each lane at its own terminal cell.
#[derive(Debug)]
pub(crate) struct RankedBatch<const L: usize> {
    pub col_ranks: Vec<[u8; L]>,
    pub row_ranks: Vec<[u8; L]>,
    pub col_lens: [usize; L],
    pub row_lens: [usize; L],
    pub count: usize,
}

impl<const L: usize> RankedBatch<L> {
    pub(crate) fn new(
        matrix: &ScoringMatrix,
        pairs: &[(&[u8], &[u8])],
    ) -> Result<Self, AlignError> {
        debug_assert!(pairs.len() <= L);
        let count = pairs.len().min(L);
        let pad = matrix.pad_rank();

        let mut col_lens = [0usize; L];
        let mut row_lens = [0usize; L];
        for (k, (a, b)) in pairs.iter().enumerate() {
            col_lens[k] = a.len();
            row_lens[k] = b.len();
        }
        let col_max = col_lens.iter().copied().max().unwrap_or(0);
        let row_max = row_lens.iter().copied().max().unwrap_or(0);

        let mut col_ranks = vec![[pad; L]; col_max];
        let mut row_ranks = vec![[pad; L]; row_max];
        for (k, &(a, b)) in pairs.iter().enumerate() {
            rank_into(matrix, a, k, &mut col_ranks)?;
            rank_into(matrix, b, k, &mut row_ranks)?;
        }

        Ok(Self {
            col_ranks,
            row_ranks,
            col_lens,
            row_lens,
            count,
        })
    }

    #[inline]
    pub(crate) fn col_max(&self) -> usize {
        self.col_ranks.len()
    }

    #[inline]
    pub(crate) fn row_max(&self) -> usize {
        self.row_ranks.len()
    }
}

fn rank_into<const L: usize>(
    matrix: &ScoringMatrix,
    seq: &[u8],
    lane: usize,
    out: &mut [[u8; L]],
) -> Result<(), AlignError> {
    for (pos, &byte) in seq.iter().enumerate() {
        let rank = matrix.rank(byte);
        if rank == INVALID_RANK {
            return Err(AlignError::InvalidSymbol { byte, pos, lane });
        }
        out[pos][lane] = rank;
    }
    Ok(())
}
