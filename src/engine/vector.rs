//! DP vectors: affine cells, chunked columns, the shared row.

use crate::scoring::gap::GapModel;
use crate::simd::{ScoreElem, SimdScore, WideScore};

/// One affine DP cell: the best score into the cell and the gap-continuation
/// score it carries to the next sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AffineCell<T, const L: usize> {
    pub h: SimdScore<T, L>,
    pub e: SimdScore<T, L>,
}

impl<T: ScoreElem, const L: usize> AffineCell<T, L> {
    pub(crate) fn zero() -> Self {
        Self {
            h: SimdScore::zero(),
            e: SimdScore::zero(),
        }
    }
}

/// Border initialisation: penalised gaps (global) or zero borders
/// (local / free leading gaps).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InitStyle {
    Penalised,
    Zero,
}

/// Logical seed of the best score at border index `i`.
pub(crate) fn seed_h(style: InitStyle, gaps: &GapModel, index: usize) -> i32 {
    match style {
        InitStyle::Penalised if index > 0 => gaps.open + index as i32 * gaps.extend,
        _ => 0,
    }
}

/// Logical seed of the gap-continuation slot at border index `i`: the cost of
/// opening a gap off the border value.
pub(crate) fn seed_e(style: InitStyle, gaps: &GapModel, index: usize) -> i32 {
    seed_h(style, gaps, index) + gaps.open_extend()
}

/// A column chunk: a head boundary cell plus up to `block_height` interior
/// cells, with one wide offset per SIMD lane.
///
/// The logical score at cell `i` is `cells[i].h + offset`, per lane. When
/// `anchored`, cells are stored relative to the chunk's own head seed so that
/// arbitrarily long sequences still fit a narrow lane type before the first
/// rebase.
pub(crate) struct DpVector<T, const L: usize> {
    cells: Vec<AffineCell<T, L>>,
    offset: WideScore<L>,
}

impl<T: ScoreElem, const L: usize> DpVector<T, L> {
    /// Seed `len` cells covering absolute border indices `base .. base + len`.
    pub(crate) fn seeded(
        style: InitStyle,
        gaps: &GapModel,
        base: usize,
        len: usize,
        anchored: bool,
    ) -> Self {
        let anchor = if anchored {
            seed_h(style, gaps, base) - T::ZERO_OFFSET.widen()
        } else {
            0
        };
        let cells = (0..len)
            .map(|i| {
                let idx = base + i;
                AffineCell {
                    h: SimdScore::splat(T::narrow(seed_h(style, gaps, idx) - anchor)),
                    e: SimdScore::splat(T::narrow(seed_e(style, gaps, idx) - anchor)),
                }
            })
            .collect();
        Self {
            cells,
            offset: WideScore::splat(anchor),
        }
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub(crate) fn cells(&self) -> &[AffineCell<T, L>] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [AffineCell<T, L>] {
        &mut self.cells
    }

    #[inline]
    pub(crate) fn offset(&self) -> WideScore<L> {
        self.offset
    }

    /// Replace the offset. Does not touch cell contents; preserving the
    /// logical scores across the pair of updates is the rebase's job.
    #[inline]
    pub(crate) fn update_offset(&mut self, offset: WideScore<L>) {
        self.offset = offset;
    }

    #[inline]
    pub(crate) fn parts_mut(&mut self) -> (&mut [AffineCell<T, L>], &mut WideScore<L>) {
        (&mut self.cells, &mut self.offset)
    }

    /// Logical best score at cell `i`, one lane.
    pub(crate) fn logical(&self, i: usize, lane: usize) -> i32 {
        self.cells[i].h.get(lane).widen() + self.offset.get(lane)
    }
}

/// The row DP vector: one cell per row position `0..=M`, chunked into
/// `block_width`-wide segments that each carry their own wide offset.
///
/// Cell 0 is the seeded corner and is never revisited; chunk `r` owns the
/// interior positions `r*W + 1 ..= min((r+1)*W, M)`.
pub(crate) struct RowVector<T, const L: usize> {
    cells: Vec<AffineCell<T, L>>,
    offsets: Vec<WideScore<L>>,
    chunk_width: usize,
    len: usize,
}

impl<T: ScoreElem, const L: usize> RowVector<T, L> {
    pub(crate) fn seeded(
        style: InitStyle,
        gaps: &GapModel,
        len: usize,
        chunk_width: usize,
        anchored: bool,
    ) -> Self {
        let chunk_count = len.div_ceil(chunk_width);
        let anchor_for = |r: usize| -> i32 {
            if anchored {
                seed_h(style, gaps, r * chunk_width) - T::ZERO_OFFSET.widen()
            } else {
                0
            }
        };
        let offsets = (0..chunk_count).map(|r| WideScore::splat(anchor_for(r))).collect();
        let cells = (0..=len)
            .map(|j| {
                let anchor = anchor_for(if j == 0 { 0 } else { (j - 1) / chunk_width });
                AffineCell {
                    h: SimdScore::splat(T::narrow(seed_h(style, gaps, j) - anchor)),
                    e: SimdScore::splat(T::narrow(seed_e(style, gaps, j) - anchor)),
                }
            })
            .collect();
        Self {
            cells,
            offsets,
            chunk_width,
            len,
        }
    }

    #[inline]
    pub(crate) fn chunk_count(&self) -> usize {
        self.offsets.len()
    }

    /// Inclusive absolute range of chunk `r`'s interior positions.
    #[inline]
    pub(crate) fn chunk_range(&self, r: usize) -> (usize, usize) {
        let lo = r * self.chunk_width + 1;
        let hi = ((r + 1) * self.chunk_width).min(self.len);
        (lo, hi)
    }

    #[inline]
    pub(crate) fn chunk_parts_mut(
        &mut self,
        r: usize,
    ) -> (&mut [AffineCell<T, L>], &mut WideScore<L>) {
        let (lo, hi) = self.chunk_range(r);
        (&mut self.cells[lo..=hi], &mut self.offsets[r])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaps() -> GapModel {
        GapModel::new(-4, -1).unwrap()
    }

    #[test]
    fn penalised_seeds_follow_affine_border() {
        let g = gaps();
        assert_eq!(seed_h(InitStyle::Penalised, &g, 0), 0);
        assert_eq!(seed_h(InitStyle::Penalised, &g, 4), -8);
        assert_eq!(seed_e(InitStyle::Penalised, &g, 0), -5);
        assert_eq!(seed_e(InitStyle::Penalised, &g, 4), -13);
        assert_eq!(seed_h(InitStyle::Zero, &g, 7), 0);
        assert_eq!(seed_e(InitStyle::Zero, &g, 7), -5);
    }

    #[test]
    fn anchored_chunk_preserves_logical_seeds() {
        let g = gaps();
        // Chunk starting deep in the matrix: raw seeds would overflow i8.
        let v = DpVector::<i8, 1>::seeded(InitStyle::Penalised, &g, 200, 9, true);
        for i in 0..9 {
            assert_eq!(v.logical(i, 0), seed_h(InitStyle::Penalised, &g, 200 + i));
        }
        // The pivot sits on the zero offset constant.
        assert_eq!(v.cells()[0].h.get(0), i8::ZERO_OFFSET);
    }

    #[test]
    fn unanchored_wide_chunk_stores_raw_seeds() {
        let g = gaps();
        let v = DpVector::<i32, 1>::seeded(InitStyle::Penalised, &g, 0, 5, false);
        assert_eq!(v.offset().get(0), 0);
        assert_eq!(v.cells()[4].h.get(0), -8);
        assert_eq!(v.cells()[4].e.get(0), -13);
    }

    #[test]
    fn offset_replacement_shifts_logical_scores() {
        let g = gaps();
        let mut v = DpVector::<i16, 1>::seeded(InitStyle::Penalised, &g, 0, 5, false);
        assert_eq!(v.size(), 5);
        assert_eq!(v.logical(3, 0), -7);
        // update_offset does not rebase cells; the logical value moves.
        v.update_offset(WideScore::splat(10));
        assert_eq!(v.logical(3, 0), 3);
    }

    #[test]
    fn row_chunk_ranges_tile_the_row() {
        let g = gaps();
        let row = RowVector::<i16, 1>::seeded(InitStyle::Penalised, &g, 21, 8, false);
        assert_eq!(row.chunk_count(), 3);
        assert_eq!(row.chunk_range(0), (1, 8));
        assert_eq!(row.chunk_range(1), (9, 16));
        assert_eq!(row.chunk_range(2), (17, 21));
    }
}
