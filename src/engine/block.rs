//! Matrix blocks and row lanes.

use crate::engine::saturated;
use crate::engine::vector::{AffineCell, DpVector, RowVector};
use crate::error::AlignError;
use crate::simd::{ScoreElem, WideScore, LANE_WIDTH};

/// One rectangular tile of the DP matrix: a column chunk paired with a row
/// chunk, sharing a single offset domain.
pub(crate) struct DpBlock<'a, T: ScoreElem, const L: usize> {
    pub column: &'a mut DpVector<T, L>,
    /// Absolute border index of the column chunk's head cell.
    pub col_base: usize,
    /// The row chunk's interior cells.
    pub row_cells: &'a mut [AffineCell<T, L>],
    /// Absolute row position of `row_cells[0]`.
    pub row_base: usize,
    /// The block's offset domain, per lane.
    pub offset: WideScore<L>,
}

/// A column chunk bound to the row vector, yielding one block per row chunk.
///
/// With `SAT` the tile rebases the column chunk onto its pivot and pulls the
/// row chunk into the same domain before handing the block out; without it
/// the tile hands through (all offsets stay at their seeded values).
pub(crate) struct ColumnTile<'a, T: ScoreElem, const L: usize, const SAT: bool> {
    pub chunk: &'a mut DpVector<T, L>,
    pub col_base: usize,
    pub row: &'a mut RowVector<T, L>,
}

impl<'a, T: ScoreElem, const L: usize, const SAT: bool> ColumnTile<'a, T, L, SAT> {
    pub(crate) fn row_at(&mut self, r: usize) -> Result<DpBlock<'_, T, L>, AlignError> {
        if SAT {
            let target = saturated::anchor_target(self.chunk.cells(), self.chunk.offset());
            let (cells, offset) = self.chunk.parts_mut();
            saturated::rebase_to(cells, offset, target)?;
            let domain = self.chunk.offset();
            let (row_cells, row_offset) = self.row.chunk_parts_mut(r);
            saturated::rebase_to(row_cells, row_offset, domain)?;
        }
        let offset = self.chunk.offset();
        let (row_base, _) = self.row.chunk_range(r);
        let (row_cells, _) = self.row.chunk_parts_mut(r);
        Ok(DpBlock {
            column: &mut *self.chunk,
            col_base: self.col_base,
            row_cells,
            row_base,
            offset,
        })
    }
}

/// A `LANE_WIDTH`-wide stripe of a block's row, with the row cells cached in
/// scratch storage for the duration of the sweep.
///
/// Construction bulk-loads the window; dropping the lane bulk-stores it back.
/// Full lanes move a compile-time-sized window, the last lane of a row moves
/// its runtime-bounded remainder. While a lane is live nothing else may touch
/// the window; the exclusive borrow enforces that.
pub(crate) struct Lane<'r, T: ScoreElem, const L: usize> {
    window: &'r mut [AffineCell<T, L>],
    cached: [AffineCell<T, L>; LANE_WIDTH],
    len: usize,
}

impl<'r, T: ScoreElem, const L: usize> Lane<'r, T, L> {
    pub(crate) fn new(window: &'r mut [AffineCell<T, L>]) -> Self {
        let len = window.len();
        debug_assert!(len > 0 && len <= LANE_WIDTH);
        let mut cached = [AffineCell::zero(); LANE_WIDTH];
        if len == LANE_WIDTH {
            cached.copy_from_slice(window);
        } else {
            cached[..len].copy_from_slice(window);
        }
        Self { window, cached, len }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// The cached row cells, mutable for the kernel sweep.
    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [AffineCell<T, L>] {
        &mut self.cached[..self.len]
    }
}

impl<T: ScoreElem, const L: usize> Drop for Lane<'_, T, L> {
    fn drop(&mut self) {
        if self.len == LANE_WIDTH {
            self.window.copy_from_slice(&self.cached);
        } else {
            self.window.copy_from_slice(&self.cached[..self.len]);
        }
    }
}
