//! Affine recurrence kernel.
//!
//! The kernel sweeps a column chunk top to bottom at one row position. Two
//! values travel with the sweep: the diagonal input and the gap score that
//! opens or extends along the sweep direction. Each cell stores its best
//! score and the complementary gap score for the next row position.

use crate::engine::vector::AffineCell;
use crate::simd::{ScoreElem, SimdScore};

/// Values carried along one column sweep.
pub(crate) struct KernelCache<T, const L: usize> {
    /// Best score of the upper-left diagonal neighbour.
    pub diag: SimdScore<T, L>,
    /// Gap score entering the current cell from the sweep direction.
    pub f: SimdScore<T, L>,
}

/// Narrow gap constants, broadcast once per run.
pub(crate) struct GapLanes<T, const L: usize> {
    pub extend: SimdScore<T, L>,
    /// Cost of opening a gap and taking its first extension step.
    pub open_extend: SimdScore<T, L>,
}

/// One cell update. All additions saturate in the narrow type.
#[inline(always)]
pub(crate) fn compute_cell<T: ScoreElem, const L: usize, const LOCAL: bool>(
    cache: &mut KernelCache<T, L>,
    cell: &mut AffineCell<T, L>,
    score: SimdScore<T, L>,
    gaps: &GapLanes<T, L>,
    floor: SimdScore<T, L>,
    best_seen: &mut SimdScore<T, L>,
) {
    let prev_h = cell.h;
    let mut best = cache.diag.adds(score).max(cache.f).max(cell.e);
    if LOCAL {
        best = best.max(floor);
        *best_seen = best_seen.max(best);
    }
    cell.h = best;
    let open = best.adds(gaps.open_extend);
    cache.f = cache.f.adds(gaps.extend).max(open);
    cell.e = cell.e.adds(gaps.extend).max(open);
    cache.diag = prev_h;
}

/// Column-sweep preamble: swap the row cell into the chunk head so the first
/// kernel step sees its diagonal and gap inputs, and roll the head's own gap
/// slot forward one row position.
#[inline(always)]
pub(crate) fn init_column<T: ScoreElem, const L: usize>(
    head: &mut AffineCell<T, L>,
    row_cell: &AffineCell<T, L>,
    gaps: &GapLanes<T, L>,
) -> KernelCache<T, L> {
    let cache = KernelCache {
        diag: head.h,
        f: row_cell.e,
    };
    let boundary = head.h;
    head.h = row_cell.h;
    head.e = boundary
        .adds(gaps.open_extend)
        .max(head.e.adds(gaps.extend));
    cache
}

/// Column-sweep epilogue: the chunk's bottom boundary and the outgoing gap
/// score move into the row cell for the next column chunk.
#[inline(always)]
pub(crate) fn finish_column<T: ScoreElem, const L: usize>(
    row_cell: &mut AffineCell<T, L>,
    bottom: &AffineCell<T, L>,
    cache: KernelCache<T, L>,
) {
    row_cell.h = bottom.h;
    row_cell.e = cache.f;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes(v: i16) -> SimdScore<i16, 1> {
        SimdScore::splat(v)
    }

    #[test]
    fn best_is_three_way_max_of_diag_gap_and_cell() {
        let gaps = GapLanes {
            extend: lanes(-1),
            open_extend: lanes(-5),
        };
        // diag + score = 7, carried gap = 9, stored gap = 3: carried gap wins.
        let mut cache = KernelCache {
            diag: lanes(3),
            f: lanes(9),
        };
        let mut cell = AffineCell {
            h: lanes(-2),
            e: lanes(3),
        };
        let mut unused = lanes(i16::MIN);
        compute_cell::<i16, 1, false>(&mut cache, &mut cell, lanes(4), &gaps, lanes(0), &mut unused);
        assert_eq!(cell.h.get(0), 9);
        // Gap slots extend or reopen off the new best.
        assert_eq!(cache.f.get(0), (9 - 1).max(9 - 5));
        assert_eq!(cell.e.get(0), (3 - 1).max(9 - 5));
        // Diagonal slides to the cell's previous best.
        assert_eq!(cache.diag.get(0), -2);
    }

    #[test]
    fn local_mode_clamps_and_records() {
        let gaps = GapLanes {
            extend: lanes(-1),
            open_extend: lanes(-5),
        };
        let mut cache = KernelCache {
            diag: lanes(-20),
            f: lanes(-30),
        };
        let mut cell = AffineCell {
            h: lanes(0),
            e: lanes(-30),
        };
        let mut best_seen = lanes(i16::MIN);
        compute_cell::<i16, 1, true>(&mut cache, &mut cell, lanes(-2), &gaps, lanes(0), &mut best_seen);
        assert_eq!(cell.h.get(0), 0, "clamped at the local floor");
        assert_eq!(best_seen.get(0), 0);
    }

    #[test]
    fn init_and_finish_thread_the_row_boundary() {
        let gaps = GapLanes {
            extend: lanes(-1),
            open_extend: lanes(-5),
        };
        let mut head = AffineCell {
            h: lanes(7),
            e: lanes(2),
        };
        let row_cell_in = AffineCell {
            h: lanes(4),
            e: lanes(-3),
        };
        let cache = init_column(&mut head, &row_cell_in, &gaps);
        assert_eq!(cache.diag.get(0), 7);
        assert_eq!(cache.f.get(0), -3);
        assert_eq!(head.h.get(0), 4);
        assert_eq!(head.e.get(0), (7 - 5).max(2 - 1));

        let bottom = AffineCell {
            h: lanes(11),
            e: lanes(0),
        };
        let mut row_cell = row_cell_in;
        finish_column(&mut row_cell, &bottom, cache);
        assert_eq!(row_cell.h.get(0), 11);
        assert_eq!(row_cell.e.get(0), -3);
    }
}
