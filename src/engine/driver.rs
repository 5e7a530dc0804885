//! Top-level DP driver.
//!
//! Tiles the `(N+1) x (M+1)` matrix into column chunks (outer loop) and row
//! chunks (inner loop); each pairing is one block. Within a block the row
//! chunk is swept in `LANE_WIDTH`-wide lanes, and for every cached row cell
//! the kernel runs down the column chunk. The row vector carries the boundary
//! between vertically adjacent blocks, the column vector the boundary between
//! horizontally adjacent ones.

use crate::engine::block::{ColumnTile, DpBlock, Lane};
use crate::engine::kernel::{compute_cell, finish_column, init_column, GapLanes};
use crate::engine::tracker::ScoreTracker;
use crate::engine::vector::{DpVector, InitStyle, RowVector};
use crate::error::AlignError;
use crate::scoring::gap::GapModel;
use crate::scoring::matrix::ScoringMatrix;
use crate::scoring::profile::SubstitutionProfile;
use crate::scoring::sequence::RankedBatch;
use crate::simd::{ScoreElem, SimdScore, LANE_WIDTH};

/// Geometry and end-gap policy resolved from the configuration.
pub(crate) struct EngineParams {
    pub block_height: usize,
    pub block_width: usize,
    pub leading_free: bool,
    pub trailing_free: bool,
}

/// Score of an alignment where one side is empty: the seed value of the far
/// border cell, or zero when end gaps are free or the mode is local.
pub(crate) fn degenerate_score(
    local: bool,
    params: &EngineParams,
    gaps: &GapModel,
    n: usize,
    m: usize,
) -> i32 {
    let len = n.max(m);
    if local || len == 0 || params.leading_free || params.trailing_free {
        0
    } else {
        gaps.open + len as i32 * gaps.extend
    }
}

/// Run one batched alignment over up to `L` lanes.
pub(crate) fn run<
    T: ScoreElem,
    const L: usize,
    const SAT: bool,
    const LOCAL: bool,
    TR: ScoreTracker<T, L>,
>(
    matrix: &ScoringMatrix,
    gaps: &GapModel,
    batch: &RankedBatch<L>,
    params: &EngineParams,
    mut tracker: TR,
) -> Result<[i32; L], AlignError> {
    let n_max = batch.col_max();
    let m_max = batch.row_max();

    let mut prefill: [Option<i32>; L] = [None; L];
    for k in 0..L {
        if k >= batch.count {
            prefill[k] = Some(0);
        } else if batch.col_lens[k] == 0 || batch.row_lens[k] == 0 {
            prefill[k] = Some(degenerate_score(
                LOCAL,
                params,
                gaps,
                batch.col_lens[k],
                batch.row_lens[k],
            ));
        }
    }
    if n_max == 0 || m_max == 0 {
        log::warn!(
            "engine run: empty input ({}x{}), returning seed scores",
            n_max,
            m_max
        );
        let mut out = [0i32; L];
        for k in 0..L {
            if let Some(v) = prefill[k] {
                out[k] = v;
            }
        }
        return Ok(out);
    }

    log::debug!(
        "engine run: {}x{}, lanes={}, saturated={}, local={}, blocks={}x{}",
        n_max,
        m_max,
        L,
        SAT,
        LOCAL,
        params.block_height,
        params.block_width
    );

    let style = if LOCAL || params.leading_free {
        InitStyle::Zero
    } else {
        InitStyle::Penalised
    };

    let h = params.block_height;
    let mut columns: Vec<(usize, DpVector<T, L>)> = (0..n_max.div_ceil(h))
        .map(|c| {
            let base = c * h;
            let interior = h.min(n_max - base);
            (base, DpVector::seeded(style, gaps, base, interior + 1, SAT))
        })
        .collect();
    let mut row = RowVector::<T, L>::seeded(style, gaps, m_max, params.block_width, SAT);
    let row_chunks = m_max.div_ceil(params.block_width);

    let gap_lanes = GapLanes {
        extend: SimdScore::splat(T::narrow(gaps.extend)),
        open_extend: SimdScore::splat(T::narrow(gaps.open_extend())),
    };

    for c in 0..columns.len() {
        let (base, chunk) = &mut columns[c];
        let mut tile = ColumnTile::<T, L, SAT> {
            chunk,
            col_base: *base,
            row: &mut row,
        };
        for r in 0..row_chunks {
            let block = tile.row_at(r)?;
            sweep_block::<T, L, LOCAL, TR>(block, matrix, &gap_lanes, batch, &mut tracker);
        }
    }

    let mut out = tracker.finish();
    for k in 0..L {
        if let Some(v) = prefill[k] {
            out[k] = v;
        }
    }
    Ok(out)
}

/// Sweep one block: lane over the row chunk, kernel down the column chunk.
fn sweep_block<T: ScoreElem, const L: usize, const LOCAL: bool, TR: ScoreTracker<T, L>>(
    block: DpBlock<'_, T, L>,
    matrix: &ScoringMatrix,
    gap_lanes: &GapLanes<T, L>,
    batch: &RankedBatch<L>,
    tracker: &mut TR,
) {
    let DpBlock {
        column,
        col_base,
        row_cells,
        row_base,
        offset,
    } = block;

    // Narrow encoding of the logical zero in this block's domain; saturates
    // to the lane minimum when the domain has drifted far above zero.
    let floor: SimdScore<T, L> = if LOCAL {
        SimdScore::from_fn(|k| T::narrow(-offset.get(k)))
    } else {
        SimdScore::splat(T::MIN)
    };
    let mut block_best = SimdScore::splat(T::MIN);

    let width = row_cells.len();
    let mut lane_off = 0;
    while lane_off < width {
        let w = LANE_WIDTH.min(width - lane_off);
        let strip_base = row_base + lane_off;
        let strip = &batch.row_ranks[strip_base - 1..strip_base - 1 + w];
        let profile = SubstitutionProfile::<T, L>::new(matrix, strip);

        let mut lane = Lane::new(&mut row_cells[lane_off..lane_off + w]);
        for jj in 0..w {
            let cells = column.cells_mut();
            let row_cell = &mut lane.cells_mut()[jj];
            let mut cache = init_column(&mut cells[0], row_cell, gap_lanes);
            for ii in 1..cells.len() {
                let score = profile.gather(&batch.col_ranks[col_base + ii - 1], jj);
                compute_cell::<T, L, LOCAL>(
                    &mut cache,
                    &mut cells[ii],
                    score,
                    gap_lanes,
                    floor,
                    &mut block_best,
                );
            }
            let bottom = cells[cells.len() - 1];
            finish_column(row_cell, &bottom, cache);
            tracker.column_done(col_base, cells, &offset, strip_base + jj);
        }
        drop(lane);
        lane_off += w;
    }

    if LOCAL {
        tracker.block_done(block_best, &offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_scores_follow_the_border_seed() {
        let gaps = GapModel::new(-4, -1).unwrap();
        let regular = EngineParams {
            block_height: 8,
            block_width: 8,
            leading_free: false,
            trailing_free: false,
        };
        assert_eq!(degenerate_score(false, &regular, &gaps, 4, 0), -8);
        assert_eq!(degenerate_score(false, &regular, &gaps, 0, 3), -7);
        assert_eq!(degenerate_score(false, &regular, &gaps, 0, 0), 0);
        assert_eq!(degenerate_score(true, &regular, &gaps, 4, 0), 0);

        let free = EngineParams {
            trailing_free: true,
            ..regular
        };
        assert_eq!(degenerate_score(false, &free, &gaps, 4, 0), 0);
    }
}
