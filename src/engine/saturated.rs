//! Saturated offset rebasing.
//!
//! Narrow lanes can only represent a window of scores around the saturated
//! zero constant. Before a block runs, its column chunk is re-anchored on the
//! chunk's pivot cell (the cell bordering the previous block) and the row
//! chunk is brought into the same offset domain, so every narrow value the
//! kernel mixes is commensurable and re-centred.
//!
//! The rebase is `cell := cell - delta + ZERO` in saturating narrow
//! arithmetic, with the wide offset updated by the delta that was actually
//! applied, so the logical score `cell + offset` is preserved exactly even if
//! the requested delta had to clamp. A widened-type verification (debug
//! builds, or the `strict-saturation` feature) recomputes every slot and
//! reports the first disagreement as an arithmetic failure instead of letting
//! a clipped cell corrupt scores silently.

use crate::engine::vector::AffineCell;
use crate::error::AlignError;
#[cfg(any(debug_assertions, feature = "strict-saturation"))]
use crate::error::SaturationDiag;
use crate::simd::{ScoreElem, SimdScore, WideScore};

/// Offset domain anchored on a chunk's pivot cell: `offset + pivot - ZERO`.
#[inline]
pub(crate) fn anchor_target<T: ScoreElem, const L: usize>(
    cells: &[AffineCell<T, L>],
    offset: WideScore<L>,
) -> WideScore<L> {
    let zero = WideScore::<L>::splat(T::ZERO_OFFSET.widen());
    offset.adds(cells[0].h.widen()).subs(zero)
}

/// Rebase a chunk so its offset becomes `target`, preserving logical scores.
pub(crate) fn rebase_to<T: ScoreElem, const L: usize>(
    cells: &mut [AffineCell<T, L>],
    offset: &mut WideScore<L>,
    target: WideScore<L>,
) -> Result<(), AlignError> {
    let zero_wide = WideScore::<L>::splat(T::ZERO_OFFSET.widen());
    let zero = SimdScore::<T, L>::splat(T::ZERO_OFFSET);
    let delta = target.subs(*offset).adds(zero_wide).narrow_to::<T>();

    #[cfg(any(debug_assertions, feature = "strict-saturation"))]
    verify_rebase(cells, delta, *offset)?;

    for cell in cells.iter_mut() {
        cell.h = cell.h.subs(delta).adds(zero);
        cell.e = cell.e.subs(delta).adds(zero);
    }
    *offset = offset.adds(delta.widen()).subs(zero_wide);
    Ok(())
}

#[cfg(any(debug_assertions, feature = "strict-saturation"))]
fn verify_rebase<T: ScoreElem, const L: usize>(
    cells: &[AffineCell<T, L>],
    delta: SimdScore<T, L>,
    offset: WideScore<L>,
) -> Result<(), AlignError> {
    let zero = SimdScore::<T, L>::splat(T::ZERO_OFFSET);
    for (i, cell) in cells.iter().enumerate() {
        for slot in [cell.h, cell.e] {
            let narrow = slot.subs(delta).adds(zero);
            for k in 0..L {
                let expected = slot.get(k).widen() - delta.get(k).widen() + T::ZERO_OFFSET.widen();
                if narrow.get(k).widen() != expected {
                    return Err(SaturationDiag {
                        cell: i,
                        lane: k,
                        narrow: narrow.get(k).widen(),
                        expected,
                        offset: offset.get(k),
                        zero_offset: T::ZERO_OFFSET.widen(),
                    }
                    .into());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::vector::{DpVector, InitStyle};
    use crate::scoring::GapModel;

    #[test]
    fn rebase_preserves_logical_scores() {
        let gaps = GapModel::new(-4, -1).unwrap();
        let mut v = DpVector::<i8, 2>::seeded(InitStyle::Penalised, &gaps, 0, 9, true);
        let before: Vec<[i32; 2]> = (0..9).map(|i| [v.logical(i, 0), v.logical(i, 1)]).collect();

        // Drift the anchor and rebase back onto the pivot.
        let target = anchor_target(v.cells(), v.offset()).adds(WideScore::splat(-7));
        let (cells, offset) = v.parts_mut();
        rebase_to(cells, offset, target).unwrap();
        assert_eq!(v.offset().get(0), target.get(0));

        for (i, want) in before.iter().enumerate() {
            assert_eq!(v.logical(i, 0), want[0], "cell {i} lane 0");
            assert_eq!(v.logical(i, 1), want[1], "cell {i} lane 1");
        }
    }

    #[test]
    fn rebase_repeats_keep_pivot_on_zero_offset() {
        let gaps = GapModel::new(-4, -1).unwrap();
        let mut v = DpVector::<i16, 1>::seeded(InitStyle::Penalised, &gaps, 16, 9, true);
        for _ in 0..3 {
            let target = anchor_target(v.cells(), v.offset());
            let (cells, offset) = v.parts_mut();
            rebase_to(cells, offset, target).unwrap();
            assert_eq!(v.cells()[0].h.get(0), i16::ZERO_OFFSET);
        }
    }

    #[cfg(any(debug_assertions, feature = "strict-saturation"))]
    #[test]
    fn overflowing_rebase_reports_diagnostic() {
        let gaps = GapModel::new(-4, -1).unwrap();
        let mut v = DpVector::<i8, 1>::seeded(InitStyle::Penalised, &gaps, 0, 9, true);
        // Shifting the domain up by 120 pushes the deep border seeds past the
        // narrow minimum.
        let target = v.offset().adds(WideScore::splat(120));
        let (cells, offset) = v.parts_mut();
        let err = rebase_to(cells, offset, target).unwrap_err();
        match err {
            AlignError::Saturation(d) => {
                assert_eq!(d.lane, 0);
                assert_ne!(d.narrow, d.expected);
                assert_eq!(d.zero_offset, i8::ZERO_OFFSET as i32);
            }
            other => panic!("expected saturation error, got {other:?}"),
        }
    }
}
