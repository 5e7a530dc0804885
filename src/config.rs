//! Aligner configuration record.
//!
//! The engine is assembled from a plain configuration record with enumerated
//! options; `PairwiseAligner::new` validates the record once and the hot path
//! dispatches to a monomorphised engine instantiation.

use crate::error::ConfigError;
use crate::scoring::{GapModel, ScoringMatrix};

/// Global or local optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentMode {
    /// Needleman-Wunsch style: score of the full-length alignment.
    Global,
    /// Smith-Waterman style: best-scoring sub-alignment, clamped at zero.
    Local,
}

/// Narrow lane scalar the DP cells are stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    I8,
    I16,
    I32,
}

impl LaneKind {
    pub(crate) fn max_value(self) -> i32 {
        match self {
            LaneKind::I8 => i8::MAX as i32,
            LaneKind::I16 => i16::MAX as i32,
            LaneKind::I32 => i32::MAX,
        }
    }
}

/// Treatment of gaps at a sequence end (global mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPolicy {
    /// End gaps are charged like any other gap.
    Penalised,
    /// End gaps are free (semi-global alignment).
    Free,
}

/// Engine configuration.
///
/// `block_height` and `block_width` bound the score drift between rebases:
/// together with the scoring model they determine whether a saturated narrow
/// lane can represent every intermediate value, which is checked at
/// construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignerConfig {
    pub mode: AlignmentMode,
    pub lane: LaneKind,
    /// Independent alignment pairs per SIMD lane vector (1, 4, 8, 16 or 32).
    pub simd_width: usize,
    /// Narrow lanes with offset rebasing; `false` runs the wide engine.
    pub saturated: bool,
    /// Column block height, in DP cells.
    pub block_height: usize,
    /// Row block width, in DP cells.
    pub block_width: usize,
    pub leading_gaps: GapPolicy,
    pub trailing_gaps: GapPolicy,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self::for_lane(LaneKind::I16)
    }
}

impl AlignerConfig {
    /// A configuration with block geometry sized for the given lane type.
    pub fn for_lane(lane: LaneKind) -> Self {
        let (block, saturated) = match lane {
            LaneKind::I8 => (8, true),
            LaneKind::I16 => (64, true),
            LaneKind::I32 => (64, false),
        };
        Self {
            mode: AlignmentMode::Global,
            lane,
            simd_width: 8,
            saturated,
            block_height: block,
            block_width: block,
            leading_gaps: GapPolicy::Penalised,
            trailing_gaps: GapPolicy::Penalised,
        }
    }

    pub(crate) fn validate(
        &self,
        matrix: &ScoringMatrix,
        gaps: &GapModel,
    ) -> Result<(), ConfigError> {
        if !matches!(self.simd_width, 1 | 4 | 8 | 16 | 32) {
            return Err(ConfigError::UnsupportedWidth {
                width: self.simd_width,
            });
        }
        match (self.lane, self.saturated) {
            (LaneKind::I32, true) | (LaneKind::I8, false) => {
                return Err(ConfigError::UnsupportedPolicy {
                    lane: self.lane,
                    saturated: self.saturated,
                });
            }
            _ => {}
        }
        if self.block_height == 0 || self.block_width == 0 {
            return Err(ConfigError::BlockGeometry {
                height: self.block_height,
                width: self.block_width,
            });
        }
        if self.mode == AlignmentMode::Local
            && (self.leading_gaps == GapPolicy::Free || self.trailing_gaps == GapPolicy::Free)
        {
            return Err(ConfigError::EndGapPolicy);
        }

        let limit = self.lane.max_value();
        if !gaps.fits(limit) {
            return Err(ConfigError::InvalidGapModel {
                open: gaps.open,
                extend: gaps.extend,
            });
        }
        if matrix.max_abs_score() > limit {
            return Err(ConfigError::SaturationWindow {
                window: matrix.max_abs_score(),
                limit,
            });
        }

        if self.saturated {
            // Conservative drift bound: within one block every value stays
            // within the block perimeter times the worst per-cell step of the
            // rebase anchor.
            let step = matrix
                .max_abs_score()
                .max(gaps.open_extend().abs())
                .max(gaps.extend.abs());
            let perimeter = (self.block_height + self.block_width + 2) as i32;
            let window = perimeter
                .saturating_mul(step)
                .saturating_add(gaps.open.abs());
            if window > limit {
                return Err(ConfigError::SaturationWindow { window, limit });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let m = ScoringMatrix::dna(4, -2);
        let g = GapModel::new(-4, -1).unwrap();
        assert!(AlignerConfig::default().validate(&m, &g).is_ok());
    }

    #[test]
    fn rejects_saturated_wide_lanes() {
        let m = ScoringMatrix::dna(4, -2);
        let g = GapModel::new(-4, -1).unwrap();
        let mut cfg = AlignerConfig::for_lane(LaneKind::I32);
        cfg.saturated = true;
        assert_eq!(
            cfg.validate(&m, &g),
            Err(ConfigError::UnsupportedPolicy {
                lane: LaneKind::I32,
                saturated: true
            })
        );
    }

    #[test]
    fn rejects_oversized_saturation_window() {
        // BLOSUM-scale scores with i8 lanes and default i8 geometry overflow
        // the drift window.
        let mut table = [0i8; 16];
        for i in 0..4 {
            for j in 0..4 {
                table[i * 4 + j] = if i == j { 11 } else { -11 };
            }
        }
        let m = ScoringMatrix::new(b"ACGT", &table).unwrap();
        let g = GapModel::new(-11, -2).unwrap();
        let cfg = AlignerConfig::for_lane(LaneKind::I8);
        assert!(matches!(
            cfg.validate(&m, &g),
            Err(ConfigError::SaturationWindow { .. })
        ));
        // The same model fits comfortably in i16 lanes.
        assert!(AlignerConfig::for_lane(LaneKind::I16).validate(&m, &g).is_ok());
    }

    #[test]
    fn rejects_free_end_gaps_in_local_mode() {
        let m = ScoringMatrix::dna(4, -2);
        let g = GapModel::new(-4, -1).unwrap();
        let mut cfg = AlignerConfig::default();
        cfg.mode = AlignmentMode::Local;
        cfg.trailing_gaps = GapPolicy::Free;
        assert_eq!(cfg.validate(&m, &g), Err(ConfigError::EndGapPolicy));
    }
}
