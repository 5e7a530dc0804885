//! Public aligner: validated configuration + runtime dispatch to the
//! monomorphised engine instantiations.

use crate::config::{AlignerConfig, AlignmentMode, GapPolicy, LaneKind};
use crate::engine::driver::{run, EngineParams};
use crate::engine::tracker::{GlobalTracker, LocalTracker};
use crate::error::{AlignError, ConfigError};
use crate::scoring::sequence::RankedBatch;
use crate::scoring::{GapModel, ScoringMatrix};

/// Pairwise alignment scorer.
///
/// Construction validates the scoring model against the configuration once;
/// `score` and `score_batch` then dispatch straight into the engine.
///
/// ```
/// use lanewise::{AlignerConfig, GapModel, PairwiseAligner, ScoringMatrix};
///
/// let matrix = ScoringMatrix::dna(4, -2);
/// let gaps = GapModel::new(-4, -1)?;
/// let aligner = PairwiseAligner::new(matrix, gaps, AlignerConfig::default())?;
/// assert_eq!(aligner.score(b"ACGT", b"ACGT")?, 16);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct PairwiseAligner {
    matrix: ScoringMatrix,
    gaps: GapModel,
    config: AlignerConfig,
}

impl PairwiseAligner {
    pub fn new(
        matrix: ScoringMatrix,
        gaps: GapModel,
        config: AlignerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate(&matrix, &gaps)?;
        log::debug!(
            "aligner: mode={:?}, lane={:?}, simd_width={}, saturated={}",
            config.mode,
            config.lane,
            config.simd_width,
            config.saturated
        );
        Ok(Self {
            matrix,
            gaps,
            config,
        })
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    pub fn matrix(&self) -> &ScoringMatrix {
        &self.matrix
    }

    pub fn gaps(&self) -> &GapModel {
        &self.gaps
    }

    /// Score one pair. `query` symbols index the first matrix axis, `target`
    /// symbols the second.
    pub fn score(&self, query: &[u8], target: &[u8]) -> Result<i32, AlignError> {
        Ok(self.run_chunk::<1>(&[(query, target)])?[0])
    }

    /// Score many pairs, `simd_width` of them per engine pass. Lane results
    /// are independent; shorter pairs in a pass are padded internally.
    pub fn score_batch(&self, pairs: &[(&[u8], &[u8])]) -> Result<Vec<i32>, AlignError> {
        let mut out = Vec::with_capacity(pairs.len());
        for chunk in pairs.chunks(self.config.simd_width) {
            let scores = match self.config.simd_width {
                1 => self.run_chunk::<1>(chunk)?.to_vec(),
                4 => self.run_chunk::<4>(chunk)?.to_vec(),
                8 => self.run_chunk::<8>(chunk)?.to_vec(),
                16 => self.run_chunk::<16>(chunk)?.to_vec(),
                32 => self.run_chunk::<32>(chunk)?.to_vec(),
                _ => unreachable!("simd width validated at construction"),
            };
            out.extend_from_slice(&scores[..chunk.len()]);
        }
        Ok(out)
    }

    fn run_chunk<const L: usize>(&self, pairs: &[(&[u8], &[u8])]) -> Result<[i32; L], AlignError> {
        let batch = RankedBatch::<L>::new(&self.matrix, pairs)?;
        let params = EngineParams {
            block_height: self.config.block_height,
            block_width: self.config.block_width,
            leading_free: self.config.leading_gaps == GapPolicy::Free,
            trailing_free: self.config.trailing_gaps == GapPolicy::Free,
        };

        let global = |batch: &RankedBatch<L>| -> GlobalTracker<L> {
            let mut active = [false; L];
            let mut initial = [i32::MIN; L];
            for k in 0..batch.count {
                active[k] = batch.col_lens[k] > 0 && batch.row_lens[k] > 0;
                if active[k] && params.trailing_free {
                    // Border endpoint (end_col, 0): the whole query against a
                    // leading gap, with the target trailing for free.
                    initial[k] = if params.leading_free {
                        0
                    } else {
                        self.gaps.open + batch.col_lens[k] as i32 * self.gaps.extend
                    };
                }
            }
            GlobalTracker::new(
                batch.col_lens,
                batch.row_lens,
                active,
                params.trailing_free,
                initial,
            )
        };

        match (self.config.lane, self.config.saturated, self.config.mode) {
            (LaneKind::I8, true, AlignmentMode::Global) => run::<i8, L, true, false, _>(
                &self.matrix,
                &self.gaps,
                &batch,
                &params,
                global(&batch),
            ),
            (LaneKind::I8, true, AlignmentMode::Local) => run::<i8, L, true, true, _>(
                &self.matrix,
                &self.gaps,
                &batch,
                &params,
                LocalTracker::new(),
            ),
            (LaneKind::I16, true, AlignmentMode::Global) => run::<i16, L, true, false, _>(
                &self.matrix,
                &self.gaps,
                &batch,
                &params,
                global(&batch),
            ),
            (LaneKind::I16, true, AlignmentMode::Local) => run::<i16, L, true, true, _>(
                &self.matrix,
                &self.gaps,
                &batch,
                &params,
                LocalTracker::new(),
            ),
            (LaneKind::I16, false, AlignmentMode::Global) => run::<i16, L, false, false, _>(
                &self.matrix,
                &self.gaps,
                &batch,
                &params,
                global(&batch),
            ),
            (LaneKind::I16, false, AlignmentMode::Local) => run::<i16, L, false, true, _>(
                &self.matrix,
                &self.gaps,
                &batch,
                &params,
                LocalTracker::new(),
            ),
            (LaneKind::I32, false, AlignmentMode::Global) => run::<i32, L, false, false, _>(
                &self.matrix,
                &self.gaps,
                &batch,
                &params,
                global(&batch),
            ),
            (LaneKind::I32, false, AlignmentMode::Local) => run::<i32, L, false, true, _>(
                &self.matrix,
                &self.gaps,
                &batch,
                &params,
                LocalTracker::new(),
            ),
            _ => unreachable!("lane policy validated at construction"),
        }
    }
}
