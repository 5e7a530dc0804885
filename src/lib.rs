//! lanewise: SIMD-lane pairwise alignment scoring with affine gaps.
//!
//! The engine evaluates global or local alignment scores with a vectorized
//! dynamic program: DP cells are fixed-width lanes of narrow integers, the
//! matrix is tiled into blocks, and a saturated offset-rebasing scheme keeps
//! every intermediate value inside the narrow range, so 8-bit lanes score
//! arbitrarily long sequences without overflow. Independent pairs ride in
//! separate SIMD lanes, so a batch of alignments costs one matrix sweep.
//!
//! ```
//! use lanewise::{AlignerConfig, AlignmentMode, GapModel, LaneKind, PairwiseAligner, ScoringMatrix};
//!
//! let matrix = ScoringMatrix::dna(4, -2);
//! let gaps = GapModel::new(-4, -1)?;
//!
//! let mut config = AlignerConfig::for_lane(LaneKind::I8);
//! config.mode = AlignmentMode::Local;
//! let aligner = PairwiseAligner::new(matrix, gaps, config)?;
//!
//! assert_eq!(aligner.score(b"AAAACGTAAAA", b"CGT")?, 12);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod aligner;
pub mod config;
mod engine;
pub mod error;
pub mod scoring;
pub mod simd;

pub use aligner::PairwiseAligner;
pub use config::{AlignerConfig, AlignmentMode, GapPolicy, LaneKind};
pub use error::{AlignError, ConfigError, SaturationDiag};
pub use scoring::{GapModel, ScoringMatrix};
pub use simd::LANE_WIDTH;
