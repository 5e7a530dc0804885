//! Error types for configuration and alignment.

use std::fmt;

use crate::config::LaneKind;

/// Errors raised while validating an aligner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Gap penalties must be non-positive and representable in the lane type.
    InvalidGapModel { open: i32, extend: i32 },

    /// Alphabet/matrix construction problem (duplicate symbol, bad table size).
    InvalidMatrix(String),

    /// Requested SIMD width is not one of the supported lane counts.
    UnsupportedWidth { width: usize },

    /// Lane type and saturation policy do not combine (e.g. saturated i32,
    /// unsaturated i8).
    UnsupportedPolicy { lane: LaneKind, saturated: bool },

    /// Free end-gap policies only apply to global alignment.
    EndGapPolicy,

    /// Block geometry must be at least one cell in each direction.
    BlockGeometry { height: usize, width: usize },

    /// The worst-case score drift across one block does not fit the narrow
    /// lane range; widen the lane type or shrink the blocks.
    SaturationWindow { window: i32, limit: i32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidGapModel { open, extend } => {
                write!(
                    f,
                    "invalid gap model: open={open}, extend={extend} (both must be \
                     non-positive and fit the configured lane type)"
                )
            }
            ConfigError::InvalidMatrix(msg) => write!(f, "invalid scoring matrix: {msg}"),
            ConfigError::UnsupportedWidth { width } => {
                write!(f, "unsupported SIMD width {width} (expected 1, 4, 8, 16 or 32)")
            }
            ConfigError::UnsupportedPolicy { lane, saturated } => {
                write!(
                    f,
                    "unsupported lane policy: lane={lane:?}, saturated={saturated}"
                )
            }
            ConfigError::EndGapPolicy => {
                write!(f, "free end-gap policies require global alignment mode")
            }
            ConfigError::BlockGeometry { height, width } => {
                write!(f, "invalid block geometry: {height}x{width}")
            }
            ConfigError::SaturationWindow { window, limit } => {
                write!(
                    f,
                    "saturation window {window} exceeds narrow lane limit {limit}; \
                     widen the lane type or reduce the block geometry"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Diagnostic payload for a saturated-rebase overflow.
///
/// Identifies the first lane of the first cell whose narrow rebase disagreed
/// with the widened-type recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaturationDiag {
    /// Cell index within the rebased vector.
    pub cell: usize,
    /// SIMD lane index.
    pub lane: usize,
    /// Result of the narrow saturating rebase.
    pub narrow: i32,
    /// Result recomputed in the widened type.
    pub expected: i32,
    /// The vector's wide offset for this lane, before the rebase.
    pub offset: i32,
    /// The saturated zero constant of the lane type.
    pub zero_offset: i32,
}

/// Errors raised while computing an alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    /// A sequence byte has no rank in the scoring matrix's rank map.
    InvalidSymbol { byte: u8, pos: usize, lane: usize },

    /// A saturated rebase overflowed the narrow lane range.
    Saturation(Box<SaturationDiag>),
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignError::InvalidSymbol { byte, pos, lane } => {
                write!(
                    f,
                    "invalid symbol 0x{byte:02x} at position {pos} (lane {lane}): \
                     no rank in the scoring alphabet"
                )
            }
            AlignError::Saturation(d) => {
                write!(
                    f,
                    "saturated rebase overflow at cell {}, lane {}: narrow result {} \
                     != expected {} (offset {}, zero offset {})",
                    d.cell, d.lane, d.narrow, d.expected, d.offset, d.zero_offset
                )
            }
        }
    }
}

impl std::error::Error for AlignError {}

impl From<SaturationDiag> for AlignError {
    fn from(d: SaturationDiag) -> Self {
        AlignError::Saturation(Box::new(d))
    }
}
