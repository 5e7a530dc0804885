//! Portable SIMD score lanes.
//!
//! This module provides the narrow-integer lane arithmetic the DP engine is
//! built on: a fixed-width vector of signed scores with element-wise
//! *saturating* add/subtract and max. Saturation is the contract: the engine
//! never relies on wrap-around, and the rebase machinery in the saturated
//! column wrapper verifies (in a widened type) that no rebase step actually
//! clipped.
//!
//! The lane count `L` is a compile-time parameter and every operation is a
//! plain element-wise loop over a fixed-size array, so the monomorphised
//! bodies vectorise to the native register width without per-ISA intrinsics.
//! Lane scalars are abstracted by [`ScoreElem`], implemented for `i8`, `i16`
//! and `i32`; the widened type used for verification and offsets is always
//! `i32`.

use std::fmt;

/// Width of one row strip cached by a DP lane, in cells.
///
/// Full lanes transfer exactly this many cells with a compile-time bound;
/// the last lane of a row falls back to a runtime-bounded tail.
pub const LANE_WIDTH: usize = 8;

/// Scalar element of a score lane.
pub trait ScoreElem:
    Copy + Ord + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    const MIN: Self;
    const MAX: Self;
    /// Re-centring constant for saturated offset rebasing (the mid-range of a
    /// signed type).
    const ZERO_OFFSET: Self;
    /// Number of bits, for diagnostics.
    const BITS: u32;

    fn adds(self, rhs: Self) -> Self;
    fn subs(self, rhs: Self) -> Self;
    fn widen(self) -> i32;
    /// Saturating conversion from the widened type.
    fn narrow(v: i32) -> Self;
    fn from_i8(v: i8) -> Self;
}

macro_rules! impl_score_elem {
    ($t:ty) => {
        impl ScoreElem for $t {
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const ZERO_OFFSET: Self = 0;
            const BITS: u32 = <$t>::BITS;

            #[inline(always)]
            fn adds(self, rhs: Self) -> Self {
                self.saturating_add(rhs)
            }

            #[inline(always)]
            fn subs(self, rhs: Self) -> Self {
                self.saturating_sub(rhs)
            }

            #[inline(always)]
            fn widen(self) -> i32 {
                self as i32
            }

            #[inline(always)]
            fn narrow(v: i32) -> Self {
                v.clamp(<$t>::MIN as i32, <$t>::MAX as i32) as $t
            }

            #[inline(always)]
            fn from_i8(v: i8) -> Self {
                v as $t
            }
        }
    };
}

impl_score_elem!(i8);
impl_score_elem!(i16);
impl_score_elem!(i32);

/// Fixed-width vector of `L` signed scores with saturating arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct SimdScore<T, const L: usize>([T; L]);

/// Wide (i32) lanes, used for DP-vector offsets and overflow verification.
pub type WideScore<const L: usize> = SimdScore<i32, L>;

impl<T: ScoreElem, const L: usize> SimdScore<T, L> {
    #[inline(always)]
    pub fn splat(v: T) -> Self {
        Self([v; L])
    }

    #[inline(always)]
    pub fn zero() -> Self {
        Self::splat(T::from_i8(0))
    }

    #[inline(always)]
    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self(std::array::from_fn(f))
    }

    /// Element-wise saturating add.
    #[inline(always)]
    pub fn adds(self, rhs: Self) -> Self {
        Self::from_fn(|k| self.0[k].adds(rhs.0[k]))
    }

    /// Element-wise saturating subtract.
    #[inline(always)]
    pub fn subs(self, rhs: Self) -> Self {
        Self::from_fn(|k| self.0[k].subs(rhs.0[k]))
    }

    /// Element-wise max.
    #[inline(always)]
    pub fn max(self, rhs: Self) -> Self {
        Self::from_fn(|k| self.0[k].max(rhs.0[k]))
    }

    #[inline(always)]
    pub fn get(&self, lane: usize) -> T {
        self.0[lane]
    }

    #[inline(always)]
    pub fn set(&mut self, lane: usize, v: T) {
        self.0[lane] = v;
    }

    /// Promote every lane to the widened type.
    #[inline(always)]
    pub fn widen(self) -> WideScore<L> {
        SimdScore(std::array::from_fn(|k| self.0[k].widen()))
    }
}

impl<const L: usize> WideScore<L> {
    /// Demote every lane back to a narrow type, saturating.
    #[inline(always)]
    pub fn narrow_to<T: ScoreElem>(self) -> SimdScore<T, L> {
        SimdScore::from_fn(|k| T::narrow(self.0[k]))
    }
}
