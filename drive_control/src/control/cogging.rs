//! Cogging-torque compensation map.
//!
//! A fixed-size circular table of per-angle current corrections. The
//! controller reads it every cycle (linear interpolation between the two
//! entries bracketing the rotor angle) and, in velocity mode and above,
//! learns it online by spreading a velocity-error-proportional correction
//! over the same two entries with the same interpolation weights.
//!
//! The table is sized once at construction and never grows or shrinks.

use drive_common::consts::{COGMAP_CAPACITY, COGMAP_MIN_SIZE, COGMAP_PWR_ALPHA};
use thiserror::Error;

use crate::math::{clamp_bidir, fmod_pos};

/// Cogging map construction error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CogMapError {
    /// Requested size is outside `[COGMAP_MIN_SIZE, COGMAP_CAPACITY]`.
    #[error("cogging map size {size} out of range [{min}, {max}]")]
    InvalidSize { size: usize, min: usize, max: usize },

    /// A preloaded table does not have the configured number of entries.
    #[error("cogging map table has {len} entries, expected {size}")]
    LengthMismatch { len: usize, size: usize },
}

/// Interpolation result for one rotor angle.
///
/// Carries the bracketing indices and weight so the adaptation step can
/// reuse them without recomputing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CogSample {
    /// Lower bracketing entry.
    pub idx: usize,
    /// Upper bracketing entry (wraps to 0 after the last entry).
    pub idx1: usize,
    /// Weight of `idx1`, in `[0, 1)`.
    pub frac: f32,
    /// Interpolated compensation current [A].
    pub current: f32,
}

/// Fixed-capacity cogging compensation table.
#[derive(Debug, Clone)]
pub struct CogMap {
    table: heapless::Vec<f32, COGMAP_CAPACITY>,
}

impl CogMap {
    /// Zero-filled map with `size` entries.
    pub fn new(size: usize) -> Result<Self, CogMapError> {
        check_size(size)?;
        let mut table = heapless::Vec::new();
        table.resize(size, 0.0).map_err(|_| invalid(size))?;
        Ok(Self { table })
    }

    /// Map initialised from a previously learned table.
    pub fn from_table(values: &[f32]) -> Result<Self, CogMapError> {
        check_size(values.len())?;
        let table = heapless::Vec::from_slice(values).map_err(|_| invalid(values.len()))?;
        Ok(Self { table })
    }

    /// Number of entries per revolution.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Always false for a constructed map.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Read-only view of the entries.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.table
    }

    /// Zero every entry, keeping the size.
    pub fn clear(&mut self) {
        self.table.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Interpolate the map at `pos_ratio` (0..1 maps to one revolution).
    ///
    /// Ratios outside `[0, 1)` wrap around the table.
    #[inline]
    pub fn lookup(&self, pos_ratio: f32) -> CogSample {
        let size = self.table.len();
        let idxf = fmod_pos(pos_ratio * size as f32, size as f32);
        let mut idx = idxf as usize;
        if idx >= size {
            idx = 0;
        }
        let idx1 = (idx + 1) % size;
        let frac = idxf - idx as f32;
        let current = (1.0 - frac) * self.table[idx] + frac * self.table[idx1];
        CogSample {
            idx,
            idx1,
            frac,
            current,
        }
    }

    /// Distribute `correction` over the two entries of `sample` and clamp
    /// each one to `±max_current`.
    #[inline]
    pub fn adapt(&mut self, sample: &CogSample, correction: f32, max_current: f32) {
        let lo = &mut self.table[sample.idx];
        *lo = clamp_bidir(*lo + (1.0 - sample.frac) * correction, max_current);
        let hi = &mut self.table[sample.idx1];
        *hi = clamp_bidir(*hi + sample.frac * correction, max_current);
    }
}

fn check_size(size: usize) -> Result<(), CogMapError> {
    if (COGMAP_MIN_SIZE..=COGMAP_CAPACITY).contains(&size) {
        Ok(())
    } else {
        Err(invalid(size))
    }
}

fn invalid(size: usize) -> CogMapError {
    CogMapError::InvalidSize {
        size,
        min: COGMAP_MIN_SIZE,
        max: COGMAP_CAPACITY,
    }
}

/// Exponentially smoothed mean of the squared correction rate.
///
/// Its square root is the RMS learning rate, reported for stability
/// monitoring of the online adaptation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrectionPower {
    value: f32,
}

impl CorrectionPower {
    /// Fold one cycle's correction rate into the estimate.
    #[inline]
    pub fn update(&mut self, rate: f32) {
        self.value += COGMAP_PWR_ALPHA * (rate * rate - self.value);
    }

    /// Current smoothed power.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }
}
