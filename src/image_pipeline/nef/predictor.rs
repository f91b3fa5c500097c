//! Per-channel predictor for a 2x2 Bayer tile.
//!
//! The first two pixels of a row are predicted from the previous row of the
//! same parity (`row_seeds`); every later pixel is predicted from the last
//! pixel of the same column parity in the current row (`running`). All
//! arithmetic wraps at 16 bits.

use thiserror::Error;

use crate::image_pipeline::nef::code_table::MAX_MAGNITUDE_CLASS;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Delta magnitude class {class} exceeds {max}", max = MAX_MAGNITUDE_CLASS)]
pub struct ClassOutOfRange {
    pub class: u32,
}

/// Magnitude class and the `class`-bit data field for one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaCode {
    pub class: u32,
    pub bits: u32,
}

#[derive(Debug, Clone)]
pub struct Predictor {
    row_seeds: [[u16; 2]; 2],
    running: [u16; 2],
}

impl Predictor {
    pub fn new(starting_value: u16) -> Self {
        Self {
            row_seeds: [[starting_value; 2]; 2],
            running: [starting_value; 2],
        }
    }

    pub fn predict(&self, row: usize, column: usize) -> u16 {
        if column <= 1 {
            self.row_seeds[row & 1][column]
        } else {
            self.running[column & 1]
        }
    }

    /// Computes the coded delta for `pixel` and advances the state.
    ///
    /// State is left untouched when the delta has no table entry.
    pub fn observe(
        &mut self,
        row: usize,
        column: usize,
        pixel: u16,
    ) -> Result<DeltaCode, ClassOutOfRange> {
        let predicted = self.predict(row, column);
        let delta = i32::from(pixel) - i32::from(predicted);
        let code = delta_code(delta);

        if code.class > MAX_MAGNITUDE_CLASS {
            return Err(ClassOutOfRange { class: code.class });
        }

        let step = delta as u16;
        if column <= 1 {
            let seed = &mut self.row_seeds[row & 1][column];
            *seed = seed.wrapping_add(step);
            self.running[column] = *seed;
        } else {
            let last = &mut self.running[column & 1];
            *last = last.wrapping_add(step);
        }

        Ok(code)
    }
}

/// Bit length of |delta| as the class. Negative deltas are stored as
/// `(2^class - 1) - |delta|`, which clears the top data bit.
pub(crate) fn delta_code(delta: i32) -> DeltaCode {
    let magnitude = delta.unsigned_abs();
    if magnitude == 0 {
        return DeltaCode { class: 0, bits: 0 };
    }

    let class = u32::BITS - magnitude.leading_zeros();
    let bits = if delta >= 0 {
        magnitude
    } else {
        ((1u32 << class) - 1) - magnitude
    };
    DeltaCode { class, bits }
}
