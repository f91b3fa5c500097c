//! NEF lossless compression module
//!
//! Encodes single-channel Bayer sensor samples into the Huffman-coded
//! predictive bitstream stored in the raw strip of a lossless NEF.

mod bit_writer;
mod code_table;
mod encoder;
mod error;
mod predictor;
pub mod types;

#[cfg(test)]
mod tests;

pub use bit_writer::BitWriter;
pub use code_table::{HuffCode, MAX_MAGNITUDE_CLASS, lookup};
pub use encoder::{OUTPUT_MARGIN_BYTES, encode, encode_to_vec};
pub use error::{NefEncodeError, Result};
pub use predictor::{ClassOutOfRange, DeltaCode, Predictor};
pub use types::{DEFAULT_STARTING_PREDICTIVE_VALUE, NefEncodeParams, NefEncodeParamsBuilder};
