//! RAW image reading module
//!
//! Sources of single-channel Bayer samples for the NEF encoder. RGB input
//! is sampled down to an RGGB mosaic on the way in.

mod mosaic;
mod reader;
mod rawloader_reader;
mod tiff_reader;
pub mod types;

pub use mosaic::{MAX_14BIT_SAMPLE, rgb_to_rggb};
pub use reader::RawImageReader;
pub use rawloader_reader::RawLoaderReader;
pub use tiff_reader::TiffBayerReader;
pub use types::RawImageData;
