//! Pipeline conversions module
//!
//! Orchestrates reading a Bayer source and writing its lossless NEF strip.

mod raw_to_nef;
pub mod types;


pub use raw_to_nef::RawToNefPipeline;
pub use types::{ConversionConfig, ConversionConfigBuilder};
