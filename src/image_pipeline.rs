//! Image processing pipeline module
//!
//! RAW sources are read into Bayer mosaics, then compressed with the NEF
//! lossless encoder.

pub mod raw;
pub mod nef;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionError,
    Result,
};

pub use raw::{
    RawImageData,
    RawImageReader,
    RawLoaderReader,
    TiffBayerReader,
};

pub use nef::{
    NefEncodeError,
    NefEncodeParams,
    NefEncodeParamsBuilder,
};

pub use conversions::{
    ConversionConfig,
    ConversionConfigBuilder,
    RawToNefPipeline,
};
