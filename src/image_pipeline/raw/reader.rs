use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::RawImageData;

/// Turns an encoded source file into a single-channel mosaic in raster order.
pub trait RawImageReader {
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData>;
}
