//! RAW image data types

/// Single-channel Bayer mosaic ready for encoding
#[derive(Debug, Clone)]
pub struct RawImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Raw pixel data in raster order
    pub data: Vec<u16>,
    /// Actual bits per sample from the sensor (e.g., 12, 14, or 16)
    pub bits_per_sample: u32,
}

impl RawImageData {
    /// Largest sample value, 0 for an empty image.
    pub fn max_sample(&self) -> u16 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}

/// Bits needed to hold `value`, with a floor of 1.
pub(crate) fn bits_for_value(value: u16) -> u32 {
    (u16::BITS - value.leading_zeros()).max(1)
}
