//! RAW image reader implementation using the rawloader library.
//!
//! Decodes a camera RAW file (ARW, CR2, NEF, DNG, ...) down to its Bayer
//! sensor samples so they can be re-encoded as lossless NEF data.

use std::io::Cursor;

use tracing::debug;
use rawloader::RawImageData as RawloaderImageData;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::raw::types::{RawImageData, bits_for_value};
use crate::image_pipeline::raw::reader::RawImageReader;

/// RAW image reader that uses the rawloader library for decoding.
///
/// Only single-component integer RAWs are accepted; linear (demosaiced) or
/// floating point RAWs have no Bayer mosaic to encode.
pub struct RawLoaderReader;

/// Bit depth assumed when the file carries no usable white level.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

impl RawImageReader for RawLoaderReader {
    /// Decodes `data` and returns the mosaic with the sensor bit depth taken
    /// from the white level (e.g. 16383 -> 14 bits).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use nef_encode_rs::image_pipeline::{RawImageReader, RawLoaderReader};
    ///
    /// let raw_bytes = std::fs::read("image.nef").unwrap();
    /// let image = RawLoaderReader.read_raw(&raw_bytes).unwrap();
    /// assert!(image.bits_per_sample <= 16);
    /// ```
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        if decoded.cpp != 1 {
            return Err(ConversionError::UnsupportedFormat(format!(
                "{} components per pixel, expected a Bayer mosaic",
                decoded.cpp
            )));
        }

        let width = decoded.width;
        let height = decoded.height;
        debug!("Decoded {} {}: {}x{}", decoded.make, decoded.model, width, height);

        let data = match decoded.data {
            RawloaderImageData::Integer(values) => values,
            RawloaderImageData::Float(_) => {
                return Err(ConversionError::UnsupportedFormat(
                    "floating point RAW data".to_string(),
                ));
            }
        };

        let max_white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
        let bits_per_sample = if max_white_level == 0 {
            DEFAULT_BITS_PER_SAMPLE
        } else {
            bits_for_value(max_white_level)
        };

        debug!(
            "bits_per_sample: {} (white level {}, black levels {:?})",
            bits_per_sample, max_white_level, decoded.blacklevels
        );

        Ok(RawImageData {
            width,
            height,
            data,
            bits_per_sample,
        })
    }
}
