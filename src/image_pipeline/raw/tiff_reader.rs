//! Reader for TIFF sources: a ready Bayer mosaic, or an RGB image to mosaic.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::mosaic::{self, MAX_14BIT_SAMPLE};
use crate::image_pipeline::raw::reader::RawImageReader;
use crate::image_pipeline::raw::types::{RawImageData, bits_for_value};

/// Reads 16-bit grayscale TIFFs whose pixels are already in CFA order, and
/// 8/16-bit RGB TIFFs which are sampled into an RGGB mosaic.
///
/// A grayscale mosaic carries no sensor white level, so its bit depth is
/// taken from the largest sample present. RGB input is scaled to 14 bits on
/// top of `black_level`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffBayerReader {
    pub black_level: u16,
}

impl TiffBayerReader {
    pub fn with_black_level(black_level: u16) -> Self {
        Self { black_level }
    }

    fn mosaic_from_rgb(
        &self,
        width: usize,
        height: usize,
        rgb: Vec<u16>,
        max_value: u16,
    ) -> Result<RawImageData> {
        if rgb.len() != width * height * 3 {
            return Err(ConversionError::DecodeError(format!(
                "{} RGB samples for {}x{}",
                rgb.len(),
                width,
                height
            )));
        }

        debug!(
            "Building RGGB mosaic from {}x{} RGB, black level {}",
            width, height, self.black_level
        );
        Ok(RawImageData {
            width,
            height,
            data: mosaic::rgb_to_rggb(width, height, &rgb, max_value, self.black_level),
            bits_per_sample: bits_for_value(MAX_14BIT_SAMPLE),
        })
    }
}

impl RawImageReader for TiffBayerReader {
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding TIFF source, {} bytes", data.len());

        let decode_err = |e: tiff::TiffError| ConversionError::DecodeError(e.to_string());

        let mut decoder = Decoder::new(Cursor::new(data)).map_err(decode_err)?;
        let color_type = decoder.colortype().map_err(decode_err)?;
        let (width, height) = decoder.dimensions().map_err(decode_err)?;
        let (width, height) = (width as usize, height as usize);

        match (color_type, decoder.read_image().map_err(decode_err)?) {
            (ColorType::Gray(16), DecodingResult::U16(data)) => {
                let bits_per_sample = bits_for_value(data.iter().copied().max().unwrap_or(0));
                debug!("Decoded TIFF mosaic: {}x{}, {} bits", width, height, bits_per_sample);
                Ok(RawImageData {
                    width,
                    height,
                    data,
                    bits_per_sample,
                })
            }
            (ColorType::RGB(16), DecodingResult::U16(rgb)) => {
                self.mosaic_from_rgb(width, height, rgb, u16::MAX)
            }
            (ColorType::RGB(8), DecodingResult::U8(rgb)) => {
                let rgb = rgb.into_iter().map(u16::from).collect();
                self.mosaic_from_rgb(width, height, rgb, u16::from(u8::MAX))
            }
            (color_type, _) => Err(ConversionError::UnsupportedFormat(format!(
                "{:?}, expected 16-bit grayscale or 8/16-bit RGB",
                color_type
            ))),
        }
    }
}
