use tracing::{info, instrument, warn};
use std::io::Write;
use std::path::Path;

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    conversions::types::ConversionConfig,
    nef::{self, NefEncodeParams},
    raw::{MAX_14BIT_SAMPLE, RawImageData, RawImageReader, RawLoaderReader, TiffBayerReader},
};

pub struct RawToNefPipeline<R: RawImageReader> {
    reader: R,
    config: ConversionConfig,
}

impl RawToNefPipeline<RawLoaderReader> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: RawLoaderReader,
            config,
        }
    }
}

impl RawToNefPipeline<TiffBayerReader> {
    /// Pipeline over TIFF sources, mosaicing RGB input onto the configured black level.
    pub fn for_tiff(config: ConversionConfig) -> Self {
        Self {
            reader: TiffBayerReader::with_black_level(config.black_level),
            config,
        }
    }
}

impl<R: RawImageReader> RawToNefPipeline<R> {
    pub fn with_custom(reader: R, config: ConversionConfig) -> Self {
        Self { reader, config }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    fn validate_bit_depth(&self, image: &RawImageData) -> Result<()> {
        if let Some(max) = self.config.max_bits_per_sample {
            if image.bits_per_sample > max {
                return Err(ConversionError::UnsupportedFormat(format!(
                    "{}-bit samples, at most {} supported",
                    image.bits_per_sample, max
                )));
            }
        }

        let max_sample = image.max_sample();
        if max_sample > MAX_14BIT_SAMPLE {
            warn!(
                max_sample,
                "Samples exceed 14 bits; encoding may fail with no Huffman entry"
            );
        }

        Ok(())
    }

    /// Encodes an already decoded mosaic, returning the encoded strip.
    #[instrument(skip_all, fields(width = image.width, height = image.height))]
    pub fn encode_image(&self, image: &RawImageData) -> Result<Vec<u8>> {
        self.validate_dimensions(image.width, image.height)?;
        self.validate_bit_depth(image)?;

        let params = NefEncodeParams::builder()
            .columns(image.width)
            .rows(image.height)
            .starting_predictive_value(self.config.starting_predictive_value)
            .build();

        let capacity =
            image.data.len() * std::mem::size_of::<u16>() + self.config.output_slack_bytes;
        let mut buffer = vec![0u8; capacity];
        let bytes = nef::encode(&params, &image.data, &mut buffer)?;
        buffer.truncate(bytes);

        Ok(buffer)
    }

    /// Decodes `input_data`, encodes it and writes the strip to `output`.
    /// Returns the number of encoded bytes written.
    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<usize> {
        info!("Starting RAW to NEF conversion");

        let raw_image = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_raw(input_data)?
        };

        let encoded = {
            let _span = tracing::info_span!("encode_nef").entered();
            self.encode_image(&raw_image)?
        };

        {
            let _span = tracing::info_span!("write_output", bytes = encoded.len()).entered();
            output.write_all(&encoded)?;
        }

        info!(
            width = raw_image.width,
            height = raw_image.height,
            bytes = encoded.len(),
            "Conversion complete"
        );
        Ok(encoded.len())
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<usize> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let mut output_file = {
            let _span = tracing::info_span!("create_output_file").entered();
            std::fs::File::create(output_path).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?
        };

        self.convert(&input_data, &mut output_file)
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.config = config;
    }
}
