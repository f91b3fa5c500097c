//! RAW to NEF conversion configuration types

use crate::image_pipeline::nef::{DEFAULT_STARTING_PREDICTIVE_VALUE, OUTPUT_MARGIN_BYTES};

/// Configuration for RAW to NEF conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Seed for every channel's predictor (from the template NEF's linearization table)
    pub starting_predictive_value: u16,
    /// Whether to validate image dimensions before conversion
    pub validate_dimensions: bool,
    /// Reject sources whose sensor depth exceeds this many bits
    pub max_bits_per_sample: Option<u32>,
    /// Capacity added on top of the source size for the output buffer
    pub output_slack_bytes: usize,
    /// Sensor black level RGB sources are scaled onto
    pub black_level: u16,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            starting_predictive_value: DEFAULT_STARTING_PREDICTIVE_VALUE,
            validate_dimensions: true,
            max_bits_per_sample: Some(14),
            output_slack_bytes: OUTPUT_MARGIN_BYTES,
            black_level: 0,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    starting_predictive_value: Option<u16>,
    validate_dimensions: Option<bool>,
    max_bits_per_sample: Option<Option<u32>>,
    output_slack_bytes: Option<usize>,
    black_level: Option<u16>,
}

impl ConversionConfigBuilder {
    pub fn starting_predictive_value(mut self, value: u16) -> Self {
        self.starting_predictive_value = Some(value);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_bits_per_sample(mut self, max: Option<u32>) -> Self {
        self.max_bits_per_sample = Some(max);
        self
    }

    pub fn output_slack_bytes(mut self, bytes: usize) -> Self {
        self.output_slack_bytes = Some(bytes);
        self
    }

    pub fn black_level(mut self, level: u16) -> Self {
        self.black_level = Some(level);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            starting_predictive_value: self
                .starting_predictive_value
                .unwrap_or(default.starting_predictive_value),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_bits_per_sample: self.max_bits_per_sample.unwrap_or(default.max_bits_per_sample),
            output_slack_bytes: self.output_slack_bytes.unwrap_or(default.output_slack_bytes),
            black_level: self.black_level.unwrap_or(default.black_level),
        }
    }
}
