//! NEF encode parameter types

/// Seed most lossless NEFs carry at offset 2 of the linearization table.
pub const DEFAULT_STARTING_PREDICTIVE_VALUE: u16 = 0x0800;

/// Geometry and seed for one encode call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NefEncodeParams {
    /// Samples per row
    pub columns: usize,
    /// Number of rows
    pub rows: usize,
    /// Initial prediction for every channel, typically the sensor black level seed
    pub starting_predictive_value: u16,
}

impl Default for NefEncodeParams {
    fn default() -> Self {
        Self {
            columns: 0,
            rows: 0,
            starting_predictive_value: DEFAULT_STARTING_PREDICTIVE_VALUE,
        }
    }
}

impl NefEncodeParams {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    pub fn builder() -> NefEncodeParamsBuilder {
        NefEncodeParamsBuilder::default()
    }

    /// Source bytes the geometry needs, `None` on overflow.
    pub fn source_size_bytes(&self) -> Option<usize> {
        self.rows
            .checked_mul(self.columns)?
            .checked_mul(std::mem::size_of::<u16>())
    }
}

/// Builder for NefEncodeParams
#[derive(Default)]
pub struct NefEncodeParamsBuilder {
    columns: Option<usize>,
    rows: Option<usize>,
    starting_predictive_value: Option<u16>,
}

impl NefEncodeParamsBuilder {
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn starting_predictive_value(mut self, value: u16) -> Self {
        self.starting_predictive_value = Some(value);
        self
    }

    pub fn build(self) -> NefEncodeParams {
        let default = NefEncodeParams::default();
        NefEncodeParams {
            columns: self.columns.unwrap_or(default.columns),
            rows: self.rows.unwrap_or(default.rows),
            starting_predictive_value: self
                .starting_predictive_value
                .unwrap_or(default.starting_predictive_value),
        }
    }
}
