use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NefEncodeError {
    #[error("Source buffer too small: {available} bytes for {required} bytes of samples")]
    SourceBufferTooSmall { required: usize, available: usize },

    #[error("No Huffman entry for magnitude class {class} at row {row}, column {column}")]
    NoHuffmanEntry { row: usize, column: usize, class: u32 },

    #[error("Output buffer too small: {required} bytes required, capacity is {capacity}")]
    OutputBufferTooSmall { required: usize, capacity: usize },
}

impl NefEncodeError {
    /// Negative status code distinct per error kind.
    pub fn code(&self) -> i32 {
        match self {
            NefEncodeError::SourceBufferTooSmall { .. } => -1,
            NefEncodeError::NoHuffmanEntry { .. } => -2,
            NefEncodeError::OutputBufferTooSmall { .. } => -3,
        }
    }
}

pub type Result<T> = std::result::Result<T, NefEncodeError>;
