//! Common utilities module
//!
//! Error types shared by the readers, the encoder and the pipeline.

pub mod error;

pub use error::{ConversionError, Result};
