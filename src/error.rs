//! Error types for Cuantizar

use crate::quantizer::{DType, QScheme, ValidationReport};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported dtype {0} for quantization spec")]
    UnsupportedDtype(DType),

    #[error("quant_min {quant_min} must be <= quant_max {quant_max}")]
    InvalidQuantRange { quant_min: i32, quant_max: i32 },

    #[error("Unsupported qscheme {0}")]
    UnsupportedQscheme(QScheme),

    #[error("Channel axis {0} must be >= 0")]
    NegativeChannelAxis(i32),

    #[error("No quantized storage dtype registered for {0}")]
    MissingQuantizedDtype(DType),

    #[error("Annotation validation failed: {0}")]
    Validation(#[from] ValidationReport),
}

pub type Result<T> = std::result::Result<T, Error>;
