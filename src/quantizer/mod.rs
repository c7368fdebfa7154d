//! Quantization specification and annotation layer
//!
//! Declares how tensors flowing through an operator graph should be
//! quantized, without computing any quantization parameters:
//! - Dtype/qscheme registry and the logical-to-physical storage mapping
//! - [`QuantizationSpec`]: immutable per-tensor-position policy
//! - [`QuantizationConfig`] / [`OperatorConfig`]: policy grouping and the
//!   operator patterns it applies to
//! - [`QuantizationAnnotation`] and the per-node annotation mutators
//! - The [`Quantizer`] backend contract and its reference implementation

mod annotation;
mod backend;
mod config;
mod dtype;
mod spec;
mod static_backend;

pub use annotation::QuantizationAnnotation;
pub use backend::{Quantizer, ValidationReport, Violation, ViolationKind};
pub use config::{OperatorConfig, OperatorPattern, QuantizationConfig};
pub use dtype::{DType, QDType, QScheme, SUPPORTED_DTYPES, SUPPORTED_QSCHEMES};
pub use spec::{ObserverKwargs, QuantizationSpec};
pub use static_backend::StaticInt8Quantizer;
