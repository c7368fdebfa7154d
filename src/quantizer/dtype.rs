//! Dtype and qscheme registry
//!
//! Fixed enumerations of logical element types and quantization schemes, plus
//! the mapping from logical dtype to physical quantized storage dtype used
//! when instantiating observers and fake-quantize modules.
//!
//! The `DType` and `QScheme` vocabularies are deliberately wider than the
//! sets accepted by [`QuantizationSpec`](super::QuantizationSpec): spec
//! construction checks membership at runtime, so unsupported members must be
//! expressible.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical element type of a tensor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    /// Unsigned 8-bit integer
    U8,
    /// Signed 8-bit integer
    I8,
    /// Signed 16-bit integer
    I16,
    /// Signed 32-bit integer
    I32,
    /// Signed 64-bit integer
    I64,
    /// 16-bit float (half precision)
    F16,
    /// 32-bit float (single precision)
    F32,
    /// 64-bit float (double precision)
    F64,
}

/// Dtypes accepted by [`QuantizationSpec`](super::QuantizationSpec)
pub const SUPPORTED_DTYPES: [DType; 5] =
    [DType::U8, DType::I8, DType::I32, DType::F16, DType::F32];

impl DType {
    /// Check whether this dtype is valid for a quantization spec
    pub fn is_supported(self) -> bool {
        SUPPORTED_DTYPES.contains(&self)
    }

    /// Physical quantized storage dtype registered for this logical dtype
    ///
    /// Returns `None` for dtypes without a registered counterpart. Note that
    /// `F32` is a valid spec dtype but has no quantized storage type, so the
    /// two supported-sets are not identical.
    pub fn quantized(self) -> Option<QDType> {
        match self {
            DType::I8 => Some(QDType::QInt8),
            DType::U8 => Some(QDType::QUInt8),
            DType::I32 => Some(QDType::QInt32),
            DType::F16 => Some(QDType::Float16),
            _ => None,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::U8 => "u8",
            DType::I8 => "i8",
            DType::I16 => "i16",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::F16 => "f16",
            DType::F32 => "f32",
            DType::F64 => "f64",
        };
        write!(f, "{name}")
    }
}

/// Physical quantized storage type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QDType {
    /// Quantized signed 8-bit integer
    QInt8,
    /// Quantized unsigned 8-bit integer
    QUInt8,
    /// Quantized signed 32-bit integer (bias)
    QInt32,
    /// Half precision, stored as-is
    Float16,
}

impl fmt::Display for QDType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QDType::QInt8 => "qint8",
            QDType::QUInt8 => "quint8",
            QDType::QInt32 => "qint32",
            QDType::Float16 => "f16",
        };
        write!(f, "{name}")
    }
}

/// Quantization scheme: how scale/zero-point apply to a tensor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QScheme {
    /// One scale and zero-point for the whole tensor
    PerTensorAffine,
    /// One scale for the whole tensor, zero-point fixed at zero
    PerTensorSymmetric,
    /// One scale/zero-point per slice along the channel axis
    PerChannelAffine,
    /// One scale per slice along the channel axis, zero-point fixed at zero
    PerChannelSymmetric,
    /// Per-channel affine with floating-point scale/zero-point parameters
    PerChannelAffineFloatQparams,
    /// Per-tensor affine with floating-point parameters (not supported)
    PerTensorAffineFloatQparams,
}

/// Schemes accepted by [`QuantizationSpec`](super::QuantizationSpec)
pub const SUPPORTED_QSCHEMES: [QScheme; 5] = [
    QScheme::PerTensorAffine,
    QScheme::PerTensorSymmetric,
    QScheme::PerChannelAffine,
    QScheme::PerChannelSymmetric,
    QScheme::PerChannelAffineFloatQparams,
];

impl QScheme {
    /// Check whether this scheme is valid for a quantization spec
    pub fn is_supported(self) -> bool {
        SUPPORTED_QSCHEMES.contains(&self)
    }

    /// Whether this scheme has one set of parameters per channel slice
    pub fn is_per_channel(self) -> bool {
        matches!(
            self,
            QScheme::PerChannelAffine
                | QScheme::PerChannelSymmetric
                | QScheme::PerChannelAffineFloatQparams
        )
    }
}

impl fmt::Display for QScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QScheme::PerTensorAffine => "per_tensor_affine",
            QScheme::PerTensorSymmetric => "per_tensor_symmetric",
            QScheme::PerChannelAffine => "per_channel_affine",
            QScheme::PerChannelSymmetric => "per_channel_symmetric",
            QScheme::PerChannelAffineFloatQparams => "per_channel_affine_float_qparams",
            QScheme::PerTensorAffineFloatQparams => "per_tensor_affine_float_qparams",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_dtypes_membership() {
        assert!(DType::U8.is_supported());
        assert!(DType::I8.is_supported());
        assert!(DType::I32.is_supported());
        assert!(DType::F16.is_supported());
        assert!(DType::F32.is_supported());

        assert!(!DType::I16.is_supported());
        assert!(!DType::I64.is_supported());
        assert!(!DType::F64.is_supported());
    }

    #[test]
    fn test_quantized_storage_mapping() {
        assert_eq!(DType::I8.quantized(), Some(QDType::QInt8));
        assert_eq!(DType::U8.quantized(), Some(QDType::QUInt8));
        assert_eq!(DType::I32.quantized(), Some(QDType::QInt32));
        assert_eq!(DType::F16.quantized(), Some(QDType::Float16));
    }

    #[test]
    fn test_f32_supported_for_specs_but_not_quantizable() {
        // The two supported-sets differ: f32 specs are legal, but there is
        // no physical quantized storage type for f32.
        assert!(DType::F32.is_supported());
        assert_eq!(DType::F32.quantized(), None);
    }

    #[test]
    fn test_unsupported_dtypes_have_no_quantized_counterpart() {
        assert_eq!(DType::I16.quantized(), None);
        assert_eq!(DType::I64.quantized(), None);
        assert_eq!(DType::F64.quantized(), None);
    }

    #[test]
    fn test_supported_qschemes_membership() {
        assert!(QScheme::PerTensorAffine.is_supported());
        assert!(QScheme::PerTensorSymmetric.is_supported());
        assert!(QScheme::PerChannelAffine.is_supported());
        assert!(QScheme::PerChannelSymmetric.is_supported());
        assert!(QScheme::PerChannelAffineFloatQparams.is_supported());

        assert!(!QScheme::PerTensorAffineFloatQparams.is_supported());
    }

    #[test]
    fn test_per_channel_classification() {
        assert!(QScheme::PerChannelAffine.is_per_channel());
        assert!(QScheme::PerChannelSymmetric.is_per_channel());
        assert!(QScheme::PerChannelAffineFloatQparams.is_per_channel());
        assert!(!QScheme::PerTensorAffine.is_per_channel());
        assert!(!QScheme::PerTensorSymmetric.is_per_channel());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(DType::I8.to_string(), "i8");
        assert_eq!(QDType::QUInt8.to_string(), "quint8");
        assert_eq!(QScheme::PerTensorAffine.to_string(), "per_tensor_affine");
    }
}
