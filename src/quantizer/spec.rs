//! Quantization spec: the per-tensor quantization policy
//!
//! A [`QuantizationSpec`] describes how one tensor position (an operator
//! input or output) should be quantized: logical dtype, static vs. dynamic,
//! integer range, scheme, and channel axis for per-channel schemes.
//!
//! Specs are immutable value objects. Every invariant is checked exactly once
//! at construction, so an invalid spec can never exist, and specs can be
//! freely cloned and aliased across many node annotations.

use super::dtype::{DType, QDType, QScheme};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// How a tensor at one operator position should be quantized
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantizationSpec {
    dtype: DType,
    is_dynamic: bool,
    quant_min: Option<i32>,
    quant_max: Option<i32>,
    qscheme: Option<QScheme>,
    ch_axis: Option<i32>,
}

impl QuantizationSpec {
    /// Create a quantization spec, validating every field
    ///
    /// Checks, in order:
    /// 1. `dtype` is in the supported set
    /// 2. `quant_min <= quant_max` when both are given
    /// 3. `qscheme` is in the supported set when given
    /// 4. `ch_axis >= 0` when given
    pub fn new(
        dtype: DType,
        is_dynamic: bool,
        quant_min: Option<i32>,
        quant_max: Option<i32>,
        qscheme: Option<QScheme>,
        ch_axis: Option<i32>,
    ) -> Result<Self> {
        if !dtype.is_supported() {
            return Err(Error::UnsupportedDtype(dtype));
        }

        if let (Some(min), Some(max)) = (quant_min, quant_max) {
            if min > max {
                return Err(Error::InvalidQuantRange {
                    quant_min: min,
                    quant_max: max,
                });
            }
        }

        if let Some(scheme) = qscheme {
            if !scheme.is_supported() {
                return Err(Error::UnsupportedQscheme(scheme));
            }
        }

        if let Some(axis) = ch_axis {
            if axis < 0 {
                return Err(Error::NegativeChannelAxis(axis));
            }
        }

        Ok(Self {
            dtype,
            is_dynamic,
            quant_min,
            quant_max,
            qscheme,
            ch_axis,
        })
    }

    /// Per-tensor symmetric signed 8-bit spec (range [-127, 127])
    pub fn int8_symmetric() -> Result<Self> {
        Self::new(
            DType::I8,
            false,
            Some(-127),
            Some(127),
            Some(QScheme::PerTensorSymmetric),
            None,
        )
    }

    /// Per-tensor affine unsigned 8-bit spec (range [0, 255])
    pub fn uint8_affine() -> Result<Self> {
        Self::new(
            DType::U8,
            false,
            Some(0),
            Some(255),
            Some(QScheme::PerTensorAffine),
            None,
        )
    }

    /// Per-channel symmetric signed 8-bit spec along `ch_axis`
    pub fn per_channel_symmetric(ch_axis: i32) -> Result<Self> {
        Self::new(
            DType::I8,
            false,
            Some(-127),
            Some(127),
            Some(QScheme::PerChannelSymmetric),
            Some(ch_axis),
        )
    }

    /// Dynamic quantization spec for `dtype` (range chosen at runtime)
    pub fn dynamic(dtype: DType) -> Result<Self> {
        Self::new(dtype, true, None, None, None, None)
    }

    /// Logical element dtype
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Whether quantization parameters are computed at runtime
    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    /// Lower bound of the quantized integer range
    pub fn quant_min(&self) -> Option<i32> {
        self.quant_min
    }

    /// Upper bound of the quantized integer range
    pub fn quant_max(&self) -> Option<i32> {
        self.quant_max
    }

    /// Quantization scheme
    pub fn qscheme(&self) -> Option<QScheme> {
        self.qscheme
    }

    /// Channel axis for per-channel schemes
    pub fn ch_axis(&self) -> Option<i32> {
        self.ch_axis
    }

    /// Derive the keyword set for instantiating an observer or fake-quantize
    ///
    /// Copies every field and substitutes the logical dtype with its
    /// registered physical quantized storage type. Fails with
    /// [`Error::MissingQuantizedDtype`] for spec dtypes without a registered
    /// counterpart (f32 is a valid spec dtype but cannot back an observer).
    ///
    /// The returned value is fully independent: mutating it never affects
    /// this spec.
    pub fn observer_kwargs(&self) -> Result<ObserverKwargs> {
        let qdtype = self
            .dtype
            .quantized()
            .ok_or(Error::MissingQuantizedDtype(self.dtype))?;

        Ok(ObserverKwargs {
            dtype: qdtype,
            is_dynamic: self.is_dynamic,
            quant_min: self.quant_min,
            quant_max: self.quant_max,
            qscheme: self.qscheme,
            ch_axis: self.ch_axis,
        })
    }
}

/// Keyword set for constructing an observer or fake-quantize module
///
/// All fields are owned copies; the originating spec keeps its logical dtype
/// while `dtype` here is the physical quantized storage type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverKwargs {
    /// Physical quantized storage dtype
    pub dtype: QDType,
    /// Whether parameters are computed at runtime
    pub is_dynamic: bool,
    /// Lower bound of the quantized range
    pub quant_min: Option<i32>,
    /// Upper bound of the quantized range
    pub quant_max: Option<i32>,
    /// Quantization scheme
    pub qscheme: Option<QScheme>,
    /// Channel axis for per-channel schemes
    pub ch_axis: Option<i32>,
}
