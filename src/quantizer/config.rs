//! Quantization config and operator config
//!
//! Pure data grouping of [`QuantizationSpec`] values: a
//! [`QuantizationConfig`] bundles the activation/weight/bias policies for one
//! quantization unit, and an [`OperatorConfig`] pairs a config with the
//! operator patterns that should receive it. Nothing here touches a graph.

use super::spec::QuantizationSpec;
use crate::graph::Op;
use serde::{Deserialize, Serialize};

/// Quantization policies for the tensor positions of one operator
///
/// Equality and hashing are structural, so configs can be deduplicated or
/// used as map keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantizationConfig {
    /// Policy for activation inputs and outputs
    pub activation: Option<QuantizationSpec>,
    /// Policy for the weight operand
    pub weight: Option<QuantizationSpec>,
    /// Policy for the bias operand
    pub bias: Option<QuantizationSpec>,
    /// Whether this config is for quantization-aware training
    pub is_qat: bool,
}

/// Ordered chain of operators treated as one fusable quantization unit
///
/// e.g. `[Op::Conv2d, Op::Relu]` declares that a convolution followed by a
/// relu is quantized as a single unit.
pub type OperatorPattern = Vec<Op>;

/// One quantization policy and the operator patterns it applies to
///
/// Purely declarative: this layer never checks patterns against a graph's
/// actual operator vocabulary. That is the downstream consumer's concern.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorConfig {
    /// The policy to apply
    pub config: QuantizationConfig,
    /// Patterns that should receive the policy
    pub operators: Vec<OperatorPattern>,
}

impl OperatorConfig {
    /// Pair a config with the patterns it applies to
    pub fn new(config: QuantizationConfig, operators: Vec<OperatorPattern>) -> Self {
        Self { config, operators }
    }
}
