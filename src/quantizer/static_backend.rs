//! Reference backend: static post-training int8 quantization
//!
//! Annotates convolution, linear, and elementwise-add patterns with a static
//! int8 policy: per-tensor affine uint8 activations and per-channel symmetric
//! int8 weights. Bias operands are left in full precision.
//!
//! Operand convention for weighted operators: input 0 is the activation,
//! input 1 the weight, input 2 (when present) the bias.

use super::backend::{Quantizer, ValidationReport, ViolationKind};
use super::config::{OperatorConfig, QuantizationConfig};
use super::spec::QuantizationSpec;
use crate::graph::{NodeId, Op, OpGraph};
use crate::Result;

/// Static int8 post-training quantization backend
#[derive(Clone, Debug)]
pub struct StaticInt8Quantizer {
    activation: QuantizationSpec,
    weight: QuantizationSpec,
    operator_configs: Vec<OperatorConfig>,
}

impl StaticInt8Quantizer {
    /// Build the backend with its fixed policy and pattern tables
    pub fn new() -> Result<Self> {
        let activation = QuantizationSpec::uint8_affine()?;
        let weight = QuantizationSpec::per_channel_symmetric(0)?;

        let config = QuantizationConfig {
            activation: Some(activation.clone()),
            weight: Some(weight.clone()),
            bias: None,
            is_qat: false,
        };
        let operator_configs = vec![OperatorConfig::new(
            config,
            vec![
                vec![Op::Conv2d, Op::Relu],
                vec![Op::Conv2d],
                vec![Op::Linear, Op::Relu],
                vec![Op::Linear],
                vec![Op::Add],
            ],
        )];

        Ok(Self {
            activation,
            weight,
            operator_configs,
        })
    }

    /// Whether `node`'s output feeds exactly one relu, making it the head of
    /// a fused `op + relu` pattern
    fn fused_relu_tail(graph: &OpGraph, node: NodeId) -> Option<NodeId> {
        let consumers = graph.consumers(node);
        match consumers.as_slice() {
            [tail] if graph.node(*tail).map(|n| n.op) == Some(Op::Relu) => Some(*tail),
            _ => None,
        }
    }

    fn annotate_weighted(&self, graph: &mut OpGraph, node: NodeId) {
        let inputs = graph.inputs(node).to_vec();
        if let Some(&act_input) = inputs.first() {
            graph.annotate_input(node, act_input, self.activation.clone());
        }
        if let Some(&weight_input) = inputs.get(1) {
            graph.annotate_input(node, weight_input, self.weight.clone());
        }
        graph.annotation_mut(node).annotated = true;

        match Self::fused_relu_tail(graph, node) {
            Some(relu) => {
                // The fused unit is quantized at the relu's output
                graph.annotate_output(relu, self.activation.clone());
                graph.annotation_mut(relu).annotated = true;
            }
            None => graph.annotate_output(node, self.activation.clone()),
        }
    }

    fn annotate_add(&self, graph: &mut OpGraph, node: NodeId) {
        let inputs = graph.inputs(node).to_vec();
        for input in inputs {
            graph.annotate_input(node, input, self.activation.clone());
        }
        graph.annotate_output(node, self.activation.clone());
        let annotation = graph.annotation_mut(node);
        annotation.annotated = true;
        annotation.input_output_share_observers = true;
    }

    /// Input operands whose specs this backend requires for `op`
    fn required_inputs(op: Op, inputs: &[NodeId]) -> Vec<NodeId> {
        match op {
            // activation and weight; bias stays in full precision
            Op::Conv2d | Op::Linear => inputs.iter().copied().take(2).collect(),
            Op::Add => inputs.to_vec(),
            _ => Vec::new(),
        }
    }
}

impl Quantizer for StaticInt8Quantizer {
    fn annotate(&self, graph: &mut OpGraph) -> Result<()> {
        let plan: Vec<(NodeId, Op)> = graph.nodes().map(|n| (n.id, n.op)).collect();

        for (id, op) in plan {
            match op {
                Op::Conv2d | Op::Linear => self.annotate_weighted(graph, id),
                Op::Add => self.annotate_add(graph, id),
                // relu tails are annotated with their head
                _ => {}
            }
        }
        Ok(())
    }

    fn validate(&self, graph: &OpGraph) -> std::result::Result<(), ValidationReport> {
        let mut report = ValidationReport::new();

        for node in graph.nodes() {
            let Some(annotation) = graph.annotation(node.id) else {
                continue;
            };
            if !annotation.annotated {
                continue;
            }

            for input in Self::required_inputs(node.op, &node.input_ids) {
                if !annotation.input_qspec_map.contains_key(&input) {
                    report.push(node.id, &node.name, ViolationKind::MissingInputSpec { input });
                }
            }

            // Annotated pattern tails and elementwise adds carry the unit's
            // output policy
            let requires_output = matches!(node.op, Op::Relu | Op::Add)
                || (matches!(node.op, Op::Conv2d | Op::Linear)
                    && Self::fused_relu_tail(graph, node.id).is_none());
            if requires_output && annotation.output_qspec.is_none() {
                report.push(node.id, &node.name, ViolationKind::MissingOutputSpec);
            }

            if annotation.input_output_share_observers
                && (annotation.input_qspec_map.is_empty() || annotation.output_qspec.is_none())
            {
                report.push(
                    node.id,
                    &node.name,
                    ViolationKind::ShareObserversWithoutEndpoints,
                );
            }

            if annotation.reuse_input_obs_or_fq && annotation.input_qspec_map.is_empty() {
                report.push(node.id, &node.name, ViolationKind::ReuseInputWithoutInputs);
            }
        }

        report.into_result()
    }

    fn supported_operators(&self) -> Vec<OperatorConfig> {
        self.operator_configs.clone()
    }
}
