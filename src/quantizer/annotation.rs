//! Per-node quantization annotation and its mutators
//!
//! A [`QuantizationAnnotation`] records, for one graph node, how its inputs
//! and output should be observed (PTQ) or fake-quantized (QAT). Annotations
//! live in the graph-owned side table; the mutators here are
//! get-or-create-then-update operations on that table.

use super::spec::QuantizationSpec;
use crate::graph::{NodeId, OpGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How one node's inputs and output should be quantized
///
/// Mutable record, exactly one per annotated node. The
/// [`QuantizationSpec`] values it holds are immutable and freely shared
/// across annotations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantizationAnnotation {
    /// Per-predecessor input quantization policy (keys unique, unordered)
    pub input_qspec_map: HashMap<NodeId, QuantizationSpec>,
    /// How this node's output is quantized
    pub output_qspec: Option<QuantizationSpec>,
    /// Whether this node is in scope for quantization
    pub annotated: bool,
    /// Placeholder flag for the future sharing-group mechanism: input and
    /// output reuse one observer
    pub input_output_share_observers: bool,
    /// Placeholder flag for the future sharing-group mechanism: reuse the
    /// input's observer or fake-quantize
    pub reuse_input_obs_or_fq: bool,
}

impl OpGraph {
    /// Get-or-create mutable access to a node's annotation
    ///
    /// A fresh default record is materialized per node on first access;
    /// no default instance is ever shared between nodes.
    pub fn annotation_mut(&mut self, node: NodeId) -> &mut QuantizationAnnotation {
        self.annotations.entry(node).or_default()
    }

    /// Record how `node`'s input coming from `input` should be quantized
    ///
    /// Creates the node's annotation if absent, then sets
    /// `input_qspec_map[input] = spec`, overwriting any prior entry for that
    /// predecessor. All other fields of an existing annotation are untouched.
    pub fn annotate_input(&mut self, node: NodeId, input: NodeId, spec: QuantizationSpec) {
        let annotation = self.annotation_mut(node);
        annotation.input_qspec_map.insert(input, spec);
    }

    /// Record how `node`'s output should be quantized
    ///
    /// Creates the node's annotation if absent, then replaces `output_qspec`.
    /// All other fields of an existing annotation are untouched.
    pub fn annotate_output(&mut self, node: NodeId, spec: QuantizationSpec) {
        let annotation = self.annotation_mut(node);
        annotation.output_qspec = Some(spec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Op;
    use proptest::prelude::*;

    fn two_input_graph() -> (OpGraph, NodeId, NodeId, NodeId) {
        let mut graph = OpGraph::new();
        let a = graph.add_node(Op::Input, "a", vec![]);
        let b = graph.add_node(Op::Input, "b", vec![]);
        let add = graph.add_node(Op::Add, "add", vec![a, b]);
        (graph, a, b, add)
    }

    // ========================================================================
    // PROPERTY TESTS - Mutator merge semantics
    // ========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// After any interleaving of input writes, the map holds the last
        /// spec written per predecessor
        #[test]
        fn prop_last_write_wins_per_predecessor(
            writes in prop::collection::vec((0usize..4, prop::bool::ANY), 1..20),
        ) {
            let mut graph = OpGraph::new();
            let preds: Vec<NodeId> = (0..4)
                .map(|i| graph.add_node(Op::Input, format!("in{i}"), vec![]))
                .collect();
            let node = graph.add_node(Op::Add, "target", preds.clone());

            let int8 = QuantizationSpec::int8_symmetric().unwrap();
            let uint8 = QuantizationSpec::uint8_affine().unwrap();

            let mut expected: std::collections::HashMap<NodeId, QuantizationSpec> =
                std::collections::HashMap::new();
            for (idx, symmetric) in &writes {
                let spec = if *symmetric { int8.clone() } else { uint8.clone() };
                graph.annotate_input(node, preds[*idx], spec.clone());
                expected.insert(preds[*idx], spec);
            }

            let annotation = graph.annotation(node).unwrap();
            prop_assert_eq!(&annotation.input_qspec_map, &expected);
        }
    }

    // ========================================================================
    // UNIT TESTS
    // ========================================================================

    #[test]
    fn test_annotate_input_merges_distinct_predecessors() {
        let (mut graph, a, b, add) = two_input_graph();
        let spec = QuantizationSpec::uint8_affine().unwrap();

        graph.annotate_input(add, a, spec.clone());
        graph.annotate_input(add, b, spec.clone());

        let annotation = graph.annotation(add).unwrap();
        assert_eq!(annotation.input_qspec_map.len(), 2);
        assert_eq!(annotation.input_qspec_map[&a], spec);
        assert_eq!(annotation.input_qspec_map[&b], spec);
    }

    #[test]
    fn test_annotate_output_preserves_input_entries() {
        let (mut graph, a, b, add) = two_input_graph();
        let spec = QuantizationSpec::uint8_affine().unwrap();

        graph.annotate_input(add, a, spec.clone());
        graph.annotate_input(add, b, spec.clone());
        graph.annotate_output(add, spec.clone());

        let annotation = graph.annotation(add).unwrap();
        assert_eq!(annotation.input_qspec_map.len(), 2);
        assert_eq!(annotation.output_qspec, Some(spec));
    }

    #[test]
    fn test_annotate_input_preserves_output_qspec() {
        let (mut graph, a, _, add) = two_input_graph();
        let out_spec = QuantizationSpec::uint8_affine().unwrap();
        let in_spec = QuantizationSpec::int8_symmetric().unwrap();

        graph.annotate_output(add, out_spec.clone());
        graph.annotate_input(add, a, in_spec);

        let annotation = graph.annotation(add).unwrap();
        assert_eq!(annotation.output_qspec, Some(out_spec));
        assert_eq!(annotation.input_qspec_map.len(), 1);
    }

    #[test]
    fn test_annotate_input_overwrites_same_predecessor() {
        let (mut graph, a, _, add) = two_input_graph();
        let first = QuantizationSpec::uint8_affine().unwrap();
        let second = QuantizationSpec::int8_symmetric().unwrap();

        graph.annotate_input(add, a, first);
        graph.annotate_input(add, a, second.clone());

        let annotation = graph.annotation(add).unwrap();
        assert_eq!(annotation.input_qspec_map.len(), 1);
        assert_eq!(annotation.input_qspec_map[&a], second);
    }

    #[test]
    fn test_mutators_preserve_flags() {
        let (mut graph, a, _, add) = two_input_graph();
        let spec = QuantizationSpec::uint8_affine().unwrap();

        graph.annotation_mut(add).annotated = true;
        graph.annotation_mut(add).input_output_share_observers = true;

        graph.annotate_input(add, a, spec.clone());
        graph.annotate_output(add, spec);

        let annotation = graph.annotation(add).unwrap();
        assert!(annotation.annotated);
        assert!(annotation.input_output_share_observers);
        assert!(!annotation.reuse_input_obs_or_fq);
    }

    #[test]
    fn test_fresh_default_per_node() {
        let (mut graph, a, b, _) = two_input_graph();

        // Touching one node's annotation must not leak into another's
        graph.annotation_mut(a).annotated = true;
        graph.annotation_mut(b).annotated = false;

        assert!(graph.annotation(a).unwrap().annotated);
        assert!(!graph.annotation(b).unwrap().annotated);
    }

    #[test]
    fn test_default_annotation_is_empty() {
        let annotation = QuantizationAnnotation::default();
        assert!(annotation.input_qspec_map.is_empty());
        assert!(annotation.output_qspec.is_none());
        assert!(!annotation.annotated);
        assert!(!annotation.input_output_share_observers);
        assert!(!annotation.reuse_input_obs_or_fq);
    }
}
