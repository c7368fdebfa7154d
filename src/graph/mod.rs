//! Operator graph with a per-node annotation side table
//!
//! A minimal computational-graph representation for the annotation layer to
//! operate over: nodes with stable identity, input edges, and one mutable
//! metadata slot per node holding the optional
//! [`QuantizationAnnotation`](crate::quantizer::QuantizationAnnotation).
//!
//! The annotation layer only reads and writes that slot; it never creates or
//! deletes nodes or edges. Distinct `OpGraph` values share no state, so one
//! graph's annotations are never visible while processing another.

use crate::quantizer::QuantizationAnnotation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a node in the operator graph
pub type NodeId = usize;

/// Operator identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    /// Graph input placeholder
    Input,
    /// Constant tensor (weights, bias)
    Constant,
    /// 2D convolution
    Conv2d,
    /// Fully-connected layer
    Linear,
    /// Rectified linear unit
    Relu,
    /// Elementwise addition
    Add,
    /// Elementwise multiplication
    Mul,
    /// 2D max pooling
    MaxPool2d,
    /// Shape change without data change
    Reshape,
    /// Softmax over the last axis
    Softmax,
    /// Graph output marker
    Output,
}

/// A node in the operator graph
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpNode {
    /// Unique node identifier
    pub id: NodeId,
    /// Operator this node computes
    pub op: Op,
    /// Producers of this node's inputs, in operand order
    pub input_ids: Vec<NodeId>,
    /// Human-readable name for reporting
    pub name: String,
}

/// Operator graph owning its nodes and their quantization annotations
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OpGraph {
    nodes: Vec<OpNode>,
    /// Handle-indexed annotation side table. The graph owns all annotations;
    /// absence of a key means the node is unannotated.
    pub(crate) annotations: HashMap<NodeId, QuantizationAnnotation>,
}

impl OpGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node, returning its identity
    pub fn add_node(&mut self, op: Op, name: impl Into<String>, input_ids: Vec<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(OpNode {
            id,
            op,
            input_ids,
            name: name.into(),
        });
        id
    }

    /// Get a node by identity
    pub fn node(&self, id: NodeId) -> Option<&OpNode> {
        self.nodes.get(id)
    }

    /// Iterate over all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &OpNode> {
        self.nodes.iter()
    }

    /// Producers of a node's inputs, in operand order
    pub fn inputs(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.input_ids.as_slice()).unwrap_or(&[])
    }

    /// Nodes that consume the given node's output
    pub fn consumers(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.input_ids.contains(&id))
            .map(|n| n.id)
            .collect()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Read a node's annotation, if any
    pub fn annotation(&self, id: NodeId) -> Option<&QuantizationAnnotation> {
        self.annotations.get(&id)
    }

    /// Attach or replace a node's annotation wholesale
    ///
    /// Prefer the incremental mutators
    /// ([`annotate_input`](Self::annotate_input),
    /// [`annotate_output`](Self::annotate_output),
    /// [`annotation_mut`](Self::annotation_mut)) when updating an existing
    /// record.
    pub fn set_annotation(&mut self, id: NodeId, annotation: QuantizationAnnotation) {
        self.annotations.insert(id, annotation);
    }

    /// Iterate over all annotated nodes
    pub fn annotations(&self) -> impl Iterator<Item = (NodeId, &QuantizationAnnotation)> {
        self.annotations.iter().map(|(id, ann)| (*id, ann))
    }

    /// Drop every annotation, leaving nodes and edges untouched
    pub fn clear_annotations(&mut self) {
        self.annotations.clear();
    }
}
