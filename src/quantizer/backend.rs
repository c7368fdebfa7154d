//! Backend quantizer contract
//!
//! A backend implements [`Quantizer`] to declare which operator patterns it
//! quantizes, annotate a graph accordingly, and validate the recorded
//! annotations before a downstream pass inserts real observers.

use super::config::OperatorConfig;
use crate::graph::{NodeId, OpGraph};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Contract every quantization backend satisfies
///
/// One implementation per backend; each backend owns its own pattern tables
/// and shares no mutable state with others.
pub trait Quantizer {
    /// Walk the graph and record a quantization annotation on every node
    /// matching one of the backend's declared operator patterns.
    ///
    /// Traversal order is backend-defined. Repeated calls carry no
    /// idempotence guarantee beyond the per-entry overwrite semantics of the
    /// mutators, and the operation is not atomic: a failure partway through
    /// may leave some nodes annotated and others not.
    fn annotate(&self, graph: &mut OpGraph) -> Result<()>;

    /// Check that every annotated node's recorded metadata is structurally
    /// consistent with the backend's policy.
    ///
    /// Nodes with no annotation or with `annotated == false` are out of scope
    /// and silently skipped. Every violation found in the single pass is
    /// collected into the report; the graph is never mutated.
    fn validate(&self, graph: &OpGraph) -> std::result::Result<(), ValidationReport>;

    /// The operator configs this backend supports
    ///
    /// Pure declaration: no graph access, structurally equal across calls.
    fn supported_operators(&self) -> Vec<OperatorConfig>;
}

/// One structural inconsistency found by [`Quantizer::validate`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A required input operand has no entry in `input_qspec_map`
    MissingInputSpec {
        /// The predecessor whose spec is missing
        input: NodeId,
    },
    /// The node's pattern requires an output spec but none is recorded
    MissingOutputSpec,
    /// `input_output_share_observers` is set but the node lacks an input
    /// entry or an output spec to share between
    ShareObserversWithoutEndpoints,
    /// `reuse_input_obs_or_fq` is set but the node has no input entries
    ReuseInputWithoutInputs,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MissingInputSpec { input } => {
                write!(f, "missing input spec for predecessor {input}")
            }
            ViolationKind::MissingOutputSpec => write!(f, "missing output spec"),
            ViolationKind::ShareObserversWithoutEndpoints => {
                write!(f, "input/output observer sharing set without both endpoints")
            }
            ViolationKind::ReuseInputWithoutInputs => {
                write!(f, "input observer reuse set without any input specs")
            }
        }
    }
}

/// A violation tagged with the offending node
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Identity of the offending node
    pub node: NodeId,
    /// Human-readable name of the offending node
    pub node_name: String,
    /// What is missing or inconsistent
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {} ({}): {}", self.node, self.node_name, self.kind)
    }
}

/// Aggregate of every violation found in one validation pass
///
/// Validation never stops at the first failure: the report carries all of
/// them, each tagged with node identity and field context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation
    pub fn push(&mut self, node: NodeId, node_name: impl Into<String>, kind: ViolationKind) {
        self.violations.push(Violation {
            node,
            node_name: node_name.into(),
            kind,
        });
    }

    /// All recorded violations, in discovery order
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether the pass found nothing wrong
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// `Ok(())` when empty, otherwise the report itself as the error
    pub fn into_result(self) -> std::result::Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "; {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}
