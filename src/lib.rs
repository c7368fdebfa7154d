//! # Cuantizar: Quantization Annotation Layer
//!
//! Cuantizar lets a backend declare, for an operator graph, how each node's
//! inputs and outputs should be represented at reduced numeric precision
//! before the graph is lowered or executed. It records *what* to quantize and
//! *how*; computing scale/zero-point values and rewriting the graph with real
//! observers belong to downstream passes.
//!
//! ## Architecture
//!
//! - **graph**: Minimal operator graph with a per-node annotation side table
//! - **quantizer**: Specs, configs, annotations, and the backend contract
//! - **error**: Crate-wide error types
//!
//! ## Usage
//!
//! ```
//! use cuantizar::{Op, OpGraph, Quantizer, StaticInt8Quantizer};
//!
//! let mut graph = OpGraph::new();
//! let x = graph.add_node(Op::Input, "x", vec![]);
//! let w = graph.add_node(Op::Constant, "w", vec![]);
//! let fc = graph.add_node(Op::Linear, "fc", vec![x, w]);
//! graph.add_node(Op::Output, "out", vec![fc]);
//!
//! let quantizer = StaticInt8Quantizer::new()?;
//! quantizer.annotate(&mut graph)?;
//! quantizer.validate(&graph)?;
//!
//! let annotation = graph.annotation(fc).expect("fc is annotated");
//! assert!(annotation.annotated);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod graph;
pub mod quantizer;

// Re-export commonly used types
pub use error::{Error, Result};
pub use graph::{NodeId, Op, OpGraph, OpNode};
pub use quantizer::{
    DType, ObserverKwargs, OperatorConfig, OperatorPattern, QDType, QScheme,
    QuantizationAnnotation, QuantizationConfig, QuantizationSpec, Quantizer, StaticInt8Quantizer,
    ValidationReport, Violation, ViolationKind,
};
