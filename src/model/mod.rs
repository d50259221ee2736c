// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core data model.
//!
//! A diagram instance owns either a node/edge graph or a rooted process tree;
//! both share validated ids, display fields, and value-level structural
//! signatures that drive the relayout-vs-rerender decision.

pub mod diagram;
pub mod fixtures;
pub mod graph;
pub mod ids;
pub mod seed;
pub mod tree;

pub use diagram::{DiagramKind, DiagramKindMismatch, DiagramModel};
pub use graph::{
    EdgeEndpoint, FieldValue, GraphEdge, GraphModel, GraphNode, GraphSignature, ModelError,
};
pub use ids::{Id, IdError, NodeId};
pub use seed::{GraphEdgeSeed, GraphNodeSeed, GraphSeed, TreeSeed};
pub use tree::{TreeModel, TreeNode, TreeSignature};
