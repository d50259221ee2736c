// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::NodeId;

/// A primitive display value attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// A graph-mode node: identity plus display attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphNode {
    label: String,
    cluster: Option<String>,
    fields: BTreeMap<String, FieldValue>,
}

impl GraphNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            cluster: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn new_with(label: impl Into<String>, cluster: Option<String>) -> Self {
        Self {
            label: label.into(),
            cluster,
            fields: BTreeMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    pub fn set_cluster<T: Into<String>>(&mut self, cluster: Option<T>) {
        self.cluster = cluster.map(Into::into);
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut BTreeMap<String, FieldValue> {
        &mut self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

/// A graph-mode edge. Direction is stored but layout treats links as
/// symmetric. Self-loops and duplicates are kept as supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    source: NodeId,
    target: NodeId,
}

impl GraphEdge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEndpoint {
    Source,
    Target,
}

/// Errors surfaced synchronously from model construction and updates.
///
/// A failed construction never mutates an existing model; callers keep the
/// previous model and must supply corrected data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownEdgeEndpoint {
        edge_index: usize,
        endpoint: EdgeEndpoint,
        node_id: NodeId,
    },
    DuplicateId {
        node_id: NodeId,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEdgeEndpoint {
                edge_index,
                endpoint,
                node_id,
            } => {
                let endpoint = match endpoint {
                    EdgeEndpoint::Source => "source",
                    EdgeEndpoint::Target => "target",
                };
                write!(f, "edge #{edge_index} references unknown {endpoint} node {node_id}")
            }
            Self::DuplicateId { node_id } => {
                write!(f, "duplicate node id {node_id}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

/// The mutable node/edge collection behind a graph-mode diagram.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphModel {
    nodes: BTreeMap<NodeId, GraphNode>,
    edges: Vec<GraphEdge>,
}

impl GraphModel {
    /// Builds a model from an ordered node list and an edge list, validating
    /// id uniqueness and edge endpoints.
    pub fn from_parts(
        nodes: Vec<(NodeId, GraphNode)>,
        edges: Vec<GraphEdge>,
    ) -> Result<Self, ModelError> {
        let mut node_map = BTreeMap::<NodeId, GraphNode>::new();
        for (node_id, node) in nodes {
            if node_map.insert(node_id.clone(), node).is_some() {
                return Err(ModelError::DuplicateId { node_id });
            }
        }

        let model = Self {
            nodes: node_map,
            edges,
        };
        model.validate_edges()?;
        Ok(model)
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, GraphNode> {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut BTreeMap<NodeId, GraphNode> {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut Vec<GraphEdge> {
        &mut self.edges
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&GraphNode> {
        self.nodes.get(node_id)
    }

    fn validate_edges(&self) -> Result<(), ModelError> {
        for (edge_index, edge) in self.edges.iter().enumerate() {
            if !self.nodes.contains_key(edge.source()) {
                return Err(ModelError::UnknownEdgeEndpoint {
                    edge_index,
                    endpoint: EdgeEndpoint::Source,
                    node_id: edge.source().clone(),
                });
            }
            if !self.nodes.contains_key(edge.target()) {
                return Err(ModelError::UnknownEdgeEndpoint {
                    edge_index,
                    endpoint: EdgeEndpoint::Target,
                    node_id: edge.target().clone(),
                });
            }
        }
        Ok(())
    }

    /// Value-level structural signature: the node-id set plus the edge
    /// endpoint list. Attribute-only changes leave the signature unchanged,
    /// which is what lets `update` skip re-layout for them.
    pub fn structure_signature(&self) -> GraphSignature {
        let mut edges = self
            .edges
            .iter()
            .map(|edge| (edge.source().clone(), edge.target().clone()))
            .collect::<Vec<_>>();
        edges.sort();

        GraphSignature {
            node_ids: self.nodes.keys().cloned().collect(),
            edges,
        }
    }
}

/// See [`GraphModel::structure_signature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSignature {
    node_ids: Vec<NodeId>,
    edges: Vec<(NodeId, NodeId)>,
}
