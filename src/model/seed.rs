// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seed-data interface.
//!
//! These serde types are the boundary a host (or a real data source) uses to
//! hand data to the engine, at mount time or later through `update`. JSON via
//! `serde_json` is the reference interchange; conversion into the validated
//! models re-checks id uniqueness and edge endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::graph::{FieldValue, GraphEdge, GraphModel, GraphNode, ModelError};
use super::ids::NodeId;
use super::tree::{TreeModel, TreeNode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNodeSeed {
    pub id: NodeId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdgeSeed {
    pub source: NodeId,
    pub target: NodeId,
}

/// Graph-mode seed: a node list plus an edge list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSeed {
    #[serde(default)]
    pub nodes: Vec<GraphNodeSeed>,
    #[serde(default)]
    pub edges: Vec<GraphEdgeSeed>,
}

impl GraphSeed {
    pub fn into_model(self) -> Result<GraphModel, ModelError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|seed| (seed.id, GraphNode::new_with(seed.label, seed.cluster)))
            .collect::<Vec<_>>();
        let edges = self
            .edges
            .into_iter()
            .map(|seed| GraphEdge::new(seed.source, seed.target))
            .collect::<Vec<_>>();
        GraphModel::from_parts(nodes, edges)
    }
}

/// Tree-mode seed: a single nested root record.
///
/// Unknown scalar members (`pid`, `port`, `connections`, ...) are collected
/// into `fields` so arbitrary display attributes survive the trip. When no
/// explicit `label` is present, `processName` and then the id stand in,
/// matching the process-map source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSeed {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSeed>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl TreeSeed {
    pub fn into_model(self) -> Result<TreeModel, ModelError> {
        TreeModel::new(self.into_node())
    }

    fn into_node(self) -> TreeNode {
        let label = self
            .label
            .or_else(|| {
                self.fields
                    .get("processName")
                    .and_then(|value| value.as_text())
                    .map(ToOwned::to_owned)
            })
            .unwrap_or_else(|| self.id.as_str().to_owned());

        let mut node = TreeNode::new(self.id, label);
        node.set_collapsed(self.collapsed);
        *node.fields_mut() = self.fields;
        for child in self.children {
            node.push_child(child.into_node());
        }
        node
    }
}
