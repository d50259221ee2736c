// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use super::graph::{FieldValue, ModelError};
use super::ids::NodeId;

/// A tree-mode node. Children are nested; the parent relationship is implied
/// by nesting and never stored redundantly.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    id: NodeId,
    label: String,
    fields: BTreeMap<String, FieldValue>,
    collapsed: bool,
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            fields: BTreeMap::new(),
            collapsed: false,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
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

    /// `collapsed` is only meaningful on nodes with children; it is retained
    /// but inert on leaves.
    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<TreeNode> {
        &mut self.children
    }

    pub fn push_child(&mut self, child: TreeNode) {
        self.children.push(child);
    }
}

/// A single rooted strict tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeModel {
    root: TreeNode,
}

impl TreeModel {
    /// Validates id uniqueness across the whole tree.
    pub fn new(root: TreeNode) -> Result<Self, ModelError> {
        let mut seen = BTreeSet::<NodeId>::new();
        let mut stack = vec![&root];
        while let Some(node) = stack.pop() {
            if !seen.insert(node.id().clone()) {
                return Err(ModelError::DuplicateId {
                    node_id: node.id().clone(),
                });
            }
            stack.extend(node.children().iter());
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn find(&self, node_id: &NodeId) -> Option<&TreeNode> {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.id() == node_id {
                return Some(node);
            }
            stack.extend(node.children().iter());
        }
        None
    }

    pub fn find_mut(&mut self, node_id: &NodeId) -> Option<&mut TreeNode> {
        let mut stack = vec![&mut self.root];
        while let Some(node) = stack.pop() {
            if node.id() == node_id {
                return Some(node);
            }
            stack.extend(node.children_mut().iter_mut());
        }
        None
    }

    /// Flips `collapsed` on `node_id` and returns the new value, or `None`
    /// when the node does not exist or has no children to hide.
    pub fn toggle_collapsed(&mut self, node_id: &NodeId) -> Option<bool> {
        let node = self.find_mut(node_id)?;
        if !node.has_children() {
            return None;
        }
        let collapsed = !node.collapsed();
        node.set_collapsed(collapsed);
        Some(collapsed)
    }

    /// Visible nodes with their depths, in layout row order (pre-order).
    /// A collapsed node is visible; its descendants are not.
    pub fn visible_nodes(&self) -> Vec<(&TreeNode, usize)> {
        let mut rows = Vec::new();
        visit_visible(&self.root, 0, &mut rows);
        rows
    }

    /// Ids of every descendant of `node_id` (excluding the node itself),
    /// regardless of collapse state.
    pub fn descendant_ids(&self, node_id: &NodeId) -> Vec<NodeId> {
        let Some(node) = self.find(node_id) else {
            return Vec::new();
        };

        let mut ids = Vec::new();
        let mut stack: Vec<&TreeNode> = node.children().iter().collect();
        while let Some(child) = stack.pop() {
            ids.push(child.id().clone());
            stack.extend(child.children().iter());
        }
        ids
    }

    /// Structural signature for tree mode: the visible shape of the tree.
    /// Collapse flags are part of it because toggles must trigger re-layout.
    pub fn structure_signature(&self) -> TreeSignature {
        let mut entries = Vec::new();
        collect_signature(&self.root, None, &mut entries);
        entries.sort();
        TreeSignature { entries }
    }
}

fn visit_visible<'a>(node: &'a TreeNode, depth: usize, rows: &mut Vec<(&'a TreeNode, usize)>) {
    rows.push((node, depth));
    if node.collapsed() {
        return;
    }
    for child in node.children() {
        visit_visible(child, depth + 1, rows);
    }
}

fn collect_signature(
    node: &TreeNode,
    parent: Option<&NodeId>,
    entries: &mut Vec<(NodeId, Option<NodeId>, bool)>,
) {
    entries.push((node.id().clone(), parent.cloned(), node.collapsed()));
    for child in node.children() {
        collect_signature(child, Some(node.id()), entries);
    }
}

/// See [`TreeModel::structure_signature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSignature {
    entries: Vec<(NodeId, Option<NodeId>, bool)>,
}
