// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use super::graph::GraphModel;
use super::tree::TreeModel;

/// The mode a diagram instance runs in, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Graph,
    Tree,
}

/// The shared in-memory model behind a diagram: a node/edge graph or a
/// rooted process tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramModel {
    Graph(GraphModel),
    Tree(TreeModel),
}

impl DiagramModel {
    pub fn kind(&self) -> DiagramKind {
        match self {
            Self::Graph(_) => DiagramKind::Graph,
            Self::Tree(_) => DiagramKind::Tree,
        }
    }

    pub fn as_graph(&self) -> Option<&GraphModel> {
        match self {
            Self::Graph(model) => Some(model),
            Self::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&TreeModel> {
        match self {
            Self::Tree(model) => Some(model),
            Self::Graph(_) => None,
        }
    }

    pub fn as_tree_mut(&mut self) -> Option<&mut TreeModel> {
        match self {
            Self::Tree(model) => Some(model),
            Self::Graph(_) => None,
        }
    }

    /// Replaces the model in place. The replacement must keep the kind the
    /// diagram was constructed with; mode is not switchable at runtime.
    pub fn replace(&mut self, model: DiagramModel) -> Result<DiagramModel, DiagramKindMismatch> {
        let found = model.kind();
        let expected = self.kind();
        if found != expected {
            return Err(DiagramKindMismatch { expected, found });
        }
        Ok(std::mem::replace(self, model))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramKindMismatch {
    expected: DiagramKind,
    found: DiagramKind,
}

impl DiagramKindMismatch {
    pub fn expected(&self) -> DiagramKind {
        self.expected
    }

    pub fn found(&self) -> DiagramKind {
        self.found
    }
}

impl fmt::Display for DiagramKindMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "diagram model kind mismatch (expected {:?}, found {:?})",
            self.expected, self.found
        )
    }
}

impl std::error::Error for DiagramKindMismatch {}

#[cfg(test)]
mod tests {
    use super::{DiagramKind, DiagramKindMismatch, DiagramModel};
    use crate::model::{GraphModel, NodeId, TreeModel, TreeNode};

    #[test]
    fn replace_keeps_kind() {
        let mut model = DiagramModel::Graph(GraphModel::default());
        let replaced = model.replace(DiagramModel::Graph(GraphModel::default()));
        assert!(replaced.is_ok());
        assert_eq!(model.kind(), DiagramKind::Graph);
    }

    #[test]
    fn replace_rejects_kind_switch() {
        let root = TreeNode::new(NodeId::new("root").expect("id"), "Root");
        let tree = TreeModel::new(root).expect("tree");

        let mut model = DiagramModel::Graph(GraphModel::default());
        let result = model.replace(DiagramModel::Tree(tree));

        assert_eq!(
            result,
            Err(DiagramKindMismatch {
                expected: DiagramKind::Graph,
                found: DiagramKind::Tree,
            })
        );
        assert_eq!(model.kind(), DiagramKind::Graph);
    }
}
