// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Left-to-right indented tree layout.
//!
//! Each visible node occupies one row; depth sets the horizontal offset.
//! Collapsed subtrees contribute no rows, so toggling a node only moves its
//! descendants and whatever sits below it in pre-order.

use std::collections::BTreeMap;

use crate::geom::{Bounds, Point, Rect};
use crate::model::{NodeId, TreeModel, TreeNode};
use crate::shape::process::NODE_WIDTH;

use super::{EdgeRoute, LayoutError, LayoutResult};

pub const DEFAULT_INDENT: f64 = 300.0;
pub const DEFAULT_ROW_HEIGHT: f64 = 60.0;

const MARGIN: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
pub struct IndentedLayout {
    indent: f64,
    row_height: f64,
}

impl IndentedLayout {
    pub fn new(indent: f64, row_height: f64) -> Self {
        Self { indent, row_height }
    }

    /// Lays out the visible part of `model`. The viewport does not constrain
    /// the result; content larger than `_bounds` simply extends past it.
    pub fn compute(&self, model: &TreeModel, _bounds: Bounds) -> Result<LayoutResult, LayoutError> {
        let mut state = PlaceState {
            indent: self.indent,
            row_height: self.row_height,
            next_row: 0,
            positions: BTreeMap::new(),
            subtree_bounds: BTreeMap::new(),
            routes: Vec::new(),
        };
        state.place(model.root(), 0);

        Ok(LayoutResult::new(
            state.positions,
            state.subtree_bounds,
            state.routes,
        ))
    }
}

impl Default for IndentedLayout {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT, DEFAULT_ROW_HEIGHT)
    }
}

struct PlaceState {
    indent: f64,
    row_height: f64,
    next_row: usize,
    positions: BTreeMap<NodeId, Point>,
    subtree_bounds: BTreeMap<NodeId, Rect>,
    routes: Vec<EdgeRoute>,
}

impl PlaceState {
    fn node_rect(&self, depth: usize, row: usize) -> Rect {
        Rect::new(
            MARGIN + depth as f64 * self.indent,
            MARGIN + row as f64 * self.row_height,
            NODE_WIDTH,
            self.row_height,
        )
    }

    /// Places `node` and its visible descendants, returning the subtree's
    /// covering rect.
    fn place(&mut self, node: &TreeNode, depth: usize) -> Rect {
        let row = self.next_row;
        self.next_row += 1;

        let own_rect = self.node_rect(depth, row);
        let center = own_rect.center();
        self.positions.insert(node.id().clone(), center);

        let mut covering = own_rect;
        if !node.collapsed() {
            for child in node.children() {
                let child_center = self
                    .node_rect(depth + 1, self.next_row)
                    .center();
                self.routes.push(EdgeRoute::new(vec![
                    Point::new(center.x + NODE_WIDTH / 2.0, center.y),
                    Point::new(center.x + NODE_WIDTH / 2.0, child_center.y),
                    Point::new(child_center.x - NODE_WIDTH / 2.0, child_center.y),
                ]));
                covering = covering.union(&self.place(child, depth + 1));
            }
        }

        self.subtree_bounds.insert(node.id().clone(), covering);
        covering
    }
}

#[cfg(test)]
mod tests {
    use super::IndentedLayout;
    use crate::geom::Bounds;
    use crate::model::fixtures::process_tree;
    use crate::model::NodeId;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn bounds() -> Bounds {
        Bounds::new(1200.0, 800.0)
    }

    #[test]
    fn every_visible_node_gets_non_negative_coordinates() {
        let tree = process_tree();
        let result = IndentedLayout::default()
            .compute(&tree, bounds())
            .expect("layout");

        assert_eq!(result.positions().len(), tree.visible_nodes().len());
        for p in result.positions().values() {
            assert!(p.x >= 0.0 && p.y >= 0.0);
        }
    }

    #[test]
    fn rows_are_disjoint_and_ordered_by_traversal() {
        let tree = process_tree();
        let result = IndentedLayout::default()
            .compute(&tree, bounds())
            .expect("layout");

        let rows = tree
            .visible_nodes()
            .iter()
            .map(|(node, _)| result.position(node.id()).expect("placed").y)
            .collect::<Vec<_>>();
        for pair in rows.windows(2) {
            assert!(pair[1] - pair[0] >= 60.0);
        }
    }

    #[test]
    fn depth_sets_the_horizontal_offset() {
        let tree = process_tree();
        let result = IndentedLayout::default()
            .compute(&tree, bounds())
            .expect("layout");

        let root_x = result.position(&nid("apache1")).expect("root").x;
        let child_x = result.position(&nid("postgres1")).expect("child").x;
        let grandchild_x = result.position(&nid("apache2")).expect("grandchild").x;
        assert_eq!(child_x - root_x, 300.0);
        assert_eq!(grandchild_x - child_x, 300.0);
    }

    #[test]
    fn collapsed_subtrees_produce_no_rows() {
        let mut tree = process_tree();
        assert_eq!(
            IndentedLayout::default()
                .compute(&tree, bounds())
                .expect("layout")
                .positions()
                .len(),
            6
        );

        tree.toggle_collapsed(&nid("postgres1"));
        let result = IndentedLayout::default()
            .compute(&tree, bounds())
            .expect("layout");
        assert_eq!(result.positions().len(), 4);
        assert!(result.position(&nid("apache2")).is_none());
        assert!(result.position(&nid("tomcat1")).is_none());
    }

    #[test]
    fn toggling_moves_only_the_subtree_and_rows_below_it() {
        let mut tree = process_tree();
        let before = IndentedLayout::default()
            .compute(&tree, bounds())
            .expect("layout");

        tree.toggle_collapsed(&nid("postgres1"));
        let after = IndentedLayout::default()
            .compute(&tree, bounds())
            .expect("layout");

        // Nodes at or above the toggled row keep their positions.
        for id in ["apache1", "postgres1"] {
            assert_eq!(before.position(&nid(id)), after.position(&nid(id)));
        }
        // Rows below move up by the two hidden rows.
        let moved = before.position(&nid("mariadb1")).expect("before").y
            - after.position(&nid("mariadb1")).expect("after").y;
        assert_eq!(moved, 120.0);
    }

    #[test]
    fn collapse_then_expand_restores_the_layout() {
        let mut tree = process_tree();
        let before = IndentedLayout::default()
            .compute(&tree, bounds())
            .expect("layout");

        tree.toggle_collapsed(&nid("postgres1"));
        tree.toggle_collapsed(&nid("postgres1"));
        let after = IndentedLayout::default()
            .compute(&tree, bounds())
            .expect("layout");
        assert_eq!(before, after);
    }

    #[test]
    fn subtree_bounds_cover_visible_descendants() {
        let tree = process_tree();
        let result = IndentedLayout::default()
            .compute(&tree, bounds())
            .expect("layout");

        let root = result.subtree_bounds(&nid("apache1")).expect("root");
        for (node, _) in tree.visible_nodes() {
            let p = result.position(node.id()).expect("placed");
            assert!(root.contains(p));
        }

        let leaf = result.subtree_bounds(&nid("iis1")).expect("leaf");
        assert_eq!(leaf.height, 60.0);
    }

    #[test]
    fn routes_run_parent_trailing_to_child_leading() {
        let tree = process_tree();
        let result = IndentedLayout::default()
            .compute(&tree, bounds())
            .expect("layout");

        // One route per visible parent/child pair.
        assert_eq!(result.routes().len(), 5);
        let first = &result.routes()[0];
        let root = result.position(&nid("apache1")).expect("root");
        let child = result.position(&nid("postgres1")).expect("child");
        assert_eq!(first.points().first().map(|p| p.y), Some(root.y));
        assert_eq!(first.points().last().map(|p| p.y), Some(child.y));
        assert!(first.points().first().map(|p| p.x) < first.points().last().map(|p| p.x));
    }
}
