// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layout engines.
//!
//! Two algorithms, chosen per diagram at construction: force-directed for
//! general graphs and indented left-to-right for process trees. Both are
//! pure functions of their inputs; the only carried state is an optional
//! previous result used to seed incremental force re-layout.

use std::collections::BTreeMap;
use std::fmt;

use crate::geom::{Bounds, Point, Rect};
use crate::model::NodeId;

pub mod force;
pub mod indented;

pub use force::ForceLayout;
pub use indented::IndentedLayout;

/// An edge's routed path as a polyline in canvas units.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRoute {
    points: Vec<Point>,
}

impl EdgeRoute {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            points: self.points.iter().map(|p| p.offset(dx, dy)).collect(),
        }
    }
}

/// Ephemeral result of one layout pass. Never persisted; recomputed on any
/// structural change or collapse toggle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutResult {
    positions: BTreeMap<NodeId, Point>,
    subtree_bounds: BTreeMap<NodeId, Rect>,
    routes: Vec<EdgeRoute>,
}

impl LayoutResult {
    pub fn new(
        positions: BTreeMap<NodeId, Point>,
        subtree_bounds: BTreeMap<NodeId, Rect>,
        routes: Vec<EdgeRoute>,
    ) -> Self {
        Self {
            positions,
            subtree_bounds,
            routes,
        }
    }

    pub fn positions(&self) -> &BTreeMap<NodeId, Point> {
        &self.positions
    }

    pub fn position(&self, node_id: &NodeId) -> Option<Point> {
        self.positions.get(node_id).copied()
    }

    pub fn subtree_bounds(&self, node_id: &NodeId) -> Option<Rect> {
        self.subtree_bounds.get(node_id).copied()
    }

    pub fn routes(&self) -> &[EdgeRoute] {
        &self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Bounding box of all node positions (centers, not node extents).
    pub fn content_bounds(&self) -> Option<Rect> {
        let mut iter = self.positions.values();
        let first = iter.next()?;
        let mut rect = Rect::new(first.x, first.y, 0.0, 0.0);
        for p in iter {
            rect = rect.union(&Rect::new(p.x, p.y, 0.0, 0.0));
        }
        Some(rect)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> LayoutResult {
        LayoutResult {
            positions: self
                .positions
                .iter()
                .map(|(id, p)| (id.clone(), p.offset(dx, dy)))
                .collect(),
            subtree_bounds: self
                .subtree_bounds
                .iter()
                .map(|(id, r)| (id.clone(), r.translated(dx, dy)))
                .collect(),
            routes: self.routes.iter().map(|r| r.translated(dx, dy)).collect(),
        }
    }

    /// Pure re-fit into a resized viewport: recenters the content without
    /// recomputing anything, never pushing it above or left of the margin.
    pub fn fit_into(&self, bounds: Bounds, margin: f64) -> LayoutResult {
        let Some(content) = self.content_bounds() else {
            return self.clone();
        };

        let dx = ((bounds.width - content.width) / 2.0 - content.min_x()).max(margin - content.min_x());
        let dy = ((bounds.height - content.height) / 2.0 - content.min_y()).max(margin - content.min_y());
        self.translated(dx, dy)
    }
}

/// Degenerate layout input. The controller degrades this to an empty render
/// rather than failing the mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    EmptyModel,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyModel => f.write_str("layout input contains no nodes"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// The engine variants a diagram can be constructed with. Not switchable at
/// runtime.
#[derive(Debug, Clone)]
pub enum LayoutEngine {
    Force(ForceLayout),
    Indented(IndentedLayout),
}
