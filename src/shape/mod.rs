// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shape registry.
//!
//! A node-type tag maps to a draw routine producing named, hit-testable
//! sub-shapes, plus an optional state routine that mutates sub-shapes in
//! place (no full redraw). Composite nodes are plain data: a group of
//! sub-shapes in draw order, each tagged with the owning node id.

use std::collections::BTreeMap;

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::geom::{Point, Rect};
use crate::model::{FieldValue, GraphNode, NodeId, TreeNode};

pub mod circle;
pub mod process;

pub use circle::CircleShape;
pub use process::FlowRectShape;

/// Horizontal text alignment within a text sub-shape's rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// What a sub-shape draws. Geometry lives in [`SubShape::rect`]; `Circle`
/// uses the rect as its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub enum SubShapeKind {
    Rect { corner_radius: f64 },
    Circle,
    Text { text: String, align: TextAlign },
}

/// Fill/stroke as hex color strings; hosts map them onto their palette.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShapeStyle {
    pub fill: Option<SmolStr>,
    pub stroke: Option<SmolStr>,
}

impl ShapeStyle {
    pub fn filled(fill: &str) -> Self {
        Self {
            fill: Some(SmolStr::new(fill)),
            stroke: None,
        }
    }

    pub fn stroked(stroke: &str) -> Self {
        Self {
            fill: None,
            stroke: Some(SmolStr::new(stroke)),
        }
    }
}

/// A named, independently hit-testable visual primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct SubShape {
    name: SmolStr,
    owner: NodeId,
    kind: SubShapeKind,
    rect: Rect,
    style: ShapeStyle,
}

impl SubShape {
    pub fn new(
        name: &str,
        owner: NodeId,
        kind: SubShapeKind,
        rect: Rect,
        style: ShapeStyle,
    ) -> Self {
        Self {
            name: SmolStr::new(name),
            owner,
            kind,
            rect,
            style,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &NodeId {
        &self.owner
    }

    pub fn kind(&self) -> &SubShapeKind {
        &self.kind
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        if let SubShapeKind::Text { text: current, .. } = &mut self.kind {
            *current = text.into();
        }
    }

    pub fn set_style(&mut self, style: ShapeStyle) {
        self.style = style;
    }

    /// Point containment. Circles test radially inside their bounding rect.
    pub fn hit(&self, p: Point) -> bool {
        match self.kind {
            SubShapeKind::Circle => {
                let center = self.rect.center();
                let rx = self.rect.width / 2.0;
                let ry = self.rect.height / 2.0;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let dx = (p.x - center.x) / rx;
                let dy = (p.y - center.y) / ry;
                dx * dx + dy * dy <= 1.0
            }
            _ => self.rect.contains(p),
        }
    }
}

/// The drawn sub-shapes of one node, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGroup {
    node_id: NodeId,
    shapes: SmallVec<[SubShape; 8]>,
}

impl ShapeGroup {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            shapes: SmallVec::new(),
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn shapes(&self) -> &[SubShape] {
        &self.shapes
    }

    pub fn push(&mut self, shape: SubShape) {
        self.shapes.push(shape);
    }

    pub fn find(&self, name: &str) -> Option<&SubShape> {
        self.shapes.iter().find(|shape| shape.name() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut SubShape> {
        self.shapes.iter_mut().find(|shape| shape.name() == name)
    }

    /// Bounding box over all sub-shapes. Empty groups yield a zero rect.
    pub fn bounds(&self) -> Rect {
        let mut iter = self.shapes.iter();
        let Some(first) = iter.next() else {
            return Rect::default();
        };
        iter.fold(first.rect(), |acc, shape| acc.union(&shape.rect()))
    }

    /// Resolves `p` to the topmost (last-drawn) sub-shape containing it.
    pub fn hit_test(&self, p: Point) -> Option<&SubShape> {
        self.shapes.iter().rev().find(|shape| shape.hit(p))
    }
}

/// A read-only view of a node handed to draw routines, shared between graph
/// and tree modes.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    pub id: &'a NodeId,
    pub label: &'a str,
    pub cluster: Option<&'a str>,
    pub fields: &'a BTreeMap<String, FieldValue>,
    pub has_children: bool,
    pub collapsed: bool,
}

impl<'a> NodeView<'a> {
    pub fn from_graph(id: &'a NodeId, node: &'a GraphNode) -> Self {
        Self {
            id,
            label: node.label(),
            cluster: node.cluster(),
            fields: node.fields(),
            has_children: false,
            collapsed: false,
        }
    }

    pub fn from_tree(node: &'a TreeNode) -> Self {
        Self {
            id: node.id(),
            label: node.label(),
            cluster: None,
            fields: node.fields(),
            has_children: node.has_children(),
            collapsed: node.collapsed(),
        }
    }

    pub fn int_field(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(|value| value.as_int())
    }
}

/// Draw + state-transition pair for one node type.
pub trait NodeShape {
    /// Draws the node centered at `origin`, producing its sub-shapes in
    /// draw order.
    fn draw(&self, node: &NodeView<'_>, origin: Point) -> ShapeGroup;

    /// Mutates named sub-shapes for a state change without redrawing.
    /// The default ignores unknown states.
    fn apply_state(&self, _state: &str, _value: bool, _group: &mut ShapeGroup) {}
}

/// Tagged registry: node-type tag → draw/apply-state pair.
pub struct ShapeRegistry {
    shapes: BTreeMap<SmolStr, Box<dyn NodeShape>>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self {
            shapes: BTreeMap::new(),
        }
    }

    /// Registry pre-loaded with the built-in node types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(CircleShape::TYPE, Box::new(CircleShape::default()));
        registry.register(FlowRectShape::TYPE, Box::new(FlowRectShape));
        registry
    }

    /// Registers `shape` under `tag`, replacing any previous registration.
    pub fn register(&mut self, tag: &str, shape: Box<dyn NodeShape>) {
        self.shapes.insert(SmolStr::new(tag), shape);
    }

    pub fn get(&self, tag: &str) -> Option<&dyn NodeShape> {
        self.shapes.get(tag).map(AsRef::as_ref)
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("tags", &self.shapes.keys().collect::<Vec<_>>())
            .finish()
    }
}
