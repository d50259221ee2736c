// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The default `circle` node used by the topology graph page.

use crate::geom::{Point, Rect};

use super::{NodeShape, NodeView, ShapeGroup, ShapeStyle, SubShape, SubShapeKind, TextAlign};

pub const NODE_DIAMETER: f64 = 128.0;
pub const LABEL_HEIGHT: f64 = 12.0;

const NODE_STROKE: &str = "#72CC4A";
const SELECTED_STROKE: &str = "#1890FF";
const LABEL_FILL: &str = "#000000A6";

/// Circle with its label centered inside.
#[derive(Debug, Clone, Copy)]
pub struct CircleShape {
    diameter: f64,
}

impl CircleShape {
    pub const TYPE: &'static str = "circle";

    pub fn new(diameter: f64) -> Self {
        Self { diameter }
    }
}

impl Default for CircleShape {
    fn default() -> Self {
        Self::new(NODE_DIAMETER)
    }
}

impl NodeShape for CircleShape {
    fn draw(&self, node: &NodeView<'_>, origin: Point) -> ShapeGroup {
        let radius = self.diameter / 2.0;
        let mut group = ShapeGroup::new(node.id.clone());

        group.push(SubShape::new(
            "key-shape",
            node.id.clone(),
            SubShapeKind::Circle,
            Rect::new(
                origin.x - radius,
                origin.y - radius,
                self.diameter,
                self.diameter,
            ),
            ShapeStyle::stroked(NODE_STROKE),
        ));

        group.push(SubShape::new(
            "label-shape",
            node.id.clone(),
            SubShapeKind::Text {
                text: node.label.to_owned(),
                align: TextAlign::Center,
            },
            Rect::new(
                origin.x - radius,
                origin.y - LABEL_HEIGHT / 2.0,
                self.diameter,
                LABEL_HEIGHT,
            ),
            ShapeStyle::filled(LABEL_FILL),
        ));

        group
    }

    fn apply_state(&self, state: &str, value: bool, group: &mut ShapeGroup) {
        if state != "selected" {
            return;
        }
        if let Some(key_shape) = group.find_mut("key-shape") {
            key_shape.set_style(ShapeStyle::stroked(if value {
                SELECTED_STROKE
            } else {
                NODE_STROKE
            }));
        }
    }
}
