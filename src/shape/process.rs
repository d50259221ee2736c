// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The composite `flow-rect` process node.
//!
//! Draw order and offsets are load-bearing: the header bar sits on the
//! wrapper's top edge and each text row hangs off the previous row's
//! baseline, so the hit regions stay contiguous. The collapse toggle is only
//! drawn for nodes with children and overlaps the wrapper's trailing-mid
//! edge, where it must win the hit test.

use crate::geom::{Point, Rect};

use super::{NodeShape, NodeView, ShapeGroup, ShapeStyle, SubShape, SubShapeKind, TextAlign};

pub const NODE_WIDTH: f64 = 120.0;
pub const NODE_HEIGHT: f64 = 60.0;
pub const HEADER_HEIGHT: f64 = 16.0;
pub const TEXT_INSET: f64 = 8.0;
pub const TEXT_HEIGHT: f64 = 8.0;
pub const ROW_STEP: f64 = 16.0;
pub const TOGGLE_SIZE: f64 = 8.0;

const STROKE_GREY: &str = "#CED4D9";
const HEADER_FILL: &str = "#F8AB4C";
const BODY_FILL: &str = "#FFF";
const TOGGLE_STROKE: &str = "rgba(0,0,0,0.25)";

pub const COLLAPSED_GLYPH: &str = "+";
pub const EXPANDED_GLYPH: &str = "-";

/// Multi-part process node: rounded wrapper, filled header bar, three
/// stacked metric rows, and (for parents) an 8×8 collapse toggle.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowRectShape;

impl FlowRectShape {
    pub const TYPE: &'static str = "flow-rect";
}

fn text_row(
    name: &str,
    node: &NodeView<'_>,
    x: f64,
    baseline: f64,
    text: String,
) -> SubShape {
    SubShape::new(
        name,
        node.id.clone(),
        SubShapeKind::Text {
            text,
            align: TextAlign::Left,
        },
        Rect::new(
            x,
            baseline - TEXT_HEIGHT,
            NODE_WIDTH - 2.0 * TEXT_INSET,
            TEXT_HEIGHT,
        ),
        ShapeStyle::filled("#000"),
    )
}

impl NodeShape for FlowRectShape {
    fn draw(&self, node: &NodeView<'_>, origin: Point) -> ShapeGroup {
        let min_x = origin.x - NODE_WIDTH / 2.0;
        let min_y = origin.y - NODE_HEIGHT / 2.0;

        let mut group = ShapeGroup::new(node.id.clone());

        group.push(SubShape::new(
            "wrapper",
            node.id.clone(),
            SubShapeKind::Rect { corner_radius: 2.0 },
            Rect::new(min_x, min_y, NODE_WIDTH, NODE_HEIGHT),
            ShapeStyle {
                fill: Some(BODY_FILL.into()),
                stroke: Some(STROKE_GREY.into()),
            },
        ));

        let header = Rect::new(min_x, min_y, NODE_WIDTH, HEADER_HEIGHT);
        group.push(SubShape::new(
            "pid-container-shape",
            node.id.clone(),
            SubShapeKind::Rect { corner_radius: 2.0 },
            header,
            ShapeStyle::filled(HEADER_FILL),
        ));

        let pid = node.int_field("pid").unwrap_or_default();
        let port = node.int_field("port").unwrap_or_default();
        let connections = node.int_field("connections").unwrap_or_default();

        // Row baselines, each hanging ROW_STEP below the previous one.
        let pid_baseline = header.max_y() - 4.0;
        let port_baseline = header.max_y() + ROW_STEP;
        let connection_baseline = port_baseline + ROW_STEP;

        let text_x = min_x + TEXT_INSET;
        group.push(text_row(
            "pid-shape",
            node,
            text_x,
            pid_baseline,
            format!("PID: {pid} ({})", node.label),
        ));
        group.push(text_row(
            "port-shape",
            node,
            text_x,
            port_baseline,
            format!("Port: {port}"),
        ));
        group.push(text_row(
            "connection-shape",
            node,
            text_x,
            connection_baseline,
            format!("Connections: {connections}"),
        ));

        if node.has_children {
            let toggle = Rect::new(
                origin.x + NODE_WIDTH / 2.0 - TOGGLE_SIZE / 2.0,
                origin.y - TOGGLE_SIZE / 2.0,
                TOGGLE_SIZE,
                TOGGLE_SIZE,
            );
            group.push(SubShape::new(
                "collapse-back",
                node.id.clone(),
                SubShapeKind::Rect { corner_radius: 0.0 },
                toggle,
                ShapeStyle {
                    fill: Some(BODY_FILL.into()),
                    stroke: Some(TOGGLE_STROKE.into()),
                },
            ));
            group.push(SubShape::new(
                "collapse-text",
                node.id.clone(),
                SubShapeKind::Text {
                    text: if node.collapsed {
                        COLLAPSED_GLYPH.to_owned()
                    } else {
                        EXPANDED_GLYPH.to_owned()
                    },
                    align: TextAlign::Center,
                },
                toggle,
                ShapeStyle::filled(TOGGLE_STROKE),
            ));
        }

        group
    }

    fn apply_state(&self, state: &str, value: bool, group: &mut ShapeGroup) {
        if state != "collapse" {
            return;
        }
        if let Some(glyph) = group.find_mut("collapse-text") {
            glyph.set_text(if value { COLLAPSED_GLYPH } else { EXPANDED_GLYPH });
        }
    }
}
