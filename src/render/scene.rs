// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The retained picture of the last rendered frame.
//!
//! A scene is rebuilt from model + layout whenever either changes; between
//! rebuilds it answers hit tests and supports in-place sub-shape mutation
//! with region-limited repaints.

use crate::geom::{Point, Rect};
use crate::layout::{EdgeRoute, LayoutResult};
use crate::model::{DiagramModel, NodeId};
use crate::shape::{NodeShape, NodeView, ShapeGroup, SubShapeKind};

use super::Surface;

#[derive(Debug, Clone, Default)]
pub struct Scene {
    groups: Vec<ShapeGroup>,
    routes: Vec<EdgeRoute>,
}

impl Scene {
    /// Draws every laid-out visible node with `shape`, keeping the layout's
    /// traversal order as the draw order.
    pub fn build(model: &DiagramModel, layout: &LayoutResult, shape: &dyn NodeShape) -> Scene {
        let mut groups = Vec::new();
        match model {
            DiagramModel::Graph(graph) => {
                for (id, node) in graph.nodes() {
                    if let Some(origin) = layout.position(id) {
                        groups.push(shape.draw(&NodeView::from_graph(id, node), origin));
                    }
                }
            }
            DiagramModel::Tree(tree) => {
                for (node, _) in tree.visible_nodes() {
                    if let Some(origin) = layout.position(node.id()) {
                        groups.push(shape.draw(&NodeView::from_tree(node), origin));
                    }
                }
            }
        }

        Scene {
            groups,
            routes: layout.routes().to_vec(),
        }
    }

    pub fn groups(&self) -> &[ShapeGroup] {
        &self.groups
    }

    pub fn group(&self, node_id: &NodeId) -> Option<&ShapeGroup> {
        self.groups.iter().find(|group| group.node_id() == node_id)
    }

    pub fn group_mut(&mut self, node_id: &NodeId) -> Option<&mut ShapeGroup> {
        self.groups
            .iter_mut()
            .find(|group| group.node_id() == node_id)
    }

    pub fn node_bounds(&self, node_id: &NodeId) -> Option<Rect> {
        self.group(node_id).map(ShapeGroup::bounds)
    }

    /// Resolves `p` to the topmost sub-shape under it: later-drawn nodes win,
    /// and within a node the last-drawn sub-shape wins.
    pub fn pick(&self, p: Point) -> Option<(&NodeId, &str)> {
        self.groups.iter().rev().find_map(|group| {
            group
                .hit_test(p)
                .map(|shape| (group.node_id(), shape.name()))
        })
    }

    /// Full repaint: edges under nodes.
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.clear();
        self.paint(surface, None);
    }

    /// Clears `region` and repaints whatever touches it. Shapes are painted
    /// whole, so content just outside the region repaints identically.
    pub fn draw_region(&self, surface: &mut dyn Surface, region: Rect) {
        surface.clear_region(region);
        self.paint(surface, Some(region));
    }

    fn paint(&self, surface: &mut dyn Surface, region: Option<Rect>) {
        for route in &self.routes {
            if touches(region, route_bounds(route)) {
                surface.draw_polyline(route.points());
            }
        }

        for group in &self.groups {
            if !touches(region, Some(group.bounds())) {
                continue;
            }
            for shape in group.shapes() {
                match shape.kind() {
                    SubShapeKind::Rect { .. } => surface.draw_rect(shape.rect(), shape.style()),
                    SubShapeKind::Circle => surface.draw_circle(shape.rect(), shape.style()),
                    SubShapeKind::Text { text, align } => {
                        surface.draw_text(shape.rect(), text, *align)
                    }
                }
            }
        }
    }
}

fn route_bounds(route: &EdgeRoute) -> Option<Rect> {
    let mut points = route.points().iter();
    let first = points.next()?;
    let mut rect = Rect::new(first.x, first.y, 0.0, 0.0);
    for p in points {
        rect = rect.union(&Rect::new(p.x, p.y, 0.0, 0.0));
    }
    Some(rect)
}

fn touches(region: Option<Rect>, bounds: Option<Rect>) -> bool {
    match (region, bounds) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(region), Some(bounds)) => region.intersects(&bounds),
    }
}

#[cfg(test)]
mod tests {
    use super::Scene;
    use crate::geom::Bounds;
    use crate::layout::IndentedLayout;
    use crate::model::fixtures::process_tree;
    use crate::model::{DiagramModel, NodeId};
    use crate::render::CharSurface;
    use crate::shape::FlowRectShape;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn tree_scene() -> Scene {
        let model = DiagramModel::Tree(process_tree());
        let layout = IndentedLayout::default()
            .compute(model.as_tree().expect("tree"), Bounds::new(1200.0, 800.0))
            .expect("layout");
        Scene::build(&model, &layout, &FlowRectShape)
    }

    #[test]
    fn build_draws_one_group_per_visible_node() {
        let scene = tree_scene();
        assert_eq!(scene.groups().len(), 6);
        assert!(scene.group(&nid("postgres1")).is_some());
    }

    #[test]
    fn pick_resolves_node_and_sub_shape() {
        let scene = tree_scene();
        let root_bounds = scene.node_bounds(&nid("apache1")).expect("bounds");

        let (node_id, name) = scene.pick(root_bounds.center()).expect("hit");
        assert_eq!(node_id, &nid("apache1"));
        assert!(name == "pid-shape" || name == "port-shape" || name == "wrapper");

        assert!(scene.pick(crate::geom::Point::new(-50.0, -50.0)).is_none());
    }

    #[test]
    fn pick_on_the_toggle_returns_the_collapse_sub_shape() {
        let scene = tree_scene();
        let group = scene.group(&nid("postgres1")).expect("group");
        let toggle = group.find("collapse-back").expect("toggle").rect().center();

        let (node_id, name) = scene.pick(toggle).expect("hit");
        assert_eq!(node_id, &nid("postgres1"));
        assert_eq!(name, "collapse-text");
    }

    #[test]
    fn draw_paints_nodes_onto_the_surface() {
        let scene = tree_scene();
        let mut surface = CharSurface::new(120, 40).expect("surface");
        scene.draw(&mut surface);
        assert!(surface.canvas().to_string().contains("PID: 3476"));
    }

    #[test]
    fn draw_region_repaints_only_around_the_region() {
        let scene = tree_scene();
        let mut surface = CharSurface::new(160, 50).expect("surface");
        scene.draw(&mut surface);
        let full = surface.canvas().to_string();

        let region = scene.node_bounds(&nid("apache1")).expect("bounds");
        scene.draw_region(&mut surface, region);
        assert_eq!(surface.canvas().to_string(), full);
    }
}
