// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagram lifecycle: mount, update, pick, resize, unmount.
//!
//! A [`Diagram`] owns its surface, model, layout engine and shape registry
//! for as long as it is mounted. Model updates are value-diffed: a change
//! that keeps the structural signature repaints without moving anything,
//! while a structural change runs the layout engine again, carrying over
//! previous positions where the engine supports it.

use std::fmt;

use smol_str::SmolStr;

use crate::geom::{Point, Rect};
use crate::layout::{LayoutEngine, LayoutResult};
use crate::model::{
    DiagramKind, DiagramKindMismatch, DiagramModel, GraphSignature, NodeId, TreeSignature,
};
use crate::shape::{CircleShape, FlowRectShape, ShapeRegistry};

use super::{Scene, Surface};

/// Fits the re-centered tree with a little air around it after a resize.
const FIT_MARGIN: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// The host surface reported no drawable area.
    SurfaceUnavailable,
    /// No draw routine is registered for the node type the model needs.
    UnknownShape { tag: SmolStr },
    /// The layout engine does not handle the model's kind.
    EngineMismatch { kind: DiagramKind },
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceUnavailable => f.write_str("surface has no drawable area"),
            Self::UnknownShape { tag } => write!(f, "no shape registered for type {tag}"),
            Self::EngineMismatch { kind } => {
                write!(f, "layout engine does not handle {kind:?} models")
            }
        }
    }
}

impl std::error::Error for MountError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    KindMismatch(DiagramKindMismatch),
}

impl fmt::Display for DiagramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindMismatch(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for DiagramError {}

impl From<DiagramKindMismatch> for DiagramError {
    fn from(err: DiagramKindMismatch) -> Self {
        Self::KindMismatch(err)
    }
}

/// What a pointer position resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickTarget {
    node_id: NodeId,
    sub_shape: SmolStr,
}

impl PickTarget {
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn sub_shape(&self) -> &str {
        &self.sub_shape
    }

    /// Stable `node-id/sub-shape` form. Ids cannot contain `/`, so the path
    /// splits unambiguously.
    pub fn path(&self) -> String {
        format!("{}/{}", self.node_id, self.sub_shape)
    }

    pub fn is_collapse_toggle(&self) -> bool {
        self.sub_shape.starts_with("collapse-")
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ModelSignature {
    Graph(GraphSignature),
    Tree(TreeSignature),
}

fn signature_of(model: &DiagramModel) -> ModelSignature {
    match model {
        DiagramModel::Graph(graph) => ModelSignature::Graph(graph.structure_signature()),
        DiagramModel::Tree(tree) => ModelSignature::Tree(tree.structure_signature()),
    }
}

/// A mounted diagram instance.
pub struct Diagram<S: Surface> {
    surface: S,
    model: DiagramModel,
    engine: LayoutEngine,
    registry: ShapeRegistry,
    shape_tag: SmolStr,
    layout: LayoutResult,
    scene: Scene,
    selected: Option<NodeId>,
    collapse_in_flight: bool,
}

impl<S: Surface> Diagram<S> {
    /// Takes ownership of `surface`, lays the model out and paints the first
    /// frame. The engine must match the model's kind, the registry must know
    /// the node type the model renders with, and the surface must have room.
    pub fn mount(
        surface: S,
        model: DiagramModel,
        engine: LayoutEngine,
        registry: ShapeRegistry,
    ) -> Result<Self, MountError> {
        if surface.bounds().is_empty() {
            return Err(MountError::SurfaceUnavailable);
        }

        let kind = model.kind();
        match (&engine, kind) {
            (LayoutEngine::Force(_), DiagramKind::Graph) => {}
            (LayoutEngine::Indented(_), DiagramKind::Tree) => {}
            _ => return Err(MountError::EngineMismatch { kind }),
        }

        let shape_tag = SmolStr::new(match kind {
            DiagramKind::Graph => CircleShape::TYPE,
            DiagramKind::Tree => FlowRectShape::TYPE,
        });
        if registry.get(&shape_tag).is_none() {
            return Err(MountError::UnknownShape { tag: shape_tag });
        }

        let mut diagram = Self {
            surface,
            model,
            engine,
            registry,
            shape_tag,
            layout: LayoutResult::default(),
            scene: Scene::default(),
            selected: None,
            collapse_in_flight: false,
        };
        diagram.relayout(None);
        diagram.rebuild_scene();
        diagram.scene.draw(&mut diagram.surface);
        Ok(diagram)
    }

    pub fn model(&self) -> &DiagramModel {
        &self.model
    }

    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for host-driven surface changes (resizes). Call
    /// [`Diagram::on_resize`] afterwards to re-render.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Swaps in a replacement model of the same kind. A structural change
    /// (nodes, edges, parentage, collapse flags) re-runs layout; an
    /// attribute-only change repaints in place. On error the previous model
    /// and frame stay untouched.
    pub fn on_model_changed(&mut self, model: DiagramModel) -> Result<(), DiagramError> {
        let structural = signature_of(&self.model) != signature_of(&model);
        self.model.replace(model)?;

        if let Some(selected) = &self.selected {
            if !self.model_contains(selected) {
                self.selected = None;
            }
        }

        if structural {
            let previous = std::mem::take(&mut self.layout);
            self.relayout(Some(&previous));
        }
        self.rebuild_scene();
        self.scene.draw(&mut self.surface);
        Ok(())
    }

    /// Re-renders after the host resized the surface. Force layouts settle
    /// again from their current positions; tree layouts are re-fit into the
    /// new viewport as-is.
    pub fn on_resize(&mut self) {
        if self.surface.bounds().is_empty() {
            return;
        }
        match &self.engine {
            LayoutEngine::Force(_) => {
                let previous = std::mem::take(&mut self.layout);
                self.relayout(Some(&previous));
            }
            LayoutEngine::Indented(_) => {
                self.layout = self.layout.fit_into(self.surface.bounds(), FIT_MARGIN);
            }
        }
        self.rebuild_scene();
        self.scene.draw(&mut self.surface);
    }

    /// Resolves a pointer position to the topmost sub-shape under it.
    pub fn pick(&self, p: Point) -> Option<PickTarget> {
        self.scene.pick(p).map(|(node_id, sub_shape)| PickTarget {
            node_id: node_id.clone(),
            sub_shape: SmolStr::new(sub_shape),
        })
    }

    /// Moves the selection, restyling the nodes involved in place.
    pub fn set_selected(&mut self, node_id: Option<NodeId>) {
        if self.selected == node_id {
            return;
        }
        let previous = std::mem::replace(&mut self.selected, node_id);

        if let Some(shape) = self.registry.get(&self.shape_tag) {
            for (id, value) in [(previous, false), (self.selected.clone(), true)] {
                let Some(id) = id else { continue };
                if let Some(group) = self.scene.group_mut(&id) {
                    shape.apply_state("selected", value, group);
                }
                if let Some(bounds) = self.scene.node_bounds(&id) {
                    self.scene.draw_region(&mut self.surface, bounds);
                }
            }
        }
    }

    /// Collapses or expands a tree node's subtree. Returns the new collapse
    /// flag, or `None` when the toggle does not apply (graph mode, a leaf,
    /// an unknown id, or a toggle already in flight).
    pub fn toggle_collapse(&mut self, node_id: &NodeId) -> Option<bool> {
        if self.collapse_in_flight {
            return None;
        }
        self.collapse_in_flight = true;
        let result = self.toggle_collapse_inner(node_id);
        self.collapse_in_flight = false;
        result
    }

    fn toggle_collapse_inner(&mut self, node_id: &NodeId) -> Option<bool> {
        let old_top = self.scene.node_bounds(node_id).map(|r| r.min_y());

        let tree = self.model.as_tree_mut()?;
        let collapsed = tree.toggle_collapsed(node_id)?;

        // Swap the glyph in place before any rows move.
        if let Some(shape) = self.registry.get(&self.shape_tag) {
            if let Some(group) = self.scene.group_mut(node_id) {
                shape.apply_state("collapse", collapsed, group);
            }
            if let Some(bounds) = self.scene.node_bounds(node_id) {
                self.scene.draw_region(&mut self.surface, bounds);
            }
        }

        self.relayout(None);
        self.rebuild_scene();

        // Everything above the toggled node keeps its rows; repaint from
        // there down.
        let new_top = self.scene.node_bounds(node_id).map(|r| r.min_y());
        let top = match (old_top, new_top) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => 0.0,
        };
        let bounds = self.surface.bounds();
        let dirty = Rect::new(0.0, top, bounds.width, (bounds.height - top).max(0.0));
        self.scene.draw_region(&mut self.surface, dirty);

        Some(collapsed)
    }

    /// Clears the frame and gives the surface back to the host.
    pub fn unmount(mut self) -> S {
        self.surface.clear();
        self.surface
    }

    fn model_contains(&self, node_id: &NodeId) -> bool {
        match &self.model {
            DiagramModel::Graph(graph) => graph.node(node_id).is_some(),
            DiagramModel::Tree(tree) => tree.find(node_id).is_some(),
        }
    }

    fn relayout(&mut self, previous: Option<&LayoutResult>) {
        let bounds = self.surface.bounds();
        self.layout = match (&self.engine, &self.model) {
            (LayoutEngine::Force(force), DiagramModel::Graph(graph)) => force
                .compute(graph, bounds, previous)
                .unwrap_or_default(),
            (LayoutEngine::Indented(indented), DiagramModel::Tree(tree)) => indented
                .compute(tree, bounds)
                .unwrap_or_default(),
            // Ruled out at mount.
            _ => LayoutResult::default(),
        };
    }

    fn rebuild_scene(&mut self) {
        if let Some(shape) = self.registry.get(&self.shape_tag) {
            self.scene = Scene::build(&self.model, &self.layout, shape);
            if let Some(selected) = self.selected.clone() {
                if let Some(group) = self.scene.group_mut(&selected) {
                    shape.apply_state("selected", true, group);
                }
            }
        }
    }
}

impl<S: Surface> fmt::Debug for Diagram<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagram")
            .field("kind", &self.model.kind())
            .field("shape_tag", &self.shape_tag)
            .field("selected", &self.selected)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagram, DiagramError, MountError};
    use crate::geom::Point;
    use crate::layout::{ForceLayout, IndentedLayout, LayoutEngine};
    use crate::model::fixtures::{process_tree, server_graph};
    use crate::model::{DiagramModel, GraphEdge, GraphNode, NodeId};
    use crate::render::{CharSurface, Surface};
    use crate::shape::ShapeRegistry;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn tree_diagram() -> Diagram<CharSurface> {
        Diagram::mount(
            CharSurface::new(160, 50).expect("surface"),
            DiagramModel::Tree(process_tree()),
            LayoutEngine::Indented(IndentedLayout::default()),
            ShapeRegistry::with_defaults(),
        )
        .expect("mount")
    }

    fn graph_diagram() -> Diagram<CharSurface> {
        Diagram::mount(
            CharSurface::new(100, 40).expect("surface"),
            DiagramModel::Graph(server_graph()),
            LayoutEngine::Force(ForceLayout::default().with_iterations(100)),
            ShapeRegistry::with_defaults(),
        )
        .expect("mount")
    }

    #[test]
    fn mount_fails_on_an_empty_surface() {
        let result = Diagram::mount(
            CharSurface::new(0, 0).expect("surface"),
            DiagramModel::Tree(process_tree()),
            LayoutEngine::Indented(IndentedLayout::default()),
            ShapeRegistry::with_defaults(),
        );
        assert!(matches!(result, Err(MountError::SurfaceUnavailable)));
    }

    #[test]
    fn mount_rejects_engine_and_kind_disagreement() {
        let result = Diagram::mount(
            CharSurface::new(80, 24).expect("surface"),
            DiagramModel::Tree(process_tree()),
            LayoutEngine::Force(ForceLayout::default()),
            ShapeRegistry::with_defaults(),
        );
        assert!(matches!(result, Err(MountError::EngineMismatch { .. })));
    }

    #[test]
    fn mount_requires_a_registered_shape() {
        let result = Diagram::mount(
            CharSurface::new(80, 24).expect("surface"),
            DiagramModel::Tree(process_tree()),
            LayoutEngine::Indented(IndentedLayout::default()),
            ShapeRegistry::new(),
        );
        assert!(matches!(result, Err(MountError::UnknownShape { .. })));
    }

    #[test]
    fn mount_paints_the_first_frame() {
        let diagram = tree_diagram();
        assert!(diagram
            .surface()
            .canvas()
            .to_string()
            .contains("PID: 3476"));
        assert_eq!(diagram.scene().groups().len(), 6);
    }

    #[test]
    fn attribute_only_update_keeps_every_position() {
        let mut diagram = tree_diagram();
        let before = diagram.layout().clone();

        let mut tree = process_tree();
        tree.find_mut(&nid("tomcat1")).expect("node").set_label("Tomcat 9");
        diagram
            .on_model_changed(DiagramModel::Tree(tree))
            .expect("update");

        assert_eq!(diagram.layout(), &before);
    }

    #[test]
    fn structural_update_lays_out_the_new_node() {
        let mut diagram = graph_diagram();

        let mut graph = server_graph();
        graph
            .nodes_mut()
            .insert(nid("serverd"), GraphNode::new("server-d.example.com"));
        graph
            .edges_mut()
            .push(GraphEdge::new(nid("servera"), nid("serverd")));
        diagram
            .on_model_changed(DiagramModel::Graph(graph))
            .expect("update");

        assert!(diagram.layout().position(&nid("serverd")).is_some());
        assert_eq!(diagram.scene().groups().len(), 4);
    }

    #[test]
    fn kind_mismatch_keeps_the_previous_model_and_frame() {
        let mut diagram = tree_diagram();
        let before = diagram.surface().canvas().to_string();

        let result = diagram.on_model_changed(DiagramModel::Graph(server_graph()));
        assert!(matches!(result, Err(DiagramError::KindMismatch(_))));
        assert_eq!(diagram.scene().groups().len(), 6);
        assert_eq!(diagram.surface().canvas().to_string(), before);
    }

    #[test]
    fn toggle_collapse_hides_and_restores_the_subtree() {
        let mut diagram = tree_diagram();

        assert_eq!(diagram.toggle_collapse(&nid("postgres1")), Some(true));
        assert_eq!(diagram.scene().groups().len(), 4);
        assert!(!diagram.surface().canvas().to_string().contains("PID: 9876"));

        assert_eq!(diagram.toggle_collapse(&nid("postgres1")), Some(false));
        assert_eq!(diagram.scene().groups().len(), 6);
        assert!(diagram.surface().canvas().to_string().contains("PID: 9876"));
    }

    #[test]
    fn toggle_swaps_the_glyph_at_the_toggle() {
        let mut diagram = tree_diagram();
        let toggle_cell = |diagram: &Diagram<CharSurface>| {
            let rect = diagram
                .scene()
                .group(&nid("postgres1"))
                .expect("group")
                .find("collapse-back")
                .expect("toggle")
                .rect();
            diagram.surface().canvas_to_cell(rect.center())
        };

        diagram.toggle_collapse(&nid("postgres1"));
        let (col, row) = toggle_cell(&diagram);
        assert_eq!(diagram.surface().canvas().get(col, row), Some('+'));

        diagram.toggle_collapse(&nid("postgres1"));
        let (col, row) = toggle_cell(&diagram);
        assert_eq!(diagram.surface().canvas().get(col, row), Some('-'));
    }

    #[test]
    fn toggle_on_leaves_and_graphs_is_inert() {
        let mut diagram = tree_diagram();
        assert_eq!(diagram.toggle_collapse(&nid("iis1")), None);

        let mut diagram = graph_diagram();
        assert_eq!(diagram.toggle_collapse(&nid("servera")), None);
    }

    #[test]
    fn pick_resolves_to_a_stable_path() {
        let diagram = tree_diagram();
        let bounds = diagram
            .scene()
            .node_bounds(&nid("apache1"))
            .expect("bounds");

        let target = diagram.pick(bounds.center()).expect("target");
        assert_eq!(target.node_id(), &nid("apache1"));
        assert!(target.path().starts_with("apache1/"));
        assert!(diagram.pick(Point::new(-10.0, -10.0)).is_none());
    }

    #[test]
    fn selection_moves_and_clears() {
        let mut diagram = graph_diagram();
        diagram.set_selected(Some(nid("servera")));
        assert_eq!(diagram.selected(), Some(&nid("servera")));

        diagram.set_selected(Some(nid("serverb")));
        assert_eq!(diagram.selected(), Some(&nid("serverb")));

        diagram.set_selected(None);
        assert_eq!(diagram.selected(), None);
    }

    #[test]
    fn selection_survives_updates_that_keep_the_node() {
        let mut diagram = graph_diagram();
        diagram.set_selected(Some(nid("serverb")));

        diagram
            .on_model_changed(DiagramModel::Graph(server_graph()))
            .expect("update");
        assert_eq!(diagram.selected(), Some(&nid("serverb")));

        let solo = crate::model::GraphModel::from_parts(
            vec![(nid("servera"), GraphNode::new("server-a.example.com"))],
            Vec::new(),
        )
        .expect("model");
        diagram
            .on_model_changed(DiagramModel::Graph(solo))
            .expect("update");
        assert_eq!(diagram.selected(), None);
    }

    #[test]
    fn resize_keeps_force_nodes_inside_the_new_viewport() {
        let mut diagram = graph_diagram();
        diagram
            .surface_mut()
            .resize(60, 20)
            .expect("resize");
        diagram.on_resize();

        let bounds = diagram.surface().bounds();
        for p in diagram.layout().positions().values() {
            assert!(p.x <= bounds.width && p.y <= bounds.height);
        }
    }

    #[test]
    fn resize_translates_a_tree_without_reshaping_it() {
        let mut diagram = tree_diagram();
        let before = diagram.layout().clone();

        diagram.surface_mut().resize(200, 60).expect("resize");
        diagram.on_resize();

        let after = diagram.layout();
        let da = after.position(&nid("apache1")).expect("root");
        let db = before.position(&nid("apache1")).expect("root");
        let (dx, dy) = (da.x - db.x, da.y - db.y);
        for (id, p) in before.positions() {
            let q = after.position(id).expect("kept");
            assert!((q.x - p.x - dx).abs() < 1e-9);
            assert!((q.y - p.y - dy).abs() < 1e-9);
        }
    }

    #[test]
    fn unmount_returns_a_cleared_surface() {
        let diagram = tree_diagram();
        let surface = diagram.unmount();
        assert_eq!(surface.canvas().to_string().trim(), "");
    }
}
