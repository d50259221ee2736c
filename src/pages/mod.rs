// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page controllers.
//!
//! Thin glue over the engine: each page owns a mounted [`Diagram`] and an
//! [`Interaction`], seeds the demo model, and exposes the bits the host
//! shell renders around the canvas (open menu, detail overlay, pending
//! navigation). All the diagram behavior lives below; pages only wire it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::interact::{Callbacks, ContextMenu, Interaction, NodeSummary, Outcome, PointerEvent};
use crate::layout::{ForceLayout, IndentedLayout, LayoutEngine};
use crate::model::{fixtures, DiagramModel, GraphSeed, ModelError, TreeSeed};
use crate::render::{Diagram, DiagramError, MountError, Surface};

/// The routes the shell can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    MainGraph,
    ProcessMap,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::MainGraph => "/",
            Self::ProcessMap => "/processmap",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Self::MainGraph),
            "/processmap" => Some(Self::ProcessMap),
            _ => None,
        }
    }
}

/// Everything that can go wrong feeding new data into a page. The previous
/// model keeps rendering through any of these.
#[derive(Debug)]
pub enum PageError {
    Parse(serde_json::Error),
    Model(ModelError),
    Diagram(DiagramError),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "seed data is not valid JSON: {err}"),
            Self::Model(err) => err.fmt(f),
            Self::Diagram(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Model(err) => Some(err),
            Self::Diagram(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<ModelError> for PageError {
    fn from(err: ModelError) -> Self {
        Self::Model(err)
    }
}

impl From<DiagramError> for PageError {
    fn from(err: DiagramError) -> Self {
        Self::Diagram(err)
    }
}

type Shared<T> = Rc<RefCell<Option<T>>>;

fn callbacks(detail: &Shared<NodeSummary>, route: &Shared<Route>) -> Callbacks {
    let detail_sink = Rc::clone(detail);
    let route_sink = Rc::clone(route);
    Callbacks {
        on_select: Some(Box::new(move |summary| {
            *detail_sink.borrow_mut() = Some(summary.clone());
        })),
        navigate: Some(Box::new(move |path| {
            *route_sink.borrow_mut() = Route::from_path(path);
        })),
    }
}

/// The server topology page: force-directed graph, selection, context menu
/// and a node detail overlay.
pub struct MainGraphPage<S: Surface> {
    diagram: Diagram<S>,
    interaction: Interaction,
    detail: Shared<NodeSummary>,
    pending_route: Shared<Route>,
}

impl<S: Surface> MainGraphPage<S> {
    pub fn open(surface: S) -> Result<Self, MountError> {
        let detail = Shared::default();
        let pending_route = Shared::default();
        let diagram = Diagram::mount(
            surface,
            DiagramModel::Graph(fixtures::server_graph()),
            LayoutEngine::Force(ForceLayout::default()),
            crate::shape::ShapeRegistry::with_defaults(),
        )?;

        Ok(Self {
            diagram,
            interaction: Interaction::new(callbacks(&detail, &pending_route)),
            detail,
            pending_route,
        })
    }

    pub fn diagram(&self) -> &Diagram<S> {
        &self.diagram
    }

    pub fn diagram_mut(&mut self) -> &mut Diagram<S> {
        &mut self.diagram
    }

    pub fn menu(&self) -> Option<&ContextMenu> {
        self.interaction.menu()
    }

    pub fn detail(&self) -> Option<NodeSummary> {
        self.detail.borrow().clone()
    }

    pub fn dismiss_detail(&mut self) {
        self.detail.borrow_mut().take();
    }

    /// The route a menu activation asked for, consumed by the shell.
    pub fn take_navigation(&mut self) -> Option<Route> {
        self.pending_route.borrow_mut().take()
    }

    /// An open detail overlay swallows pointer input until dismissed.
    pub fn on_pointer(&mut self, event: PointerEvent) -> Outcome {
        if self.detail.borrow().is_some() {
            self.detail.borrow_mut().take();
            return Outcome::None;
        }
        self.interaction.on_pointer(&mut self.diagram, event)
    }

    pub fn activate_menu(&mut self, index: usize) -> Outcome {
        self.interaction.activate(index)
    }

    pub fn dismiss_menu(&mut self) -> Outcome {
        self.interaction.dismiss_menu()
    }

    pub fn on_resize(&mut self) {
        self.diagram.on_resize();
    }

    /// Replaces the model from JSON seed data. Failures leave the page on
    /// its current model.
    pub fn load_json(&mut self, json: &str) -> Result<(), PageError> {
        let seed: GraphSeed = serde_json::from_str(json)?;
        let model = seed.into_model()?;
        self.diagram.on_model_changed(DiagramModel::Graph(model))?;
        Ok(())
    }

    pub fn close(self) -> S {
        self.diagram.unmount()
    }
}

impl<S: Surface> fmt::Debug for MainGraphPage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainGraphPage")
            .field("diagram", &self.diagram)
            .finish()
    }
}

/// The process map page: indented tree with collapsible subtrees.
pub struct ProcessMapPage<S: Surface> {
    diagram: Diagram<S>,
    interaction: Interaction,
    detail: Shared<NodeSummary>,
    pending_route: Shared<Route>,
}

impl<S: Surface> ProcessMapPage<S> {
    pub fn open(surface: S) -> Result<Self, MountError> {
        let detail = Shared::default();
        let pending_route = Shared::default();
        let diagram = Diagram::mount(
            surface,
            DiagramModel::Tree(fixtures::process_tree()),
            LayoutEngine::Indented(IndentedLayout::default()),
            crate::shape::ShapeRegistry::with_defaults(),
        )?;

        Ok(Self {
            diagram,
            interaction: Interaction::new(callbacks(&detail, &pending_route)),
            detail,
            pending_route,
        })
    }

    pub fn diagram(&self) -> &Diagram<S> {
        &self.diagram
    }

    pub fn diagram_mut(&mut self) -> &mut Diagram<S> {
        &mut self.diagram
    }

    pub fn menu(&self) -> Option<&ContextMenu> {
        self.interaction.menu()
    }

    pub fn detail(&self) -> Option<NodeSummary> {
        self.detail.borrow().clone()
    }

    pub fn dismiss_detail(&mut self) {
        self.detail.borrow_mut().take();
    }

    pub fn take_navigation(&mut self) -> Option<Route> {
        self.pending_route.borrow_mut().take()
    }

    pub fn on_pointer(&mut self, event: PointerEvent) -> Outcome {
        if self.detail.borrow().is_some() {
            self.detail.borrow_mut().take();
            return Outcome::None;
        }
        self.interaction.on_pointer(&mut self.diagram, event)
    }

    pub fn activate_menu(&mut self, index: usize) -> Outcome {
        self.interaction.activate(index)
    }

    pub fn dismiss_menu(&mut self) -> Outcome {
        self.interaction.dismiss_menu()
    }

    pub fn on_resize(&mut self) {
        self.diagram.on_resize();
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), PageError> {
        let seed: TreeSeed = serde_json::from_str(json)?;
        let model = seed.into_model()?;
        self.diagram.on_model_changed(DiagramModel::Tree(model))?;
        Ok(())
    }

    pub fn close(self) -> S {
        self.diagram.unmount()
    }
}

impl<S: Surface> fmt::Debug for ProcessMapPage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessMapPage")
            .field("diagram", &self.diagram)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{MainGraphPage, ProcessMapPage, Route};
    use crate::geom::Point;
    use crate::interact::{Outcome, PointerEvent};
    use crate::model::NodeId;
    use crate::render::CharSurface;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn main_page() -> MainGraphPage<CharSurface> {
        MainGraphPage::open(CharSurface::new(100, 40).expect("surface")).expect("page")
    }

    fn process_page() -> ProcessMapPage<CharSurface> {
        ProcessMapPage::open(CharSurface::new(160, 50).expect("surface")).expect("page")
    }

    fn node_point<S: crate::render::Surface>(
        diagram: &crate::render::Diagram<S>,
        id: &str,
    ) -> Point {
        diagram.layout().position(&nid(id)).expect("position")
    }

    #[test]
    fn route_paths_round_trip() {
        assert_eq!(Route::from_path(Route::ProcessMap.path()), Some(Route::ProcessMap));
        assert_eq!(Route::from_path(Route::MainGraph.path()), Some(Route::MainGraph));
        assert_eq!(Route::from_path("/nowhere"), None);
    }

    #[test]
    fn detail_flow_opens_and_dismisses_the_overlay() {
        let mut page = main_page();
        let p = node_point(page.diagram(), "servera");

        page.on_pointer(PointerEvent::right(p));
        page.activate_menu(0);

        let detail = page.detail().expect("detail");
        assert_eq!(detail.id, nid("servera"));
        assert_eq!(detail.label, "server-a.example.com");

        // The next click only dismisses the overlay.
        let outcome = page.on_pointer(PointerEvent::left(p));
        assert_eq!(outcome, Outcome::None);
        assert!(page.detail().is_none());
        assert_eq!(page.diagram().selected(), None);
    }

    #[test]
    fn process_map_entry_requests_navigation() {
        let mut page = main_page();
        let p = node_point(page.diagram(), "serverb");

        page.on_pointer(PointerEvent::right(p));
        page.activate_menu(1);

        assert_eq!(page.take_navigation(), Some(Route::ProcessMap));
        assert_eq!(page.take_navigation(), None);
    }

    #[test]
    fn load_json_swaps_the_graph() {
        let mut page = main_page();
        page.load_json(
            r#"{
                "nodes": [
                    { "id": "web1", "label": "web-1" },
                    { "id": "db1", "label": "db-1" }
                ],
                "edges": [{ "source": "web1", "target": "db1" }]
            }"#,
        )
        .expect("load");

        assert_eq!(page.diagram().scene().groups().len(), 2);
        assert!(page.diagram().layout().position(&nid("web1")).is_some());
    }

    #[test]
    fn bad_seed_data_keeps_the_current_model() {
        let mut page = main_page();

        let err = page.load_json("not json at all").unwrap_err();
        assert!(matches!(err, super::PageError::Parse(_)));

        let err = page
            .load_json(r#"{ "nodes": [{ "id": "a", "label": "A" }], "edges": [{ "source": "a", "target": "ghost" }] }"#)
            .unwrap_err();
        assert!(matches!(err, super::PageError::Model(_)));

        assert_eq!(page.diagram().scene().groups().len(), 3);
    }

    #[test]
    fn process_page_toggles_from_pointer_input() {
        let mut page = process_page();
        let toggle = page
            .diagram()
            .scene()
            .group(&nid("postgres1"))
            .expect("group")
            .find("collapse-back")
            .expect("toggle")
            .rect()
            .center();

        let outcome = page.on_pointer(PointerEvent::left(toggle));
        assert!(matches!(outcome, Outcome::Toggled { collapsed: true, .. }));
        assert_eq!(page.diagram().scene().groups().len(), 4);
    }

    #[test]
    fn close_returns_the_surface_for_reuse() {
        let page = process_page();
        let surface = page.close();
        let page = MainGraphPage::open(surface).expect("reopen");
        assert_eq!(page.diagram().scene().groups().len(), 3);
    }
}
