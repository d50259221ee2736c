// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pointer interaction: selection, collapse toggles and the node context
//! menu.
//!
//! The engine never talks to the host's input system directly. Hosts
//! translate their native events into [`PointerEvent`]s and feed them
//! through an [`Interaction`], which drives the mounted diagram and reports
//! what happened as an [`Outcome`]. Menu activation is dispatched through
//! host-supplied [`Callbacks`]; picking air is deliberately quiet.

use std::fmt;

use smol_str::SmolStr;

use crate::geom::Point;
use crate::model::{DiagramModel, NodeId};
use crate::render::{Diagram, Surface};

pub const MENU_DETAIL: &str = "detail";
pub const MENU_PROCESS_MAP: &str = "processmap";

/// One entry of the node context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    key: SmolStr,
    label: SmolStr,
}

impl MenuItem {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: SmolStr::new(key),
            label: SmolStr::new(label),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The stock menu offered on every node.
pub fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new(MENU_DETAIL, "View Detail"),
        MenuItem::new(MENU_PROCESS_MAP, "View Process Map"),
    ]
}

/// Identity and display attributes of a node, detached from the model so
/// callbacks can hold onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSummary {
    pub id: NodeId,
    pub label: String,
    pub cluster: Option<String>,
}

impl NodeSummary {
    pub fn from_model(model: &DiagramModel, node_id: &NodeId) -> Option<Self> {
        match model {
            DiagramModel::Graph(graph) => graph.node(node_id).map(|node| Self {
                id: node_id.clone(),
                label: node.label().to_owned(),
                cluster: node.cluster().map(str::to_owned),
            }),
            DiagramModel::Tree(tree) => tree.find(node_id).map(|node| Self {
                id: node_id.clone(),
                label: node.label().to_owned(),
                cluster: None,
            }),
        }
    }
}

/// Host-supplied reactions to menu activations.
#[derive(Default)]
pub struct Callbacks {
    /// `detail` was chosen for a node.
    pub on_select: Option<Box<dyn FnMut(&NodeSummary)>>,
    /// A navigation entry was chosen; the argument is the route.
    pub navigate: Option<Box<dyn FnMut(&str)>>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_select", &self.on_select.is_some())
            .field("navigate", &self.navigate.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

/// A pointer event in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn left(position: Point) -> Self {
        Self {
            position,
            button: PointerButton::Left,
        }
    }

    pub fn right(position: Point) -> Self {
        Self {
            position,
            button: PointerButton::Right,
        }
    }
}

/// An open context menu, anchored where the pointer was.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    target: NodeSummary,
    items: Vec<MenuItem>,
    anchor: Point,
}

impl ContextMenu {
    pub fn target(&self) -> &NodeSummary {
        &self.target
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }
}

/// What an event did to the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing applicable under the pointer.
    None,
    Selected(NodeId),
    SelectionCleared,
    Toggled { node_id: NodeId, collapsed: bool },
    MenuOpened,
    MenuDismissed,
    /// A menu entry fired; carries its key.
    Activated(SmolStr),
}

/// Per-page interaction state: the open menu plus the dispatch callbacks.
#[derive(Debug)]
pub struct Interaction {
    menu: Option<ContextMenu>,
    callbacks: Callbacks,
}

impl Interaction {
    pub fn new(callbacks: Callbacks) -> Self {
        Self {
            menu: None,
            callbacks,
        }
    }

    pub fn menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    pub fn dismiss_menu(&mut self) -> Outcome {
        if self.menu.take().is_some() {
            Outcome::MenuDismissed
        } else {
            Outcome::None
        }
    }

    /// Routes one pointer event into the diagram.
    ///
    /// Any click while the menu is open first dismisses it; right-clicking a
    /// node opens the menu on it; left-clicking a collapse toggle flips the
    /// subtree; left-clicking a node body selects it; clicking empty canvas
    /// clears the selection.
    pub fn on_pointer<S: Surface>(
        &mut self,
        diagram: &mut Diagram<S>,
        event: PointerEvent,
    ) -> Outcome {
        if self.menu.take().is_some() {
            return Outcome::MenuDismissed;
        }

        let Some(target) = diagram.pick(event.position) else {
            if diagram.selected().is_some() {
                diagram.set_selected(None);
                return Outcome::SelectionCleared;
            }
            return Outcome::None;
        };

        match event.button {
            PointerButton::Right => {
                let Some(summary) = NodeSummary::from_model(diagram.model(), target.node_id())
                else {
                    return Outcome::None;
                };
                self.menu = Some(ContextMenu {
                    target: summary,
                    items: default_menu(),
                    anchor: event.position,
                });
                Outcome::MenuOpened
            }
            PointerButton::Left if target.is_collapse_toggle() => {
                let node_id = target.node_id().clone();
                match diagram.toggle_collapse(&node_id) {
                    Some(collapsed) => Outcome::Toggled { node_id, collapsed },
                    None => Outcome::None,
                }
            }
            PointerButton::Left => {
                let node_id = target.node_id().clone();
                diagram.set_selected(Some(node_id.clone()));
                Outcome::Selected(node_id)
            }
        }
    }

    /// Fires the menu entry at `index` and closes the menu. Unknown indices
    /// just close it.
    pub fn activate(&mut self, index: usize) -> Outcome {
        let Some(menu) = self.menu.take() else {
            return Outcome::None;
        };
        let Some(item) = menu.items.get(index) else {
            return Outcome::MenuDismissed;
        };

        match item.key() {
            MENU_DETAIL => {
                if let Some(on_select) = &mut self.callbacks.on_select {
                    on_select(&menu.target);
                }
            }
            MENU_PROCESS_MAP => {
                if let Some(navigate) = &mut self.callbacks.navigate {
                    navigate("/processmap");
                }
            }
            _ => {}
        }
        Outcome::Activated(item.key.clone())
    }
}
