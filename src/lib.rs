// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Toposcope: interactive node diagrams in the terminal.
//!
//! One diagram engine, two views: a force-directed topology graph and an
//! indented, collapsible process tree. The engine core (model, shapes,
//! layout, render controller) is host-agnostic; the shipped host is a
//! ratatui/crossterm shell in [`tui`].

pub mod geom;
pub mod interact;
pub mod layout;
pub mod model;
pub mod pages;
pub mod render;
pub mod shape;
pub mod tui;
