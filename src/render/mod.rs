// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering.
//!
//! The engine draws into a [`Surface`], an abstract raster owned by the host.
//! Everything the engine emits is in continuous canvas units; the surface
//! decides how those map onto its cells or pixels. The retained picture of
//! the last frame lives in a [`Scene`], which also answers hit tests.

use std::fmt;

use crate::geom::{Bounds, Point, Rect};
use crate::shape::{ShapeStyle, TextAlign};

pub mod canvas;
pub mod controller;
pub mod scene;

pub use canvas::{CharCanvas, CharSurface};
pub use controller::{Diagram, DiagramError, MountError, PickTarget};
pub use scene::Scene;

/// A host-owned draw target.
///
/// Coordinates are canvas units; implementations clip anything that falls
/// outside their raster instead of failing.
pub trait Surface {
    /// Current drawable area. A surface may report empty bounds when the
    /// host has no room for it; mounting fails on such a surface.
    fn bounds(&self) -> Bounds;

    fn clear(&mut self);

    /// Clears only the cells covered by `region`.
    fn clear_region(&mut self, region: Rect);

    fn draw_rect(&mut self, rect: Rect, style: &ShapeStyle);

    /// Draws a circle inscribed in `rect`.
    fn draw_circle(&mut self, rect: Rect, style: &ShapeStyle);

    fn draw_text(&mut self, rect: Rect, text: &str, align: TextAlign);

    fn draw_polyline(&mut self, points: &[Point]);
}

/// Raster errors from the character surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    AreaOverflow { width: usize, height: usize },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AreaOverflow { width, height } => {
                write!(f, "canvas area overflow: {width}*{height}")
            }
        }
    }
}

impl std::error::Error for CanvasError {}
