// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character-cell raster and the TUI [`Surface`] built on it.
//!
//! The grid merges Unicode box-drawing characters into junctions instead of
//! overwriting them, so crossing edge routes and adjacent node frames come
//! out as `┼`, `├` and friends. Everything else is last-writer-wins. All
//! draw calls clip at the grid edges.

use std::fmt;

use crate::geom::{Bounds, Point, Rect};
use crate::shape::{ShapeStyle, TextAlign};

use super::{CanvasError, Surface};

const BOX_HORIZONTAL: char = '─';
const BOX_VERTICAL: char = '│';

const EDGE_LEFT: u8 = 1 << 0;
const EDGE_RIGHT: u8 = 1 << 1;
const EDGE_UP: u8 = 1 << 2;
const EDGE_DOWN: u8 = 1 << 3;

fn edges_of(ch: char) -> Option<u8> {
    match ch {
        '─' => Some(EDGE_LEFT | EDGE_RIGHT),
        '│' => Some(EDGE_UP | EDGE_DOWN),
        '┌' => Some(EDGE_RIGHT | EDGE_DOWN),
        '┐' => Some(EDGE_LEFT | EDGE_DOWN),
        '└' => Some(EDGE_RIGHT | EDGE_UP),
        '┘' => Some(EDGE_LEFT | EDGE_UP),
        '├' => Some(EDGE_UP | EDGE_DOWN | EDGE_RIGHT),
        '┤' => Some(EDGE_UP | EDGE_DOWN | EDGE_LEFT),
        '┬' => Some(EDGE_LEFT | EDGE_RIGHT | EDGE_DOWN),
        '┴' => Some(EDGE_LEFT | EDGE_RIGHT | EDGE_UP),
        '┼' => Some(EDGE_LEFT | EDGE_RIGHT | EDGE_UP | EDGE_DOWN),
        _ => None,
    }
}

fn char_of(edges: u8) -> char {
    match edges {
        0 => ' ',
        1..=3 => BOX_HORIZONTAL,
        4 | 8 | 12 => BOX_VERTICAL,
        10 => '┌',
        9 => '┐',
        6 => '└',
        5 => '┘',
        14 => '├',
        13 => '┤',
        11 => '┬',
        7 => '┴',
        _ => '┼',
    }
}

/// A fixed-size character grid with junction-merging box semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharCanvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
    box_edges: Vec<u8>,
}

impl CharCanvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        let len = width
            .checked_mul(height)
            .ok_or(CanvasError::AreaOverflow { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![' '; len],
            box_edges: vec![0; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let idx = y * self.width + x;
        let edges = self.box_edges[idx];
        Some(if edges == 0 {
            self.cells[idx]
        } else {
            // Render only the arms a neighbor actually connects to, so an
            // elbow where two lines end comes out as a corner, not a cross.
            let connected = self.connected_edges(x, y, edges);
            char_of(if connected == 0 { edges } else { connected })
        })
    }

    fn connected_edges(&self, x: usize, y: usize, edges: u8) -> u8 {
        let mut connected = 0;
        let at = |x: usize, y: usize| self.box_edges[y * self.width + x];

        if edges & EDGE_LEFT != 0 && x > 0 && at(x - 1, y) & EDGE_RIGHT != 0 {
            connected |= EDGE_LEFT;
        }
        if edges & EDGE_RIGHT != 0 && x + 1 < self.width && at(x + 1, y) & EDGE_LEFT != 0 {
            connected |= EDGE_RIGHT;
        }
        if edges & EDGE_UP != 0 && y > 0 && at(x, y - 1) & EDGE_DOWN != 0 {
            connected |= EDGE_UP;
        }
        if edges & EDGE_DOWN != 0 && y + 1 < self.height && at(x, y + 1) & EDGE_UP != 0 {
            connected |= EDGE_DOWN;
        }
        connected
    }

    /// Sets one cell. Box-drawing characters accumulate into junctions;
    /// anything else overwrites. Out-of-bounds writes clip.
    pub fn set(&mut self, x: usize, y: usize, ch: char) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = y * self.width + x;
        if let Some(edges) = edges_of(ch) {
            self.box_edges[idx] |= edges;
        } else {
            self.cells[idx] = ch;
            self.box_edges[idx] = 0;
        }
    }

    pub fn fill(&mut self, ch: char) {
        self.cells.fill(ch);
        self.box_edges.fill(0);
    }

    /// Resets the cells in `x0..=x1`, `y0..=y1` to blanks.
    pub fn clear_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        for y in y0..=y1.min(self.height.saturating_sub(1)) {
            for x in x0..=x1.min(self.width.saturating_sub(1)) {
                let idx = y * self.width + x;
                self.cells[idx] = ' ';
                self.box_edges[idx] = 0;
            }
        }
    }

    /// Writes `text` left-to-right from `(x, y)`, clipping at the right edge.
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.set(x + i, y, ch);
        }
    }

    pub fn draw_hline(&mut self, x0: usize, x1: usize, y: usize) {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        for x in min_x..=max_x {
            self.set(x, y, BOX_HORIZONTAL);
        }
    }

    pub fn draw_vline(&mut self, x: usize, y0: usize, y1: usize) {
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        for y in min_y..=max_y {
            self.set(x, y, BOX_VERTICAL);
        }
    }

    /// Draws a single-line box with corners at `(x0, y0)` and `(x1, y1)`.
    /// Degenerate boxes collapse to lines.
    pub fn draw_box(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };

        if min_y == max_y {
            return self.draw_hline(min_x, max_x, min_y);
        }
        if min_x == max_x {
            return self.draw_vline(min_x, min_y, max_y);
        }

        for x in (min_x + 1)..max_x {
            self.set(x, min_y, BOX_HORIZONTAL);
            self.set(x, max_y, BOX_HORIZONTAL);
        }
        for y in (min_y + 1)..max_y {
            self.set(min_x, y, BOX_VERTICAL);
            self.set(max_x, y, BOX_VERTICAL);
        }
        self.set(min_x, min_y, '┌');
        self.set(max_x, min_y, '┐');
        self.set(min_x, max_y, '└');
        self.set(max_x, max_y, '┘');
    }
}

impl fmt::Display for CharCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        for y in 0..self.height {
            for x in 0..self.width {
                // (x, y) is in bounds by construction.
                f.write_char(self.get(x, y).unwrap_or(' '))?;
            }
            if y + 1 < self.height {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if text.chars().count() <= max_len {
        return text.to_owned();
    }
    if max_len == 1 {
        return "…".to_owned();
    }
    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

/// [`Surface`] over a [`CharCanvas`].
///
/// Canvas units map onto cells through a fixed cell size; the defaults give
/// a character cell the usual 1:2 aspect so diagrams keep their proportions.
#[derive(Debug, Clone, PartialEq)]
pub struct CharSurface {
    canvas: CharCanvas,
    cell_width: f64,
    cell_height: f64,
}

impl CharSurface {
    pub const DEFAULT_CELL_WIDTH: f64 = 8.0;
    pub const DEFAULT_CELL_HEIGHT: f64 = 16.0;

    pub fn new(cols: usize, rows: usize) -> Result<Self, CanvasError> {
        Self::with_cell_size(
            cols,
            rows,
            Self::DEFAULT_CELL_WIDTH,
            Self::DEFAULT_CELL_HEIGHT,
        )
    }

    pub fn with_cell_size(
        cols: usize,
        rows: usize,
        cell_width: f64,
        cell_height: f64,
    ) -> Result<Self, CanvasError> {
        Ok(Self {
            canvas: CharCanvas::new(cols, rows)?,
            cell_width,
            cell_height,
        })
    }

    pub fn canvas(&self) -> &CharCanvas {
        &self.canvas
    }

    /// Replaces the raster with one of the new size. Content is discarded;
    /// the caller re-renders.
    pub fn resize(&mut self, cols: usize, rows: usize) -> Result<(), CanvasError> {
        self.canvas = CharCanvas::new(cols, rows)?;
        Ok(())
    }

    /// Canvas-unit position at the center of cell `(col, row)`. Hosts use
    /// this to translate pointer events.
    pub fn cell_to_canvas(&self, col: usize, row: usize) -> Point {
        Point::new(
            (col as f64 + 0.5) * self.cell_width,
            (row as f64 + 0.5) * self.cell_height,
        )
    }

    /// Cell containing the canvas-unit position `p`.
    pub fn canvas_to_cell(&self, p: Point) -> (usize, usize) {
        (self.col_of(p.x), self.row_of(p.y))
    }

    fn col_of(&self, x: f64) -> usize {
        ((x / self.cell_width).floor().max(0.0)) as usize
    }

    fn row_of(&self, y: f64) -> usize {
        ((y / self.cell_height).floor().max(0.0)) as usize
    }

    fn cell_rect(&self, rect: Rect) -> (usize, usize, usize, usize) {
        let x0 = self.col_of(rect.min_x());
        let y0 = self.row_of(rect.min_y());
        // Keep the far edge inside the rect rather than on its boundary.
        let x1 = self.col_of((rect.max_x() - 1e-9).max(rect.min_x())).max(x0);
        let y1 = self.row_of((rect.max_y() - 1e-9).max(rect.min_y())).max(y0);
        (x0, y0, x1, y1)
    }

    fn draw_segment(&mut self, a: Point, b: Point) {
        let (x0, y0) = (self.col_of(a.x), self.row_of(a.y));
        let (x1, y1) = (self.col_of(b.x), self.row_of(b.y));

        if y0 == y1 {
            return self.canvas.draw_hline(x0, x1, y0);
        }
        if x0 == x1 {
            return self.canvas.draw_vline(x0, y0, y1);
        }

        // Diagonal: sample along the segment.
        let steps = (x1.abs_diff(x0)).max(y1.abs_diff(y0));
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let x = x0 as f64 + (x1 as f64 - x0 as f64) * t;
            let y = y0 as f64 + (y1 as f64 - y0 as f64) * t;
            self.canvas.set(x.round() as usize, y.round() as usize, '·');
        }
    }
}

impl Surface for CharSurface {
    fn bounds(&self) -> Bounds {
        Bounds::new(
            self.canvas.width() as f64 * self.cell_width,
            self.canvas.height() as f64 * self.cell_height,
        )
    }

    fn clear(&mut self) {
        self.canvas.fill(' ');
    }

    fn clear_region(&mut self, region: Rect) {
        let (x0, y0, x1, y1) = self.cell_rect(region);
        self.canvas.clear_rect(x0, y0, x1, y1);
    }

    fn draw_rect(&mut self, rect: Rect, style: &ShapeStyle) {
        let (x0, y0, x1, y1) = self.cell_rect(rect);
        if style.fill.is_some() && style.stroke.is_none() {
            // Fill-only rects read as shaded bands.
            for y in y0..=y1 {
                for x in x0..=x1 {
                    self.canvas.set(x, y, '░');
                }
            }
        } else {
            self.canvas.draw_box(x0, y0, x1, y1);
        }
    }

    fn draw_circle(&mut self, rect: Rect, style: &ShapeStyle) {
        let _ = style;
        let center = rect.center();
        let rx = (rect.width / 2.0).max(self.cell_width);
        let ry = (rect.height / 2.0).max(self.cell_height);

        let samples = 64;
        for i in 0..samples {
            let angle = i as f64 / samples as f64 * std::f64::consts::TAU;
            let x = center.x + rx * angle.cos();
            let y = center.y + ry * angle.sin();
            self.canvas.set(self.col_of(x), self.row_of(y), '•');
        }
    }

    fn draw_text(&mut self, rect: Rect, text: &str, align: TextAlign) {
        let (x0, y0, x1, y1) = self.cell_rect(rect);
        let width = x1 - x0 + 1;
        let row = y0 + (y1 - y0) / 2;

        let clipped = truncate_with_ellipsis(text, width);
        let x = match align {
            TextAlign::Left => x0,
            TextAlign::Center => x0 + (width.saturating_sub(clipped.chars().count())) / 2,
        };
        self.canvas.write_str(x, row, &clipped);
    }

    fn draw_polyline(&mut self, points: &[Point]) {
        for pair in points.windows(2) {
            self.draw_segment(pair[0], pair[1]);
        }
    }
}
