// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded force-directed layout (Fruchterman-Reingold).
//!
//! Deterministic: nodes without a carried-over position are seeded on a
//! circle around the viewport center in id order, so the same model in the
//! same viewport always settles in the same place. A fixed iteration count
//! stands in for convergence detection.

use std::collections::BTreeMap;

use crate::geom::{Bounds, Point};
use crate::model::{GraphModel, NodeId};

use super::{EdgeRoute, LayoutError, LayoutResult};

pub const DEFAULT_GRAVITY: f64 = 5.0;
pub const DEFAULT_SPEED: f64 = 5.0;
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Keeps node centers clear of the viewport edges.
const EDGE_PADDING: f64 = 16.0;

#[derive(Debug, Clone, Copy)]
pub struct ForceLayout {
    gravity: f64,
    speed: f64,
    iterations: usize,
}

impl ForceLayout {
    pub fn new(gravity: f64, speed: f64) -> Self {
        Self {
            gravity,
            speed,
            iterations: DEFAULT_ITERATIONS,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Runs the simulation to its iteration budget and clamps the result
    /// into `bounds`. Ids present in `previous` keep their old positions as
    /// the starting point, so incremental updates stay visually stable.
    pub fn compute(
        &self,
        model: &GraphModel,
        bounds: Bounds,
        previous: Option<&LayoutResult>,
    ) -> Result<LayoutResult, LayoutError> {
        let ids: Vec<&NodeId> = model.nodes().keys().collect();
        let n = ids.len();
        if n == 0 {
            return Err(LayoutError::EmptyModel);
        }

        let index: BTreeMap<&NodeId, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let center = bounds.center();
        let mut pos = seed_positions(&ids, center, bounds, previous);

        let area = (bounds.width * bounds.height).max(1.0);
        let k = (area / n as f64).sqrt();
        let max_displace = area.sqrt() / 10.0;
        let step = max_displace * (self.speed / 800.0);

        let mut disp = vec![(0.0_f64, 0.0_f64); n];
        for _ in 0..self.iterations {
            for d in &mut disp {
                *d = (0.0, 0.0);
            }

            // Pairwise repulsion.
            for i in 0..n {
                for j in (i + 1)..n {
                    let (ux, uy, dist) = direction(pos[i], pos[j]);
                    let force = k * k / dist;
                    disp[i].0 += ux * force;
                    disp[i].1 += uy * force;
                    disp[j].0 -= ux * force;
                    disp[j].1 -= uy * force;
                }
            }

            // Attraction along links; direction is ignored.
            for edge in model.edges() {
                let i = index[edge.source()];
                let j = index[edge.target()];
                if i == j {
                    continue;
                }
                let (ux, uy, dist) = direction(pos[i], pos[j]);
                let force = dist * dist / k;
                disp[i].0 -= ux * force;
                disp[i].1 -= uy * force;
                disp[j].0 += ux * force;
                disp[j].1 += uy * force;
            }

            // Gravity pulls everything toward the viewport center.
            for i in 0..n {
                disp[i].0 -= (pos[i].x - center.x) * self.gravity * 0.01;
                disp[i].1 -= (pos[i].y - center.y) * self.gravity * 0.01;
            }

            for i in 0..n {
                let len = (disp[i].0 * disp[i].0 + disp[i].1 * disp[i].1).sqrt();
                if len > 0.0 {
                    let limited = len.min(step);
                    pos[i].x += disp[i].0 / len * limited;
                    pos[i].y += disp[i].1 / len * limited;
                }
            }
        }

        let positions: BTreeMap<NodeId, Point> = ids
            .iter()
            .zip(&pos)
            .map(|(id, p)| ((*id).clone(), bounds.clamp(*p, EDGE_PADDING)))
            .collect();

        let routes = model
            .edges()
            .iter()
            .map(|edge| {
                EdgeRoute::new(vec![positions[edge.source()], positions[edge.target()]])
            })
            .collect();

        Ok(LayoutResult::new(positions, BTreeMap::new(), routes))
    }
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY, DEFAULT_SPEED)
    }
}

/// Unit vector from `b` to `a` plus the (floored) distance between them.
/// Coincident points repel along a fixed axis instead of dividing by zero.
fn direction(a: Point, b: Point) -> (f64, f64, f64) {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < 1e-9 {
        (1.0, 0.0, 0.01)
    } else {
        (dx / dist, dy / dist, dist)
    }
}

fn seed_positions(
    ids: &[&NodeId],
    center: Point,
    bounds: Bounds,
    previous: Option<&LayoutResult>,
) -> Vec<Point> {
    let radius = (bounds.width.min(bounds.height) / 4.0).max(10.0);
    let n = ids.len();
    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            if let Some(p) = previous.and_then(|prev| prev.position(id)) {
                return p;
            }
            let angle = i as f64 / n as f64 * std::f64::consts::TAU;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}
