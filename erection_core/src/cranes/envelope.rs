//! Capacity envelope: a conservative polygon approximation of a crane load
//! chart in (load weight, lift height) space.
//!
//! The polygon runs through
//!
//! ```text
//! height
//!   ^
//!   |(0,Hmax)----(Cmin,Hmax)
//!   |                 \
//!   |                  \
//!   |                 (Cmax,Hmin)
//!   |                    |
//!   +(0,0)-----------(Cmax,0)----> weight
//! ```
//!
//! Points on the boundary count as liftable, so the origin is always inside.

use serde::{Deserialize, Serialize};

use crate::errors::{ErectionError, ErectionResult};

/// Boundary tolerance for point-on-edge tests (tonnes / meters).
const EDGE_TOLERANCE: f64 = 1e-9;

/// A vertex of the envelope polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePoint {
    pub weight_t: f64,
    pub height_m: f64,
}

impl EnvelopePoint {
    pub fn new(weight_t: f64, height_m: f64) -> Self {
        EnvelopePoint { weight_t, height_m }
    }
}

/// Closed polygon bounding the loads a crane configuration can lift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityEnvelope {
    vertices: Vec<EnvelopePoint>,
}

impl CapacityEnvelope {
    /// Build the five-vertex envelope from the extremes of a crane's spec rows.
    ///
    /// Fails with `DegenerateEnvelope` on a non-positive max capacity or max
    /// height, negative minima, or any non-finite value.
    pub fn from_limits(
        crane: &str,
        min_capacity_t: f64,
        max_capacity_t: f64,
        min_height_m: f64,
        max_height_m: f64,
    ) -> ErectionResult<Self> {
        let values = [min_capacity_t, max_capacity_t, min_height_m, max_height_m];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ErectionError::degenerate_envelope(crane, "non-finite capacity or height"));
        }
        if max_capacity_t <= 0.0 {
            return Err(ErectionError::degenerate_envelope(
                crane,
                format!("max capacity must be positive, got {max_capacity_t} t"),
            ));
        }
        if max_height_m <= 0.0 {
            return Err(ErectionError::degenerate_envelope(
                crane,
                format!("max lift height must be positive, got {max_height_m} m"),
            ));
        }
        if min_capacity_t < 0.0 || min_height_m < 0.0 {
            return Err(ErectionError::degenerate_envelope(
                crane,
                "capacity and height must not be negative",
            ));
        }

        Ok(CapacityEnvelope {
            vertices: vec![
                EnvelopePoint::new(0.0, 0.0),
                EnvelopePoint::new(0.0, max_height_m),
                EnvelopePoint::new(min_capacity_t, max_height_m),
                EnvelopePoint::new(max_capacity_t, min_height_m),
                EnvelopePoint::new(max_capacity_t, 0.0),
            ],
        })
    }

    /// Polygon vertices in construction order.
    pub fn vertices(&self) -> &[EnvelopePoint] {
        &self.vertices
    }

    /// True if a load of `weight_t` can be lifted to `height_m`.
    ///
    /// Boundary-inclusive: points on an edge or vertex are inside.
    pub fn contains(&self, weight_t: f64, height_m: f64) -> bool {
        if !weight_t.is_finite() || !height_m.is_finite() {
            return false;
        }
        let p = EnvelopePoint::new(weight_t, height_m);
        let n = self.vertices.len();

        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            if on_segment(a, b, p) {
                return true;
            }
        }

        // Even-odd ray cast toward +weight
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.height_m > p.height_m) != (vj.height_m > p.height_m) {
                let crossing = vi.weight_t
                    + (p.height_m - vi.height_m) * (vj.weight_t - vi.weight_t) / (vj.height_m - vi.height_m);
                if p.weight_t < crossing {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Enclosed area (t·m), shoelace formula.
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                a.weight_t * b.height_m - b.weight_t * a.height_m
            })
            .sum();
        twice.abs() / 2.0
    }
}

fn on_segment(a: EnvelopePoint, b: EnvelopePoint, p: EnvelopePoint) -> bool {
    let cross = (b.weight_t - a.weight_t) * (p.height_m - a.height_m)
        - (b.height_m - a.height_m) * (p.weight_t - a.weight_t);
    let scale = (b.weight_t - a.weight_t).abs().max((b.height_m - a.height_m).abs()).max(1.0);
    if cross.abs() > EDGE_TOLERANCE * scale {
        return false;
    }
    let within = |lo: f64, hi: f64, v: f64| v >= lo.min(hi) - EDGE_TOLERANCE && v <= lo.max(hi) + EDGE_TOLERANCE;
    within(a.weight_t, b.weight_t, p.weight_t) && within(a.height_m, b.height_m, p.height_m)
}
