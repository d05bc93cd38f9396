//! Arc decomposition
//!
//! Converts G2/G3 moves into linear segments. The arc is described by its
//! start point, the center offset (I/J/K words) and a direction; the end
//! point and step length are supplied at subdivision time.

use crate::coord_system::ArcPlane;
use crate::vector::{Axis, Vector};
use std::f64::consts::TAU;

/// Fewest segments an arc is split into
pub const MIN_ARC_SEGMENTS: usize = 8;

/// Segments for a full turn; the cap scales with the swept fraction
pub const MAX_ARC_SEGMENTS: usize = 360;

/// Sweeps closer to zero than this count as a full turn
const SWEEP_EPSILON: f64 = 1e-9;

/// Direction of a circular move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcDirection {
    /// G2
    Clockwise,
    /// G3
    CounterClockwise,
}

/// Circular move awaiting subdivision
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    start: Vector,
    direction: ArcDirection,
    /// I, J, K offsets stored in the x, y, z slots
    center_offset: Vector,
    plane: ArcPlane,
}

impl Arc {
    pub fn new(start: Vector, direction: ArcDirection, center_offset: Vector, plane: ArcPlane) -> Self {
        Self {
            start,
            direction,
            center_offset,
            plane,
        }
    }

    pub fn direction(&self) -> ArcDirection {
        self.direction
    }

    pub fn plane(&self) -> ArcPlane {
        self.plane
    }

    /// Circle center in plane coordinates
    pub fn center(&self) -> (f64, f64) {
        let (a, b, _) = self.plane.axes();
        (
            self.start.get(a).unwrap_or(0.0) + self.center_offset.get(a).unwrap_or(0.0),
            self.start.get(b).unwrap_or(0.0) + self.center_offset.get(b).unwrap_or(0.0),
        )
    }

    pub fn radius(&self) -> f64 {
        let (a, b, _) = self.plane.axes();
        self.center_offset
            .get(a)
            .unwrap_or(0.0)
            .hypot(self.center_offset.get(b).unwrap_or(0.0))
    }

    fn start_angle(&self) -> f64 {
        let (a, b, _) = self.plane.axes();
        let oa = self.center_offset.get(a).unwrap_or(0.0);
        let ob = self.center_offset.get(b).unwrap_or(0.0);
        (-ob).atan2(-oa)
    }

    /// Signed swept angle towards `end` in radians
    ///
    /// Positive for counter-clockwise, negative for clockwise. An arc ending
    /// where it started sweeps a full turn.
    pub fn sweep(&self, end: &Vector) -> f64 {
        let (a, b, _) = self.plane.axes();
        let (ca, cb) = self.center();
        let ea = end.get(a).or(self.start.get(a)).unwrap_or(0.0);
        let eb = end.get(b).or(self.start.get(b)).unwrap_or(0.0);

        let mut sweep = (eb - cb).atan2(ea - ca) - self.start_angle();
        if sweep.abs() < SWEEP_EPSILON {
            sweep = 0.0;
        }
        match self.direction {
            ArcDirection::CounterClockwise if sweep <= 0.0 => sweep + TAU,
            ArcDirection::Clockwise if sweep >= 0.0 => sweep - TAU,
            _ => sweep,
        }
    }

    /// Number of segments used for the arc towards `end`
    pub fn segment_count(&self, end: &Vector, step: f64) -> usize {
        let sweep = self.sweep(end).abs();
        let length = self.radius() * sweep;
        let min = MIN_ARC_SEGMENTS as f64;
        let max = (MAX_ARC_SEGMENTS as f64 * sweep / TAU).max(min);
        let wanted = if step > 0.0 { length / step } else { max };
        (wanted.clamp(min, max).ceil() as usize).clamp(MIN_ARC_SEGMENTS, MAX_ARC_SEGMENTS)
    }

    /// Split the arc into linear moves ending at `end`
    ///
    /// The start point is not part of the output. Every segment carries the
    /// end feed rate and `end.e / n` of extrusion; the final segment equals
    /// `end` on X, Y, Z and F.
    pub fn subdivide(&self, end: &Vector, step: f64) -> Vec<Vector> {
        let (a, b, linear) = self.plane.axes();
        let (ca, cb) = self.center();
        let radius = self.radius();
        let start_angle = self.start_angle();
        let sweep = self.sweep(end);
        let count = self.segment_count(end, step);

        let start_linear = self.start.get(linear).unwrap_or(0.0);
        let end_linear = end.get(linear).unwrap_or(start_linear);
        let feed = end.f.or(self.start.f);
        let e = end.e.unwrap_or(0.0) / count as f64;

        let mut segments = Vec::with_capacity(count);
        for i in 1..=count {
            let fraction = i as f64 / count as f64;
            let angle = start_angle + sweep * fraction;
            let mut segment = Vector::new();
            segment.set(a, Some(ca + radius * angle.cos()));
            segment.set(b, Some(cb + radius * angle.sin()));
            segment.set(linear, Some(start_linear + (end_linear - start_linear) * fraction));
            segment.e = Some(e);
            segment.f = feed;
            segments.push(segment);
        }

        if let Some(last) = segments.last_mut() {
            for axis in [Axis::X, Axis::Y, Axis::Z, Axis::F] {
                if let Some(v) = end.get(axis) {
                    last.set(axis, Some(v));
                }
            }
        }

        tracing::trace!(
            "Arc {:?} in {} split into {} segments (sweep {:.4} rad)",
            self.direction,
            self.plane,
            count,
            sweep
        );
        segments
    }
}
